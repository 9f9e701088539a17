//! Route debounced file changes to pipeline tasks.
//!
//! In a dev session only compiled sources need task re-runs; everything
//! else served straight from `app/` (pages, images) just triggers a
//! browser reload. A manifest change re-wires injection and re-gathers
//! fonts.

use std::path::{Path, PathBuf};

use crate::{config::PipelineConfig, task::Task, utils::walk::has_ext};

use super::ChangeKind;

/// Aggregated plan for one debounced batch.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WatchPlan {
    /// Tasks to re-run, deduplicated, in first-seen order.
    pub tasks: Vec<Task>,
    /// Whether connected browsers should reload afterwards.
    pub reload: bool,
    /// First changed path, for the reload reason.
    pub trigger: Option<PathBuf>,
}

impl WatchPlan {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && !self.reload
    }

    fn push_task(&mut self, task: Task) {
        if !self.tasks.contains(&task) {
            self.tasks.push(task);
        }
    }
}

/// Plan the response to a debounced change batch.
pub fn plan(config: &PipelineConfig, changes: &[(PathBuf, ChangeKind)]) -> WatchPlan {
    let mut plan = WatchPlan::default();

    for (path, _) in changes {
        let Some(route) = route_path(config, path) else {
            continue;
        };

        if plan.trigger.is_none() {
            plan.trigger = Some(path.clone());
        }
        plan.reload = true;
        for task in route {
            plan.push_task(task);
        }
    }

    plan
}

/// Tasks for one changed path, or `None` when the path is irrelevant.
///
/// An empty task list means reload-only.
fn route_path(config: &PipelineConfig, path: &Path) -> Option<Vec<Task>> {
    if *path == config.paths.manifest {
        return Some(vec![Task::Inject, Task::Fonts]);
    }

    // Outputs are not watched, but guard against configs nesting staging
    // or dist inside the app tree
    if path.starts_with(&config.paths.staging) || path.starts_with(&config.paths.dist) {
        return None;
    }

    if !path.starts_with(&config.paths.app) {
        return None;
    }

    if path.starts_with(config.paths.styles_dir()) {
        if has_ext(path, &["scss", "sass"]) {
            return Some(vec![Task::StylesSass]);
        }
        if has_ext(path, &["less"]) {
            return Some(vec![Task::StylesLess]);
        }
        return Some(vec![]);
    }

    if path.starts_with(config.paths.scripts_dir()) && has_ext(path, &["js"]) {
        return Some(vec![Task::Scripts]);
    }

    if path.starts_with(config.paths.fonts_dir()) {
        return Some(vec![Task::Fonts]);
    }

    // Pages, images and extras are served from app/ directly
    Some(vec![])
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.root = PathBuf::from("/proj");
        config.paths.normalize(Path::new("/proj"));
        config
    }

    fn changed(path: &str) -> (PathBuf, ChangeKind) {
        (PathBuf::from(path), ChangeKind::Modified)
    }

    #[test]
    fn test_scss_routes_to_sass_task() {
        let config = test_config();
        let plan = plan(&config, &[changed("/proj/app/styles/main.scss")]);
        assert_eq!(plan.tasks, vec![Task::StylesSass]);
        assert!(plan.reload);
    }

    #[test]
    fn test_less_and_scss_both_planned() {
        let config = test_config();
        let plan = plan(
            &config,
            &[
                changed("/proj/app/styles/a.scss"),
                changed("/proj/app/styles/b.less"),
                changed("/proj/app/styles/c.scss"),
            ],
        );
        assert_eq!(plan.tasks, vec![Task::StylesSass, Task::StylesLess]);
    }

    #[test]
    fn test_script_change() {
        let config = test_config();
        let plan = plan(&config, &[changed("/proj/app/scripts/lib/util.js")]);
        assert_eq!(plan.tasks, vec![Task::Scripts]);
    }

    #[test]
    fn test_page_and_image_reload_only() {
        let config = test_config();
        let plan = plan(
            &config,
            &[
                changed("/proj/app/index.html"),
                changed("/proj/app/images/logo.png"),
            ],
        );
        assert!(plan.tasks.is_empty());
        assert!(plan.reload);
        assert_eq!(plan.trigger, Some(PathBuf::from("/proj/app/index.html")));
    }

    #[test]
    fn test_manifest_change() {
        let config = test_config();
        let plan = plan(&config, &[changed("/proj/vendor.json")]);
        assert_eq!(plan.tasks, vec![Task::Inject, Task::Fonts]);
    }

    #[test]
    fn test_unrelated_path_ignored() {
        let config = test_config();
        let plan = plan(&config, &[changed("/proj/README.md")]);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_staging_ignored() {
        let config = test_config();
        let plan = plan(&config, &[changed("/proj/.tmp/styles/main.css")]);
        assert!(plan.is_empty());
    }
}
