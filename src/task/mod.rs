//! Pipeline tasks.
//!
//! Each submodule implements one task; [`Task`] is the dispatch surface
//! used by CLI targets and the file watcher. Destination conventions:
//!
//! | Task       | Destination                               |
//! |------------|-------------------------------------------|
//! | styles     | `.tmp/styles`                             |
//! | scripts    | `.tmp/scripts`                            |
//! | fonts      | `.tmp/fonts` (serve) / `dist/fonts` (build) |
//! | html       | `dist` (bundles and pages)                |
//! | images     | `dist/images`                             |
//! | extras     | `dist`                                    |
//! | inject     | rewrites sources under `app/`             |

pub mod clean;
pub mod extras;
pub mod fonts;
pub mod html;
pub mod images;
pub mod inject;
pub mod scripts;
pub mod styles;

use std::ops::Add;

use anyhow::Result;

/// One unit of pipeline work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    StylesSass,
    StylesLess,
    Scripts,
    Html,
    Images,
    Fonts,
    Extras,
    Inject,
}

impl Task {
    /// Log prefix for this task.
    pub fn label(self) -> &'static str {
        match self {
            Self::StylesSass | Self::StylesLess => "styles",
            Self::Scripts => "scripts",
            Self::Html => "html",
            Self::Images => "images",
            Self::Fonts => "fonts",
            Self::Extras => "extras",
            Self::Inject => "inject",
        }
    }

    /// Run the task against the global config.
    pub fn run(self) -> Result<Report> {
        let config = crate::config::cfg();
        self.run_with(&config)
    }

    /// Run the task against an explicit config.
    pub fn run_with(self, config: &crate::config::PipelineConfig) -> Result<Report> {
        match self {
            Self::StylesSass => styles::run_sass(config),
            Self::StylesLess => styles::run_less(config),
            Self::Scripts => scripts::run(config),
            Self::Html => html::run(config),
            Self::Images => images::run(config),
            Self::Fonts => fonts::run(config),
            Self::Extras => extras::run(config),
            Self::Inject => inject::run(config),
        }
    }
}

/// Outcome summary of a task run.
///
/// Per-file failures that a task tolerates (styles, images) are counted
/// in `failed` rather than aborting the task.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Report {
    pub fn processed(count: usize) -> Self {
        Self {
            processed: count,
            ..Self::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl Add for Report {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            processed: self.processed + other.processed,
            skipped: self.skipped + other.skipped,
            failed: self.failed + other.failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_add() {
        let a = Report {
            processed: 2,
            skipped: 1,
            failed: 0,
        };
        let b = Report {
            processed: 1,
            skipped: 0,
            failed: 1,
        };
        let sum = a + b;
        assert_eq!(sum.processed, 3);
        assert_eq!(sum.skipped, 1);
        assert!(!sum.is_clean());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Task::StylesSass.label(), "styles");
        assert_eq!(Task::StylesLess.label(), "styles");
        assert_eq!(Task::Inject.label(), "inject");
    }
}
