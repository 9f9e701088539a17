//! Vendor dependency manifest (`vendor.json`).
//!
//! The manifest lists front-end packages installed under the vendor
//! directory. Each listed package is resolved to its main files via the
//! `main` field of `vendor/<name>/package.json`, falling back to
//! `<name>.js` / `<name>.css` in the package root when no metadata exists.
//!
//! Resolution degrades instead of failing: a missing manifest yields an
//! empty package list with a warning, and a package directory that can't
//! be resolved is skipped. Tasks that consume vendor files (fonts,
//! inject) keep working on local sources either way.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use serde::Deserialize;

use crate::{log, utils::walk::has_ext};

/// Extensions considered font files when gathering from vendor packages.
pub const FONT_EXTENSIONS: &[&str] = &["eot", "svg", "ttf", "woff", "woff2"];

/// Parsed `vendor.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorManifest {
    /// Package name -> version requirement. Versions are informational;
    /// resolution only uses the names.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

/// A vendor package with its resolved main files.
#[derive(Debug, Clone)]
pub struct VendorPackage {
    pub name: String,
    /// Absolute paths to the package's main files, in manifest order.
    pub mains: Vec<PathBuf>,
}

/// `main` field of a package.json, either one entry or several.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MainField {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct PackageMeta {
    main: Option<MainField>,
}

impl VendorManifest {
    /// Load the manifest from disk.
    ///
    /// A missing file is not an error: vendor-aware tasks degrade to
    /// local sources only.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log!("warning"; "{} not found, skipping vendor packages", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(manifest) => Ok(manifest),
            Err(err) => {
                log!("warning"; "failed to parse {}: {err}", path.display());
                Ok(Self::default())
            }
        }
    }

    /// Resolve every listed dependency to its main files.
    ///
    /// Packages that don't exist under `vendor_dir` or resolve to no
    /// files are skipped with a warning.
    pub fn packages(&self, vendor_dir: &Path) -> Vec<VendorPackage> {
        self.dependencies
            .keys()
            .filter_map(|name| {
                let pkg_dir = vendor_dir.join(name);
                if !pkg_dir.is_dir() {
                    log!("warning"; "vendor package '{name}' not found in {}", vendor_dir.display());
                    return None;
                }

                let mains = resolve_mains(name, &pkg_dir);
                if mains.is_empty() {
                    log!("warning"; "vendor package '{name}' has no main files");
                    return None;
                }

                Some(VendorPackage {
                    name: name.clone(),
                    mains,
                })
            })
            .collect()
    }

    /// All font files shipped by listed packages.
    ///
    /// Searches whole package trees rather than just main files since
    /// fonts are conventionally shipped alongside a CSS main.
    pub fn font_files(&self, vendor_dir: &Path) -> Vec<PathBuf> {
        self.packages(vendor_dir)
            .iter()
            .flat_map(|pkg| {
                crate::utils::walk::files_recursive(&vendor_dir.join(&pkg.name))
                    .into_iter()
                    .filter(|path| has_ext(path, FONT_EXTENSIONS))
            })
            .collect()
    }
}

/// Resolve a package's main files from its package.json.
fn resolve_mains(name: &str, pkg_dir: &Path) -> Vec<PathBuf> {
    let meta_path = pkg_dir.join("package.json");
    let declared = fs::read_to_string(&meta_path)
        .ok()
        .and_then(|content| serde_json::from_str::<PackageMeta>(&content).ok())
        .and_then(|meta| meta.main);

    let entries = match declared {
        Some(MainField::One(main)) => vec![main],
        Some(MainField::Many(mains)) => mains,
        // No metadata: conventional <name>.js / <name>.css fallback
        None => vec![format!("{name}.js"), format!("{name}.css")],
    };

    entries
        .iter()
        .map(|entry| pkg_dir.join(entry))
        .filter(|path| path.is_file())
        .collect()
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_pkg(vendor: &Path, name: &str, meta: Option<&str>, files: &[&str]) {
        let dir = vendor.join(name);
        fs::create_dir_all(&dir).unwrap();
        if let Some(meta) = meta {
            fs::write(dir.join("package.json"), meta).unwrap();
        }
        for file in files {
            let path = dir.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x").unwrap();
        }
    }

    fn manifest(deps: &[&str]) -> VendorManifest {
        VendorManifest {
            dependencies: deps
                .iter()
                .map(|name| (name.to_string(), "^1.0.0".to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_load_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let loaded = VendorManifest::load(&dir.path().join("vendor.json")).unwrap();
        assert!(loaded.dependencies.is_empty());
    }

    #[test]
    fn test_load_malformed_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vendor.json");
        fs::write(&path, "{ not json").unwrap();
        let loaded = VendorManifest::load(&path).unwrap();
        assert!(loaded.dependencies.is_empty());
    }

    #[test]
    fn test_resolve_main_string() {
        let dir = TempDir::new().unwrap();
        write_pkg(
            dir.path(),
            "jquery",
            Some(r#"{"main": "dist/jquery.js"}"#),
            &["dist/jquery.js"],
        );

        let pkgs = manifest(&["jquery"]).packages(dir.path());
        assert_eq!(pkgs.len(), 1);
        assert_eq!(pkgs[0].mains, vec![dir.path().join("jquery/dist/jquery.js")]);
    }

    #[test]
    fn test_resolve_main_array() {
        let dir = TempDir::new().unwrap();
        write_pkg(
            dir.path(),
            "bootstrap",
            Some(r#"{"main": ["dist/css/bootstrap.css", "dist/js/bootstrap.js"]}"#),
            &["dist/css/bootstrap.css", "dist/js/bootstrap.js"],
        );

        let pkgs = manifest(&["bootstrap"]).packages(dir.path());
        assert_eq!(pkgs[0].mains.len(), 2);
    }

    #[test]
    fn test_resolve_fallback_names() {
        let dir = TempDir::new().unwrap();
        write_pkg(dir.path(), "normalize", None, &["normalize.css"]);

        let pkgs = manifest(&["normalize"]).packages(dir.path());
        assert_eq!(
            pkgs[0].mains,
            vec![dir.path().join("normalize/normalize.css")]
        );
    }

    #[test]
    fn test_missing_package_skipped() {
        let dir = TempDir::new().unwrap();
        write_pkg(dir.path(), "present", None, &["present.js"]);

        let pkgs = manifest(&["absent", "present"]).packages(dir.path());
        assert_eq!(pkgs.len(), 1);
        assert_eq!(pkgs[0].name, "present");
    }

    #[test]
    fn test_font_files() {
        let dir = TempDir::new().unwrap();
        write_pkg(
            dir.path(),
            "icons",
            Some(r#"{"main": "css/icons.css"}"#),
            &[
                "css/icons.css",
                "fonts/icons.woff",
                "fonts/icons.woff2",
                "fonts/icons.ttf",
                "readme.md",
            ],
        );

        let fonts = manifest(&["icons"]).font_files(dir.path());
        assert_eq!(fonts.len(), 3);
        assert!(fonts.iter().all(|f| has_ext(f, FONT_EXTENSIONS)));
    }
}
