//! Clean task: remove the staging and dist trees.
//!
//! Source (`app/`), vendor packages and the test harness are never
//! touched.

use std::{fs, io, path::Path};

use anyhow::{Context, Result};

use crate::{config::PipelineConfig, log};

pub fn run(config: &PipelineConfig) -> Result<()> {
    remove_tree(&config.paths.staging)?;
    remove_tree(&config.paths.dist)?;
    log!("clean"; "removed {} and {}",
        config.root_relative(&config.paths.staging).display(),
        config.root_relative(&config.paths.dist).display());
    Ok(())
}

fn remove_tree(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("failed to remove {}", dir.display()))
        }
    }
}
