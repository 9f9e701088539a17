//! File watching for serve mode.
//!
//! Architecture:
//! ```text
//! notify watcher -> Debouncer (pure timing) -> router (task planning) -> handler
//! ```
//!
//! The watcher thread owns the notify handle and loops on a crossbeam
//! select over raw events and the shutdown channel. Batches that survive
//! debouncing are planned into tasks by [`router`] and handed to the
//! caller's handler.

mod debounce;
pub mod router;

use std::path::PathBuf;

use anyhow::{Context, Result};
use crossbeam::channel::{Receiver, bounded, select};
use notify::{RecursiveMode, Watcher};

use crate::{config::PipelineConfig, debug};

use debounce::Debouncer;

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Watch the source tree until shutdown, feeding debounced batches to
/// `handler`. Blocks the calling thread.
pub fn run(
    config: &PipelineConfig,
    shutdown: &Receiver<()>,
    mut handler: impl FnMut(Vec<(PathBuf, ChangeKind)>),
) -> Result<()> {
    let (events_tx, events_rx) = bounded::<notify::Result<notify::Event>>(256);

    let mut watcher = notify::recommended_watcher(move |res| {
        events_tx.send(res).ok();
    })
    .context("failed to create file watcher")?;

    watcher
        .watch(&config.paths.app, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", config.paths.app.display()))?;
    if config.paths.manifest.exists() {
        watcher
            .watch(&config.paths.manifest, RecursiveMode::NonRecursive)
            .ok();
    }

    let mut debouncer = Debouncer::new();

    loop {
        select! {
            recv(events_rx) -> msg => match msg {
                Ok(Ok(event)) => debouncer.add_event(&event),
                Ok(Err(err)) => debug!("watch"; "notify error: {err}"),
                Err(_) => return Ok(()),
            },
            recv(shutdown) -> _ => return Ok(()),
            default(debouncer.sleep_duration()) => {}
        }

        if let Some(changes) = debouncer.take_if_ready() {
            let mut batch: Vec<_> = changes.into_iter().collect();
            batch.sort();
            handler(batch);
        }
    }
}
