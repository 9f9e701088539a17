//! Development server: pre-build, watch, serve, live reload.
//!
//! Lifecycle:
//! 1. Bind HTTP (and WebSocket) ports early so conflicts fail fast.
//! 2. Run the target's pre-build so first requests see fresh assets.
//! 3. Spawn the watcher thread, which re-runs tasks and pushes reloads.
//! 4. Loop on requests with a small rayon pool until Ctrl+C unblocks
//!    the listener.

mod lifecycle;
mod response;
mod roots;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use crossbeam::channel::bounded;

use crate::{
    cli::ServeTarget,
    config::PipelineConfig,
    core, debug, log, logger,
    reload::ReloadServer,
    task::{self, Report, Task},
    watch::{self, ChangeKind, router},
};

use roots::ServeRoots;

/// Worker threads for the request loop.
const REQUEST_WORKERS: usize = 4;

pub fn run(config: Arc<PipelineConfig>, target: ServeTarget) -> Result<()> {
    let (server, port) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    core::register_server(Arc::clone(&server), shutdown_tx);

    // Dist is a static preview of the built site; nothing to watch.
    let watch = config.serve.watch && target != ServeTarget::Dist;
    let reload = if watch {
        Some(Arc::new(ReloadServer::start(config.serve.reload_port)?))
    } else {
        None
    };
    let ws_port = reload.as_ref().map(|r| r.port);

    prebuild(&config, target)?;

    let watcher = watch.then(|| {
        let config = Arc::clone(&config);
        let reload = reload.clone();
        let shutdown = shutdown_rx.clone();
        std::thread::spawn(move || {
            log!(
                "watch";
                "watching {}",
                config.root_relative(&config.paths.app).display()
            );
            if let Err(err) = watch::run(&config, &shutdown, |changes| {
                handle_changes(&config, reload.as_deref(), changes);
            }) {
                log!("error"; "watcher stopped: {err:#}");
            }
        })
    });

    log!(
        "serve";
        "{} ready at http://{}:{}/",
        target.label(),
        config.serve.interface,
        port
    );
    if let Some(ws) = ws_port {
        debug!("serve"; "live reload on ws://127.0.0.1:{ws}");
    }

    let roots = ServeRoots::for_target(&config, target);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_WORKERS)
        .build()?;

    pool.scope(|scope| {
        loop {
            match server.recv() {
                Ok(request) => {
                    let roots = &roots;
                    scope.spawn(move |_| response::handle(request, roots, ws_port));
                }
                // Unblocked by the Ctrl+C handler, or the socket died
                Err(err) => {
                    if !core::is_shutdown() {
                        log!("error"; "request loop: {err}");
                    }
                    break;
                }
            }
            if core::is_shutdown() {
                break;
            }
        }
    });

    if let Some(reload) = &reload {
        reload.shutdown();
    }
    if let Some(handle) = watcher {
        handle.join().ok();
    }
    log!("serve"; "stopped");
    Ok(())
}

/// Bring assets up to date before the first request.
fn prebuild(config: &PipelineConfig, target: ServeTarget) -> Result<()> {
    match target {
        ServeTarget::Dev => {
            Task::Inject.run_with(config)?;

            let (styles, scripts) = rayon::join(
                || -> Result<Report> {
                    let (sass, less) = rayon::join(
                        || Task::StylesSass.run_with(config),
                        || Task::StylesLess.run_with(config),
                    );
                    Ok(sass? + less?)
                },
                || Task::Scripts.run_with(config),
            );
            let report = styles? + scripts? + Task::Fonts.run_with(config)?;
            debug!("serve"; "prepared {} file(s)", report.processed);
        }
        ServeTarget::Dist => {
            task::clean::run(config)?;
            crate::cli::build::run(config)?;
        }
        ServeTarget::Test => {
            Task::Scripts.run_with(config)?;
        }
    }
    Ok(())
}

/// React to one debounced change batch from the watcher.
fn handle_changes(
    config: &PipelineConfig,
    reload: Option<&ReloadServer>,
    changes: Vec<(PathBuf, ChangeKind)>,
) {
    let plan = router::plan(config, &changes);
    if plan.is_empty() {
        return;
    }

    let reason = plan
        .trigger
        .as_ref()
        .map(|p| config.root_relative(p).display().to_string())
        .unwrap_or_else(|| "change".to_string());

    let mut failed = false;
    for task in &plan.tasks {
        if let Err(err) = task.run_with(config) {
            logger::status_error(&format!("{} failed: {reason}", task.label()), &format!("{err:#}"));
            failed = true;
        }
    }
    if failed {
        return;
    }

    if plan.reload {
        if let Some(server) = reload {
            server.reload(&reason);
        }
    }

    let suffix = match changes.len() {
        0 | 1 => String::new(),
        n => format!(" (+{} more)", n - 1),
    };
    logger::status_success(&format!("{reason}{suffix}"));
}
