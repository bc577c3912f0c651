//! Backend worker thread that owns the tokio runtime for the UI.

use std::thread;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::bounded;
use tokio::{runtime::Handle, sync::oneshot};

/// Keeps the backend runtime alive; dropping it shuts the worker down.
pub struct Backend {
    handle: Handle,
    _shutdown: oneshot::Sender<()>,
}

impl Backend {
    pub fn handle(&self) -> Handle {
        self.handle.clone()
    }
}

pub fn spawn_backend_thread() -> Result<Backend> {
    let (handle_tx, handle_rx) = bounded::<Result<Handle, String>>(1);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    thread::Builder::new()
        .name("pixeltype-backend".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    tracing::error!("failed to build backend runtime: {err}");
                    let _ = handle_tx.send(Err(err.to_string()));
                    return;
                }
            };
            let _ = handle_tx.send(Ok(runtime.handle().clone()));
            runtime.block_on(async move {
                let _ = shutdown_rx.await;
            });
            tracing::debug!("backend worker stopped");
        })
        .context("failed to spawn backend thread")?;

    let handle = handle_rx
        .recv()
        .context("backend thread exited before starting")?
        .map_err(|err| anyhow!("backend worker startup failure: {err}"))?;
    Ok(Backend {
        handle,
        _shutdown: shutdown_tx,
    })
}
