use tokio_util::sync::CancellationToken;
use tracing::info;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// Registered SIGINT/SIGTERM (Ctrl-C on Windows) handlers.
///
/// Registration happens in [`ShutdownSignal::install`], before anything
/// touches the panel; from then on an interrupt no longer kills the process
/// and the run always reaches its clean-up.
#[derive(Debug)]
pub struct ShutdownSignal {
    #[cfg(unix)]
    interrupt: Signal,
    #[cfg(unix)]
    terminate: Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl ShutdownSignal {
    /// Must be called from within a tokio runtime.
    pub fn install() -> std::io::Result<Self> {
        #[cfg(unix)]
        {
            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
            })
        }

        #[cfg(windows)]
        {
            Ok(Self {
                ctrl_c: tokio::signal::windows::ctrl_c()?,
            })
        }
    }

    /// Wait for a shutdown signal, then cancel `token` so the watch loop and
    /// one-shot draws stop at their next blocking point.
    pub async fn wait(mut self, token: CancellationToken) {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = self.interrupt.recv() => {
                    info!(event = "core.shutdown.signal_received", signal = "SIGINT");
                }
                _ = self.terminate.recv() => {
                    info!(event = "core.shutdown.signal_received", signal = "SIGTERM");
                }
            }
        }

        #[cfg(windows)]
        {
            self.ctrl_c.recv().await;
            info!(event = "core.shutdown.signal_received", signal = "CTRL_C");
        }

        token.cancel();
    }
}
