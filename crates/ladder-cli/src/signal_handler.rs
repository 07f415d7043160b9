//! Ctrl+C handling: the first interrupt cancels the in-flight call, a second exits

use futures::stream::StreamExt;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook_tokio::{Handle, Signals};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Signal listener bound to one cancellation token
pub struct SignalHandler {
    handle: Handle,
    task_handle: Option<JoinHandle<()>>,
}

impl SignalHandler {
    /// Start listening; interrupts cancel `token`
    pub fn start(token: CancellationToken) -> std::io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        let handle = signals.handle();

        let task_handle = tokio::spawn(async move {
            while let Some(signal) = signals.next().await {
                match signal {
                    SIGINT | SIGTERM => {
                        if token.is_cancelled() {
                            eprintln!("\nExiting.");
                            std::process::exit(130);
                        }
                        eprintln!("\n🛑 Cancelling request... (Ctrl+C again to exit)");
                        token.cancel();
                    }
                    _ => {}
                }
            }
        });

        Ok(Self {
            handle,
            task_handle: Some(task_handle),
        })
    }
}

impl Drop for SignalHandler {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(task) = self.task_handle.take() {
            task.abort();
        }
    }
}
