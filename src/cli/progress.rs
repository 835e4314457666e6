//! Terminal spinner shown while waiting on the model

use std::io::{self, Write};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Animated spinner drawn on stderr by a background task
pub struct Spinner {
    message: String,
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Spinner {
    /// Start spinning; must be called inside a tokio runtime
    pub fn start(message: impl Into<String>) -> Self {
        let message = message.into();
        let (stop, mut stopped) = watch::channel(false);
        let label = message.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FRAME_INTERVAL);
            let mut frame = 0;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let mut stderr = io::stderr();
                        let _ = write!(stderr, "\r{} {}", FRAMES[frame], label);
                        let _ = stderr.flush();
                        frame = (frame + 1) % FRAMES.len();
                    }
                    _ = stopped.changed() => break,
                }
            }
        });

        Self {
            message,
            stop,
            handle,
        }
    }

    /// Stop the animation and print the final status line
    pub async fn finish(self, success: bool) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;

        let icon = if success { "✓" } else { "✗" };
        eprintln!("\r{} {}", icon, self.message);
    }
}
