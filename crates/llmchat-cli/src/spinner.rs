use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Animated label shown while a reply is pending
pub struct Spinner {
    running: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(label: &str, colored: bool) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let label = if colored {
            label.blue().bold().to_string()
        } else {
            label.to_string()
        };

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(80));
            let mut frame = 0;
            while flag.load(Ordering::Relaxed) {
                ticker.tick().await;
                if !flag.load(Ordering::Relaxed) {
                    break;
                }
                print!("\r{label} {} ", FRAMES[frame]);
                io::stdout().flush().ok();
                frame = (frame + 1) % FRAMES.len();
            }
        });

        Self {
            running,
            task: Some(task),
        }
    }

    /// Stop the animation and print `line` in its place
    pub async fn finish(mut self, line: &str) {
        self.halt();
        if let Some(task) = self.task.take() {
            task.await.ok();
        }
        print!("\r\x1b[K{line}");
        io::stdout().flush().ok();
    }

    fn halt(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            self.halt();
            task.abort();
            print!("\r\x1b[K");
            io::stdout().flush().ok();
        }
    }
}
