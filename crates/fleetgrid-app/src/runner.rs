//! Background execution of gateway calls

use std::sync::mpsc::Sender;
use std::thread;

/// Where gateway jobs run.
///
/// `Threaded` keeps the UI responsive; `Inline` runs the job on the caller's
/// thread so results are already queued when the call returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskRunner {
    #[default]
    Threaded,
    Inline,
}

impl TaskRunner {
    /// Run `job` and post its result to `sender`
    pub fn spawn<T, F>(&self, sender: &Sender<T>, job: F)
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        match self {
            TaskRunner::Threaded => {
                let sender = sender.clone();
                thread::spawn(move || {
                    // Receiver gone means the board was closed.
                    let _ = sender.send(job());
                });
            }
            TaskRunner::Inline => {
                let _ = sender.send(job());
            }
        }
    }
}
