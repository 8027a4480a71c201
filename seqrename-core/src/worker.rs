use crate::observer::forward;
use crate::{CancelToken, RenameError, RenameEvent, Renamer, RunOutcome};
use std::sync::mpsc::{self, Receiver, Sender, TryIter};
use std::thread::{self, JoinHandle};

/// A rename run on its own thread, reporting back through a channel.
///
/// Every run ends with exactly one terminal event: `Finished`, `Cancelled` or `Failed`.
/// Dropping the worker cancels the run and joins the thread.
pub struct RenameWorker {
    events: Receiver<RenameEvent>,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
}

impl RenameWorker {
    pub fn spawn(renamer: Renamer) -> Result<Self, RenameError> {
        let cancel = renamer.cancel_token();

        Self::spawn_with(cancel, move |tx| match renamer.run(tx) {
            Ok(RunOutcome::Completed) => {}
            Ok(RunOutcome::Cancelled { completed }) => {
                forward(tx, RenameEvent::Cancelled { completed });
            }
            Err(e) => forward(tx, RenameEvent::Failed(e)),
        })
    }

    /// Runs `job` on the worker thread. The job is responsible for sending a terminal event.
    pub fn spawn_with<F>(cancel: CancelToken, job: F) -> Result<Self, RenameError>
    where
        F: FnOnce(&mut Sender<RenameEvent>) + Send + 'static,
    {
        let (tx, events) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("seqrename-worker".to_string())
            .spawn(move || {
                let mut tx = tx;
                job(&mut tx);
            })
            .map_err(RenameError::Spawn)?;

        Ok(Self {
            events,
            cancel,
            handle: Some(handle),
        })
    }

    /// Events produced so far, without blocking
    pub fn try_iter(&self) -> TryIter<'_, RenameEvent> {
        self.events.try_iter()
    }

    /// Asks the run to stop before its next file
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Waits for the run to end and returns the events nobody drained yet
    pub fn join(mut self) -> Result<Vec<RenameEvent>, RenameError> {
        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| RenameError::WorkerPanicked)?;
        }
        Ok(self.events.try_iter().collect())
    }
}

impl Drop for RenameWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.cancel.cancel();
            if handle.join().is_err() {
                log::warn!("Rename worker panicked");
            }
        }
    }
}
