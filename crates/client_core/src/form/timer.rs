use std::time::Duration;

use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

/// Timer expiries delivered back to the form controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSignal {
    LoadingFinished,
    DismissElapsed { generation: u64 },
}

/// A one-shot timer that posts `signal` after `delay`. Dropping the guard
/// cancels the timer if it has not fired yet.
#[derive(Debug)]
pub(crate) struct ScopedTimer {
    handle: JoinHandle<()>,
}

impl ScopedTimer {
    /// Must be called from within a tokio runtime.
    pub(crate) fn arm(
        delay: Duration,
        signal: FormSignal,
        signals: UnboundedSender<FormSignal>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = signals.send(signal);
        });
        Self { handle }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
