use crate::error::SdkResult;
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A point in time derived from a caller supplied timeout.
///
/// Timeouts too large to be represented as an `Instant` never expire.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Deadline(Option<Instant>);

impl Deadline {
    pub(crate) fn after(timeout: Duration) -> Self {
        Deadline(Instant::now().checked_add(timeout))
    }

    pub(crate) fn remaining(&self) -> Duration {
        match self.0 {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => Duration::MAX,
        }
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// Outcome of a one-shot operation, shared by every caller waiting for it.
///
/// Each waiter applies its own timeout; the first completion is kept.
#[derive(Debug, Default)]
pub(crate) struct Completion {
    result: Mutex<Option<SdkResult>>,
    done: Condvar,
}

impl Completion {
    pub(crate) fn complete(&self, result: SdkResult) {
        let mut slot = self.result.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(result);
        }
        self.done.notify_all();
    }

    pub(crate) fn wait(&self, timeout: Duration) -> Option<SdkResult> {
        let slot = self.result.lock().unwrap_or_else(PoisonError::into_inner);
        let (slot, _) = self
            .done
            .wait_timeout_while(slot, timeout, |result| result.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        slot.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn zero_timeout_is_expired() {
        assert!(Deadline::after(Duration::ZERO).is_expired());
    }

    #[test]
    fn huge_timeout_never_expires() {
        let deadline = Deadline::after(Duration::MAX);
        assert!(!deadline.is_expired());
        assert_eq!(deadline.remaining(), Duration::MAX);
    }

    #[test]
    fn completion_keeps_first_result() {
        let completion = Completion::default();
        assert_eq!(completion.wait(Duration::from_millis(10)), None);

        completion.complete(Err(SdkError::AlreadyShutdown));
        completion.complete(Ok(()));
        assert_eq!(
            completion.wait(Duration::ZERO),
            Some(Err(SdkError::AlreadyShutdown))
        );
    }

    #[test]
    fn completion_wakes_waiters() {
        let completion = Arc::new(Completion::default());
        let waiter = {
            let completion = completion.clone();
            thread::spawn(move || completion.wait(Duration::from_secs(5)))
        };

        thread::sleep(Duration::from_millis(20));
        completion.complete(Ok(()));
        assert_eq!(waiter.join().unwrap(), Some(Ok(())));
    }
}
