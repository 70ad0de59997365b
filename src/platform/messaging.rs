use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// The only way a notification can fail: nobody is listening.
///
/// This is expected whenever the popup is closed and callers should not treat
/// it as an error.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("receiving end does not exist")]
    ReceiverAbsent,
}

/// Fire-and-forget sender between the background service and the popup
#[derive(Debug)]
pub struct Notifier<T> {
    tx: Option<UnboundedSender<T>>,
}

impl<T> Clone for Notifier<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Notifier<T> {
    pub fn channel() -> (Self, UnboundedReceiver<T>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A notifier nobody will ever listen to
    pub fn detached() -> Self {
        Self { tx: None }
    }

    pub fn notify(&self, message: T) -> Result<(), NotifyError> {
        match &self.tx {
            Some(tx) => tx.send(message).map_err(|_| NotifyError::ReceiverAbsent),
            None => Err(NotifyError::ReceiverAbsent),
        }
    }

    /// Notify and swallow `ReceiverAbsent`, logging it at debug level.
    /// Returns whether the message was handed off.
    pub fn notify_best_effort(&self, message: T, what: &str) -> bool {
        match self.notify(message) {
            Ok(()) => true,
            Err(NotifyError::ReceiverAbsent) => {
                log::debug!("{what}: popup not listening");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivered_when_receiver_is_alive() {
        let (notifier, mut rx) = Notifier::channel();
        notifier.notify(7).unwrap();
        assert_eq!(rx.try_recv().unwrap(), 7);
    }

    #[test]
    fn dropped_receiver_is_receiver_absent() {
        let (notifier, rx) = Notifier::<u8>::channel();
        drop(rx);
        assert_eq!(notifier.notify(1), Err(NotifyError::ReceiverAbsent));
        assert!(!notifier.notify_best_effort(1, "test"));
    }

    #[test]
    fn detached_never_delivers() {
        let notifier = Notifier::<u8>::detached();
        assert_eq!(notifier.notify(1), Err(NotifyError::ReceiverAbsent));
    }
}
