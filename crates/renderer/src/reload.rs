//! Single-slot rendezvous between the source watcher and the render loop.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

/// Creates the watcher-to-render-loop handoff pair.
///
/// The underlying channel has zero capacity, so an [`offer`](ReloadSender::offer)
/// completes only once the render loop takes the value. That caps outstanding
/// reloads at one and means the watcher never reads the file again before the
/// previous contents were consumed, preserving write order.
pub(crate) fn reload_handoff() -> (ReloadSender, ReloadReceiver) {
    let (tx, rx) = bounded(0);
    (ReloadSender { tx }, ReloadReceiver { rx })
}

/// Producer half, owned by the watcher thread.
pub(crate) struct ReloadSender {
    tx: Sender<String>,
}

impl ReloadSender {
    /// Offers freshly read fragment source, blocking until the render loop
    /// accepts it. Returns `false` once the render loop is gone.
    pub(crate) fn offer(&self, source: String) -> bool {
        self.tx.send(source).is_ok()
    }
}

/// Consumer half, owned by the render loop.
pub(crate) struct ReloadReceiver {
    rx: Receiver<String>,
}

impl ReloadReceiver {
    /// Non-blocking poll for a pending fragment source.
    pub(crate) fn try_take(&self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(source) => Some(source),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;

    fn take_within(rx: &ReloadReceiver, timeout: Duration) -> String {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(source) = rx.try_take() {
                return source;
            }
            assert!(Instant::now() < deadline, "timed out waiting for an offer");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn try_take_on_idle_handoff_returns_none() {
        let (_tx, rx) = reload_handoff();
        assert!(rx.try_take().is_none());
    }

    #[test]
    fn offer_blocks_until_taken() {
        let (tx, rx) = reload_handoff();
        let delivered = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&delivered);
        let producer = thread::spawn(move || {
            assert!(tx.offer("source".into()));
            flag.store(true, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(50));
        assert!(!delivered.load(Ordering::SeqCst), "offer returned before take");

        assert_eq!(take_within(&rx, Duration::from_secs(5)), "source");
        producer.join().unwrap();
        assert!(delivered.load(Ordering::SeqCst));
    }

    #[test]
    fn offers_arrive_in_order() {
        let (tx, rx) = reload_handoff();
        let producer = thread::spawn(move || {
            assert!(tx.offer("first".into()));
            assert!(tx.offer("second".into()));
        });

        assert_eq!(take_within(&rx, Duration::from_secs(5)), "first");
        assert_eq!(take_within(&rx, Duration::from_secs(5)), "second");
        producer.join().unwrap();
    }

    #[test]
    fn offer_fails_once_receiver_is_gone() {
        let (tx, rx) = reload_handoff();
        drop(rx);
        assert!(!tx.offer("orphaned".into()));
    }
}
