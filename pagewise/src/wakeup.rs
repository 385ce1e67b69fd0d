//! Wakeup channel for snapshot emission.
//!
//! A render loop blocks while nothing changes. Every time a paged source
//! emits a new snapshot it sends a wakeup signal, and the loop re-renders.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

/// Sender half of the wakeup channel.
#[derive(Clone, Debug)]
pub struct WakeupSender {
    tx: mpsc::Sender<()>,
}

impl WakeupSender {
    /// Send a wakeup signal.
    ///
    /// Non-blocking. A full buffer already guarantees a pending render, and a
    /// dropped receiver means the loop is gone, so both errors are ignored.
    pub fn send(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Receiver half of the wakeup channel.
#[derive(Debug)]
pub struct WakeupReceiver {
    rx: mpsc::Receiver<()>,
}

impl WakeupReceiver {
    /// Wait for a wakeup signal.
    ///
    /// Returns `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Take a pending signal without waiting.
    pub fn try_recv(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }

    /// Drain all pending wakeup signals, returning how many were collapsed.
    ///
    /// Several snapshots emitted between two frames only need one render.
    pub fn drain(&mut self) -> usize {
        let mut drained = 0;
        while self.rx.try_recv().is_ok() {
            drained += 1;
        }
        drained
    }
}

/// Create a new wakeup channel pair.
pub fn channel() -> (WakeupSender, WakeupReceiver) {
    let (tx, rx) = mpsc::channel(16);
    (WakeupSender { tx }, WakeupReceiver { rx })
}

/// Slot for a wakeup sender that is installed after construction.
///
/// Sources are usually created before the render loop that listens to them,
/// so the sender is plugged in later. All clones share the same slot.
#[derive(Debug, Default, Clone)]
pub struct WakeupHandle {
    inner: Arc<Mutex<Option<WakeupSender>>>,
}

impl WakeupHandle {
    /// Create a new empty handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a wakeup sender, replacing any previous one.
    pub fn install(&self, sender: WakeupSender) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = Some(sender);
        }
    }

    /// Send a wakeup signal if a sender is installed.
    pub fn send(&self) {
        if let Ok(guard) = self.inner.lock()
            && let Some(sender) = guard.as_ref()
        {
            sender.send();
        }
    }
}
