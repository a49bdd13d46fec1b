//! Latest-observation mailbox between the gesture collaborator and the tick.
use std::sync::{Arc, Weak};

use crossbeam_channel::{Receiver, Sender, TrySendError};

use super::hand::{HandObservation, HandSignal};

/// Single-slot channel carrying hand signals from any producer thread to the simulation
/// thread.
///
/// A new signal displaces the pending one, so the slot always holds the newest signal and
/// producers never block, however long the consumer goes without ticking.
#[derive(Debug)]
pub struct HandMailbox {
    tx: Sender<HandSignal>,
    rx: Receiver<HandSignal>,
    open: Arc<()>,
}

impl Default for HandMailbox {
    fn default() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(1);
        Self {
            tx,
            rx,
            open: Arc::new(()),
        }
    }
}

impl HandMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// A producer handle that can be moved to another thread.
    pub fn sender(&self) -> HandSender {
        HandSender {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
            open: Arc::downgrade(&self.open),
        }
    }

    /// Takes the pending signal, if any.
    pub fn take_latest(&self) -> Option<HandSignal> {
        self.rx.try_recv().ok()
    }

    /// Drops the pending signal.
    pub fn clear(&self) {
        while self.rx.try_recv().is_ok() {}
    }
}

/// Cloneable producer side of a [`HandMailbox`].
#[derive(Clone, Debug)]
pub struct HandSender {
    tx: Sender<HandSignal>,
    // Used only to evict a pending signal the consumer has not taken yet.
    rx: Receiver<HandSignal>,
    open: Weak<()>,
}

impl HandSender {
    /// Publishes a detection. Returns `false` once the mailbox is gone.
    pub fn observe(&self, observation: HandObservation) -> bool {
        self.publish(HandSignal::Detected(observation))
    }

    /// Publishes that no hand is visible anymore.
    pub fn lost(&self) -> bool {
        self.publish(HandSignal::Lost)
    }

    fn publish(&self, mut signal: HandSignal) -> bool {
        loop {
            if self.open.strong_count() == 0 {
                return false;
            }
            match self.tx.try_send(signal) {
                Ok(()) => return true,
                Err(TrySendError::Full(rejected)) => {
                    let _ = self.rx.try_recv();
                    signal = rejected;
                }
                Err(TrySendError::Disconnected(_)) => return false,
            }
        }
    }
}
