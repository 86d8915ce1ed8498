// Input arbitration: remote input owns the channel whenever it reported this cycle

use std::sync::Mutex;

use super::intent::IntentPair;

/// Pick exactly one intent pair for the cycle
///
/// A remote pair preempts the local one even when it is (0, 0): an idle remote
/// still reports every cycle, while an idle local source may not report at all.
pub fn select(remote: Option<IntentPair>, local: Option<IntentPair>) -> IntentPair {
    remote.or(local).unwrap_or_else(IntentPair::none)
}

/// Single-slot mailbox for the remote intent
///
/// Written from the transport callback, read-and-cleared by the control loop.
#[derive(Debug, Default)]
pub struct RemoteMailbox {
    slot: Mutex<Option<IntentPair>>,
}

impl RemoteMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the latest remote intent, replacing any unread one
    pub fn post(&self, pair: IntentPair) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(pair);
    }

    /// Take the pending intent, leaving the slot empty
    pub fn take(&self) -> Option<IntentPair> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}
