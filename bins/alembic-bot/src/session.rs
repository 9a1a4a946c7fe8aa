//! Per-chat input sessions.
//!
//! A command that needs numbers puts the chat into an awaiting state; the
//! next plain-text message is read as that input. A pending state older than
//! the timeout is treated as idle.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use alembic_core::UserId;

/// What a chat is waiting to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    /// Cube, vapor and distillate temperatures.
    Strength,
    /// Batch volume and strength.
    Fractions,
    /// Raw spirit volume.
    Speed,
    /// Six constants.
    SetConstants,
}

/// Awaiting states keyed by chat, with the time each was entered.
pub struct Sessions {
    pending: HashMap<UserId, (Pending, Instant)>,
    timeout: Duration,
}

impl Sessions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: HashMap::new(),
            timeout,
        }
    }

    /// Enter the awaiting state for `user`, replacing any previous one.
    pub fn begin(&mut self, user: UserId, pending: Pending) {
        self.pending.insert(user, (pending, Instant::now()));
    }

    /// Current awaiting state, dropping it if it has timed out.
    pub fn current(&mut self, user: UserId) -> Option<Pending> {
        let (pending, since) = *self.pending.get(&user)?;
        if since.elapsed() >= self.timeout {
            self.pending.remove(&user);
            return None;
        }
        Some(pending)
    }

    /// Return `user` to idle.
    pub fn finish(&mut self, user: UserId) -> Option<Pending> {
        self.pending.remove(&user).map(|(pending, _)| pending)
    }

    /// Drop every timed-out state. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.pending.len();
        let timeout = self.timeout;
        self.pending.retain(|_, (_, since)| since.elapsed() < timeout);
        before - self.pending.len()
    }

    /// Chats currently awaiting input (including not yet pruned ones).
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
