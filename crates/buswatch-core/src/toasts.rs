// SPDX-License-Identifier: AGPL-3.0
// Buswatch Core - Toast bookkeeping
//
// The sink only tracks the active set and hands out ids; scheduling the
// 3-second expiry is the shell's job so the core stays timer-free.

use crate::types::{Toast, ToastKind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// How long a toast stays visible
pub const TOAST_TTL: Duration = Duration::from_secs(3);

/// Active toasts beyond this evict the oldest
pub const MAX_ACTIVE_TOASTS: usize = 8;

/// In-memory set of active toasts with strictly increasing ids
pub struct NotificationSink {
    toasts: RwLock<Vec<Toast>>,
    next_id: AtomicU64,
}

impl NotificationSink {
    pub fn new() -> Self {
        Self {
            toasts: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append a toast. Returns the new toast and, when the cap overflowed,
    /// the id of the evicted oldest toast.
    pub fn push(&self, message: impl Into<String>, kind: ToastKind) -> (Toast, Option<u64>) {
        let toast = Toast {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            message: message.into(),
            kind,
        };

        let mut toasts = self.toasts.write().unwrap();
        toasts.push(toast.clone());

        let evicted = if toasts.len() > MAX_ACTIVE_TOASTS {
            Some(toasts.remove(0).id)
        } else {
            None
        };

        (toast, evicted)
    }

    /// Remove exactly the toast with the given id. One toast's expiry can
    /// never take out another.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut toasts = self.toasts.write().unwrap();
        let before = toasts.len();
        toasts.retain(|toast| toast.id != id);
        toasts.len() != before
    }

    /// Snapshot of the active set
    pub fn active(&self) -> Vec<Toast> {
        self.toasts.read().unwrap().clone()
    }
}

impl Default for NotificationSink {
    fn default() -> Self {
        Self::new()
    }
}
