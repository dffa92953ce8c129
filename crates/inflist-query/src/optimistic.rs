#![forbid(unsafe_code)]

//! Two-phase optimistic updates.
//!
//! An edit is applied locally before the server confirms it, then either
//! reconciled against the server's answer or rolled back. [`Optimistic`]
//! keeps the last confirmed value plus an ordered list of pending deltas;
//! the visible value is always `confirmed` with every pending delta replayed
//! in application order.
//!
//! | From    | Event                      | To         | Visible value                    |
//! |---------|----------------------------|------------|----------------------------------|
//! | -       | `apply(delta)`             | Pending    | confirmed + all pending deltas   |
//! | Pending | `commit(id, Some(server))` | Committed  | server + remaining deltas        |
//! | Pending | `commit(id, None)`         | Committed  | delta folded into confirmed      |
//! | Pending | `rollback(id)`             | RolledBack | confirmed + remaining deltas     |
//! | settled | `commit` / `rollback`      | unchanged  | `MutationError::NotPending`      |
//!
//! Only the last [`SETTLED_HISTORY`] settled mutations keep their phase.
//! Older ones are evicted oldest first; after eviction [`Optimistic::phase`]
//! returns `None` and a late `commit`/`rollback` reports
//! [`MutationError::Unknown`]. Memory stays bounded no matter how long the
//! value lives.

use std::collections::VecDeque;

use crate::error::MutationError;

/// Settled mutations whose phase is remembered.
pub const SETTLED_HISTORY: usize = 64;

/// Identifier of one optimistic mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MutationId(u64);

impl MutationId {
    /// Raw numeric id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Lifecycle phase of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    /// Applied locally, awaiting the server.
    Pending,
    /// Server accepted the change.
    Committed,
    /// Server rejected the change; its delta was removed.
    RolledBack,
}

struct PendingDelta<T> {
    id: MutationId,
    apply: Box<dyn Fn(&mut T)>,
}

/// A value with optimistic local edits layered over the confirmed state.
pub struct Optimistic<T> {
    confirmed: T,
    visible: T,
    pending: Vec<PendingDelta<T>>,
    /// Most recently settled last; at most `SETTLED_HISTORY` entries.
    settled: VecDeque<(MutationId, MutationPhase)>,
    next_id: u64,
}

impl<T: Clone> Optimistic<T> {
    /// Wrap a server-confirmed value.
    pub fn new(confirmed: T) -> Self {
        Self {
            visible: confirmed.clone(),
            confirmed,
            pending: Vec::new(),
            settled: VecDeque::new(),
            next_id: 0,
        }
    }

    /// Value to display: confirmed state plus pending edits.
    pub fn value(&self) -> &T {
        &self.visible
    }

    /// Last server-confirmed value.
    pub fn confirmed(&self) -> &T {
        &self.confirmed
    }

    /// Number of mutations awaiting the server.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Phase of `id`; `None` if it was never applied here or has been
    /// evicted from the settled history.
    pub fn phase(&self, id: MutationId) -> Option<MutationPhase> {
        if self.pending.iter().any(|d| d.id == id) {
            return Some(MutationPhase::Pending);
        }
        self.settled
            .iter()
            .rev()
            .find(|(settled, _)| *settled == id)
            .map(|&(_, phase)| phase)
    }

    /// Number of settled mutations whose phase is still remembered.
    pub fn settled_count(&self) -> usize {
        self.settled.len()
    }

    /// Apply `delta` locally and return its id.
    pub fn apply(&mut self, delta: impl Fn(&mut T) + 'static) -> MutationId {
        let id = MutationId(self.next_id);
        self.next_id += 1;
        delta(&mut self.visible);
        self.pending.push(PendingDelta {
            id,
            apply: Box::new(delta),
        });
        tracing::debug!(target: "inflist.optimistic", id = id.raw(), "mutation applied");
        id
    }

    /// Server accepted `id`. With `Some(server)`, the server value becomes
    /// the confirmed state; with `None`, the local delta is folded in.
    pub fn commit(&mut self, id: MutationId, server: Option<T>) -> Result<(), MutationError> {
        let delta = self.take_pending(id)?;
        match server {
            Some(value) => self.confirmed = value,
            None => (delta.apply)(&mut self.confirmed),
        }
        self.settle(id, MutationPhase::Committed);
        self.replay();
        tracing::debug!(target: "inflist.optimistic", id = id.raw(), "mutation committed");
        Ok(())
    }

    /// Server rejected `id`; drop its delta.
    pub fn rollback(&mut self, id: MutationId) -> Result<(), MutationError> {
        self.take_pending(id)?;
        self.settle(id, MutationPhase::RolledBack);
        self.replay();
        tracing::warn!(target: "inflist.optimistic", id = id.raw(), "mutation rolled back");
        Ok(())
    }

    /// Replace the confirmed value from a fresh server read, keeping pending
    /// edits on top.
    pub fn reconcile(&mut self, server: T) {
        self.confirmed = server;
        self.replay();
    }

    fn take_pending(&mut self, id: MutationId) -> Result<PendingDelta<T>, MutationError> {
        if let Some(pos) = self.pending.iter().position(|d| d.id == id) {
            return Ok(self.pending.remove(pos));
        }
        match self.phase(id) {
            Some(phase) => Err(MutationError::NotPending { id, phase }),
            None => Err(MutationError::Unknown(id)),
        }
    }

    fn settle(&mut self, id: MutationId, phase: MutationPhase) {
        if self.settled.len() == SETTLED_HISTORY {
            self.settled.pop_front();
        }
        self.settled.push_back((id, phase));
    }

    fn replay(&mut self) {
        self.visible = self.confirmed.clone();
        for delta in &self.pending {
            (delta.apply)(&mut self.visible);
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Optimistic<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Optimistic")
            .field("confirmed", &self.confirmed)
            .field("visible", &self.visible)
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_shows_immediately() {
        let mut count = Optimistic::new(10u32);
        let id = count.apply(|v| *v += 1);
        assert_eq!(*count.value(), 11);
        assert_eq!(*count.confirmed(), 10);
        assert_eq!(count.phase(id), Some(MutationPhase::Pending));
    }

    #[test]
    fn rollback_restores_confirmed() {
        let mut flag = Optimistic::new(false);
        let id = flag.apply(|v| *v = !*v);
        assert!(*flag.value());
        flag.rollback(id).unwrap();
        assert!(!*flag.value());
        assert_eq!(flag.phase(id), Some(MutationPhase::RolledBack));
    }

    #[test]
    fn commit_with_server_value_keeps_other_pending() {
        let mut count = Optimistic::new(0u32);
        let a = count.apply(|v| *v += 1);
        let _b = count.apply(|v| *v += 10);
        assert_eq!(*count.value(), 11);

        // Server counted someone else's edit too.
        count.commit(a, Some(5)).unwrap();
        assert_eq!(*count.confirmed(), 5);
        assert_eq!(*count.value(), 15);
        assert_eq!(count.pending_count(), 1);
    }

    #[test]
    fn commit_without_server_value_folds_delta() {
        let mut count = Optimistic::new(1u32);
        let id = count.apply(|v| *v *= 3);
        count.commit(id, None).unwrap();
        assert_eq!(*count.confirmed(), 3);
        assert_eq!(*count.value(), 3);
    }

    #[test]
    fn settled_mutations_reject_transitions() {
        let mut count = Optimistic::new(0u32);
        let id = count.apply(|v| *v += 1);
        count.commit(id, None).unwrap();
        assert_eq!(
            count.rollback(id),
            Err(MutationError::NotPending {
                id,
                phase: MutationPhase::Committed
            })
        );
        assert_eq!(*count.value(), 1);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let mut a = Optimistic::new(0u32);
        let mut b = Optimistic::new(0u32);
        let _ = b.apply(|v| *v += 1);
        let foreign = b.apply(|v| *v += 1);
        assert_eq!(a.commit(foreign, None), Err(MutationError::Unknown(foreign)));
    }

    #[test]
    fn reconcile_keeps_pending_edits() {
        let mut count = Optimistic::new(0u32);
        count.apply(|v| *v += 2);
        count.reconcile(100);
        assert_eq!(*count.value(), 102);
    }

    #[test]
    fn settled_history_is_bounded() {
        let mut flag = Optimistic::new(false);
        let first = flag.apply(|v| *v = true);
        flag.commit(first, None).unwrap();
        for _ in 0..(SETTLED_HISTORY * 4) {
            let id = flag.apply(|v| *v = !*v);
            flag.rollback(id).unwrap();
        }
        assert_eq!(flag.settled_count(), SETTLED_HISTORY);
        assert_eq!(flag.pending_count(), 0);

        // The oldest settled mutation has been evicted.
        assert_eq!(flag.phase(first), None);
        assert_eq!(flag.rollback(first), Err(MutationError::Unknown(first)));
        assert!(*flag.value());

        let recent = flag.apply(|v| *v = false);
        flag.rollback(recent).unwrap();
        assert_eq!(flag.phase(recent), Some(MutationPhase::RolledBack));
        assert_eq!(flag.settled_count(), SETTLED_HISTORY);
    }
}
