//! Thread-safe cyclic cursor
//!
//! Walks indices `0, 1, ..., len - 1, 0, ...` for a shared cursor and for any
//! number of per-caller cursors. All bookkeeping for one pool sits behind a
//! single mutex so two callers can never be handed the same "next" slot under
//! the per-invocation policy, and a sticky assignment is visible to every later
//! call from that caller.

use crate::config::ParameterLevel;
use crate::value::CallerId;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::trace;

#[derive(Debug, Default)]
struct CursorState {
    /// Next index handed out by the shared cursor
    shared: usize,

    /// Last index handed to each caller
    per_caller: HashMap<CallerId, usize>,
}

/// Cyclic cursor over a pool of `len` elements
#[derive(Debug)]
pub struct CyclicCursor {
    len: usize,
    state: Mutex<CursorState>,
}

impl CyclicCursor {
    /// Create a cursor positioned at index 0
    pub fn new(len: usize) -> Self {
        Self {
            len,
            state: Mutex::new(CursorState::default()),
        }
    }

    /// Number of elements the cursor walks over
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the cursor walks over an empty pool
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Cursor state is updated with plain assignments, so a panicking holder
    // cannot leave it half-written.
    fn lock(&self) -> MutexGuard<'_, CursorState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn wrap(&self, index: usize) -> usize {
        if self.len == 0 {
            0
        } else {
            index % self.len
        }
    }

    /// Pick an index for `caller` according to `level`
    pub fn select(&self, level: ParameterLevel, caller: CallerId) -> usize {
        match level {
            ParameterLevel::PerInvocation => self.next_shared(),
            ParameterLevel::PerThread => self.next_for_caller(caller),
            ParameterLevel::PerThreadStatic => self.sticky_for_caller(caller),
        }
    }

    /// Take the next index from the shared cursor
    pub fn next_shared(&self) -> usize {
        let mut state = self.lock();
        let index = self.wrap(state.shared);
        state.shared = self.wrap(index + 1);
        index
    }

    /// Advance the caller's own cursor
    ///
    /// A caller seen for the first time starts at the current shared position
    /// without moving the shared cursor.
    pub fn next_for_caller(&self, caller: CallerId) -> usize {
        let mut state = self.lock();
        let index = match state.per_caller.get(&caller) {
            Some(&last) => self.wrap(last + 1),
            None => self.wrap(state.shared),
        };
        state.per_caller.insert(caller, index);
        index
    }

    /// Return the caller's fixed index, assigning the next shared index on first access
    pub fn sticky_for_caller(&self, caller: CallerId) -> usize {
        let mut state = self.lock();
        if let Some(&assigned) = state.per_caller.get(&caller) {
            return assigned;
        }

        let index = self.wrap(state.shared);
        state.shared = self.wrap(index + 1);
        state.per_caller.insert(caller, index);
        index
    }

    /// Pick the first index, in cursor order, that `accept` approves
    ///
    /// Used when some elements cannot serve a call (a file name that does not
    /// match its pattern). The search starts where [`select`](Self::select)
    /// would, visits every index at most once, and runs under a single lock
    /// acquisition so concurrent callers cannot move the cursor mid-search.
    ///
    /// On success the cursor is left as if the accepted index had been
    /// selected: the shared cursor moves past it, a per-caller cursor stores
    /// it, and a sticky caller's assignment moves to it. When nothing is
    /// accepted the cursor state is left unchanged and `None` is returned.
    pub fn select_matching<F>(&self, level: ParameterLevel, caller: CallerId, mut accept: F) -> Option<usize>
    where
        F: FnMut(usize) -> bool,
    {
        let mut state = self.lock();
        let start = match level {
            ParameterLevel::PerInvocation => self.wrap(state.shared),
            ParameterLevel::PerThread => match state.per_caller.get(&caller) {
                Some(&last) => self.wrap(last + 1),
                None => self.wrap(state.shared),
            },
            ParameterLevel::PerThreadStatic => match state.per_caller.get(&caller) {
                Some(&assigned) => assigned,
                None => self.wrap(state.shared),
            },
        };

        let mut skipped = 0usize;
        let found = (0..self.len)
            .map(|offset| self.wrap(start + offset))
            .find(|&index| {
                let ok = accept(index);
                if !ok {
                    skipped += 1;
                }
                ok
            })?;

        match level {
            ParameterLevel::PerInvocation => state.shared = self.wrap(found + 1),
            ParameterLevel::PerThread => {
                state.per_caller.insert(caller, found);
            }
            ParameterLevel::PerThreadStatic => {
                if !state.per_caller.contains_key(&caller) {
                    state.shared = self.wrap(start + 1);
                }
                state.per_caller.insert(caller, found);
            }
        }
        if skipped > 0 {
            trace!(%caller, %level, from = start, to = found, skipped, "skipped rejected candidates");
        }
        Some(found)
    }

    /// Index the caller currently holds, if it has been seen
    pub fn caller_position(&self, caller: CallerId) -> Option<usize> {
        self.lock().per_caller.get(&caller).copied()
    }

    /// Current position of the shared cursor
    pub fn shared_position(&self) -> usize {
        self.lock().shared
    }

    /// Forget every caller and rewind the shared cursor
    pub fn reset(&mut self) {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *state = CursorState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    const X: CallerId = CallerId(1);
    const Y: CallerId = CallerId(2);

    #[test]
    fn test_shared_wraparound() {
        let cursor = CyclicCursor::new(3);

        assert_eq!(cursor.next_shared(), 0);
        assert_eq!(cursor.next_shared(), 1);
        assert_eq!(cursor.next_shared(), 2);
        assert_eq!(cursor.next_shared(), 0); // Wrapped
        assert_eq!(cursor.next_shared(), 1);
    }

    #[test]
    fn test_per_caller_seeds_from_shared_without_advancing() {
        let cursor = CyclicCursor::new(3);
        assert_eq!(cursor.next_shared(), 0);

        assert_eq!(cursor.next_for_caller(X), 1);
        assert_eq!(cursor.shared_position(), 1);
        assert_eq!(cursor.next_for_caller(Y), 1);

        assert_eq!(cursor.next_for_caller(X), 2);
        assert_eq!(cursor.next_for_caller(X), 0);
        assert_eq!(cursor.next_for_caller(Y), 2);
    }

    #[test]
    fn test_per_caller_interleaving_never_skips() {
        let cursor = CyclicCursor::new(4);
        let mut last: HashMap<CallerId, usize> = HashMap::new();

        for round in 0..20 {
            let caller = if round % 3 == 0 { Y } else { X };
            let index = cursor.select(ParameterLevel::PerThread, caller);
            if let Some(prev) = last.insert(caller, index) {
                assert_eq!(index, (prev + 1) % 4);
            }
        }
    }

    #[test]
    fn test_sticky_assigns_once() {
        let cursor = CyclicCursor::new(2);

        assert_eq!(cursor.sticky_for_caller(X), 0);
        assert_eq!(cursor.sticky_for_caller(Y), 1);
        assert_eq!(cursor.sticky_for_caller(CallerId(3)), 0); // Wrapped

        for _ in 0..5 {
            assert_eq!(cursor.sticky_for_caller(X), 0);
            assert_eq!(cursor.sticky_for_caller(Y), 1);
        }
        assert_eq!(cursor.shared_position(), 1);
    }

    #[test]
    fn test_select_matching_shared_skips_rejected() {
        let cursor = CyclicCursor::new(4);

        // Only odd indices are acceptable
        assert_eq!(cursor.select_matching(ParameterLevel::PerInvocation, X, |i| i % 2 == 1), Some(1));
        assert_eq!(cursor.shared_position(), 2);
        assert_eq!(cursor.select_matching(ParameterLevel::PerInvocation, Y, |i| i % 2 == 1), Some(3));
        assert_eq!(cursor.shared_position(), 0);
    }

    #[test]
    fn test_select_matching_visits_each_index_once_on_failure() {
        let cursor = CyclicCursor::new(5);
        cursor.next_shared();
        cursor.next_shared();

        let mut visited = Vec::new();
        let found = cursor.select_matching(ParameterLevel::PerInvocation, X, |i| {
            visited.push(i);
            false
        });

        assert_eq!(found, None);
        assert_eq!(visited, vec![2, 3, 4, 0, 1]);
        assert_eq!(cursor.shared_position(), 2);
    }

    #[test]
    fn test_select_matching_moves_sticky_assignment() {
        let cursor = CyclicCursor::new(3);

        assert_eq!(cursor.sticky_for_caller(X), 0);
        assert_eq!(cursor.select_matching(ParameterLevel::PerThreadStatic, X, |i| i == 2), Some(2));
        assert_eq!(cursor.caller_position(X), Some(2));
        assert_eq!(cursor.sticky_for_caller(X), 2);

        // A new sticky caller consumes one shared slot, wherever it lands
        assert_eq!(cursor.select_matching(ParameterLevel::PerThreadStatic, Y, |i| i == 2), Some(2));
        assert_eq!(cursor.shared_position(), 2);

        // Accepted assignments are kept without searching
        assert_eq!(cursor.select_matching(ParameterLevel::PerThreadStatic, X, |_| true), Some(2));
    }

    #[test]
    fn test_select_matching_per_caller_continues_after_match() {
        let cursor = CyclicCursor::new(4);

        assert_eq!(cursor.select_matching(ParameterLevel::PerThread, X, |i| i != 1), Some(0));
        assert_eq!(cursor.select_matching(ParameterLevel::PerThread, X, |i| i != 1), Some(2));
        assert_eq!(cursor.select_matching(ParameterLevel::PerThread, X, |i| i != 1), Some(3));
        assert_eq!(cursor.select_matching(ParameterLevel::PerThread, X, |i| i != 1), Some(0));
        assert_eq!(cursor.shared_position(), 0);
    }

    #[test]
    fn test_empty_cursor_returns_zero() {
        let cursor = CyclicCursor::new(0);
        assert!(cursor.is_empty());
        assert_eq!(cursor.next_shared(), 0);
        assert_eq!(cursor.next_for_caller(X), 0);
        assert_eq!(cursor.sticky_for_caller(X), 0);
    }

    #[test]
    fn test_reset() {
        let mut cursor = CyclicCursor::new(3);
        cursor.next_shared();
        cursor.next_for_caller(X);

        cursor.reset();
        assert_eq!(cursor.shared_position(), 0);
        assert_eq!(cursor.caller_position(X), None);
    }

    #[test]
    fn test_concurrent_shared_cursor_hands_out_each_slot_once() {
        let cursor = Arc::new(CyclicCursor::new(1000));
        let threads = 8;
        let per_thread = 125;

        let mut all: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    let cursor = Arc::clone(&cursor);
                    scope.spawn(move || (0..per_thread).map(|_| cursor.next_shared()).collect::<Vec<_>>())
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        all.sort_unstable();
        assert_eq!(all, (0..1000).collect::<Vec<_>>());
    }
}
