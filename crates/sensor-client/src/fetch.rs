//! Fetch keys and tickets
//!
//! A view's data is determined by its fetch key. Every request is issued with
//! a [`Ticket`] recording the key and a generation number; when the response
//! arrives it is only applied if no newer request was started and the view
//! still wants that key. Slow responses to superseded requests are dropped
//! instead of overwriting newer data.

/// Handle for one in-flight request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    generation: u64,
    key: K,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// Hands out tickets and decides which completions are still wanted
#[derive(Debug, Clone)]
pub struct FetchTracker<K> {
    generation: u64,
    pending: Option<u64>,
    _key: std::marker::PhantomData<fn() -> K>,
}

impl<K> Default for FetchTracker<K> {
    fn default() -> Self {
        Self {
            generation: 0,
            pending: None,
            _key: std::marker::PhantomData,
        }
    }
}

impl<K: Clone + PartialEq + std::fmt::Debug> FetchTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request for `key`, superseding any request already in flight
    pub fn begin(&mut self, key: K) -> Ticket<K> {
        self.generation += 1;
        self.pending = Some(self.generation);
        Ticket {
            generation: self.generation,
            key,
        }
    }

    /// Whether a request is outstanding whose result would still be applied
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Settle `ticket`. Returns true if its result should be applied.
    ///
    /// Only the newest ticket can settle the tracker; older ones are rejected
    /// and leave the pending request untouched.
    pub fn finish(&mut self, ticket: &Ticket<K>, current_key: &K) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding stale response for {:?} (generation {} < {})",
                ticket.key,
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.pending = None;
        if &ticket.key != current_key {
            tracing::debug!(
                "Discarding response for {:?}, view now wants {:?}",
                ticket.key,
                current_key
            );
            return false;
        }
        true
    }
}
