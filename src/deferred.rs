use std::collections::VecDeque;
use std::fmt;

use log::trace;

use crate::{Error, Promise};

/// A handler for one settlement. It runs at most once.
pub type Callback<'a, T> = Box<dyn FnOnce(T) + 'a>;

struct Continuation<'a, T> {
    on_success: Option<Callback<'a, T>>,
    on_failure: Option<Callback<'a, T>>,
}

/// Queue of continuation pairs, consumed first-registered-first-served.
///
/// Registration appends a pair; each settlement removes the front pair and
/// runs at most one of its handlers. There is no settled state: a settlement
/// with nothing queued is dropped, and nothing is replayed to later
/// registrations.
///
/// # Examples
///
/// ```
/// use deferred_queue::{Deferred, Promise};
/// use std::cell::Cell;
///
/// let got = Cell::new(0);
/// let mut d = Deferred::new();
/// d.resolve(1); // nobody listening yet, lost
/// d.on_resolve(|v| got.set(v));
/// d.resolve(2);
/// assert_eq!(got.get(), 2);
/// assert!(d.is_empty());
/// ```
///
/// Handlers run synchronously inside `resolve`/`reject`; a panic in a handler
/// unwinds out of that call. Handlers cannot reach the deferred that is
/// running them, since it is mutably borrowed for the duration of the call.
pub struct Deferred<'a, T> {
    queue: VecDeque<Continuation<'a, T>>,
}

impl<'a, T> Deferred<'a, T> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// An empty deferred with room for `capacity` pairs before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a continuation pair. Either handler may be absent; an absent
    /// handler means the matching settlement consumes the pair silently.
    ///
    /// Returns `self`, so further calls register further independent pairs.
    ///
    /// ```
    /// use deferred_queue::{Callback, Deferred, Promise};
    /// use std::cell::Cell;
    ///
    /// let failed = Cell::new(None);
    /// let mut d = Deferred::new();
    /// let on_failure: Callback<'_, &str> = Box::new(|e| failed.set(Some(e)));
    /// d.register(None, Some(on_failure)).register(None, None);
    /// d.reject("boom").reject("ignored");
    /// assert_eq!(failed.get(), Some("boom"));
    /// ```
    pub fn register(
        &mut self,
        on_success: Option<Callback<'a, T>>,
        on_failure: Option<Callback<'a, T>>,
    ) -> &mut Self {
        trace!(
            "register continuation (success: {}, failure: {}), {} already pending",
            on_success.is_some(),
            on_failure.is_some(),
            self.queue.len()
        );
        self.queue.push_back(Continuation {
            on_success,
            on_failure,
        });
        self
    }

    /// Register both handlers.
    pub fn then<S, F>(&mut self, on_success: S, on_failure: F) -> &mut Self
    where
        S: FnOnce(T) + 'a,
        F: FnOnce(T) + 'a,
    {
        self.register(Some(Box::new(on_success)), Some(Box::new(on_failure)))
    }

    /// Register a pair with only a success handler.
    pub fn on_resolve<S>(&mut self, on_success: S) -> &mut Self
    where
        S: FnOnce(T) + 'a,
    {
        self.register(Some(Box::new(on_success)), None)
    }

    /// Register a pair with only a failure handler.
    pub fn on_reject<F>(&mut self, on_failure: F) -> &mut Self
    where
        F: FnOnce(T) + 'a,
    {
        self.register(None, Some(Box::new(on_failure)))
    }

    /// Number of pairs still waiting for a settlement.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Like [`Promise::resolve`], but hands the value back when nothing is
    /// registered instead of dropping it.
    pub fn try_resolve(&mut self, value: T) -> Result<&mut Self, Error<T>> {
        match self.queue.pop_front() {
            Some(pair) => {
                dispatch("resolve", pair.on_success, value, self.queue.len());
                Ok(self)
            }
            None => Err(Error::NoPendingContinuation(value)),
        }
    }

    /// Like [`Promise::reject`], but hands the value back when nothing is
    /// registered instead of dropping it.
    pub fn try_reject(&mut self, value: T) -> Result<&mut Self, Error<T>> {
        match self.queue.pop_front() {
            Some(pair) => {
                dispatch("reject", pair.on_failure, value, self.queue.len());
                Ok(self)
            }
            None => Err(Error::NoPendingContinuation(value)),
        }
    }
}

/// The pair is already off the queue when the handler runs.
fn dispatch<T>(kind: &str, handler: Option<Callback<'_, T>>, value: T, remaining: usize) {
    match handler {
        Some(handler) => {
            trace!("{}: running handler, {} still pending", kind, remaining);
            handler(value)
        }
        None => trace!("{}: pair has no handler, value dropped", kind),
    }
}

impl<'a, T> Promise<T> for Deferred<'a, T> {
    fn resolve(&mut self, value: T) -> &mut Self {
        if self.try_resolve(value).is_err() {
            trace!("resolve: no pending continuation, value dropped");
        }
        self
    }

    fn reject(&mut self, value: T) -> &mut Self {
        if self.try_reject(value).is_err() {
            trace!("reject: no pending continuation, value dropped");
        }
        self
    }
}

impl<T> Default for Deferred<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Deferred<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending: Vec<_> = self
            .queue
            .iter()
            .map(|pair| (pair.on_success.is_some(), pair.on_failure.is_some()))
            .collect();
        f.debug_struct("Deferred").field("pending", &pending).finish()
    }
}
