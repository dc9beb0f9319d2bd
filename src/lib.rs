//! A FIFO deferred.
//!
//! A [`Deferred`] keeps an ordered queue of success/failure continuation
//! pairs. Every call to [`Promise::resolve`] or [`Promise::reject`] takes the
//! oldest pair off the queue and runs the matching handler, if that pair has
//! one. Settling an empty deferred does nothing and the value is lost.
//!
//! One deferred can therefore stand for a whole sequence of asynchronous
//! events, each event consuming exactly one registration.
//!
//! # Examples
//!
//! ```
//! use deferred_queue::{Deferred, Promise};
//! use std::cell::RefCell;
//!
//! let seen = RefCell::new(Vec::new());
//! let mut d = Deferred::new();
//! d.then(|v| seen.borrow_mut().push(("ok", v)), |v| seen.borrow_mut().push(("err", v)))
//!     .then(|v| seen.borrow_mut().push(("ok", v)), |v| seen.borrow_mut().push(("err", v)));
//! d.resolve(1).reject(2);
//! assert_eq!(*seen.borrow(), vec![("ok", 1), ("err", 2)]);
//! ```
pub mod deferred;

pub use deferred::{Callback, Deferred};

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error<T> {
    /// The queue was empty; the settlement value is handed back.
    #[error("no pending continuation to settle")]
    NoPendingContinuation(T),
}

impl<T> Error<T> {
    /// Take back the value that could not be delivered.
    pub fn into_inner(self) -> T {
        match self {
            Error::NoPendingContinuation(value) => value,
        }
    }
}

/// The producer side: report the outcome of one asynchronous event.
///
/// Both methods return `self` so settlements can be chained.
pub trait Promise<T> {
    /// Report success for the oldest pending registration.
    fn resolve(&mut self, value: T) -> &mut Self;
    /// Report failure for the oldest pending registration.
    fn reject(&mut self, value: T) -> &mut Self;
}
