//! Deferred values settled synchronously by an external resolver.
//!
//! [`defer`] returns a [`Resolver`] wrapping a fresh [`PendingValue`]. Hand
//! the promise to whoever is interested, let them register handlers with
//! [`then`](PendingValue::then) and [`catch`](PendingValue::catch), and later
//! call [`resolve`](Resolver::resolve) or [`reject`](Resolver::reject). The
//! matching handler runs right away, on the calling thread.
//!
//! Each settlement consumes at most one handler of each kind, newest first.
//! Handlers registered after settlement are never called.
//!
//! [`adapt`] turns a function taking a `(failure, success)` completion
//! callback into one returning a [`PendingValue`].
//!
//! # Examples
//!
//! ```
//! use oath::{defer, Resolver, Status};
//! use std::sync::mpsc::channel;
//!
//! let (tx, rx) = channel();
//! let resolver: Resolver<String, String> = defer();
//! resolver.promise().then_catch(
//!     move |value| tx.send(value).unwrap(),
//!     |error| eprintln!("failed: {error}"),
//! );
//! resolver.resolve("🍓".into()).unwrap();
//! assert_eq!(rx.recv().unwrap(), "🍓");
//! assert_eq!(resolver.promise().status(), Status::Resolved);
//! ```
use std::fmt::{self, Display};

use thiserror::Error;

pub mod deferred;
pub mod promise;
pub mod promisify;

pub use deferred::{defer, defer_with, Resolver, Settlement};
pub use promise::{PendingValue, Status};
pub use promisify::{adapt, adapt_with, Adapted, Completion};

/// Which kind of handler a settlement was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Failure,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Failure => write!(f, "failure"),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("no {0} handler registered")]
    MissingHandler(Outcome),
    #[error("promise is already {0}")]
    InvalidState(Status),
}
