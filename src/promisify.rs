//! Adapts callback-style functions into functions returning a
//! [`PendingValue`].
//!
//! The wrapped function receives its input plus a [`Completion`] to call once
//! it has an answer. All invocations of one adapted function share a single
//! [`Resolver`], created when [`adapt`] is called: the first settlement
//! consumes the registered handlers and later invocations find them gone.
//!
//! # Examples
//!
//! ```
//! use oath::{adapt, Completion, Error, Outcome};
//! let mut double = adapt(|n: u32, done: Completion<u32, String>| done.succeed(n * 2));
//! double.promise().then(|n: u32| assert_eq!(n, 42));
//! double.call(21).unwrap();
//! // The shared promise has no handler left for a second run.
//! assert_eq!(double.call(1).unwrap_err(), Error::MissingHandler(Outcome::Success));
//! ```
use std::fmt;
use std::marker::PhantomData;

use crate::{Error, PendingValue, Resolver, Settlement};
use log::trace;

/// The `(failure, success)` callback handed to an adapted function.
pub struct Completion<T, E, R = ()> {
    resolver: Resolver<T, E, R>,
}

impl<T, E, R> fmt::Debug for Completion<T, E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("promise", self.resolver.promise())
            .finish()
    }
}

impl<T: Clone, E: Clone, R> Completion<T, E, R> {
    /// Settles the shared promise. A `success` resolves it and a `failure`
    /// rejects it, in that order; both run when both are given. The first
    /// error stops the rest and is returned.
    pub fn complete(self, failure: Option<E>, success: Option<T>) -> Result<Option<R>, Error> {
        let mut output = None;
        if let Some(data) = success {
            output = Some(self.resolver.resolve(data)?);
        }
        if let Some(error) = failure {
            self.resolver.reject(error)?;
        }
        Ok(output)
    }

    pub fn succeed(self, data: T) -> Result<R, Error> {
        self.resolver.resolve(data)
    }

    pub fn fail(self, error: E) -> Result<(), Error> {
        self.resolver.reject(error)
    }
}

/// A callback-style function turned into one that returns a [`PendingValue`].
pub struct Adapted<F, I, T, E, R = ()> {
    func: F,
    resolver: Resolver<T, E, R>,
    _input: PhantomData<fn(I)>,
}

impl<F, I, T, E, R> Adapted<F, I, T, E, R>
where
    F: FnMut(I, Completion<T, E, R>) -> Result<(), Error>,
{
    /// Runs the wrapped function on `input` and returns the shared promise.
    /// Errors the wrapped function returns, usually forwarded from its
    /// [`Completion`], are passed through.
    pub fn call(&mut self, input: I) -> Result<PendingValue<T, E, R>, Error> {
        trace!("invoking adapted function");
        let completion = Completion {
            resolver: self.resolver.clone(),
        };
        (self.func)(input, completion)?;
        Ok(self.resolver.promise().clone())
    }

    /// The promise shared by every call, available before the first one.
    pub fn promise(&self) -> &PendingValue<T, E, R> {
        self.resolver.promise()
    }
}

/// Wraps `func` so that calling it yields a [`PendingValue`]. See the
/// [module documentation](self) for the sharing rules.
pub fn adapt<F, I, T, E, R>(func: F) -> Adapted<F, I, T, E, R>
where
    F: FnMut(I, Completion<T, E, R>) -> Result<(), Error>,
{
    adapt_with(Settlement::default(), func)
}

/// Like [`adapt`], with an explicit [`Settlement`] policy for the shared
/// resolver.
pub fn adapt_with<F, I, T, E, R>(settlement: Settlement, func: F) -> Adapted<F, I, T, E, R>
where
    F: FnMut(I, Completion<T, E, R>) -> Result<(), Error>,
{
    Adapted {
        func,
        resolver: Resolver::with_settlement(settlement),
        _input: PhantomData,
    }
}
