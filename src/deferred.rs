//! The controlling half of a promise. A [`Resolver`] owns its
//! [`PendingValue`] and is the only thing allowed to settle it.
//!
use crate::{Error, Outcome, PendingValue, Status};
use log::{debug, trace, warn};

/// What a [`Resolver`] does when asked to settle a promise that has already
/// been settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Settlement {
    /// Settle again: overwrite the stored value and consume the next handlers
    /// in line, if there are any.
    #[default]
    Unguarded,
    /// Refuse with [`Error::InvalidState`] and leave the promise untouched.
    Guarded,
}

impl Settlement {
    fn check(self, status: Status) -> Result<(), Error> {
        match (self, status) {
            (Settlement::Guarded, Status::Resolved | Status::Rejected) => {
                warn!("refusing to settle a promise that is already {}", status);
                Err(Error::InvalidState(status))
            }
            _ => Ok(()),
        }
    }
}

/// Settles a [`PendingValue`] exactly once.
///
/// Handlers run synchronously on the calling thread, before `resolve` or
/// `reject` returns. No lock is held while a handler runs, or while a
/// discarded handler or overwritten value is dropped, so handlers may
/// register more handlers on the same promise.
///
/// `reject` takes the lock twice: once to pop the failure handler and again,
/// after that handler has run, to drop the newest success handler. A success
/// handler registered in between, re-entrantly or from another thread, is the
/// one dropped, and the handler registered before settlement stays in place.
///
/// # Examples
///
/// ```
/// use oath::{defer, Error, Outcome};
/// let resolver = defer::<&str, &str, usize>();
/// resolver.promise().then_catch(|s| s.len(), |e| eprintln!("{e}"));
/// assert_eq!(resolver.resolve("🍓"), Ok(4));
/// // The failure handler was discarded and nothing is left to reject with.
/// assert_eq!(resolver.reject("💥"), Err(Error::MissingHandler(Outcome::Failure)));
/// ```
#[derive(Debug)]
pub struct Resolver<T, E, R = ()> {
    promise: PendingValue<T, E, R>,
    settlement: Settlement,
}

impl<T, E, R> Clone for Resolver<T, E, R> {
    fn clone(&self) -> Self {
        Self {
            promise: self.promise.clone(),
            settlement: self.settlement,
        }
    }
}

impl<T, E, R> Default for Resolver<T, E, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E, R> Resolver<T, E, R> {
    pub fn new() -> Self {
        Self::with_settlement(Settlement::default())
    }

    pub fn with_settlement(settlement: Settlement) -> Self {
        Self {
            promise: PendingValue::new(),
            settlement,
        }
    }

    /// The promise settled by this resolver. Clone it to hand it out.
    pub fn promise(&self) -> &PendingValue<T, E, R> {
        &self.promise
    }

    pub fn settlement(&self) -> Settlement {
        self.settlement
    }

    /// Resolves the promise with `data`.
    ///
    /// Drops the most recently registered failure handler without calling it,
    /// then pops the most recently registered success handler and returns what
    /// it returns. If no success handler is registered the promise is still
    /// marked resolved, and [`Error::MissingHandler`] is returned.
    ///
    /// `data` is both stored on the promise and handed to the handler, hence
    /// `T: Clone`.
    pub fn resolve(&self, data: T) -> Result<R, Error>
    where
        T: Clone,
    {
        let (previous, discarded, handler) = {
            let mut inner = self.promise.lock();
            self.settlement.check(inner.status())?;
            let previous = inner.value.replace(Ok(data.clone()));
            (previous, inner.failure.pop(), inner.success.pop())
        };
        // Dropped outside the lock: captured state may read the promise.
        drop(previous);
        if discarded.is_some() {
            trace!("discarded failure handler on resolve");
            drop(discarded);
        }
        match handler {
            Some(handler) => {
                debug!("promise resolved");
                Ok(handler(data))
            }
            None => {
                warn!("promise resolved with no success handler registered");
                Err(Error::MissingHandler(Outcome::Success))
            }
        }
    }

    /// Rejects the promise with `error`.
    ///
    /// Pops and calls the most recently registered failure handler, then drops
    /// the most recently registered success handler. Without a failure handler
    /// the promise is still marked rejected, success handlers are left alone,
    /// and [`Error::MissingHandler`] is returned.
    ///
    /// `error` is both stored on the promise and handed to the handler, hence
    /// `E: Clone`.
    pub fn reject(&self, error: E) -> Result<(), Error>
    where
        E: Clone,
    {
        let (previous, handler) = {
            let mut inner = self.promise.lock();
            self.settlement.check(inner.status())?;
            let previous = inner.value.replace(Err(error.clone()));
            (previous, inner.failure.pop())
        };
        drop(previous);
        let Some(handler) = handler else {
            warn!("promise rejected with no failure handler registered");
            return Err(Error::MissingHandler(Outcome::Failure));
        };
        debug!("promise rejected");
        handler(error);
        let discarded = self.promise.lock().success.pop();
        if discarded.is_some() {
            trace!("discarded success handler on reject");
            drop(discarded);
        }
        Ok(())
    }
}

/// Creates a [`Resolver`] around a fresh, pending promise.
pub fn defer<T, E, R>() -> Resolver<T, E, R> {
    Resolver::new()
}

/// Like [`defer`], with an explicit [`Settlement`] policy.
pub fn defer_with<T, E, R>(settlement: Settlement) -> Resolver<T, E, R> {
    Resolver::with_settlement(settlement)
}
