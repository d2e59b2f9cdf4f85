use std::fmt::{self, Debug, Display};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::trace;

pub(crate) type SuccessHandler<T, R> = Box<dyn FnOnce(T) -> R + Send>;
pub(crate) type FailureHandler<E> = Box<dyn FnOnce(E) + Send>;

/// Where a promise is in its life. Leaves `Pending` once and for all
/// (unless the owning resolver is unguarded and settled again).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Pending,
    Resolved,
    Rejected,
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pending => write!(f, "pending"),
            Status::Resolved => write!(f, "resolved"),
            Status::Rejected => write!(f, "rejected"),
        }
    }
}

pub(crate) struct Inner<T, E, R> {
    pub(crate) value: Option<Result<T, E>>,
    pub(crate) success: Vec<SuccessHandler<T, R>>,
    pub(crate) failure: Vec<FailureHandler<E>>,
}

impl<T, E, R> Inner<T, E, R> {
    pub(crate) fn status(&self) -> Status {
        match self.value {
            None => Status::Pending,
            Some(Ok(_)) => Status::Resolved,
            Some(Err(_)) => Status::Rejected,
        }
    }
}

/// A value that does not exist yet.
///
/// Handles are cheap to clone and all clones share the same state. Only the
/// [`Resolver`](crate::Resolver) that created a `PendingValue` can settle it;
/// everybody else may only register handlers.
///
/// Registered handlers are consumed last-in first-out, one per settlement:
/// resolving invokes the most recent success handler and drops the most recent
/// failure handler, anything registered earlier stays where it is. Handlers
/// registered after settlement are never invoked.
///
/// # Examples
///
/// ```
/// use oath::{defer, Resolver, Status};
/// let resolver: Resolver<u32, String> = defer();
/// resolver.promise().then(|n| println!("got {n}"));
/// resolver.resolve(7).unwrap();
/// assert_eq!(resolver.promise().status(), Status::Resolved);
/// ```
pub struct PendingValue<T, E, R = ()> {
    inner: Arc<Mutex<Inner<T, E, R>>>,
}

impl<T, E, R> Clone for PendingValue<T, E, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, E, R> Debug for PendingValue<T, E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("PendingValue")
            .field("status", &inner.status())
            .field("success_handlers", &inner.success.len())
            .field("failure_handlers", &inner.failure.len())
            .finish()
    }
}

impl<T, E, R> PendingValue<T, E, R> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value: None,
                success: vec![],
                failure: vec![],
            })),
        }
    }

    // User code never runs under this lock, handler and value drops
    // included, so a poisoned guard still holds consistent state.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Inner<T, E, R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a success handler. Its return value is handed back to
    /// whoever calls [`Resolver::resolve`](crate::Resolver::resolve).
    pub fn then<S>(&self, on_success: S) -> &Self
    where
        S: FnOnce(T) -> R + Send + 'static,
    {
        let mut inner = self.lock();
        inner.success.push(Box::new(on_success));
        trace!("registered success handler #{}", inner.success.len());
        self
    }

    /// Registers a success handler and a failure handler in one go.
    pub fn then_catch<S, F>(&self, on_success: S, on_failure: F) -> &Self
    where
        S: FnOnce(T) -> R + Send + 'static,
        F: FnOnce(E) + Send + 'static,
    {
        self.then(on_success).catch(on_failure)
    }

    /// Registers a failure handler.
    pub fn catch<F>(&self, on_failure: F) -> &Self
    where
        F: FnOnce(E) + Send + 'static,
    {
        let mut inner = self.lock();
        inner.failure.push(Box::new(on_failure));
        trace!("registered failure handler #{}", inner.failure.len());
        self
    }

    pub fn status(&self) -> Status {
        self.lock().status()
    }

    pub fn is_pending(&self) -> bool {
        self.status() == Status::Pending
    }

    /// The payload (or error) this promise was last settled with.
    pub fn value(&self) -> Option<Result<T, E>>
    where
        T: Clone,
        E: Clone,
    {
        self.lock().value.clone()
    }

    /// Number of success handlers still waiting to be consumed.
    pub fn success_handlers(&self) -> usize {
        self.lock().success.len()
    }

    /// Number of failure handlers still waiting to be consumed.
    pub fn failure_handlers(&self) -> usize {
        self.lock().failure.len()
    }
}
