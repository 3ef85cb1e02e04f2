//! Memoization
//!
//! [`Memoized`] holds a value that is computed on first request and cached
//! for every request after that. Concurrent first requests run the
//! computation once; the others wait for it. A failed computation stores
//! nothing, so the next request tries again.

use std::fmt;
use std::future::Future;

use tokio::sync::OnceCell;

/// A lazily computed, cached value
pub struct Memoized<T> {
    cell: OnceCell<T>,
}

impl<T> Memoized<T> {
    /// Create an empty cell
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Return the cached value, computing it with `init` on first use
    pub async fn get_or_init<F, Fut>(&self, init: F) -> &T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.cell.get_or_init(init).await
    }

    /// Return the cached value, computing it with a fallible `init` on first use
    ///
    /// # Errors
    ///
    /// Returns the error from `init`. Nothing is cached in that case.
    pub async fn get_or_try_init<E, F, Fut>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.cell.get_or_try_init(init).await
    }

    /// Whether the value has been computed
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

impl<T> Default for Memoized<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memoized<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("value", &self.cell.get())
            .finish()
    }
}
