//! Lazily established, shared backend connection
//!
//! [`LazyConnection`] holds the single connection handle every operation and
//! every concurrent caller of a document store shares. The handle is created
//! on first use with double-checked locking:
//!
//! 1. lock-free load of the published handle; return it if present;
//! 2. otherwise take the initialisation lock and load again, since another
//!    caller may have finished connecting while this one waited;
//! 3. only if the slot is still empty, connect and publish the fully
//!    constructed handle before releasing the lock.
//!
//! At most one connection attempt is in flight at a time, no caller observes
//! a partially constructed handle, and once connected the lock is never
//! touched again on the read path. If a connection attempt fails or its
//! future is dropped (deadline, cancellation) the slot stays empty and the
//! next caller retries.

use arc_swap::ArcSwapOption;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Double-checked-locking slot for a shared connection handle
pub struct LazyConnection<H> {
    slot: ArcSwapOption<H>,
    init_lock: Mutex<()>,
}

impl<H> Default for LazyConnection<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> LazyConnection<H> {
    /// Creates an empty (not yet connected) slot
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
            init_lock: Mutex::new(()),
        }
    }

    /// Currently published handle, without connecting
    pub fn current(&self) -> Option<Arc<H>> {
        self.slot.load_full()
    }

    /// Whether a handle is currently published
    pub fn is_connected(&self) -> bool {
        self.slot.load().is_some()
    }

    /// Returns the shared handle, connecting first if there is none
    ///
    /// # Arguments
    ///
    /// * `connect` - Establishes a new handle; invoked at most once per
    ///   empty-slot period, never concurrently with itself
    ///
    /// # Errors
    ///
    /// Returns the error produced by `connect`; nothing is published then.
    pub async fn get_or_connect<F, Fut, E>(&self, connect: F) -> Result<Arc<H>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<H, E>>,
    {
        if let Some(handle) = self.slot.load_full() {
            return Ok(handle);
        }

        let _guard = self.init_lock.lock().await;

        if let Some(handle) = self.slot.load_full() {
            return Ok(handle);
        }

        let handle = Arc::new(connect().await?);
        self.slot.store(Some(Arc::clone(&handle)));
        Ok(handle)
    }

    /// Unpublishes the handle and returns it so the caller can close it
    ///
    /// Idempotent: returns `None` when there is nothing to tear down. Waits
    /// for an in-flight connection attempt to finish so a handle published
    /// concurrently is not leaked. A later [`get_or_connect`](Self::get_or_connect)
    /// connects again.
    pub async fn disconnect(&self) -> Option<Arc<H>> {
        if self.slot.load().is_none() {
            return None;
        }

        let _guard = self.init_lock.lock().await;
        self.slot.swap(None)
    }
}
