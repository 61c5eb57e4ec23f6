use crate::router::{Router, RouterError};

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwapOption;
use tracing::debug;

/// Storage for a compiled router.
pub trait RouteCache<A> {
    fn get(&self) -> Option<Arc<Router<A>>>;
    fn set(&self, router: Arc<Router<A>>);
    fn clear(&self);
}

/// Keeps the router in memory; readers never block.
pub struct MemoryRouteCache<A> {
    slot: ArcSwapOption<Router<A>>,
}

impl<A> Default for MemoryRouteCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for MemoryRouteCache<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRouteCache")
            .field("cached", &self.slot.load().is_some())
            .finish()
    }
}

impl<A> MemoryRouteCache<A> {
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
        }
    }
}

impl<A> RouteCache<A> for MemoryRouteCache<A> {
    fn get(&self) -> Option<Arc<Router<A>>> {
        self.slot.load_full()
    }

    fn set(&self, router: Arc<Router<A>>) {
        self.slot.store(Some(router));
    }

    fn clear(&self) {
        self.slot.store(None);
    }
}

/// Builds a router at most once per cache fill.
///
/// Readers that find the cache filled return at once. On a miss, builders
/// queue on a mutex; the first one builds and publishes, the others find the
/// published router when they get the lock.
#[derive(Debug)]
pub struct RouterLoader<A, C = MemoryRouteCache<A>> {
    cache: C,
    writer: Mutex<()>,
    _marker: std::marker::PhantomData<fn() -> A>,
}

impl<A, C: RouteCache<A>> RouterLoader<A, C> {
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            writer: Mutex::new(()),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn load<F>(&self, build: F) -> Result<Arc<Router<A>>, RouterError>
    where
        F: FnOnce() -> Result<Router<A>, RouterError>,
    {
        if let Some(router) = self.cache.get() {
            return Ok(router);
        }

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(router) = self.cache.get() {
            return Ok(router);
        }

        let router = Arc::new(build()?);
        debug!(
            routes = router.len(),
            nodes = router.node_count(),
            "published compiled router"
        );
        self.cache.set(Arc::clone(&router));
        Ok(router)
    }
}
