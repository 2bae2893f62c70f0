use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, TryLockError},
};

use crate::{
    assets::source::AssetSource,
    foundation::core::{DEFAULT_PAGE_SIZE, Size},
    foundation::error::InkformResult,
    model::page::PageLayout,
    raster::page::{PageRasterizer, RasterOutcome},
    template::runtime::RuntimeTemplate,
};

/// How rasterized sources are reused across loads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Keep the rasterized pages of each source identity until evicted.
    ///
    /// Every load still resolves its own layouts against the cached backgrounds, so two
    /// documents over one source share rasters but never fields. A load at a different dpi
    /// replaces the cached rasters.
    #[default]
    Memoized,
    /// Re-read and re-rasterize the source on every load.
    AlwaysReload,
}

/// Resolver configuration.
#[derive(Clone, Debug)]
pub struct ResolverOpts {
    /// Reuse policy.
    pub policy: CachePolicy,
    /// Page size used when neither a layout nor a raster determines one.
    pub default_page_size: Size,
}

impl Default for ResolverOpts {
    fn default() -> Self {
        Self {
            policy: CachePolicy::Memoized,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Rasterized pages of one source at one resolution.
#[derive(Debug)]
struct CachedRaster {
    dpi: u32,
    outcome: Arc<RasterOutcome>,
}

type Slot = Arc<Mutex<Option<CachedRaster>>>;

/// Loads source documents, rasterizes their pages and resolves templates against them.
///
/// Safe to share between threads. Concurrent first loads of one identity wait on a per-identity
/// slot so the source is rasterized once. The slot map lock is never held while waiting on a
/// slot.
pub struct TemplateResolver {
    assets: Arc<dyn AssetSource>,
    rasterizer: Arc<dyn PageRasterizer>,
    opts: ResolverOpts,
    slots: Mutex<HashMap<String, Slot>>,
    rasterize_counts: Mutex<HashMap<String, u64>>,
}

impl std::fmt::Debug for TemplateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateResolver")
            .field("opts", &self.opts)
            .field("cached_len", &self.cached_len())
            .finish_non_exhaustive()
    }
}

impl TemplateResolver {
    /// Resolver over the given collaborators.
    pub fn new(
        assets: Arc<dyn AssetSource>,
        rasterizer: Arc<dyn PageRasterizer>,
        opts: ResolverOpts,
    ) -> Self {
        Self {
            assets,
            rasterizer,
            opts,
            slots: Mutex::new(HashMap::new()),
            rasterize_counts: Mutex::new(HashMap::new()),
        }
    }

    /// Active options.
    pub fn opts(&self) -> &ResolverOpts {
        &self.opts
    }

    /// Resolve the template for `source` against `layouts`.
    ///
    /// Only the rasterized backgrounds are cached; the returned template always reflects the
    /// layouts, name and dpi of this call. Asset errors propagate. Rasterizer errors do not:
    /// affected pages resolve with [`crate::PageBackground::Unavailable`]. Failed loads are
    /// never cached.
    #[tracing::instrument(skip(self, layouts), fields(pages = layouts.len()))]
    pub fn load(
        &self,
        source: &str,
        name: &str,
        layouts: &[PageLayout],
        dpi: u32,
    ) -> InkformResult<Arc<RuntimeTemplate>> {
        let outcome = match self.opts.policy {
            CachePolicy::AlwaysReload => Arc::new(self.rasterize(source, dpi)?),
            CachePolicy::Memoized => self.cached_raster(source, dpi)?,
        };
        Ok(Arc::new(RuntimeTemplate::resolve(
            source,
            name,
            dpi,
            layouts,
            &outcome,
            self.opts.default_page_size,
        )))
    }

    fn cached_raster(&self, source: &str, dpi: u32) -> InkformResult<Arc<RasterOutcome>> {
        let slot = {
            let mut slots = lock(&self.slots);
            slots.entry(source.to_owned()).or_default().clone()
        };
        let mut cached = lock(&slot);
        match cached.as_ref() {
            Some(c) if c.dpi == dpi => {
                tracing::debug!("template cache hit");
                return Ok(c.outcome.clone());
            }
            Some(c) => tracing::debug!(cached_dpi = c.dpi, "template cache dpi changed"),
            None => tracing::debug!("template cache miss"),
        }
        match self.rasterize(source, dpi) {
            Ok(outcome) => {
                let outcome = Arc::new(outcome);
                *cached = Some(CachedRaster {
                    dpi,
                    outcome: outcome.clone(),
                });
                Ok(outcome)
            }
            Err(e) => {
                let empty = cached.is_none();
                drop(cached);
                if empty {
                    self.forget_empty_slot(source, &slot);
                }
                Err(e)
            }
        }
    }

    /// Remove `slot` from the map if it is still the entry for `source` and nothing was cached
    /// in it. A slot another loader is currently filling is left alone.
    fn forget_empty_slot(&self, source: &str, slot: &Slot) {
        let mut slots = lock(&self.slots);
        let Some(current) = slots.get(source) else {
            return;
        };
        if !Arc::ptr_eq(current, slot) {
            return;
        }
        let empty = match slot.try_lock() {
            Ok(guard) => guard.is_none(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_none(),
            Err(TryLockError::WouldBlock) => false,
        };
        if empty {
            slots.remove(source);
        }
    }

    fn rasterize(&self, source: &str, dpi: u32) -> InkformResult<RasterOutcome> {
        let bytes = self.assets.load(source)?;
        *lock(&self.rasterize_counts)
            .entry(source.to_owned())
            .or_insert(0) += 1;
        let outcome = RasterOutcome::from_result(self.rasterizer.rasterize(&bytes, dpi));
        if let RasterOutcome::Failed(reason) = &outcome {
            tracing::warn!(%reason, "page rasterization failed; rendering without backgrounds");
        }
        Ok(outcome)
    }

    /// Drop the cached rasters for `source`. Returns `true` if any were cached.
    ///
    /// Waits for an in-flight load of `source` to finish, without blocking loads of other
    /// identities.
    pub fn evict(&self, source: &str) -> bool {
        let slot = lock(&self.slots).remove(source);
        slot.is_some_and(|s| lock(&s).is_some())
    }

    /// Drop every cached source.
    pub fn clear(&self) {
        lock(&self.slots).clear();
    }

    /// `true` when rasters for `source` are cached.
    pub fn is_cached(&self, source: &str) -> bool {
        let slot = lock(&self.slots).get(source).cloned();
        slot.is_some_and(|s| lock(&s).is_some())
    }

    /// Number of cached sources.
    pub fn cached_len(&self) -> usize {
        let slots: Vec<Slot> = lock(&self.slots).values().cloned().collect();
        slots.iter().filter(|s| lock(s).is_some()).count()
    }

    /// How many times `source` has been handed to the rasterizer.
    pub fn rasterize_count(&self, source: &str) -> u64 {
        lock(&self.rasterize_counts)
            .get(source)
            .copied()
            .unwrap_or(0)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
#[path = "../../tests/unit/template/resolver.rs"]
mod tests;
