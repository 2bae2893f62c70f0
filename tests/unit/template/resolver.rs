use std::sync::{
    Arc, Barrier,
    atomic::{AtomicUsize, Ordering},
};
use std::time::{Duration, Instant};

use super::*;
use crate::{
    InkformError,
    assets::source::MemoryAssetSource,
    model::{binding::FieldBinding, field::FieldConfig},
    raster::page::PageRaster,
    template::runtime::PageBackground,
};

#[derive(Default)]
struct CountingRasterizer {
    calls: AtomicUsize,
    delay: Option<Duration>,
    fail: bool,
    started: Option<std::sync::mpsc::SyncSender<()>>,
}

impl PageRasterizer for CountingRasterizer {
    fn rasterize(&self, _document: &[u8], dpi: u32) -> InkformResult<Vec<PageRaster>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(tx) = &self.started {
            let _ = tx.try_send(());
        }
        if let Some(d) = self.delay {
            std::thread::sleep(d);
        }
        if self.fail {
            return Err(crate::InkformError::raster("no renderer"));
        }
        Ok(vec![PageRaster {
            page_index: 0,
            image: Arc::new(vec![1, 2, 3]),
            pixel_width: 2 * dpi,
            pixel_height: 4 * dpi,
            dpi,
        }])
    }
}

fn assets() -> Arc<MemoryAssetSource> {
    Arc::new(
        MemoryAssetSource::new()
            .with("form.pdf", b"%PDF-1.7 fake".to_vec())
            .with("other.pdf", b"%PDF-1.7 other".to_vec()),
    )
}

fn background_image(t: &RuntimeTemplate, page: usize) -> Arc<Vec<u8>> {
    t.pages()[page]
        .background
        .raster()
        .expect("raster background")
        .image
        .clone()
}

fn bindings(t: &RuntimeTemplate) -> Vec<String> {
    t.fields().map(|f| f.binding().to_string()).collect()
}

fn resolver(r: Arc<CountingRasterizer>, policy: CachePolicy) -> TemplateResolver {
    TemplateResolver::new(
        assets(),
        r,
        ResolverOpts {
            policy,
            ..ResolverOpts::default()
        },
    )
}

#[test]
fn memoized_loads_rasterize_once() {
    let r = Arc::new(CountingRasterizer::default());
    let res = resolver(r.clone(), CachePolicy::Memoized);
    let layouts = [PageLayout::new(0)];

    let a = res.load("form.pdf", "Form", &layouts, 72).unwrap();
    let b = res.load("form.pdf", "Form", &layouts, 72).unwrap();
    assert_eq!(a, b);
    assert!(Arc::ptr_eq(&background_image(&a, 0), &background_image(&b, 0)));
    assert_eq!(r.calls.load(Ordering::SeqCst), 1);
    assert_eq!(res.rasterize_count("form.pdf"), 1);
    assert!(res.is_cached("form.pdf"));
    assert_eq!(res.cached_len(), 1);
    assert_eq!(a.pages()[0].size, Size::new(144.0, 288.0));
}

#[test]
fn memoized_loads_resolve_each_call_against_its_own_layouts() {
    let r = Arc::new(CountingRasterizer::default());
    let res = resolver(r.clone(), CachePolicy::Memoized);
    let first_name = FieldConfig::text(FieldBinding::new("firstName").unwrap(), 0, 10.0, 10.0);
    let last_name = FieldConfig::text(FieldBinding::new("lastName").unwrap(), 0, 10.0, 10.0)
        .with_required(true);
    let sig = FieldConfig::signature(FieldBinding::new("sig").unwrap(), 1, 10.0, 10.0);

    let first = res
        .load(
            "form.pdf",
            "Form",
            &[PageLayout::new(0).with_field(first_name)],
            72,
        )
        .unwrap();
    let second = res
        .load(
            "form.pdf",
            "Form B",
            &[
                PageLayout::new(0).with_field(last_name),
                PageLayout::new(1).with_field(sig),
            ],
            72,
        )
        .unwrap();

    assert_eq!(bindings(&first), ["firstName"]);
    assert_eq!(bindings(&second), ["lastName", "sig"]);
    assert_eq!(second.name(), "Form B");
    assert_eq!(second.pages().len(), 2);
    assert!(Arc::ptr_eq(
        &background_image(&first, 0),
        &background_image(&second, 0)
    ));
    assert_eq!(second.pages()[1].background, PageBackground::Missing);
    assert_eq!(res.rasterize_count("form.pdf"), 1);
    assert_eq!(r.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn memoized_load_at_new_dpi_replaces_cached_rasters() {
    let r = Arc::new(CountingRasterizer::default());
    let res = resolver(r.clone(), CachePolicy::Memoized);
    let layouts = [PageLayout::new(0)];

    let low = res.load("form.pdf", "Form", &layouts, 72).unwrap();
    let high = res.load("form.pdf", "Form", &layouts, 144).unwrap();
    let again = res.load("form.pdf", "Form", &layouts, 144).unwrap();
    assert_eq!(low.dpi(), 72);
    assert_eq!(high.dpi(), 144);
    assert_eq!(high.pages()[0].background.raster().unwrap().dpi, 144);
    assert_eq!(again, high);
    assert_eq!(r.calls.load(Ordering::SeqCst), 2);
    assert_eq!(res.cached_len(), 1);
}

#[test]
fn evict_and_clear_force_reload() {
    let r = Arc::new(CountingRasterizer::default());
    let res = resolver(r.clone(), CachePolicy::Memoized);
    let layouts = [PageLayout::new(0)];

    res.load("form.pdf", "Form", &layouts, 72).unwrap();
    res.load("other.pdf", "Other", &layouts, 72).unwrap();
    assert_eq!(res.cached_len(), 2);

    assert!(res.evict("form.pdf"));
    assert!(!res.evict("form.pdf"));
    assert!(!res.is_cached("form.pdf"));
    res.load("form.pdf", "Form", &layouts, 72).unwrap();
    assert_eq!(res.rasterize_count("form.pdf"), 2);

    res.clear();
    assert_eq!(res.cached_len(), 0);
    res.load("other.pdf", "Other", &layouts, 72).unwrap();
    assert_eq!(res.rasterize_count("other.pdf"), 2);
    assert_eq!(r.calls.load(Ordering::SeqCst), 4);
}

#[test]
fn always_reload_rasterizes_every_call() {
    let r = Arc::new(CountingRasterizer::default());
    let res = resolver(r.clone(), CachePolicy::AlwaysReload);
    let layouts = [PageLayout::new(0)];
    let a = res.load("form.pdf", "Form", &layouts, 72).unwrap();
    let b = res.load("form.pdf", "Form", &layouts, 72).unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(r.calls.load(Ordering::SeqCst), 2);
    assert_eq!(res.cached_len(), 0);
}

#[test]
fn rasterizer_failure_degrades_to_unavailable_backgrounds() {
    let r = Arc::new(CountingRasterizer {
        fail: true,
        ..CountingRasterizer::default()
    });
    let res = resolver(r, CachePolicy::Memoized);
    let t = res
        .load("form.pdf", "Form", &[PageLayout::new(0)], 72)
        .unwrap();
    assert!(matches!(t.pages()[0].background, PageBackground::Unavailable(_)));
    assert_eq!(t.pages()[0].size, DEFAULT_PAGE_SIZE);
}

#[test]
fn asset_errors_propagate_and_are_not_cached() {
    let r = Arc::new(CountingRasterizer::default());
    let res = resolver(r.clone(), CachePolicy::Memoized);
    let err = res
        .load("missing.pdf", "Missing", &[PageLayout::new(0)], 72)
        .unwrap_err();
    assert!(matches!(err, InkformError::Asset(_)));
    assert!(!res.is_cached("missing.pdf"));
    assert_eq!(r.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn failed_loads_leave_no_slot_behind() {
    let r = Arc::new(CountingRasterizer::default());
    let res = resolver(r, CachePolicy::Memoized);
    for i in 0..16 {
        let source = format!("missing-{i}.pdf");
        assert!(res.load(&source, "Missing", &[PageLayout::new(0)], 72).is_err());
    }
    assert_eq!(lock(&res.slots).len(), 0);

    res.load("form.pdf", "Form", &[PageLayout::new(0)], 72)
        .unwrap();
    assert_eq!(lock(&res.slots).len(), 1);
}

#[test]
fn evict_during_slow_load_does_not_block_other_sources() {
    let (tx, rx) = std::sync::mpsc::sync_channel(1);
    let r = Arc::new(CountingRasterizer {
        delay: Some(Duration::from_millis(600)),
        started: Some(tx),
        ..CountingRasterizer::default()
    });
    let res = Arc::new(resolver(r, CachePolicy::Memoized));

    let loader = {
        let res = res.clone();
        std::thread::spawn(move || {
            res.load("form.pdf", "Form", &[PageLayout::new(0)], 72)
                .unwrap()
        })
    };
    rx.recv().unwrap();

    let evictor = {
        let res = res.clone();
        std::thread::spawn(move || res.evict("form.pdf"))
    };
    std::thread::sleep(Duration::from_millis(50));

    let start = Instant::now();
    assert!(!res.is_cached("other.pdf"));
    assert!(start.elapsed() < Duration::from_millis(250));

    loader.join().unwrap();
    assert!(evictor.join().unwrap());
    assert!(!res.is_cached("form.pdf"));
}

#[test]
fn concurrent_first_loads_are_coalesced() {
    let r = Arc::new(CountingRasterizer {
        delay: Some(Duration::from_millis(50)),
        ..CountingRasterizer::default()
    });
    let res = Arc::new(resolver(r.clone(), CachePolicy::Memoized));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let res = res.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                res.load("form.pdf", "Form", &[PageLayout::new(0)], 72)
                    .unwrap()
            })
        })
        .collect();
    let templates: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(r.calls.load(Ordering::SeqCst), 1);
    let images: Vec<_> = templates.iter().map(|t| background_image(t, 0)).collect();
    assert!(images.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}
