use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use xr_window_manager::gesture::GestureConfig;
use xr_window_manager::instance::{Instance, InstanceId};
use xr_window_manager::projection::Pose;
use xr_window_manager::reconcile::{InstanceReconciler, ReconcileReport};
use xr_window_manager::source::{SourceId, SourceKind, SourceStatus, SurfaceSource};

struct CountingSource {
    dropped: Arc<AtomicUsize>,
}

impl SurfaceSource for CountingSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Browser
    }
    fn status(&self) -> SourceStatus {
        SourceStatus::Ready
    }
    fn aspect_ratio(&self) -> Option<f32> {
        None
    }
    fn pixel_size(&self) -> Option<(u32, u32)> {
        None
    }
    fn title(&self) -> Option<String> {
        None
    }
}

impl Drop for CountingSource {
    fn drop(&mut self) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct Factory {
    created: AtomicUsize,
    dropped: Arc<AtomicUsize>,
}

impl Factory {
    fn build(&self, id: &SourceId) -> anyhow::Result<Instance> {
        if let SourceId::Url(url) = id {
            if url.contains("broken") {
                anyhow::bail!("cannot open {url}");
            }
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        let dropped = self.dropped.clone();
        Instance::new(id.clone(), Pose::in_front(0.5), GestureConfig::default(), move |_sink| {
            Ok(Box::new(CountingSource { dropped }) as Box<dyn SurfaceSource>)
        })
    }

    fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    fn dropped(&self) -> usize {
        self.dropped.load(Ordering::SeqCst)
    }
}

fn urls(list: &[&str]) -> Vec<SourceId> {
    list.iter().map(|u| SourceId::Url(u.to_string())).collect()
}

fn ids(reconciler: &InstanceReconciler) -> Vec<InstanceId> {
    reconciler.instances().iter().map(|i| i.id()).collect()
}

fn keys(reconciler: &InstanceReconciler) -> Vec<SourceId> {
    reconciler
        .instances()
        .iter()
        .map(|i| i.source_id().clone())
        .collect()
}

#[test]
fn unchanged_desired_set_keeps_instances() {
    let factory = Factory::default();
    let mut reconciler = InstanceReconciler::new();
    let desired = urls(&["a.com", "b.com"]);

    reconciler.reconcile(&desired, |id| factory.build(id));
    let first = ids(&reconciler);
    let report = reconciler.reconcile(&desired, |id| factory.build(id));

    assert_eq!(ids(&reconciler), first);
    assert!(report.is_noop());
    assert_eq!(report.retained, 2);
    assert_eq!(factory.created(), 2);
}

#[test]
fn diff_retains_creates_and_disposes() {
    let factory = Factory::default();
    let mut reconciler = InstanceReconciler::new();

    reconciler.reconcile(&urls(&["a.com", "b.com"]), |id| factory.build(id));
    let b = reconciler.instances()[1].id();

    let report = reconciler.reconcile(&urls(&["b.com", "c.com"]), |id| factory.build(id));

    assert_eq!(
        report,
        ReconcileReport {
            created: 1,
            retained: 1,
            disposed: 1,
            failed: 0,
        }
    );
    assert_eq!(reconciler.instances()[0].id(), b);
    assert_eq!(keys(&reconciler), urls(&["b.com", "c.com"]));
    assert_eq!(factory.dropped(), 1);
}

#[test]
fn reordering_does_not_recreate() {
    let factory = Factory::default();
    let mut reconciler = InstanceReconciler::new();

    reconciler.reconcile(&urls(&["a.com", "b.com", "c.com"]), |id| factory.build(id));
    let before = ids(&reconciler);
    reconciler.reconcile(&urls(&["c.com", "a.com", "b.com"]), |id| factory.build(id));

    assert_eq!(ids(&reconciler), vec![before[2], before[0], before[1]]);
    assert_eq!(factory.created(), 3);
    assert_eq!(factory.dropped(), 0);
}

#[test]
fn duplicates_collapse_to_one_instance() {
    let factory = Factory::default();
    let mut reconciler = InstanceReconciler::new();

    reconciler.reconcile(&urls(&["a.com", "a.com", "b.com", "a.com"]), |id| {
        factory.build(id)
    });

    assert_eq!(keys(&reconciler), urls(&["a.com", "b.com"]));
    assert_eq!(factory.created(), 2);
}

#[test]
fn failed_creation_is_remembered_while_desired() {
    let factory = Factory::default();
    let mut reconciler = InstanceReconciler::new();
    let desired = urls(&["a.com", "broken.com"]);
    let broken = SourceId::Url("broken.com".into());

    let report = reconciler.reconcile(&desired, |id| factory.build(id));
    assert_eq!(report.failed, 1);
    assert_eq!(keys(&reconciler), urls(&["a.com"]));
    assert!(reconciler.is_failed(&broken));

    let attempts = std::cell::Cell::new(0);
    reconciler.reconcile(&desired, |id| {
        attempts.set(attempts.get() + 1);
        factory.build(id)
    });
    assert_eq!(attempts.get(), 0);

    reconciler.reconcile(&urls(&["a.com"]), |id| factory.build(id));
    assert!(!reconciler.is_failed(&broken));
}

#[test]
fn clear_releases_everything() {
    let factory = Factory::default();
    let mut reconciler = InstanceReconciler::new();

    reconciler.reconcile(&urls(&["a.com", "b.com"]), |id| factory.build(id));
    reconciler.clear();

    assert!(reconciler.is_empty());
    assert_eq!(factory.dropped(), 2);
}

#[test]
fn mixed_kinds_are_distinct_keys() {
    let factory = Factory::default();
    let mut reconciler = InstanceReconciler::new();
    let handle = xr_window_manager::source::WindowHandle::from_raw(1);
    let desired = vec![SourceId::Url("1".into()), SourceId::Window(handle)];

    reconciler.reconcile(&desired, |id| factory.build(id));

    assert_eq!(reconciler.len(), 2);
    assert_eq!(reconciler.instances()[1].source_id().kind(), SourceKind::Window);
}
