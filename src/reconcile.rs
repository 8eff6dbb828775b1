//! Diff a desired set of source identifiers against the live instances.
//!
//! Matched identifiers keep their instance (pose, swapchain and gesture
//! state intact), new identifiers get a freshly built instance and the rest
//! are dropped, which releases their sources. The live set follows the
//! desired order.

use crate::instance::Instance;
use crate::source::{SourceId, SourceStatus};
use anyhow::Result;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub retained: usize,
    pub disposed: usize,
    pub failed: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.disposed == 0 && self.failed == 0
    }
}

#[derive(Default)]
pub struct InstanceReconciler {
    live: Vec<Instance>,
    // Sources that failed to start. They are not rebuilt until the user
    // deselects and reselects them.
    failed: HashSet<SourceId>,
}

impl InstanceReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances(&self) -> &[Instance] {
        &self.live
    }

    pub fn instances_mut(&mut self) -> &mut [Instance] {
        &mut self.live
    }

    pub fn is_failed(&self, id: &SourceId) -> bool {
        self.failed.contains(id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Dispose every live instance.
    pub fn clear(&mut self) {
        self.live.clear();
        self.failed.clear();
    }

    /// Bring the live set in line with `desired`. Duplicate identifiers
    /// collapse to the first occurrence.
    pub fn reconcile<F>(&mut self, desired: &[SourceId], mut create: F) -> ReconcileReport
    where
        F: FnMut(&SourceId) -> Result<Instance>,
    {
        let mut report = ReconcileReport::default();

        let mut previous: HashMap<SourceId, Instance> = HashMap::with_capacity(self.live.len());
        for instance in self.live.drain(..) {
            if instance.status() == SourceStatus::Failed {
                tracing::warn!(source = %instance.source_id(), "source failed to initialise, dropping it");
                self.failed.insert(instance.source_id().clone());
                report.failed += 1;
                continue;
            }
            previous.insert(instance.source_id().clone(), instance);
        }

        let wanted: HashSet<&SourceId> = desired.iter().collect();
        self.failed.retain(|id| wanted.contains(id));

        let mut seen: HashSet<&SourceId> = HashSet::with_capacity(desired.len());
        for id in desired {
            if !seen.insert(id) {
                continue;
            }
            if let Some(instance) = previous.remove(id) {
                self.live.push(instance);
                report.retained += 1;
                continue;
            }
            if self.failed.contains(id) {
                continue;
            }
            match create(id) {
                Ok(instance) => {
                    self.live.push(instance);
                    report.created += 1;
                }
                Err(err) => {
                    tracing::warn!(source = %id, "failed to create instance: {err:#}");
                    self.failed.insert(id.clone());
                    report.failed += 1;
                }
            }
        }

        report.disposed = previous.len();
        drop(previous);

        if !report.is_noop() {
            tracing::debug!(
                created = report.created,
                retained = report.retained,
                disposed = report.disposed,
                failed = report.failed,
                "reconciled instances"
            );
        }
        report
    }
}
