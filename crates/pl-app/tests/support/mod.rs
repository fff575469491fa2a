#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use pl_core::dataset::{Lead, Project, ProjectStatus};
use pl_core::geo::LatLng;
use pl_core::ports::{GeocodeError, GeocoderPort, RegionConstraint};
use tokio::sync::Notify;

static TRACE_INIT: Once = Once::new();

pub fn init_tracing() {
    TRACE_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub const LEEDS: LatLng = LatLng::new(53.7960, -1.5479);
pub const YORK: LatLng = LatLng::new(53.9590, -1.0815);
pub const HULL: LatLng = LatLng::new(53.7457, -0.3367);

/// Postcode table geocoder with one postcode that blocks until released.
pub struct GatedGeocoder {
    table: HashMap<String, LatLng>,
    gated: String,
    pub entered: Notify,
    pub release: Notify,
    pub calls: AtomicUsize,
}

impl GatedGeocoder {
    pub fn new(entries: &[(&str, LatLng)], gated: &str) -> Arc<Self> {
        Arc::new(Self {
            table: entries
                .iter()
                .map(|(postcode, point)| (postcode.to_string(), *point))
                .collect(),
            gated: gated.to_string(),
            entered: Notify::new(),
            release: Notify::new(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocoderPort for GatedGeocoder {
    async fn lookup(
        &self,
        postcode: &str,
        _constraint: &RegionConstraint,
    ) -> Result<Vec<LatLng>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if postcode == self.gated {
            self.entered.notify_one();
            self.release.notified().await;
        }
        Ok(self.table.get(postcode).copied().into_iter().collect())
    }
}

pub fn project(name: &str, postcode: &str, status: ProjectStatus) -> Project {
    Project {
        name: name.to_string(),
        postcode: postcode.to_string(),
        status,
    }
}

pub fn lead(name: &str, postcode: &str) -> Lead {
    Lead {
        name: name.to_string(),
        postcode: postcode.to_string(),
        role: None,
        project: None,
    }
}
