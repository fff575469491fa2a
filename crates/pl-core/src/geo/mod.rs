//! Geographic primitives.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Minimal extent containing every point it was extended with.
/// 包含所有已扩展点的最小范围。
///
/// Starts empty. Markers are confined to one country so the extent never
/// wraps the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatLngBounds {
    extent: Option<Extent>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl LatLngBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, point: LatLng) {
        self.extent = Some(match self.extent {
            None => Extent {
                south: point.lat,
                west: point.lng,
                north: point.lat,
                east: point.lng,
            },
            Some(e) => Extent {
                south: e.south.min(point.lat),
                west: e.west.min(point.lng),
                north: e.north.max(point.lat),
                east: e.east.max(point.lng),
            },
        });
    }

    pub fn is_empty(&self) -> bool {
        self.extent.is_none()
    }

    pub fn south_west(&self) -> Option<LatLng> {
        self.extent.map(|e| LatLng::new(e.south, e.west))
    }

    pub fn north_east(&self) -> Option<LatLng> {
        self.extent.map(|e| LatLng::new(e.north, e.east))
    }

    pub fn center(&self) -> Option<LatLng> {
        self.extent
            .map(|e| LatLng::new((e.south + e.north) / 2.0, (e.west + e.east) / 2.0))
    }

    pub fn contains(&self, point: LatLng) -> bool {
        self.extent.is_some_and(|e| {
            point.lat >= e.south
                && point.lat <= e.north
                && point.lng >= e.west
                && point.lng <= e.east
        })
    }
}

impl FromIterator<LatLng> for LatLngBounds {
    fn from_iter<I: IntoIterator<Item = LatLng>>(iter: I) -> Self {
        let mut bounds = LatLngBounds::new();
        for point in iter {
            bounds.extend(point);
        }
        bounds
    }
}
