use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// How trustworthy a resolved coordinate is. `CityFallback` is the sentinel
/// tier: the point is the city hall, not the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Exact,
    Town,
    CityFallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoResult {
    pub point: GeoPoint,
    pub precision: Precision,
}

/// The fixed region this tool scouts in. `marker` is the substring whose
/// presence means an address is already region-qualified; `prefix` gets
/// prepended otherwise. `fallback` anchors the CityFallback tier.
#[derive(Debug, Clone)]
pub struct RegionProfile {
    pub marker: &'static str,
    pub prefix: &'static str,
    pub fallback: GeoPoint,
}

impl RegionProfile {
    /// Kyotango, northern Kyoto prefecture. The fallback point is the city
    /// hall in Mineyama.
    pub fn kyotango() -> Self {
        Self {
            marker: "京都",
            prefix: "京都府",
            fallback: GeoPoint { lat: 35.62, lon: 135.06 },
        }
    }

    /// Region-qualifies an address for lookup, never twice.
    pub fn qualify(&self, address: &str) -> String {
        if address.contains(self.marker) {
            address.to_string()
        } else {
            format!("{} {}", self.prefix, address)
        }
    }

    /// Whether a point sits in the ±0.01° box around the fallback sentinel,
    /// i.e. is indistinguishable from "we never found this place".
    pub fn near_fallback(&self, point: GeoPoint) -> bool {
        (point.lat - self.fallback.lat).abs() < 0.01 && (point.lon - self.fallback.lon).abs() < 0.01
    }
}

impl Default for RegionProfile {
    fn default() -> Self {
        Self::kyotango()
    }
}
