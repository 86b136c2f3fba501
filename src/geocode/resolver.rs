use crate::geocode::{GeoPoint, GeoResult, GeocodeError, Precision, RegionProfile};
use tracing::warn;

/// Seam to the geocoding provider, kept narrow so the resolver can run
/// against canned backends.
pub trait GeocodeBackend: Send + Sync {
    fn search(&self, query: &str) -> Result<Option<GeoPoint>, GeocodeError>;
    fn reverse(&self, point: GeoPoint) -> Result<Option<String>, GeocodeError>;
}

pub struct AddressResolver {
    backend: Box<dyn GeocodeBackend>,
    region: RegionProfile,
}

impl AddressResolver {
    pub fn new(backend: Box<dyn GeocodeBackend>, region: RegionProfile) -> Self {
        Self { backend, region }
    }

    /// Three-tier lookup: the full address, then its town, then the region
    /// fallback point. Provider misses and errors alike degrade to the next
    /// tier, and the precision tag says which tier answered.
    pub fn resolve(&self, address: &str) -> GeoResult {
        let query = self.region.qualify(address);
        match self.backend.search(&query) {
            Ok(Some(point)) => {
                return GeoResult {
                    point,
                    precision: Precision::Exact,
                }
            }
            Ok(None) => {}
            Err(e) => warn!("exact lookup failed for {query}: {e}"),
        }

        let town = coarsen_to_town(address);
        if !town.is_empty() && town != address {
            let query = self.region.qualify(&town);
            match self.backend.search(&query) {
                Ok(Some(point)) => {
                    return GeoResult {
                        point,
                        precision: Precision::Town,
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("town lookup failed for {query}: {e}"),
            }
        }

        GeoResult {
            point: self.region.fallback,
            precision: Precision::CityFallback,
        }
    }

    /// Japanese display name for a point, `None` when the provider has no
    /// answer (or is down; that gets logged, not surfaced).
    pub fn reverse(&self, point: GeoPoint) -> Option<String> {
        match self.backend.reverse(point) {
            Ok(name) => name,
            Err(e) => {
                warn!("reverse lookup failed for {},{}: {e}", point.lat, point.lon);
                None
            }
        }
    }

    pub fn region(&self) -> &RegionProfile {
        &self.region
    }
}

/// Coarsens a lot-level address to its town: every digit run goes (ASCII and
/// full-width both), then any trailing run of hyphen / 番 / 地 markers.
pub fn coarsen_to_town(address: &str) -> String {
    let without_digits: String = address
        .chars()
        .filter(|c| !c.is_ascii_digit() && !('０'..='９').contains(c))
        .collect();
    without_digits
        .trim_end_matches(['-', '－', '番', '地'])
        .to_string()
}
