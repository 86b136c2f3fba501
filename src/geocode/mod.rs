mod geocode_error;
mod models;
mod nominatim;
mod resolver;

pub use geocode_error::GeocodeError;
pub use models::{GeoPoint, GeoResult, Precision, RegionProfile};
pub use nominatim::NominatimClient;
pub use resolver::{coarsen_to_town, AddressResolver, GeocodeBackend};
