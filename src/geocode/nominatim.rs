use crate::geocode::resolver::GeocodeBackend;
use crate::geocode::{GeoPoint, GeocodeError};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

// Nominatim usage policy wants a self-identifying agent.
const USER_AGENT: &str = "tango_scout/0.1 (kyotango scouting tool)";

#[derive(Debug, Deserialize)]
struct SearchPlace {
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReversePlace {
    #[serde(default)]
    display_name: Option<String>,
    // A 200 with an error body is how unresolvable points come back.
    #[serde(default)]
    error: Option<String>,
}

pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl SearchPlace {
    fn point(&self) -> Result<GeoPoint, GeocodeError> {
        // Coordinates arrive as JSON strings.
        let lat = self
            .lat
            .parse()
            .map_err(|e| GeocodeError::Parse(format!("bad latitude {:?}: {e}", self.lat)))?;
        let lon = self
            .lon
            .parse()
            .map_err(|e| GeocodeError::Parse(format!("bad longitude {:?}: {e}", self.lon)))?;
        Ok(GeoPoint { lat, lon })
    }
}

impl GeocodeBackend for NominatimClient {
    fn search(&self, query: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let resp = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query),
                ("format", "jsonv2"),
                ("limit", "1"),
                ("accept-language", "ja"),
            ])
            .send()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(GeocodeError::Provider(format!(
                "search returned {}",
                resp.status()
            )));
        }

        let places: Vec<SearchPlace> = resp
            .json()
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        match places.first() {
            Some(place) => Ok(Some(place.point()?)),
            None => Ok(None),
        }
    }

    fn reverse(&self, point: GeoPoint) -> Result<Option<String>, GeocodeError> {
        let lat = point.lat.to_string();
        let lon = point.lon.to_string();
        let resp = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("format", "jsonv2"),
                ("accept-language", "ja"),
            ])
            .send()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(GeocodeError::Provider(format!(
                "reverse returned {}",
                resp.status()
            )));
        }

        let place: ReversePlace = resp
            .json()
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        if place.error.is_some() {
            return Ok(None);
        }
        Ok(place.display_name.filter(|name| !name.is_empty()))
    }
}
