use crate::domain::appraisal::AppraisalResult;
use crate::geocode::GeoPoint;
use chrono::{NaiveDate, NaiveDateTime};

/// Lifecycle of a scouted property. Stored canonically as snake_case;
/// anything unrecognized decodes as `Considering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyStatus {
    Considering,
    Purchased,
    Passed,
    NotYetVisited,
}

impl PropertyStatus {
    pub const ALL: [PropertyStatus; 4] = [
        PropertyStatus::Considering,
        PropertyStatus::Purchased,
        PropertyStatus::Passed,
        PropertyStatus::NotYetVisited,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyStatus::Considering => "considering",
            PropertyStatus::Purchased => "purchased",
            PropertyStatus::Passed => "passed",
            PropertyStatus::NotYetVisited => "not_yet_visited",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "purchased" => PropertyStatus::Purchased,
            "passed" => PropertyStatus::Passed,
            "not_yet_visited" => PropertyStatus::NotYetVisited,
            _ => PropertyStatus::Considering,
        }
    }

    /// Display name, as the operator reads it.
    pub fn label(self) -> &'static str {
        match self {
            PropertyStatus::Considering => "検討中",
            PropertyStatus::Purchased => "購入済み",
            PropertyStatus::Passed => "見送り",
            PropertyStatus::NotYetVisited => "未内見",
        }
    }
}

/// A saved property as it lives in the `properties` table.
#[derive(Debug, Clone)]
pub struct PropertyRecord {
    pub id: i64,
    pub title: String,
    pub address: String,
    /// NULL coordinates mean "not geocoded"; such records stay off the maps.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price: i64,
    pub renovation_cost: i64,
    pub roi: f64,
    pub features: String,
    pub rating: String,
    pub memo: String,
    pub status: PropertyStatus,
    pub legal_risks: String,
    pub details_json: String,
    pub created_at: NaiveDateTime,
}

impl PropertyRecord {
    /// The full appraisal this record was saved from, decoded tolerantly.
    pub fn appraisal(&self) -> AppraisalResult {
        AppraisalResult::from_json(&self.details_json)
    }

    pub fn point(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint { lat, lon }),
            _ => None,
        }
    }
}

/// Insert payload for a new property row.
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub title: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price: i64,
    pub renovation_cost: i64,
    pub roi: f64,
    pub features: String,
    pub rating: String,
    pub memo: String,
    pub status: PropertyStatus,
    pub legal_risks: String,
    pub details_json: String,
}

impl NewProperty {
    /// Shapes an accepted appraisal into the row that gets saved: title is
    /// `YYYYMMDD_<address>`, the memo starts out as the model's bitter
    /// advice, and the full appraisal JSON rides along in `details_json`.
    pub fn from_appraisal(
        address: &str,
        point: Option<GeoPoint>,
        result: &AppraisalResult,
        today: NaiveDate,
    ) -> Self {
        Self {
            title: format!("{}_{}", today.format("%Y%m%d"), address),
            address: address.to_string(),
            latitude: point.map(|p| p.lat),
            longitude: point.map(|p| p.lon),
            price: result.price_listing,
            renovation_cost: result.renovation_estimate,
            roi: result.roi_estimate,
            features: result.features_summary.clone(),
            rating: result.grade.clone(),
            memo: result.bitter_advice.clone(),
            status: PropertyStatus::Considering,
            legal_risks: result.legal_risks.clone(),
            details_json: result.to_json(),
        }
    }
}

/// The single-column update surface of the store. One field per call is the
/// granularity every edit form works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyField {
    Price,
    RenovationCost,
    Roi,
    Features,
    Rating,
    Memo,
    Status,
    LegalRisks,
    DetailsJson,
    Latitude,
    Longitude,
}

impl PropertyField {
    pub fn column(self) -> &'static str {
        match self {
            PropertyField::Price => "price",
            PropertyField::RenovationCost => "renovation_cost",
            PropertyField::Roi => "roi",
            PropertyField::Features => "features",
            PropertyField::Rating => "rating",
            PropertyField::Memo => "memo",
            PropertyField::Status => "status",
            PropertyField::LegalRisks => "legal_risks",
            PropertyField::DetailsJson => "details_json",
            PropertyField::Latitude => "latitude",
            PropertyField::Longitude => "longitude",
        }
    }
}
