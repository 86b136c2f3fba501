use crate::advisor::Advisor;
use crate::appraisal::{
    AppraisalClient, AppraisalError, GenerativeBackend, ModelRequest, RetryPolicy,
};
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::evidence::EvidenceVault;
use crate::geocode::{AddressResolver, GeoPoint, GeocodeBackend, GeocodeError, RegionProfile};
use crate::state::App;
use astra::{Body, Request, Response};
use http::Method;
use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use url::form_urlencoded;

/// Canned geocoder: answers straight from a fixed query table.
pub struct StubGeocode {
    entries: HashMap<String, GeoPoint>,
    reverse_name: Option<String>,
}

impl StubGeocode {
    pub fn new(entries: &[(&str, GeoPoint)], reverse_name: Option<&str>) -> Self {
        Self {
            entries: entries.iter().map(|(q, p)| (q.to_string(), *p)).collect(),
            reverse_name: reverse_name.map(str::to_string),
        }
    }
}

impl GeocodeBackend for StubGeocode {
    fn search(&self, query: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        Ok(self.entries.get(query).copied())
    }

    fn reverse(&self, _point: GeoPoint) -> Result<Option<String>, GeocodeError> {
        Ok(self.reverse_name.clone())
    }
}

/// Scripted model backend: replies play in order, the last one repeats, and
/// every request is recorded for inspection.
pub struct StubModel {
    replies: Vec<Result<String, String>>,
    requests: Mutex<Vec<ModelRequest>>,
    served: Mutex<usize>,
}

impl StubModel {
    pub fn new(replies: Vec<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            replies,
            requests: Mutex::new(Vec::new()),
            served: Mutex::new(0),
        })
    }

    pub fn last_request(&self) -> Option<ModelRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl GenerativeBackend for StubModel {
    fn generate(&self, request: &ModelRequest) -> Result<String, AppraisalError> {
        self.requests.lock().unwrap().push(request.clone());

        let mut served = self.served.lock().unwrap();
        let index = (*served).min(self.replies.len().saturating_sub(1));
        *served += 1;

        match self.replies.get(index) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(msg)) => Err(AppraisalError::Provider(msg.clone())),
            None => Err(AppraisalError::Provider("no scripted reply".to_string())),
        }
    }
}

/// The reply every happy-path appraisal test scripts.
pub fn appraisal_json() -> String {
    r#"{
        "price_listing": 350,
        "renovation_estimate": 800,
        "total_investment": 1150,
        "expected_revenue_monthly": 20,
        "roi_estimate": 8.5,
        "legal_risks": "接道義務を要確認",
        "grade": "A",
        "bitter_advice": "改修費を甘く見るな",
        "pros": "海まで徒歩5分",
        "cons": "雨漏りの形跡",
        "features_summary": "木造2階建て 6DK"
    }"#
    .to_string()
}

/// Geocoder fixture matching the addresses the scout tests type in: an exact
/// hit for the full lot address and a town hit for its coarsened form.
pub fn default_geo() -> StubGeocode {
    StubGeocode::new(
        &[
            ("京都府 網野町網野123", GeoPoint { lat: 35.701, lon: 135.058 }),
            ("京都府 網野町網野", GeoPoint { lat: 35.690, lon: 135.060 }),
        ],
        Some("京都府京丹後市網野町網野"),
    )
}

pub fn test_app() -> (App, Arc<StubModel>) {
    test_app_with(default_geo(), vec![Ok(appraisal_json())])
}

/// Builds a full App against a throwaway database and evidence directory.
pub fn test_app_with(
    geo: StubGeocode,
    replies: Vec<Result<String, String>>,
) -> (App, Arc<StubModel>) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    let db_path = std::env::temp_dir().join(format!("tango_scout_router_{nanos}.sqlite3"));
    let db = Database::new(db_path.to_string_lossy().to_string());
    init_db(&db, include_str!("../../sql/schema.sql")).expect("schema should apply");

    let vault = EvidenceVault::new(std::env::temp_dir().join(format!("tango_scout_router_vault_{nanos}")));
    let resolver = AddressResolver::new(Box::new(geo), RegionProfile::kyotango());

    let model = StubModel::new(replies);
    let appraiser = AppraisalClient::new(
        model.clone(),
        RetryPolicy {
            max_attempts: 3,
            backoff: Duration::ZERO,
        },
    );
    let advisor = Advisor::new(model.clone());

    let app = App::new(db, AppConfig::default(), resolver, appraiser, advisor, vault);
    (app, model)
}

pub fn get(uri: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, fields: &[(&str, &str)]) -> Request {
    let mut body = form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        body.append_pair(key, value);
    }

    http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.finish().into_bytes()))
        .unwrap()
}

/// Raw-body upload the way the page script sends one: name in the query
/// string, payload as the body.
pub fn post_upload(uri: &str, name: &str, content_type: &str, bytes: Vec<u8>) -> Request {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("name", name)
        .finish();

    http::Request::builder()
        .method(Method::POST)
        .uri(format!("{uri}?{query}"))
        .header("Content-Type", content_type)
        .body(Body::from(bytes))
        .unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_bytes(resp: Response) -> Vec<u8> {
    let mut bytes = Vec::new();
    resp.into_body().reader().read_to_end(&mut bytes).unwrap();
    bytes
}

pub fn location(resp: &Response) -> String {
    resp.headers()
        .get("Location")
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// GET request for wherever the redirect points, notice query included.
pub fn follow(resp: &Response) -> Request {
    get(&location(resp))
}
