use std::collections::HashMap;
use std::sync::Mutex;

use crate::advisor::Advisor;
use crate::appraisal::AppraisalClient;
use crate::config::AppConfig;
use crate::db::connection::Database;
use crate::domain::AppraisalResult;
use crate::evidence::{EvidenceAttachment, EvidenceVault};
use crate::geocode::{AddressResolver, GeoPoint, Precision, RegionProfile};

/// One question/answer pair from the consultant page.
pub struct ChatExchange {
    pub question: String,
    pub answer: String,
}

/// Working state for the property currently being scouted, plus the
/// consultant transcript and any files staged for a re-appraisal.
/// Single-operator tool, so one session for the whole process.
pub struct ScoutSession {
    pub address: String,
    pub map_center: GeoPoint,
    pub precision: Option<Precision>,
    pub evidence: Vec<EvidenceAttachment>,
    pub appraisal: Option<AppraisalResult>,
    followup: HashMap<i64, Vec<EvidenceAttachment>>,
    pub chat: Vec<ChatExchange>,
}

impl ScoutSession {
    pub fn new() -> Self {
        ScoutSession {
            address: String::new(),
            map_center: RegionProfile::kyotango().fallback,
            precision: None,
            evidence: Vec::new(),
            appraisal: None,
            followup: HashMap::new(),
            chat: Vec::new(),
        }
    }

    /// A new target address restarts the scout: the map jumps to the
    /// resolved point and any previous report no longer applies.
    pub fn enter_address(&mut self, address: &str, point: GeoPoint, precision: Precision) {
        self.address = address.to_string();
        self.map_center = point;
        self.precision = Some(precision);
        self.appraisal = None;
    }

    /// Manual pin drop. Overrides the geocoded point but keeps the
    /// report, since the operator is only correcting the location.
    pub fn place_pin(&mut self, point: GeoPoint) {
        self.map_center = point;
        self.precision = None;
    }

    pub fn stage_evidence(&mut self, attachment: EvidenceAttachment) {
        self.evidence.push(attachment);
    }

    pub fn record_appraisal(&mut self, result: AppraisalResult) {
        self.appraisal = Some(result);
    }

    /// Clears the scout workspace after a save (or on demand). The
    /// consultant transcript and staged re-appraisal files survive.
    pub fn clear_scout(&mut self) {
        self.address.clear();
        self.map_center = RegionProfile::kyotango().fallback;
        self.precision = None;
        self.evidence.clear();
        self.appraisal = None;
    }

    pub fn stage_followup(&mut self, property_id: i64, attachment: EvidenceAttachment) {
        self.followup.entry(property_id).or_default().push(attachment);
    }

    pub fn followup_count(&self, property_id: i64) -> usize {
        self.followup.get(&property_id).map(Vec::len).unwrap_or(0)
    }

    /// Drains the staged files for one property.
    pub fn take_followup(&mut self, property_id: i64) -> Vec<EvidenceAttachment> {
        self.followup.remove(&property_id).unwrap_or_default()
    }

    pub fn push_chat(&mut self, question: String, answer: String) {
        self.chat.push(ChatExchange { question, answer });
    }
}

impl Default for ScoutSession {
    fn default() -> Self {
        ScoutSession::new()
    }
}

/// Everything the request handlers need, shared across worker threads.
pub struct App {
    pub db: Database,
    pub config: AppConfig,
    pub resolver: AddressResolver,
    pub appraiser: AppraisalClient,
    pub advisor: Advisor,
    pub vault: EvidenceVault,
    pub session: Mutex<ScoutSession>,
}

impl App {
    pub fn new(
        db: Database,
        config: AppConfig,
        resolver: AddressResolver,
        appraiser: AppraisalClient,
        advisor: Advisor,
        vault: EvidenceVault,
    ) -> Self {
        App {
            db,
            config,
            resolver,
            appraiser,
            advisor,
            vault,
            session: Mutex::new(ScoutSession::new()),
        }
    }
}
