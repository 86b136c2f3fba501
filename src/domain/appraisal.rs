use serde::{Deserialize, Deserializer, Serialize};

/// The structured verdict the appraisal model is instructed to return.
///
/// Model output is best-effort JSON, so every field is defaulted: a missing
/// or malformed field degrades to zero / empty instead of rejecting the
/// whole appraisal. Money fields are in 万円 (units of 10,000 yen).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppraisalResult {
    #[serde(default, deserialize_with = "flexible_i64")]
    pub price_listing: i64,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub renovation_estimate: i64,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub total_investment: i64,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub expected_revenue_monthly: i64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub roi_estimate: f64,
    #[serde(default)]
    pub legal_risks: String,
    /// S / A / B / C, strictest scale.
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub bitter_advice: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub pros: String,
    #[serde(default, deserialize_with = "flexible_string")]
    pub cons: String,
    #[serde(default)]
    pub features_summary: String,
}

impl AppraisalResult {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }
}

// Models occasionally quote numbers ("350") or leave them null; accept all
// three shapes instead of failing the decode.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flexible {
    Num(f64),
    Text(String),
    Empty(()),
}

impl Flexible {
    fn as_f64(&self) -> f64 {
        match self {
            Flexible::Num(n) => *n,
            Flexible::Text(s) => s.trim().replace(',', "").parse().unwrap_or(0.0),
            Flexible::Empty(()) => 0.0,
        }
    }
}

fn flexible_i64<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Flexible::deserialize(de)?.as_f64() as i64)
}

fn flexible_f64<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Flexible::deserialize(de)?.as_f64())
}

// The narrative fields are asked for as strings, but models sometimes hand
// back lists anyway; those get joined line-per-item.
fn flexible_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrList {
        Text(String),
        List(Vec<String>),
        Empty(()),
    }

    Ok(match TextOrList::deserialize(de)? {
        TextOrList::Text(s) => s,
        TextOrList::List(items) => items.join("\n"),
        TextOrList::Empty(()) => String::new(),
    })
}
