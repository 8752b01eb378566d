//! Draft data models
//!
//! A draft is an unsubmitted case saved for later resumption. Drafts are
//! keyed by a short, human-readable id (`PEND-xxxx-xxxxx`).

use super::case::CaseRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Prefix of every generated draft id
pub const DRAFT_ID_PREFIX: &str = "PEND-";

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut n: u128) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Generate a draft id from a timestamp and random bits:
/// last 4 base36 digits of the millisecond clock, then 5 random base36 digits.
pub fn generate_draft_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().max(0) as u128;
    let ts = to_base36(millis);
    let ts_tail = &ts[ts.len().saturating_sub(4)..];

    let random = to_base36(Uuid::new_v4().as_u128());
    let rnd = &random[random.len().saturating_sub(5)..];

    format!("{}{}-{}", DRAFT_ID_PREFIX, ts_tail, rnd)
}

/// An in-progress case with its identifier and last save time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub id: String,

    #[serde(alias = "ts", default = "Utc::now", deserialize_with = "lenient_timestamp")]
    pub saved_at: DateTime<Utc>,

    #[serde(flatten)]
    pub record: CaseRecord,
}

impl Draft {
    pub fn new(id: impl Into<String>, record: CaseRecord) -> Self {
        Self {
            id: id.into(),
            saved_at: Utc::now(),
            record,
        }
    }

    pub fn summary(&self) -> DraftSummary {
        DraftSummary {
            id: self.id.clone(),
            saved_at: self.saved_at.to_rfc3339(),
            name: self.record.employee.name.clone(),
            area: self.record.employee.area.clone(),
            supervisor: self.record.employee.supervisor.clone(),
            initial_pct: self.record.initial_compliance_pct(),
        }
    }
}

/// One line of a draft listing
///
/// Remote rows come from the spreadsheet with its own column names, so the
/// Spanish keys are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSummary {
    pub id: String,

    #[serde(alias = "ts_humano", alias = "ts", default, deserialize_with = "lenient_string")]
    pub saved_at: String,

    #[serde(alias = "nombre", default)]
    pub name: String,

    #[serde(default)]
    pub area: String,

    #[serde(default)]
    pub supervisor: String,

    #[serde(
        alias = "pct_inicial",
        alias = "pctInicial",
        alias = "initialCompliancePct",
        default,
        deserialize_with = "lenient_pct"
    )]
    pub initial_pct: u8,
}

/// RFC 3339 text or epoch milliseconds (number or digits); anything else
/// reads as now.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let from_millis = |ms: i64| DateTime::<Utc>::from_timestamp_millis(ms);
    let parsed = match &value {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(from_millis),
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|t| t.with_timezone(&Utc))
            .ok()
            .or_else(|| s.trim().parse::<i64>().ok().and_then(from_millis)),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(Utc::now))
}

/// Spreadsheet cells may come back as strings or numbers
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_pct<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let pct = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(pct.round().clamp(0.0, 100.0) as u8)
}
