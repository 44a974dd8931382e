//! Survey data model shared between the API client, the flows, and the CLI.
//!
//! The backend owns every one of these records; the client only ever holds a
//! read-only, possibly stale copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// AI-derived survey parameters returned by the plan endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPlan {
    pub survey_id: String,
    /// Decimal string. Converted to base units only when building the
    /// on-chain call.
    pub total_reward: String,
    pub target_responses: u64,
}

/// Creation time as the backend sent it: either epoch milliseconds or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedAt {
    Millis(i64),
    Text(String),
}

impl CreatedAt {
    /// Epoch milliseconds, if the value can be interpreted as a point in time.
    ///
    /// Numeric strings are taken as milliseconds; other text must be RFC 3339.
    pub fn epoch_millis(&self) -> Option<i64> {
        match self {
            Self::Millis(ms) => Some(*ms),
            Self::Text(s) => {
                let s = s.trim();
                if let Ok(ms) = s.parse::<i64>() {
                    return Some(ms);
                }
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| dt.timestamp_millis())
            }
        }
    }

    /// Render as `DD Mon YYYY`, or verbatim when the value is not a date.
    pub fn display_date(&self) -> String {
        match self
            .epoch_millis()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
        {
            Some(dt) => dt.format("%d %b %Y").to_string(),
            None => match self {
                Self::Millis(ms) => ms.to_string(),
                Self::Text(s) => s.clone(),
            },
        }
    }
}

/// Survey detail as seen by any viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDetail {
    pub survey_id: String,
    pub creator_address: Option<String>,
    pub total_reward: Option<String>,
    pub target_responses: Option<u64>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub created_at: Option<CreatedAt>,
}

/// Aggregate statistics, visible to the survey creator only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyStats {
    pub total_responses: u64,
    pub total_valid_wallets: u64,
    pub avg_score: Option<f64>,
}

/// Scoring outcome recorded against a single response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    Valid,
    Invalid,
    Other(String),
}

impl ResponseStatus {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("valid") {
            Self::Valid
        } else if raw.eq_ignore_ascii_case("invalid") {
            Self::Invalid
        } else {
            Self::Other(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
            Self::Other(s) => s,
        }
    }
}

/// One respondent's submission, visible to the survey creator only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    pub id: String,
    pub wallet: String,
    pub status: Option<ResponseStatus>,
    pub score: Option<f64>,
    pub explanation: Option<String>,
    pub answers: Vec<String>,
    pub created_at: Option<CreatedAt>,
}

impl ResponseRecord {
    /// Eligible for the reward. Says nothing about whether the reward
    /// transaction has been observed on chain.
    pub fn is_reward_eligible(&self) -> bool {
        matches!(self.status, Some(ResponseStatus::Valid))
    }
}

/// Everything the detail endpoint returned for one survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDocument {
    pub detail: SurveyDetail,
    pub stats: Option<SurveyStats>,
    pub responses: Vec<ResponseRecord>,
    pub questions: Vec<String>,
}

/// A row of the creator's survey list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySummary {
    pub id: String,
    pub title: Option<String>,
    pub created_at: Option<CreatedAt>,
    pub total_reward: Option<String>,
    pub target_responses: Option<u64>,
    pub total_responses: Option<u64>,
    pub total_valid_wallets: Option<u64>,
    pub avg_score: Option<f64>,
}

/// Sort newest first. Rows without an interpretable creation time go last.
pub fn sort_newest_first(surveys: &mut [SurveySummary]) {
    surveys.sort_by(|a, b| {
        let ka = a.created_at.as_ref().and_then(CreatedAt::epoch_millis);
        let kb = b.created_at.as_ref().and_then(CreatedAt::epoch_millis);
        kb.cmp(&ka)
    });
}

/// The backend's classification of a submitted answer set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub verdict: Option<String>,
    pub reason: Option<String>,
    pub explanation: Option<String>,
    pub score: Option<f64>,
    pub reward_tx_hash: Option<String>,
    pub tx_hash: Option<String>,
}

impl Verdict {
    /// "valid" in any case signals reward eligibility.
    pub fn is_valid(&self) -> bool {
        self.verdict
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("valid"))
    }

    /// The reward transaction, preferring the dedicated field.
    pub fn transaction_hash(&self) -> Option<&str> {
        self.reward_tx_hash
            .as_deref()
            .filter(|h| !h.is_empty())
            .or(self.tx_hash.as_deref().filter(|h| !h.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, created_at: Option<CreatedAt>) -> SurveySummary {
        SurveySummary {
            id: id.into(),
            title: None,
            created_at,
            total_reward: None,
            target_responses: None,
            total_responses: None,
            total_valid_wallets: None,
            avg_score: None,
        }
    }

    #[test]
    fn created_at_accepts_millis_numeric_text_and_rfc3339() {
        assert_eq!(CreatedAt::Millis(5).epoch_millis(), Some(5));
        assert_eq!(CreatedAt::Text("1700000000000".into()).epoch_millis(), Some(1_700_000_000_000));
        assert_eq!(
            CreatedAt::Text("2026-02-21T10:00:00Z".into()).epoch_millis(),
            Some(1_771_668_000_000)
        );
        assert_eq!(CreatedAt::Text("yesterday".into()).epoch_millis(), None);
    }

    #[test]
    fn display_date_formats_or_falls_back() {
        assert_eq!(
            CreatedAt::Text("2026-02-21T10:00:00Z".into()).display_date(),
            "21 Feb 2026"
        );
        assert_eq!(CreatedAt::Text("last week".into()).display_date(), "last week");
    }

    #[test]
    fn sorts_newest_first_with_unknown_last() {
        let mut rows = vec![
            summary("old", Some(CreatedAt::Millis(1_000))),
            summary("none", None),
            summary("new", Some(CreatedAt::Text("2026-01-01T00:00:00Z".into()))),
            summary("junk", Some(CreatedAt::Text("soon".into()))),
            summary("mid", Some(CreatedAt::Millis(2_000))),
        ];
        sort_newest_first(&mut rows);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(&ids[..3], &["new", "mid", "old"]);
        assert!(ids[3..].contains(&"none") && ids[3..].contains(&"junk"));
    }

    #[test]
    fn response_status_parses_case_insensitively() {
        assert_eq!(ResponseStatus::parse("valid"), ResponseStatus::Valid);
        assert_eq!(ResponseStatus::parse("INVALID"), ResponseStatus::Invalid);
        assert_eq!(
            ResponseStatus::parse("PENDING"),
            ResponseStatus::Other("PENDING".into())
        );
    }

    #[test]
    fn verdict_validity_and_hash_preference() {
        let v = Verdict {
            verdict: Some("Valid".into()),
            reward_tx_hash: Some(String::new()),
            tx_hash: Some("0xabc".into()),
            ..Default::default()
        };
        assert!(v.is_valid());
        assert_eq!(v.transaction_hash(), Some("0xabc"));

        let rejected = Verdict {
            verdict: Some("invalid".into()),
            ..Default::default()
        };
        assert!(!rejected.is_valid());
        assert_eq!(rejected.transaction_hash(), None);
    }
}
