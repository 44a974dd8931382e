//! Decoding boundary for agent responses.
//!
//! The backend contract drifts: payloads move between `survey` and `detail`
//! wrappers, lists come back as arrays or as `{ items }` / `{ data }` objects.
//! Each field is located by probing an ordered list of JSON pointers and
//! taking the first one whose value has the expected shape. Nothing outside
//! this module looks at raw response JSON.

use serde_json::Value;
use surveysensei_core::{
    CreatedAt, ResponseRecord, ResponseStatus, SurveyDetail, SurveyDocument, SurveyPlan,
    SurveyStats, SurveySummary, Verdict,
};

use crate::SyncError;

const DETAIL_PATHS: &[&str] = &["/detail", "/survey", ""];
const QUESTION_PATHS: &[&str] = &[
    "/detail/questions",
    "/survey/questions",
    "/questions",
    "/plan/questions",
];
const STATS_PATHS: &[&str] = &["/stats", "/detail/stats", "/survey/stats"];
const RESPONSE_PATHS: &[&str] = &[
    "/responses",
    "/responses/items",
    "/responses/data",
    "/detail/responses",
    "/survey/responses",
];
const LIST_PATHS: &[&str] = &["/surveys", "/list"];

// ── Entry points ──

/// `survey.{surveyId,totalReward,targetResponses}` from the plan endpoint.
pub fn plan(body: &Value) -> Result<SurveyPlan, SyncError> {
    let survey = body
        .get("survey")
        .filter(|v| v.is_object())
        .ok_or_else(|| SyncError::Malformed("response has no survey object".into()))?;
    let survey_id = text(survey, &["surveyId", "id"])
        .ok_or_else(|| SyncError::Malformed("survey has no surveyId".into()))?;
    let total_reward = text(survey, &["totalReward"])
        .ok_or_else(|| SyncError::Malformed("survey has no totalReward".into()))?;
    let target_responses = count(survey, &["targetResponses"])
        .ok_or_else(|| SyncError::Malformed("survey has no targetResponses".into()))?;
    Ok(SurveyPlan {
        survey_id,
        total_reward,
        target_responses,
    })
}

/// Survey rows from `surveys[]` or `list[]`. Rows without an id are dropped.
pub fn survey_list(body: &Value) -> Vec<SurveySummary> {
    let Some(rows) = first_match(body, LIST_PATHS, Value::is_array).and_then(Value::as_array)
    else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| {
            let id = text(row, &["surveyId", "id"])?;
            let stats = row.get("stats").filter(|s| s.is_object());
            Some(SurveySummary {
                id,
                title: text(row, &["title", "description"]),
                created_at: created_at(row),
                total_reward: text(row, &["totalReward"]),
                target_responses: count(row, &["targetResponses"]),
                total_responses: stats.and_then(|s| count(s, &["totalResponses"])),
                total_valid_wallets: stats.and_then(|s| count(s, &["totalValidWallets"])),
                avg_score: stats.and_then(|s| float(s, &["avgScore"])),
            })
        })
        .collect()
}

/// Full detail document. `requested_id` stands in when the payload omits it.
pub fn document(body: &Value, requested_id: &str) -> SurveyDocument {
    let empty = Value::Object(Default::default());
    let d = first_match(body, DETAIL_PATHS, Value::is_object).unwrap_or(&empty);

    let detail = SurveyDetail {
        survey_id: text(d, &["surveyId", "id"]).unwrap_or_else(|| requested_id.to_string()),
        creator_address: text(d, &["creatorWallet", "creator", "creatorAddress"]),
        total_reward: text(d, &["totalReward"]),
        target_responses: count(d, &["targetResponses"]),
        description: text(d, &["description"]),
        title: text(d, &["title"]).or_else(|| text(body, &["title"])),
        created_at: created_at(d),
    };

    let stats = first_match(body, STATS_PATHS, Value::is_object).map(|s| SurveyStats {
        total_responses: count(s, &["totalResponses"]).unwrap_or(0),
        total_valid_wallets: count(s, &["totalValidWallets"]).unwrap_or(0),
        avg_score: float(s, &["avgScore"]),
    });

    let responses = first_match(body, RESPONSE_PATHS, Value::is_array)
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .enumerate()
                .filter(|(_, r)| r.is_object())
                .map(|(i, r)| response(r, i))
                .collect()
        })
        .unwrap_or_default();

    let questions = first_match(body, QUESTION_PATHS, Value::is_array)
        .map(strings)
        .unwrap_or_default();

    SurveyDocument {
        detail,
        stats,
        responses,
        questions,
    }
}

/// Verdict from the answer endpoint; every field is optional.
pub fn verdict(body: &Value) -> Verdict {
    Verdict {
        verdict: text(body, &["verdict"]),
        reason: text(body, &["reason"]),
        explanation: text(body, &["explanation"]),
        score: float(body, &["score"]),
        reward_tx_hash: text(body, &["rewardTxHash", "reward_tx_hash"]),
        tx_hash: text(body, &["txHash", "transactionHash", "hash"]),
    }
}

// ── Probing helpers ──

/// First pointer whose value passes `accept`.
fn first_match<'a>(
    root: &'a Value,
    paths: &[&str],
    accept: fn(&Value) -> bool,
) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|p| root.pointer(p))
        .find(|v| accept(v))
}

fn response(r: &Value, index: usize) -> ResponseRecord {
    ResponseRecord {
        id: text(r, &["id", "_id", "responseId"]).unwrap_or_else(|| index.to_string()),
        wallet: text(r, &["wallet", "walletAddress", "respondent"]).unwrap_or_default(),
        status: text(r, &["status", "verdict"]).map(|s| ResponseStatus::parse(&s)),
        score: float(r, &["score"]),
        explanation: text(r, &["explanation", "reason"]),
        answers: r.get("answers").map(strings).unwrap_or_default(),
        created_at: created_at(r),
    }
}

/// First key holding a non-empty string or a number, as text.
fn text(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match v.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First key holding a non-negative integer (number or numeric string).
fn count(v: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| match v.get(*k)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn float(v: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| match v.get(*k)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn created_at(v: &Value) -> Option<CreatedAt> {
    ["createdAt", "created_at", "created"]
        .iter()
        .find_map(|k| match v.get(*k)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(CreatedAt::Millis),
            Value::String(s) if !s.trim().is_empty() => Some(CreatedAt::Text(s.clone())),
            _ => None,
        })
}

/// Array elements as non-empty strings. Objects contribute their `text` or
/// `question` field.
fn strings(v: &Value) -> Vec<String> {
    let Some(items) = v.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(_) | Value::Bool(_) => Some(item.to_string()),
            Value::Object(_) => text(item, &["text", "question"]),
            _ => None,
        })
        .filter(|s| !s.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plan_reads_nested_survey() {
        let body = json!({
            "survey": {"surveyId": "S1", "totalReward": "1.5", "targetResponses": 100}
        });
        let p = plan(&body).unwrap();
        assert_eq!(p.survey_id, "S1");
        assert_eq!(p.total_reward, "1.5");
        assert_eq!(p.target_responses, 100);
    }

    #[test]
    fn plan_keeps_numeric_reward_as_decimal_text() {
        let body = json!({
            "survey": {"surveyId": "S1", "totalReward": 0.25, "targetResponses": "40"}
        });
        let p = plan(&body).unwrap();
        assert_eq!(p.total_reward, "0.25");
        assert_eq!(p.target_responses, 40);
    }

    #[test]
    fn plan_without_survey_is_malformed() {
        assert!(matches!(plan(&json!({"error": "nope"})), Err(SyncError::Malformed(_))));
        assert!(matches!(
            plan(&json!({"survey": {"surveyId": "S1"}})),
            Err(SyncError::Malformed(_))
        ));
    }

    #[test]
    fn detail_prefers_detail_wrapper_then_survey_then_root() {
        let body = json!({
            "survey": {"surveyId": "from-survey"},
            "detail": {"surveyId": "from-detail", "creatorWallet": "0xABC"}
        });
        let doc = document(&body, "req");
        assert_eq!(doc.detail.survey_id, "from-detail");
        assert_eq!(doc.detail.creator_address.as_deref(), Some("0xABC"));

        let body = json!({"survey": {"id": "S2", "creator": "0xdef", "totalReward": "2"}});
        let doc = document(&body, "req");
        assert_eq!(doc.detail.survey_id, "S2");
        assert_eq!(doc.detail.creator_address.as_deref(), Some("0xdef"));

        let body = json!({"title": "Root survey", "targetResponses": 7});
        let doc = document(&body, "req");
        assert_eq!(doc.detail.survey_id, "req");
        assert_eq!(doc.detail.title.as_deref(), Some("Root survey"));
        assert_eq!(doc.detail.target_responses, Some(7));
    }

    #[test]
    fn detail_skips_non_object_wrapper() {
        let body = json!({"detail": "not ready", "survey": {"surveyId": "S3"}});
        assert_eq!(document(&body, "req").detail.survey_id, "S3");
    }

    #[test]
    fn responses_accept_array_or_items_or_data() {
        let as_array = json!({
            "responses": [{"id": "r1", "wallet": "0x1", "status": "VALID", "score": 9}]
        });
        let as_items = json!({"responses": {"items": [{"id": "r1", "wallet": "0x1"}]}});
        let as_data = json!({"responses": {"data": [{"wallet": "0x1"}, "junk"]}});

        let a = document(&as_array, "S").responses;
        assert_eq!(a.len(), 1);
        assert!(a[0].is_reward_eligible());
        assert_eq!(a[0].score, Some(9.0));

        assert_eq!(document(&as_items, "S").responses[0].id, "r1");

        let d = document(&as_data, "S").responses;
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].id, "0");
    }

    #[test]
    fn responses_default_to_empty() {
        let body = json!({"responses": {"unexpected": true}});
        assert!(document(&body, "S").responses.is_empty());
    }

    #[test]
    fn stats_are_optional_sibling() {
        let body = json!({
            "survey": {"surveyId": "S1"},
            "stats": {"totalResponses": 3, "totalValidWallets": 2, "avgScore": 7.5}
        });
        let stats = document(&body, "S1").stats.unwrap();
        assert_eq!(stats.total_responses, 3);
        assert_eq!(stats.total_valid_wallets, 2);
        assert_eq!(stats.avg_score, Some(7.5));

        assert!(document(&json!({"survey": {}}), "S1").stats.is_none());
    }

    #[test]
    fn questions_probe_in_order_and_drop_empty() {
        let body = json!({
            "questions": ["root"],
            "survey": {"questions": ["Why?", "", {"text": "How?"}, 3]}
        });
        assert_eq!(document(&body, "S").questions, vec!["Why?", "How?", "3"]);

        let body = json!({"plan": {"questions": ["From plan"]}});
        assert_eq!(document(&body, "S").questions, vec!["From plan"]);
    }

    #[test]
    fn list_reads_surveys_or_list_with_aliases() {
        let body = json!({"list": [
            {"id": "A", "description": "Hoodies", "created_at": 1700000000000u64,
             "stats": {"totalResponses": 4, "avgScore": null}},
            {"title": "no id"}
        ]});
        let rows = survey_list(&body);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "A");
        assert_eq!(rows[0].title.as_deref(), Some("Hoodies"));
        assert_eq!(rows[0].created_at, Some(CreatedAt::Millis(1_700_000_000_000)));
        assert_eq!(rows[0].total_responses, Some(4));
        assert_eq!(rows[0].avg_score, None);

        assert!(survey_list(&json!({"surveys": {}})).is_empty());
    }

    #[test]
    fn verdict_reads_aliases() {
        let body = json!({
            "verdict": "VALID", "reason": "good", "score": 8,
            "reward_tx_hash": "0xfeed", "transactionHash": "0xbeef"
        });
        let v = verdict(&body);
        assert!(v.is_valid());
        assert_eq!(v.reason.as_deref(), Some("good"));
        assert_eq!(v.score, Some(8.0));
        assert_eq!(v.transaction_hash(), Some("0xfeed"));
        assert_eq!(v.tx_hash.as_deref(), Some("0xbeef"));
    }
}
