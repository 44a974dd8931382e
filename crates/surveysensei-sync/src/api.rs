//! Seams to the remote collaborators: the survey agent API and the wallet.

use async_trait::async_trait;
use serde::Serialize;
use surveysensei_core::chain::CallError;
use surveysensei_core::{CreateSurveyCall, SurveyDocument, SurveyPlan, SurveySummary, Verdict};
use thiserror::Error;

/// Agent worker base; endpoint paths are appended to it.
pub const DEFAULT_API_URL: &str = "https://surveysensei-agent.rahmandana08.workers.dev/agent";

#[derive(Error, Debug)]
pub enum SyncError {
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{context} (server returned {status})")]
    Server {
        context: &'static str,
        status: u16,
        body: String,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum ChainError {
    /// JSON-RPC error object from the wallet, including user rejection (4001).
    #[error("{message}")]
    Rejected { code: i64, message: String },

    #[cfg(feature = "http")]
    #[error("wallet RPC request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("wallet RPC returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("malformed wallet RPC response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Call(#[from] CallError),
}

/// Body of the answer endpoint. `questions` and `answers` are index-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub survey_id: String,
    pub wallet: String,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
}

/// The survey agent: one logical action per call.
#[async_trait]
pub trait SurveyApi: Send + Sync {
    /// Turn free text into survey parameters for `wallet`.
    async fn create_plan(&self, description: &str, wallet: &str) -> Result<SurveyPlan, SyncError>;

    async fn list_surveys(&self, creator_wallet: &str) -> Result<Vec<SurveySummary>, SyncError>;

    async fn survey_detail(&self, survey_id: &str) -> Result<SurveyDocument, SyncError>;

    async fn submit_answers(&self, submission: &AnswerSubmission) -> Result<Verdict, SyncError>;
}

/// Sends a prepared create-survey call and returns the transaction hash.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(&self, call: &CreateSurveyCall) -> Result<String, ChainError>;
}

/// The plan endpoint expects the wallet address appended to the free text.
pub fn plan_content(description: &str, wallet: &str) -> String {
    format!("{} Wallet saya: {}", description.trim(), wallet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_content_appends_wallet() {
        assert_eq!(
            plan_content("  hoodie survey, 100 responses, 1 BNB ", "0xabc"),
            "hoodie survey, 100 responses, 1 BNB Wallet saya: 0xabc"
        );
    }

    #[test]
    fn answer_submission_uses_camel_case() {
        let body = AnswerSubmission {
            survey_id: "S1".into(),
            wallet: "0xabc".into(),
            questions: vec!["Q1".into()],
            answers: vec!["A1".into()],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["surveyId"], "S1");
        assert_eq!(json["answers"][0], "A1");
    }

    #[test]
    fn server_error_message_names_the_action() {
        let err = SyncError::Server {
            context: "Failed to generate survey parameters",
            status: 500,
            body: "oops".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to generate survey parameters (server returned 500)"
        );
    }
}
