pub mod access;
pub mod answers;
pub mod chain;
pub mod link;
pub mod progress;
pub mod reward;
pub mod scope;
pub mod survey;

pub use access::{AccessDecision, LinkContext, is_creator};
pub use chain::{ChainConfig, CreateSurveyCall, Network};
pub use progress::{EntryId, EntryPatch, ProgressLog, Severity, StatusEntry};
pub use scope::{ViewScope, ViewToken};
pub use survey::{
    CreatedAt, ResponseRecord, ResponseStatus, SurveyDetail, SurveyDocument, SurveyPlan,
    SurveyStats, SurveySummary, Verdict,
};

/// User-facing text for an error, with a generic fallback.
pub fn user_message(err: &dyn std::fmt::Display) -> String {
    let msg = err.to_string();
    if msg.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        msg
    }
}
