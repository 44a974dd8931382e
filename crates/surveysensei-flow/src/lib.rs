//! User-facing workflows: survey creation, survey detail and dashboard views,
//! and answering a survey.

pub mod answer;
pub mod dashboard;
pub mod detail;
pub mod orchestrator;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use answer::{AnswerSession, AnswerState};
pub use dashboard::Dashboard;
pub use detail::SurveyPage;
pub use orchestrator::{CreateSurveyFlow, FlowState, RunOutcome, Stage};
pub use wallet::{WalletIdentity, WalletSession};
