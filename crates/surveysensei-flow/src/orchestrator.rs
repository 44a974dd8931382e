//! Create-survey orchestration.
//!
//! One run walks an explicit state machine:
//!
//! ```text
//! Idle -> GeneratingPlan -> SubmittingTransaction -> Done
//!              |                     |
//!              +------> Failed <-----+
//! ```
//!
//! Each step reports into the run's [`ProgressLog`]. A step's in-progress
//! entry is resolved in place only on success; on failure it is left as is
//! and an error entry follows it.

use std::sync::Arc;

use surveysensei_core::{
    ChainConfig, CreateSurveyCall, EntryPatch, ProgressLog, StatusEntry, SurveyPlan, ViewScope,
    ViewToken, user_message,
};
use surveysensei_store::LatestSurveySlot;
use surveysensei_sync::{ChainError, SurveyApi, TransactionSubmitter};
use tracing::{info, warn};

use crate::wallet::WalletIdentity;

// ── Messages ──

pub const MSG_GENERATING: &str = "Generating AI plan...";
pub const MSG_PLAN_READY: &str = "AI plan generated successfully!";
pub const MSG_PREPARING_TX: &str = "Preparing blockchain transaction...";
pub const MSG_TX_PREPARED: &str = "Blockchain transaction prepared";
pub const MSG_TX_SUBMITTED: &str = "Blockchain transaction submitted!";
pub const MSG_CREATED: &str = "Survey created successfully!";

// ── States ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    GeneratingPlan,
    SubmittingTransaction,
    Done,
    Failed,
}

impl FlowState {
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::GeneratingPlan | Self::SubmittingTransaction)
    }
}

/// The step a failed run stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Plan,
    Transaction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Preconditions not met; the log was not touched.
    NotStarted,
    /// `tx_hash` is `None` when the wallet went away before the chain step.
    Created {
        plan: SurveyPlan,
        tx_hash: Option<String>,
    },
    Failed {
        stage: Stage,
        message: String,
        plan: Option<SurveyPlan>,
    },
    /// The owning view was torn down mid-run; the late result was dropped.
    Abandoned,
}

// ── Flow ──

pub struct CreateSurveyFlow {
    api: Arc<dyn SurveyApi>,
    submitter: Arc<dyn TransactionSubmitter>,
    slot: Arc<dyn LatestSurveySlot>,
    chain: ChainConfig,
    log: ProgressLog,
    state: FlowState,
    scope: ViewScope,
    latest_survey_id: Option<String>,
}

impl CreateSurveyFlow {
    pub fn new(
        api: Arc<dyn SurveyApi>,
        submitter: Arc<dyn TransactionSubmitter>,
        slot: Arc<dyn LatestSurveySlot>,
        chain: ChainConfig,
    ) -> Self {
        Self {
            api,
            submitter,
            slot,
            chain,
            log: ProgressLog::new(),
            state: FlowState::Idle,
            scope: ViewScope::new(),
            latest_survey_id: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn in_flight(&self) -> bool {
        self.state.is_in_flight()
    }

    pub fn log(&self) -> &ProgressLog {
        &self.log
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// Id of the survey created by the most recent run, if it got a plan.
    pub fn latest_survey_id(&self) -> Option<&str> {
        self.latest_survey_id.as_deref()
    }

    /// Stream entries as they are appended or patched.
    pub fn set_observer(&mut self, observer: impl Fn(&StatusEntry) + Send + Sync + 'static) {
        self.log.set_observer(observer);
    }

    /// Handle the owning view keeps; invalidating it abandons any running step.
    pub fn scope(&self) -> ViewScope {
        self.scope.clone()
    }

    /// Whether the start control should be enabled.
    pub fn can_start(&self, description: &str, wallet: &dyn WalletIdentity) -> bool {
        !self.in_flight() && !description.trim().is_empty() && wallet.address().is_some()
    }

    /// Run plan generation and the on-chain registration for `description`.
    pub async fn run(&mut self, description: &str, wallet: &dyn WalletIdentity) -> RunOutcome {
        if !self.can_start(description, wallet) {
            return RunOutcome::NotStarted;
        }
        let Some(address) = wallet.address() else {
            return RunOutcome::NotStarted;
        };

        self.log.clear();
        self.latest_survey_id = None;
        let token = self.scope.begin();

        // ── Step 1: plan ──
        self.state = FlowState::GeneratingPlan;
        let generating = self.log.info(MSG_GENERATING);
        let result = self.api.create_plan(description, &address).await;
        if let Some(abandoned) = self.abandoned(&token) {
            return abandoned;
        }
        let plan = match result {
            Ok(plan) => plan,
            Err(e) => return self.fail(Stage::Plan, &e, None),
        };

        self.log.update(generating, EntryPatch::resolved(MSG_PLAN_READY));
        self.log.info(format!("Survey ID: {}", plan.survey_id));
        self.log.info(format!("Total Reward: {}", plan.total_reward));
        self.log.info(format!("Target Responses: {}", plan.target_responses));
        self.latest_survey_id = Some(plan.survey_id.clone());
        self.slot.remember(&plan.survey_id).await;

        // ── Step 2: transaction ──
        let Some(creator) = wallet.address() else {
            info!(
                survey_id = %plan.survey_id,
                "wallet disconnected after plan, skipping transaction"
            );
            return self.finish(plan, None);
        };

        self.state = FlowState::SubmittingTransaction;
        let preparing = self.log.info(MSG_PREPARING_TX);
        let result = match CreateSurveyCall::from_plan(&self.chain, &plan, &creator) {
            Ok(call) => self.submitter.submit(&call).await,
            Err(e) => Err(ChainError::from(e)),
        };
        if let Some(abandoned) = self.abandoned(&token) {
            return abandoned;
        }
        match result {
            Ok(hash) => {
                self.log.update(preparing, EntryPatch::resolved(MSG_TX_PREPARED));
                self.log.success(MSG_TX_SUBMITTED);
                self.log.info(format!("Transaction hash: {hash}"));
                self.finish(plan, Some(hash))
            }
            Err(e) => self.fail(Stage::Transaction, &e, Some(plan)),
        }
    }

    fn abandoned(&mut self, token: &ViewToken) -> Option<RunOutcome> {
        if token.is_current() {
            return None;
        }
        info!("create-survey view left mid-run, dropping result");
        self.state = FlowState::Idle;
        Some(RunOutcome::Abandoned)
    }

    fn finish(&mut self, plan: SurveyPlan, tx_hash: Option<String>) -> RunOutcome {
        self.log.success(MSG_CREATED);
        self.state = FlowState::Done;
        info!(survey_id = %plan.survey_id, tx_hash = ?tx_hash, "survey created");
        RunOutcome::Created { plan, tx_hash }
    }

    fn fail(
        &mut self,
        stage: Stage,
        err: &dyn std::fmt::Display,
        plan: Option<SurveyPlan>,
    ) -> RunOutcome {
        let message = user_message(err);
        warn!(stage = ?stage, error = %message, "create-survey run failed");
        self.log.error(format!("Error: {message}"));
        self.state = FlowState::Failed;
        RunOutcome::Failed {
            stage,
            message,
            plan,
        }
    }
}
