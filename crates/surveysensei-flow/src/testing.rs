//! Queue-backed collaborators for workflow tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use surveysensei_core::{
    CreateSurveyCall, SurveyDetail, SurveyDocument, SurveyPlan, SurveySummary, Verdict, ViewScope,
};
use surveysensei_sync::{
    AnswerSubmission, ChainError, SurveyApi, SyncError, TransactionSubmitter,
};

use crate::wallet::WalletSession;

pub const WALLET: &str = "0x00000000000000000000000000000000000000aa";

fn pop<T>(queue: &Mutex<Vec<Result<T, SyncError>>>) -> Result<T, SyncError> {
    let mut queue = queue.lock().unwrap();
    if queue.is_empty() {
        return Err(SyncError::Malformed("mock queue exhausted".to_string()));
    }
    queue.remove(0)
}

#[derive(Default)]
pub struct MockApi {
    pub plans: Mutex<Vec<Result<SurveyPlan, SyncError>>>,
    pub lists: Mutex<Vec<Result<Vec<SurveySummary>, SyncError>>>,
    pub details: Mutex<Vec<Result<SurveyDocument, SyncError>>>,
    pub verdicts: Mutex<Vec<Result<Verdict, SyncError>>>,
    pub submissions: Mutex<Vec<AnswerSubmission>>,
    pub plan_calls: Mutex<Vec<(String, String)>>,
    /// Disconnected right after the plan call returns.
    pub disconnect_after_plan: Option<std::sync::Arc<WalletSession>>,
    /// Invalidated once while the next plan call is in flight.
    pub leave_during_plan: Mutex<Option<ViewScope>>,
    /// Invalidated once while the next detail call is in flight.
    pub leave_during_detail: Mutex<Option<ViewScope>>,
    /// Detail calls never complete while set.
    pub stall_details: AtomicBool,
}

fn leave(hook: &Mutex<Option<ViewScope>>) {
    if let Some(scope) = hook.lock().unwrap().take() {
        scope.invalidate();
    }
}

#[async_trait]
impl SurveyApi for MockApi {
    async fn create_plan(&self, description: &str, wallet: &str) -> Result<SurveyPlan, SyncError> {
        self.plan_calls
            .lock()
            .unwrap()
            .push((description.to_string(), wallet.to_string()));
        let result = pop(&self.plans);
        leave(&self.leave_during_plan);
        if let Some(session) = &self.disconnect_after_plan {
            session.disconnect();
        }
        result
    }

    async fn list_surveys(&self, _creator_wallet: &str) -> Result<Vec<SurveySummary>, SyncError> {
        pop(&self.lists)
    }

    async fn survey_detail(&self, _survey_id: &str) -> Result<SurveyDocument, SyncError> {
        if self.stall_details.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let result = pop(&self.details);
        leave(&self.leave_during_detail);
        result
    }

    async fn submit_answers(&self, submission: &AnswerSubmission) -> Result<Verdict, SyncError> {
        self.submissions.lock().unwrap().push(submission.clone());
        pop(&self.verdicts)
    }
}

#[derive(Default)]
pub struct MockSubmitter {
    pub replies: Mutex<Vec<Result<String, ChainError>>>,
    pub calls: Mutex<Vec<CreateSurveyCall>>,
}

impl MockSubmitter {
    pub fn new(replies: Vec<Result<String, ChainError>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TransactionSubmitter for MockSubmitter {
    async fn submit(&self, call: &CreateSurveyCall) -> Result<String, ChainError> {
        self.calls.lock().unwrap().push(call.clone());
        let mut queue = self.replies.lock().unwrap();
        if queue.is_empty() {
            return Err(ChainError::Malformed("mock queue exhausted".to_string()));
        }
        queue.remove(0)
    }
}

pub fn plan(id: &str) -> SurveyPlan {
    SurveyPlan {
        survey_id: id.to_string(),
        total_reward: "0.5".to_string(),
        target_responses: 100,
    }
}

pub fn server_error(context: &'static str, status: u16) -> SyncError {
    SyncError::Server {
        context,
        status,
        body: String::new(),
    }
}

pub fn document(id: &str, creator: Option<&str>, questions: &[&str]) -> SurveyDocument {
    SurveyDocument {
        detail: SurveyDetail {
            survey_id: id.to_string(),
            creator_address: creator.map(str::to_string),
            total_reward: Some("1".to_string()),
            target_responses: Some(10),
            description: None,
            title: Some(format!("Survey {id}")),
            created_at: None,
        },
        stats: None,
        responses: Vec::new(),
        questions: questions.iter().map(|q| q.to_string()).collect(),
    }
}
