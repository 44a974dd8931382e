//! Answering a survey as a respondent.

use std::sync::Arc;

use surveysensei_core::answers::{AnswerIssue, answers_complete, first_issue};
use surveysensei_core::{SurveyDocument, Verdict, ViewScope, user_message};
use surveysensei_sync::{
    AnswerSubmission, ConsistentReader, ReadOutcome, RetryPolicy, SurveyApi, retry_with_delay,
};
use tracing::{info, warn};

use crate::wallet::WalletIdentity;

#[derive(Debug, Clone, PartialEq)]
pub enum AnswerState {
    Loading,
    /// Questions could not be loaded and there is nothing to show.
    Unavailable(String),
    Ready,
    Submitting,
    /// Eligible for the reward. Payment itself is not observed here.
    Submitted(Verdict),
    /// Scored as ineligible; the respondent may revise and resubmit.
    Rejected(Verdict),
}

pub struct AnswerSession {
    api: Arc<dyn SurveyApi>,
    survey_id: String,
    scope: ViewScope,
    reader: ConsistentReader<SurveyDocument>,
    submit_policy: RetryPolicy,
    answers: Vec<String>,
    state: AnswerState,
    error: Option<String>,
}

impl AnswerSession {
    /// `submit_policy` applies to the answer write. The write is not
    /// idempotent, so [`RetryPolicy::once`] is the usual choice.
    pub fn new(
        api: Arc<dyn SurveyApi>,
        survey_id: impl Into<String>,
        read_policy: RetryPolicy,
        submit_policy: RetryPolicy,
    ) -> Self {
        Self {
            api,
            survey_id: survey_id.into(),
            scope: ViewScope::new(),
            reader: ConsistentReader::new(read_policy),
            submit_policy,
            answers: Vec::new(),
            state: AnswerState::Loading,
            error: None,
        }
    }

    /// Fetch the questions. Answers typed so far are kept for questions
    /// that survive the reload.
    pub async fn load(&mut self) -> ReadOutcome {
        let token = self.scope.begin();
        let api = self.api.clone();
        let id = self.survey_id.clone();
        let outcome = self
            .reader
            .refresh(&token, "survey-questions", |_| {
                let api = api.clone();
                let id = id.clone();
                async move { api.survey_detail(&id).await }
            })
            .await;

        match &outcome {
            ReadOutcome::Fresh => {
                let count = self.questions().len();
                self.answers.resize(count, String::new());
                if !matches!(self.state, AnswerState::Submitted(_)) {
                    self.state = AnswerState::Ready;
                }
            }
            ReadOutcome::Empty { error } => {
                self.state = AnswerState::Unavailable(error.clone());
            }
            ReadOutcome::Stale { .. } | ReadOutcome::Superseded => {}
        }
        outcome
    }

    pub fn scope(&self) -> ViewScope {
        self.scope.clone()
    }

    pub fn survey_id(&self) -> &str {
        &self.survey_id
    }

    pub fn title(&self) -> Option<&str> {
        self.reader
            .current()
            .and_then(|doc| doc.detail.title.as_deref())
    }

    pub fn questions(&self) -> &[String] {
        self.reader
            .current()
            .map(|doc| doc.questions.as_slice())
            .unwrap_or(&[])
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn state(&self) -> &AnswerState {
        &self.state
    }

    /// Most recent load or submit failure.
    pub fn error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or_else(|| self.reader.last_error())
    }

    fn editable(&self) -> bool {
        matches!(self.state, AnswerState::Ready | AnswerState::Rejected(_))
    }

    /// Set the answer for question `index`. Ignored outside the editable
    /// states or for an index with no question.
    pub fn set_answer(&mut self, index: usize, text: impl Into<String>) -> bool {
        if !self.editable() {
            return false;
        }
        match self.answers.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    pub fn first_issue(&self) -> Option<(usize, AnswerIssue)> {
        first_issue(&self.answers)
    }

    pub fn can_submit(&self, wallet: &dyn WalletIdentity) -> bool {
        self.editable()
            && wallet.address().is_some()
            && !self.questions().is_empty()
            && answers_complete(&self.answers)
    }

    /// Send the answers for scoring. Returns the state afterwards; a
    /// transport failure returns to `Ready` with [`error`](Self::error) set.
    pub async fn submit(&mut self, wallet: &dyn WalletIdentity) -> &AnswerState {
        if !self.can_submit(wallet) {
            return &self.state;
        }
        let Some(address) = wallet.address() else {
            return &self.state;
        };

        let submission = AnswerSubmission {
            survey_id: self.survey_id.clone(),
            wallet: address,
            questions: self.questions().to_vec(),
            answers: self.answers.clone(),
        };
        self.state = AnswerState::Submitting;
        self.error = None;

        let api = self.api.clone();
        let result = retry_with_delay(&self.submit_policy, "answer", |_| {
            let api = api.clone();
            let submission = submission.clone();
            async move { api.submit_answers(&submission).await }
        })
        .await;

        self.state = match result {
            Ok(verdict) if verdict.is_valid() => {
                info!(
                    survey_id = %self.survey_id,
                    tx = ?verdict.transaction_hash(),
                    "answers accepted"
                );
                AnswerState::Submitted(verdict)
            }
            Ok(verdict) => {
                info!(
                    survey_id = %self.survey_id,
                    reason = ?verdict.reason,
                    "answers scored ineligible"
                );
                AnswerState::Rejected(verdict)
            }
            Err(e) => {
                let message = user_message(&e);
                warn!(survey_id = %self.survey_id, error = %message, "answer submission failed");
                self.error = Some(message);
                AnswerState::Ready
            }
        };
        &self.state
    }
}
