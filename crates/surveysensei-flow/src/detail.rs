//! Survey detail view: the consistent reader plus the access gate.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use surveysensei_core::{
    AccessDecision, LinkContext, ResponseRecord, SurveyDocument, SurveyStats, ViewScope,
};
use surveysensei_sync::{ConsistentReader, ReadOutcome, RetryPolicy, SurveyApi};
use tracing::debug;

/// One open survey page. Switching to another survey id starts from scratch;
/// reloading the same id keeps the displayed document across failures.
pub struct SurveyPage {
    api: Arc<dyn SurveyApi>,
    scope: ViewScope,
    survey_id: Option<String>,
    reader: ConsistentReader<SurveyDocument>,
    gate: AccessDecision,
}

impl SurveyPage {
    pub fn new(api: Arc<dyn SurveyApi>, policy: RetryPolicy) -> Self {
        Self {
            api,
            scope: ViewScope::new(),
            survey_id: None,
            reader: ConsistentReader::new(policy),
            gate: AccessDecision::default(),
        }
    }

    /// Load `survey_id`, superseding any read still in flight.
    pub async fn open(&mut self, survey_id: &str, viewer: Option<&str>) -> ReadOutcome {
        if self.survey_id.as_deref() != Some(survey_id) {
            debug!(survey_id, "switching survey page");
            self.reader.reset();
            self.gate = AccessDecision::default();
            self.survey_id = Some(survey_id.to_string());
        }
        self.load(survey_id.to_string(), viewer).await
    }

    /// Re-read the open survey. A no-op when nothing is open.
    pub async fn reload(&mut self, viewer: Option<&str>) -> ReadOutcome {
        match self.survey_id.clone() {
            Some(id) => self.load(id, viewer).await,
            None => ReadOutcome::Superseded,
        }
    }

    async fn load(&mut self, survey_id: String, viewer: Option<&str>) -> ReadOutcome {
        let token = self.scope.begin();
        let api = self.api.clone();
        let outcome = self
            .reader
            .refresh(&token, "survey-detail", |_| {
                let api = api.clone();
                let id = survey_id.clone();
                async move { api.survey_detail(&id).await }
            })
            .await;
        if outcome != ReadOutcome::Superseded {
            self.regate(viewer);
        }
        outcome
    }

    /// Reload every `interval` until `shutdown` resolves, handing each
    /// outcome to `on_reload`. Shutdown also cuts a reload short, and the
    /// scope is invalidated on the way out.
    pub async fn watch<S, F>(
        &mut self,
        viewer: Option<&str>,
        interval: Duration,
        shutdown: S,
        mut on_reload: F,
    ) where
        S: Future,
        F: FnMut(&SurveyPage, &ReadOutcome),
    {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(interval) => {}
            }
            let outcome = tokio::select! {
                _ = &mut shutdown => break,
                outcome = self.reload(viewer) => outcome,
            };
            on_reload(self, &outcome);
        }
        debug!(survey_id = ?self.survey_id, "survey watch stopped");
        self.scope.invalidate();
    }

    /// Recompute creator-only visibility for `viewer` against the displayed
    /// document. Call when the connected wallet changes.
    pub fn regate(&mut self, viewer: Option<&str>) {
        let creator = self
            .reader
            .current()
            .and_then(|doc| doc.detail.creator_address.as_deref());
        self.gate = AccessDecision::evaluate(viewer, creator);
    }

    /// Handle the owning view keeps; invalidating it drops late results.
    pub fn scope(&self) -> ViewScope {
        self.scope.clone()
    }

    pub fn survey_id(&self) -> Option<&str> {
        self.survey_id.as_deref()
    }

    pub fn document(&self) -> Option<&SurveyDocument> {
        self.reader.current()
    }

    pub fn error(&self) -> Option<&str> {
        self.reader.last_error()
    }

    pub fn gate(&self) -> AccessDecision {
        self.gate
    }

    /// Stats, only for the creator.
    pub fn stats(&self) -> Option<&SurveyStats> {
        if !self.gate.show_stats() {
            return None;
        }
        self.document().and_then(|doc| doc.stats.as_ref())
    }

    /// Responses, only for the creator.
    pub fn responses(&self) -> &[ResponseRecord] {
        match self.document() {
            Some(doc) if self.gate.show_responses() => &doc.responses,
            _ => &[],
        }
    }

    pub fn can_copy_link(&self) -> bool {
        self.document().is_some() && self.gate.can_copy_link(LinkContext::SurveyDetail)
    }
}
