//! The creator's survey list.

use std::sync::Arc;

use surveysensei_core::{SurveySummary, ViewScope, survey::sort_newest_first};
use surveysensei_sync::{ConsistentReader, ReadOutcome, RetryPolicy, SurveyApi};

/// How many surveys the home view shows.
pub const RECENT_LIMIT: usize = 10;

pub struct Dashboard {
    api: Arc<dyn SurveyApi>,
    scope: ViewScope,
    wallet: Option<String>,
    reader: ConsistentReader<Vec<SurveySummary>>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn SurveyApi>, policy: RetryPolicy) -> Self {
        Self {
            api,
            scope: ViewScope::new(),
            wallet: None,
            reader: ConsistentReader::new(policy),
        }
    }

    /// Load the surveys created by `wallet`, newest first. A different wallet
    /// starts from an empty list.
    pub async fn load(&mut self, wallet: &str) -> ReadOutcome {
        if self.wallet.as_deref() != Some(wallet) {
            self.reader.reset();
            self.wallet = Some(wallet.to_string());
        }
        let token = self.scope.begin();
        let api = self.api.clone();
        let wallet = wallet.to_string();
        self.reader
            .refresh(&token, "surveys", |_| {
                let api = api.clone();
                let wallet = wallet.clone();
                async move {
                    let mut surveys = api.list_surveys(&wallet).await?;
                    sort_newest_first(&mut surveys);
                    Ok::<_, surveysensei_sync::SyncError>(surveys)
                }
            })
            .await
    }

    pub fn scope(&self) -> ViewScope {
        self.scope.clone()
    }

    pub fn surveys(&self) -> &[SurveySummary] {
        self.reader.current().map(Vec::as_slice).unwrap_or(&[])
    }

    /// The first `limit` surveys.
    pub fn recent(&self, limit: usize) -> &[SurveySummary] {
        let all = self.surveys();
        &all[..all.len().min(limit)]
    }

    pub fn error(&self) -> Option<&str> {
        self.reader.last_error()
    }
}
