//! HTTP client for the survey agent's JSON endpoints.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use surveysensei_core::{SurveyDocument, SurveyPlan, SurveySummary, Verdict};
use tracing::info;

use crate::api::{AnswerSubmission, SurveyApi, SyncError, plan_content};
use crate::decode;

const CREATE_PATH: &str = "create";
const LIST_PATH: &str = "surveys";
const DETAIL_PATH: &str = "survey-detail";
const ANSWER_PATH: &str = "answer";

/// HTTP client for the agent worker. Every action is a JSON POST.
pub struct SurveyClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    content: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListRequest<'a> {
    action: &'static str,
    creator_wallet: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailRequest<'a> {
    action: &'static str,
    survey_id: &'a str,
}

impl SurveyClient {
    /// Create a client for the given agent base URL.
    ///
    /// `base_url` should be like `https://host/agent`; a trailing slash is
    /// tolerated.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// POST `body` and parse the reply as JSON. `context` becomes the
    /// user-facing message on a non-success status.
    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        context: &'static str,
    ) -> Result<Value, SyncError> {
        let url = self.url(path);
        info!(url = %url, "calling survey agent");
        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                context,
                status: status.as_u16(),
                body,
            });
        }
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl SurveyApi for SurveyClient {
    async fn create_plan(&self, description: &str, wallet: &str) -> Result<SurveyPlan, SyncError> {
        let content = plan_content(description, wallet);
        let body = self
            .post(
                CREATE_PATH,
                &CreateRequest { content: &content },
                "Failed to generate survey parameters",
            )
            .await?;
        let plan = decode::plan(&body)?;
        info!(
            survey_id = %plan.survey_id,
            total_reward = %plan.total_reward,
            target = plan.target_responses,
            "plan generated"
        );
        Ok(plan)
    }

    async fn list_surveys(&self, creator_wallet: &str) -> Result<Vec<SurveySummary>, SyncError> {
        let body = self
            .post(
                LIST_PATH,
                &ListRequest {
                    action: "list",
                    creator_wallet,
                },
                "Failed to fetch surveys",
            )
            .await?;
        let surveys = decode::survey_list(&body);
        info!(count = surveys.len(), "listed surveys");
        Ok(surveys)
    }

    async fn survey_detail(&self, survey_id: &str) -> Result<SurveyDocument, SyncError> {
        let body = self
            .post(
                DETAIL_PATH,
                &DetailRequest {
                    action: "detail",
                    survey_id,
                },
                "Failed to fetch survey detail",
            )
            .await?;
        Ok(decode::document(&body, survey_id))
    }

    async fn submit_answers(&self, submission: &AnswerSubmission) -> Result<Verdict, SyncError> {
        let body = self
            .post(ANSWER_PATH, submission, "Failed to submit answers")
            .await?;
        let verdict = decode::verdict(&body);
        info!(survey_id = %submission.survey_id, verdict = ?verdict.verdict, "answers scored");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survey_client_trims_trailing_slash() {
        let client = SurveyClient::new("https://agent.example/agent/".into());
        assert_eq!(client.base_url, "https://agent.example/agent");
        assert_eq!(client.url(DETAIL_PATH), "https://agent.example/agent/survey-detail");
    }

    #[test]
    fn request_bodies_match_agent_contract() {
        let list = serde_json::to_value(ListRequest {
            action: "list",
            creator_wallet: "0xabc",
        })
        .unwrap();
        assert_eq!(list, serde_json::json!({"action": "list", "creatorWallet": "0xabc"}));

        let detail = serde_json::to_value(DetailRequest {
            action: "detail",
            survey_id: "S1",
        })
        .unwrap();
        assert_eq!(detail, serde_json::json!({"action": "detail", "surveyId": "S1"}));
    }
}
