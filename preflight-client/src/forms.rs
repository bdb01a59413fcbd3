use preflight_form_types::{
    CompleteRunResponse, CreateRunResponse, FormDefinition, PageAnswers, RunId, RunSummary,
    SaveAnswersResponse,
};
use reqwest::Method;
use serde::Serialize;

use crate::{ApiClient, ClientError};

#[derive(Debug, Serialize)]
struct CreateRunRequest<'a> {
    form_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SaveAnswersRequest<'a> {
    page_id: &'a str,
    answers: &'a PageAnswers,
}

/// Client for form definitions and survey runs.
#[derive(Debug, Clone)]
pub struct FormsClient {
    api: ApiClient,
}

impl FormsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /forms/{form_name}`, optionally pinned to a version.
    pub async fn get_form_definition(
        &self,
        form_name: &str,
        version: Option<&str>,
    ) -> Result<FormDefinition, ClientError> {
        let mut request = self.api.request(Method::GET, &["forms", form_name]);
        if let Some(version) = version {
            request = request.query(&[("version", version)]);
        }
        self.api.send_json(request).await
    }

    /// `POST /runs` to start a run of the latest (or the given) form version.
    pub async fn create_run(
        &self,
        form_name: &str,
        version: Option<&str>,
    ) -> Result<CreateRunResponse, ClientError> {
        let request = self
            .api
            .request(Method::POST, &["runs"])
            .json(&CreateRunRequest { form_name, version });
        let run: CreateRunResponse = self.api.send_json(request).await?;

        tracing::info!(run_id = %run.run_id, form_name, form_version = %run.form_version, "created run");
        Ok(run)
    }

    /// `GET /runs/{run_id}` with every saved answer.
    pub async fn get_run(&self, run_id: RunId) -> Result<RunSummary, ClientError> {
        let run_id = run_id.to_string();
        let request = self.api.request(Method::GET, &["runs", &run_id]);
        self.api.send_json(request).await
    }

    /// `PATCH /runs/{run_id}/answers` with one page's answers.
    ///
    /// Sending the same page again overwrites what was stored for it.
    pub async fn save_answers(
        &self,
        run_id: RunId,
        page_id: &str,
        answers: &PageAnswers,
    ) -> Result<SaveAnswersResponse, ClientError> {
        let id = run_id.to_string();
        let request = self
            .api
            .request(Method::PATCH, &["runs", &id, "answers"])
            .json(&SaveAnswersRequest { page_id, answers });
        let saved: SaveAnswersResponse = self.api.send_json(request).await?;

        tracing::debug!(%run_id, page_id, fields = answers.len(), "saved answers");
        Ok(saved)
    }

    /// `POST /runs/{run_id}/complete`.
    pub async fn complete_run(&self, run_id: RunId) -> Result<CompleteRunResponse, ClientError> {
        let id = run_id.to_string();
        let request = self.api.request(Method::POST, &["runs", &id, "complete"]);
        let completed: CompleteRunResponse = self.api.send_json(request).await?;

        tracing::info!(%run_id, completed_at = %completed.completed_at, "completed run");
        Ok(completed)
    }
}
