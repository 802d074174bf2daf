//! HTTP implementation of the backend gateway.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use super::models::{
    ActiveTimer, AppSetting, Client, CreateInvoice, CreateLineItem, Invoice, LineItemRecord,
    Project, TimeEntry, TimerState,
};
use super::Backend;
use crate::error::{AppError, AppResult};

/// Gateway posting JSON commands to the backend process.
///
/// Commands live at `POST {base_url}/commands/{name}`. A success status
/// carries the typed response body (`null` for unit commands); any other
/// status carries `{"error": "..."}`, surfaced verbatim as
/// [`AppError::Backend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip(self, body))]
    async fn invoke<B, T>(&self, command: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_value(body)?;
        let url = format!("{}/commands/{}", self.base_url, command);

        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("Command '{}' failed with status {}", command, status),
        };
        tracing::error!(command, status = %status, error = %message, "Backend command rejected");
        Err(AppError::Backend(message))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn start_timer(
        &self,
        project_id: Uuid,
        description: Option<String>,
    ) -> AppResult<ActiveTimer> {
        self.invoke(
            "start_timer",
            &json!({ "project_id": project_id, "description": description }),
        )
        .await
    }

    async fn stop_timer(&self) -> AppResult<TimeEntry> {
        self.invoke("stop_timer", &json!({})).await
    }

    async fn pause_timer(&self) -> AppResult<ActiveTimer> {
        self.invoke("pause_timer", &json!({})).await
    }

    async fn resume_timer(&self) -> AppResult<ActiveTimer> {
        self.invoke("resume_timer", &json!({})).await
    }

    async fn get_timer_state(&self) -> AppResult<TimerState> {
        self.invoke("get_timer_state", &json!({})).await
    }

    async fn list_unbilled_entries(&self, client_id: Uuid) -> AppResult<Vec<TimeEntry>> {
        self.invoke("list_unbilled_entries", &json!({ "client_id": client_id }))
            .await
    }

    async fn create_invoice(&self, input: CreateInvoice) -> AppResult<Invoice> {
        self.invoke("create_invoice", &input).await
    }

    async fn add_line_item(&self, input: CreateLineItem) -> AppResult<LineItemRecord> {
        self.invoke("add_line_item", &input).await
    }

    async fn get_client(&self, client_id: Uuid) -> AppResult<Client> {
        self.invoke("get_client", &json!({ "client_id": client_id }))
            .await
    }

    async fn list_projects_by_client(&self, client_id: Uuid) -> AppResult<Vec<Project>> {
        self.invoke(
            "list_projects_by_client",
            &json!({ "client_id": client_id }),
        )
        .await
    }

    async fn get_all_settings(&self) -> AppResult<Vec<AppSetting>> {
        self.invoke("get_all_settings", &json!({})).await
    }

    async fn set_setting(&self, key: &str, value: &str) -> AppResult<()> {
        self.invoke("set_setting", &json!({ "key": key, "value": value }))
            .await
    }
}
