//! Backend command gateway.
//!
//! The backend process owns all business state; this module is the client's
//! only way to reach it. The [`Backend`] trait mirrors the command surface,
//! with an HTTP implementation for the real process and an in-memory mock
//! for tests and demo mode.

pub mod models;

mod http;
mod mock;

pub use http::HttpBackend;
pub use mock::MockBackend;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use models::{
    ActiveTimer, AppSetting, Client, CreateInvoice, CreateLineItem, Invoice, LineItemRecord,
    Project, TimeEntry, TimerState,
};

/// Asynchronous command surface of the backend process.
///
/// Calls are fire-and-await: no retry, no client-side timeout. Rejections
/// surface as [`crate::error::AppError::Backend`] carrying the backend's
/// message.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Start the single backend timer against a project.
    async fn start_timer(
        &self,
        project_id: Uuid,
        description: Option<String>,
    ) -> AppResult<ActiveTimer>;

    /// Stop the running timer, producing a completed time entry.
    async fn stop_timer(&self) -> AppResult<TimeEntry>;

    /// Pause the running timer.
    async fn pause_timer(&self) -> AppResult<ActiveTimer>;

    /// Resume the paused timer.
    async fn resume_timer(&self) -> AppResult<ActiveTimer>;

    /// Authoritative timer snapshot; idle when no timer exists.
    async fn get_timer_state(&self) -> AppResult<TimerState>;

    /// Billable entries of a client not yet attached to any invoice,
    /// oldest first.
    async fn list_unbilled_entries(&self, client_id: Uuid) -> AppResult<Vec<TimeEntry>>;

    /// Create an invoice; the backend assigns the invoice number.
    async fn create_invoice(&self, input: CreateInvoice) -> AppResult<Invoice>;

    /// Append a line item to an invoice; the backend computes the amount
    /// and refreshes the invoice totals.
    async fn add_line_item(&self, input: CreateLineItem) -> AppResult<LineItemRecord>;

    /// Fetch a single client.
    async fn get_client(&self, client_id: Uuid) -> AppResult<Client>;

    /// Projects belonging to a client.
    async fn list_projects_by_client(&self, client_id: Uuid) -> AppResult<Vec<Project>>;

    /// All persisted application settings.
    async fn get_all_settings(&self) -> AppResult<Vec<AppSetting>>;

    /// Persist one application setting.
    async fn set_setting(&self, key: &str, value: &str) -> AppResult<()>;
}
