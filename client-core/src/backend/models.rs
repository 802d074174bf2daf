//! Data shapes crossing the backend command boundary.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authoritative timer snapshot as the backend reports it.
///
/// The default value is the idle timer: nothing running, zero elapsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub is_running: bool,
    pub is_paused: bool,
    pub project_id: Option<Uuid>,
    pub project_name: Option<String>,
    pub description: Option<String>,
    pub elapsed_secs: i64,
    pub start_time: Option<DateTime<Utc>>,
}

/// The backend's single live timer record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveTimer {
    pub id: i32,
    pub project_id: Uuid,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub accumulated_secs: i64,
    pub is_paused: bool,
}

/// A completed tracked-time record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: Uuid,
    pub project_id: Uuid,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_secs: i64,
    pub is_billable: bool,
    pub is_manual: bool,
    pub invoice_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "sent" => InvoiceStatus::Sent,
            "paid" => InvoiceStatus::Paid,
            "overdue" => InvoiceStatus::Overdue,
            "cancelled" => InvoiceStatus::Cancelled,
            _ => InvoiceStatus::Draft,
        }
    }
}

/// A persisted invoice. The invoice number is backend-assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub client_id: Uuid,
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub subtotal: Decimal,
    pub tax_rate: Option<Decimal>,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub notes: Option<String>,
    pub payment_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted invoice line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemRecord {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub amount: Decimal,
    pub sort_order: i32,
}

/// A billable client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Completed,
    Archived,
    OnHold,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
            ProjectStatus::OnHold => "on_hold",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "completed" => ProjectStatus::Completed,
            "archived" => ProjectStatus::Archived,
            "on_hold" => ProjectStatus::OnHold,
            _ => ProjectStatus::Active,
        }
    }
}

/// A client's project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub hourly_rate: Option<Decimal>,
    pub budget_hours: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single persisted application setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSetting {
    pub key: String,
    pub value: String,
}

/// Input for creating an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoice {
    pub client_id: Uuid,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
    pub tax_rate: Option<Decimal>,
}

/// Input for adding a line item to an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLineItem {
    pub invoice_id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub sort_order: i32,
}
