//! In-memory backend for tests and demo mode.
//!
//! Replicates the backend's observable behavior: one active timer at a
//! time, elapsed time accumulated across pause cycles, sequential invoice
//! numbering, and line-item amounts computed server-side. Individual
//! commands can be scripted to fail.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::models::{
    ActiveTimer, AppSetting, Client, CreateInvoice, CreateLineItem, Invoice, InvoiceStatus,
    LineItemRecord, Project, ProjectStatus, TimeEntry, TimerState,
};
use super::Backend;
use crate::error::{AppError, AppResult};

struct ScriptedFailure {
    remaining_successes: u32,
    message: String,
}

#[derive(Default)]
struct MockState {
    active_timer: Option<ActiveTimer>,
    clients: HashMap<Uuid, Client>,
    projects: Vec<Project>,
    entries: Vec<TimeEntry>,
    invoices: Vec<Invoice>,
    line_items: Vec<LineItemRecord>,
    settings: HashMap<String, String>,
    invoice_seq: u32,
    failures: HashMap<String, ScriptedFailure>,
}

impl MockState {
    fn check_failure(&mut self, command: &str) -> AppResult<()> {
        if let Some(failure) = self.failures.get_mut(command) {
            if failure.remaining_successes == 0 {
                return Err(AppError::Backend(failure.message.clone()));
            }
            failure.remaining_successes -= 1;
        }
        Ok(())
    }
}

/// Scriptable in-memory [`Backend`].
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future call of `command` fail with `message`.
    pub async fn fail_command(&self, command: &str, message: &str) {
        self.fail_command_after(command, 0, message).await;
    }

    /// Let the next `successes` calls of `command` succeed, then fail every
    /// call after that with `message`.
    pub async fn fail_command_after(&self, command: &str, successes: u32, message: &str) {
        self.state.lock().await.failures.insert(
            command.to_string(),
            ScriptedFailure {
                remaining_successes: successes,
                message: message.to_string(),
            },
        );
    }

    /// Remove all scripted failures.
    pub async fn clear_failures(&self) {
        self.state.lock().await.failures.clear();
    }

    /// Insert a client fixture and return it.
    pub async fn seed_client(&self, name: &str, hourly_rate: Option<Decimal>) -> Client {
        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: None,
            company: None,
            address: None,
            phone: None,
            notes: None,
            hourly_rate,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .await
            .clients
            .insert(client.id, client.clone());
        client
    }

    /// Insert a project fixture for a client and return it.
    pub async fn seed_project(&self, client_id: Uuid, name: &str) -> Project {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            client_id,
            name: name.to_string(),
            description: None,
            status: ProjectStatus::Active,
            hourly_rate: None,
            budget_hours: None,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.projects.push(project.clone());
        project
    }

    /// Insert a completed, billable, unbilled time entry and return it.
    pub async fn seed_unbilled_entry(
        &self,
        project_id: Uuid,
        description: Option<&str>,
        duration_secs: i64,
    ) -> TimeEntry {
        let now = Utc::now();
        let entry = TimeEntry {
            id: Uuid::new_v4(),
            project_id,
            description: description.map(String::from),
            start_time: now - chrono::Duration::seconds(duration_secs),
            end_time: now,
            duration_secs,
            is_billable: true,
            is_manual: false,
            invoice_id: None,
            created_at: now,
        };
        self.state.lock().await.entries.push(entry.clone());
        entry
    }

    /// Insert a setting fixture.
    pub async fn seed_setting(&self, key: &str, value: &str) {
        self.state
            .lock()
            .await
            .settings
            .insert(key.to_string(), value.to_string());
    }

    /// Invoices persisted so far, in creation order.
    pub async fn invoices(&self) -> Vec<Invoice> {
        self.state.lock().await.invoices.clone()
    }

    /// Line items persisted for one invoice, in creation order.
    pub async fn line_items_for(&self, invoice_id: Uuid) -> Vec<LineItemRecord> {
        self.state
            .lock()
            .await
            .line_items
            .iter()
            .filter(|item| item.invoice_id == invoice_id)
            .cloned()
            .collect()
    }

    /// Completed time entries, in creation order.
    pub async fn time_entries(&self) -> Vec<TimeEntry> {
        self.state.lock().await.entries.clone()
    }

    /// Current value of one setting, if persisted.
    pub async fn setting(&self, key: &str) -> Option<String> {
        self.state.lock().await.settings.get(key).cloned()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn start_timer(
        &self,
        project_id: Uuid,
        description: Option<String>,
    ) -> AppResult<ActiveTimer> {
        let mut state = self.state.lock().await;
        state.check_failure("start_timer")?;

        if state.active_timer.is_some() {
            return Err(AppError::Backend(
                "A timer is already running. Stop it first.".to_string(),
            ));
        }

        let timer = ActiveTimer {
            id: 1,
            project_id,
            description,
            start_time: Utc::now(),
            accumulated_secs: 0,
            is_paused: false,
        };
        state.active_timer = Some(timer.clone());
        Ok(timer)
    }

    async fn stop_timer(&self) -> AppResult<TimeEntry> {
        let mut state = self.state.lock().await;
        state.check_failure("stop_timer")?;

        let timer = state
            .active_timer
            .take()
            .ok_or_else(|| AppError::Backend("No active timer to stop".to_string()))?;

        let now = Utc::now();
        let elapsed = if timer.is_paused {
            timer.accumulated_secs
        } else {
            timer.accumulated_secs + (now - timer.start_time).num_seconds()
        };

        let entry = TimeEntry {
            id: Uuid::new_v4(),
            project_id: timer.project_id,
            description: timer.description,
            start_time: timer.start_time,
            end_time: now,
            duration_secs: elapsed,
            is_billable: true,
            is_manual: false,
            invoice_id: None,
            created_at: now,
        };
        state.entries.push(entry.clone());
        Ok(entry)
    }

    async fn pause_timer(&self) -> AppResult<ActiveTimer> {
        let mut state = self.state.lock().await;
        state.check_failure("pause_timer")?;

        let timer = state
            .active_timer
            .as_mut()
            .ok_or_else(|| AppError::Backend("No active timer to pause".to_string()))?;
        if timer.is_paused {
            return Err(AppError::Backend("Timer is already paused".to_string()));
        }

        timer.accumulated_secs += (Utc::now() - timer.start_time).num_seconds();
        timer.is_paused = true;
        Ok(timer.clone())
    }

    async fn resume_timer(&self) -> AppResult<ActiveTimer> {
        let mut state = self.state.lock().await;
        state.check_failure("resume_timer")?;

        let timer = state
            .active_timer
            .as_mut()
            .ok_or_else(|| AppError::Backend("No active timer to resume".to_string()))?;
        if !timer.is_paused {
            return Err(AppError::Backend("Timer is not paused".to_string()));
        }

        timer.start_time = Utc::now();
        timer.is_paused = false;
        Ok(timer.clone())
    }

    async fn get_timer_state(&self) -> AppResult<TimerState> {
        let mut state = self.state.lock().await;
        state.check_failure("get_timer_state")?;

        let Some(timer) = state.active_timer.clone() else {
            return Ok(TimerState::default());
        };

        let elapsed = if timer.is_paused {
            timer.accumulated_secs
        } else {
            timer.accumulated_secs + (Utc::now() - timer.start_time).num_seconds()
        };
        let project_name = state
            .projects
            .iter()
            .find(|project| project.id == timer.project_id)
            .map(|project| project.name.clone());

        Ok(TimerState {
            is_running: true,
            is_paused: timer.is_paused,
            project_id: Some(timer.project_id),
            project_name,
            description: timer.description,
            elapsed_secs: elapsed,
            start_time: Some(timer.start_time),
        })
    }

    async fn list_unbilled_entries(&self, client_id: Uuid) -> AppResult<Vec<TimeEntry>> {
        let mut state = self.state.lock().await;
        state.check_failure("list_unbilled_entries")?;

        let project_ids: Vec<Uuid> = state
            .projects
            .iter()
            .filter(|project| project.client_id == client_id)
            .map(|project| project.id)
            .collect();

        let mut entries: Vec<TimeEntry> = state
            .entries
            .iter()
            .filter(|entry| {
                project_ids.contains(&entry.project_id)
                    && entry.invoice_id.is_none()
                    && entry.is_billable
            })
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.start_time);
        Ok(entries)
    }

    async fn create_invoice(&self, input: CreateInvoice) -> AppResult<Invoice> {
        let mut state = self.state.lock().await;
        state.check_failure("create_invoice")?;

        let now = Utc::now();
        state.invoice_seq += 1;
        let invoice = Invoice {
            id: Uuid::new_v4(),
            invoice_number: format!("INV-{}-{:03}", now.year(), state.invoice_seq),
            client_id: input.client_id,
            status: InvoiceStatus::Draft,
            issue_date: input.issue_date,
            due_date: input.due_date,
            subtotal: Decimal::ZERO,
            tax_rate: input.tax_rate,
            tax_amount: Decimal::ZERO,
            total: Decimal::ZERO,
            notes: input.notes,
            payment_link: None,
            created_at: now,
            updated_at: now,
        };
        state.invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn add_line_item(&self, input: CreateLineItem) -> AppResult<LineItemRecord> {
        let mut state = self.state.lock().await;
        state.check_failure("add_line_item")?;

        let invoice_exists = state
            .invoices
            .iter()
            .any(|invoice| invoice.id == input.invoice_id);
        if !invoice_exists {
            return Err(AppError::Backend(format!(
                "Invoice not found: {}",
                input.invoice_id
            )));
        }

        let record = LineItemRecord {
            id: Uuid::new_v4(),
            invoice_id: input.invoice_id,
            description: input.description,
            quantity: input.quantity,
            unit_price: input.unit_price,
            amount: input.quantity * input.unit_price,
            sort_order: input.sort_order,
        };
        state.line_items.push(record.clone());

        // Recompute the invoice totals the way the backend does after
        // every item lands.
        let subtotal: Decimal = state
            .line_items
            .iter()
            .filter(|item| item.invoice_id == input.invoice_id)
            .map(|item| item.amount)
            .sum();
        if let Some(invoice) = state
            .invoices
            .iter_mut()
            .find(|invoice| invoice.id == input.invoice_id)
        {
            let rate = invoice.tax_rate.unwrap_or(Decimal::ZERO);
            invoice.subtotal = subtotal;
            invoice.tax_amount = subtotal * rate / Decimal::ONE_HUNDRED;
            invoice.total = invoice.subtotal + invoice.tax_amount;
            invoice.updated_at = Utc::now();
        }

        Ok(record)
    }

    async fn get_client(&self, client_id: Uuid) -> AppResult<Client> {
        let mut state = self.state.lock().await;
        state.check_failure("get_client")?;

        state
            .clients
            .get(&client_id)
            .cloned()
            .ok_or_else(|| AppError::Backend(format!("Client not found: {}", client_id)))
    }

    async fn list_projects_by_client(&self, client_id: Uuid) -> AppResult<Vec<Project>> {
        let mut state = self.state.lock().await;
        state.check_failure("list_projects_by_client")?;

        Ok(state
            .projects
            .iter()
            .filter(|project| project.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn get_all_settings(&self) -> AppResult<Vec<AppSetting>> {
        let mut state = self.state.lock().await;
        state.check_failure("get_all_settings")?;

        let mut settings: Vec<AppSetting> = state
            .settings
            .iter()
            .map(|(key, value)| AppSetting {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();
        settings.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(settings)
    }

    async fn set_setting(&self, key: &str, value: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        state.check_failure("set_setting")?;

        state.settings.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
