//! Builds draft line items from a client's unbilled time.

use std::collections::HashMap;

use client_core::backend::models::TimeEntry;
use client_core::backend::Backend;
use client_core::error::AppResult;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::instrument;
use uuid::Uuid;

use crate::models::{InvoiceDraft, LineItem};

/// Shown when a time entry's project is no longer in the client's list.
const FALLBACK_PROJECT_NAME: &str = "Project";

const SECS_PER_HOUR: i64 = 3600;

fn billable_hours(duration_secs: i64) -> Decimal {
    let mut hours = (Decimal::from(duration_secs) / Decimal::from(SECS_PER_HOUR))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // pin the scale so an even hour still reads "1.00"
    hours.rescale(2);
    hours
}

// fallback text rounds coarser than the billed quantity
fn format_hours(duration_secs: i64) -> Decimal {
    let mut hours = (Decimal::from(duration_secs) / Decimal::from(SECS_PER_HOUR))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    hours.rescale(1);
    hours
}

fn entry_description(project_name: &str, description: Option<&str>, duration_secs: i64) -> String {
    match description.filter(|text| !text.is_empty()) {
        Some(text) => format!("{project_name} - {text}"),
        None => format!("{project_name} ({}h)", format_hours(duration_secs)),
    }
}

fn line_item_for_entry(
    project_names: &HashMap<Uuid, String>,
    rate: Decimal,
    entry: &TimeEntry,
    sort_order: i32,
) -> LineItem {
    let project_name = project_names
        .get(&entry.project_id)
        .map(String::as_str)
        .unwrap_or(FALLBACK_PROJECT_NAME);
    let hours = billable_hours(entry.duration_secs);
    let description =
        entry_description(project_name, entry.description.as_deref(), entry.duration_secs);
    LineItem::new(description, hours, rate, sort_order)
}

/// Select `client_id` on the draft and regenerate its line items from the
/// client's unbilled time entries.
///
/// Each entry becomes one line item billed at the client's hourly rate,
/// or `default_hourly_rate` when the client has none. A client with no
/// unbilled time keeps whatever items are already on the draft.
#[instrument(skip(backend, draft))]
pub async fn populate_from_client(
    backend: &dyn Backend,
    draft: &mut InvoiceDraft,
    client_id: Uuid,
    default_hourly_rate: Decimal,
) -> AppResult<()> {
    let (client, entries, projects) = tokio::try_join!(
        backend.get_client(client_id),
        backend.list_unbilled_entries(client_id),
        backend.list_projects_by_client(client_id),
    )?;

    draft.set_client_id(Some(client_id));

    if entries.is_empty() {
        tracing::debug!(client = %client.name, "no unbilled time, keeping existing line items");
        return Ok(());
    }

    let rate = client.hourly_rate.unwrap_or(default_hourly_rate);
    let project_names: HashMap<Uuid, String> = projects
        .into_iter()
        .map(|project| (project.id, project.name))
        .collect();

    let items: Vec<LineItem> = entries
        .iter()
        .enumerate()
        .map(|(position, entry)| line_item_for_entry(&project_names, rate, entry, position as i32))
        .collect();

    tracing::info!(
        client = %client.name,
        line_items = items.len(),
        "draft populated from unbilled time"
    );
    draft.replace_line_items(items);
    Ok(())
}

/// Deselect the client and drop the line items generated for it.
pub fn clear_client(draft: &mut InvoiceDraft) {
    draft.set_client_id(None);
    draft.replace_line_items(Vec::new());
}
