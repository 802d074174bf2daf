use chrono::{Days, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

use super::line_item::LineItem;

const DEFAULT_DUE_DAYS: u64 = 30;

/// Invoice under construction in the builder page.
///
/// Totals are derived on demand from the line items and never stored.
/// The draft itself accepts any field values; validation happens when the
/// draft is submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDraft {
    client_id: Option<Uuid>,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    notes: String,
    tax_rate: Decimal,
    line_items: Vec<LineItem>,
}

impl InvoiceDraft {
    /// Fresh draft dated today with payment due in 30 days.
    pub fn new() -> Self {
        let today = Utc::now().date_naive();
        Self {
            client_id: None,
            issue_date: today,
            due_date: today + Days::new(DEFAULT_DUE_DAYS),
            notes: String::new(),
            tax_rate: Decimal::ZERO,
            line_items: Vec::new(),
        }
    }

    pub fn client_id(&self) -> Option<Uuid> {
        self.client_id
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn set_client_id(&mut self, client_id: Option<Uuid>) {
        self.client_id = client_id;
    }

    pub fn set_issue_date(&mut self, issue_date: NaiveDate) {
        self.issue_date = issue_date;
    }

    pub fn set_due_date(&mut self, due_date: NaiveDate) {
        self.due_date = due_date;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn set_tax_rate(&mut self, tax_rate: Decimal) {
        self.tax_rate = tax_rate;
    }

    pub fn add_line_item(&mut self, item: LineItem) {
        self.line_items.push(item);
    }

    /// Replace the item at `index` wholesale. Out of range does nothing.
    pub fn update_line_item(&mut self, index: usize, item: LineItem) {
        if let Some(slot) = self.line_items.get_mut(index) {
            *slot = item;
        }
    }

    /// Remove the item at `index`. Out of range does nothing.
    pub fn remove_line_item(&mut self, index: usize) {
        if index < self.line_items.len() {
            self.line_items.remove(index);
        }
    }

    pub fn replace_line_items(&mut self, items: Vec<LineItem>) {
        self.line_items = items;
    }

    /// Discard everything and start over with the defaults.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Sum of line item amounts.
    pub fn subtotal(&self) -> Decimal {
        self.line_items.iter().map(LineItem::amount).sum()
    }

    /// Tax on the subtotal, rounded half away from zero to cents.
    pub fn tax_amount(&self) -> Decimal {
        (self.subtotal() * self.tax_rate / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn total(&self) -> Decimal {
        self.subtotal() + self.tax_amount()
    }
}

impl Default for InvoiceDraft {
    fn default() -> Self {
        Self::new()
    }
}
