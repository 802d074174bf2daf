//! Populate and submit flows against the in-memory backend.

use client_core::backend::MockBackend;
use invoice_builder::{
    clear_client, populate_from_client, submit_draft, InvoiceDraft, LineItem, SubmitError,
};
use rust_decimal::Decimal;

fn default_rate() -> Decimal {
    Decimal::ONE_HUNDRED
}

#[tokio::test]
async fn populate_builds_line_items_from_unbilled_time() {
    let backend = MockBackend::new();
    let client = backend.seed_client("Acme Corp", Some(Decimal::from(80))).await;
    let project = backend.seed_project(client.id, "Website Redesign").await;
    backend
        .seed_unbilled_entry(project.id, Some("API work"), 5400)
        .await;
    backend.seed_unbilled_entry(project.id, None, 3600).await;

    let mut draft = InvoiceDraft::new();
    populate_from_client(&backend, &mut draft, client.id, default_rate())
        .await
        .expect("populate");

    assert_eq!(draft.client_id(), Some(client.id));
    let items = draft.line_items();
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].description(), "Website Redesign - API work");
    assert_eq!(items[0].quantity(), Decimal::new(150, 2));
    assert_eq!(items[0].unit_price(), Decimal::from(80));
    assert_eq!(items[0].amount(), Decimal::from(120));
    assert_eq!(items[0].sort_order(), 0);

    assert_eq!(items[1].description(), "Website Redesign (1.0h)");
    assert_eq!(items[1].amount(), Decimal::from(80));
    assert_eq!(items[1].sort_order(), 1);

    assert_eq!(draft.subtotal(), Decimal::from(200));
}

#[tokio::test]
async fn populate_falls_back_to_the_default_rate() {
    let backend = MockBackend::new();
    let client = backend.seed_client("Acme Corp", None).await;
    let project = backend.seed_project(client.id, "Website Redesign").await;
    backend.seed_unbilled_entry(project.id, None, 3600).await;

    let mut draft = InvoiceDraft::new();
    populate_from_client(&backend, &mut draft, client.id, default_rate())
        .await
        .expect("populate");

    assert_eq!(draft.line_items()[0].unit_price(), Decimal::ONE_HUNDRED);
}

#[tokio::test]
async fn populate_without_unbilled_time_keeps_existing_items() {
    let backend = MockBackend::new();
    let client = backend.seed_client("Acme Corp", None).await;

    let mut draft = InvoiceDraft::new();
    draft.add_line_item(LineItem::new("Retainer", Decimal::ONE, Decimal::from(500), 0));
    populate_from_client(&backend, &mut draft, client.id, default_rate())
        .await
        .expect("populate");

    assert_eq!(draft.client_id(), Some(client.id));
    assert_eq!(draft.line_items().len(), 1);
    assert_eq!(draft.line_items()[0].description(), "Retainer");
}

#[tokio::test]
async fn populate_surfaces_a_missing_client() {
    let backend = MockBackend::new();

    let mut draft = InvoiceDraft::new();
    let err = populate_from_client(&backend, &mut draft, uuid::Uuid::new_v4(), default_rate())
        .await
        .expect_err("unknown client");

    assert!(err.user_message().starts_with("Client not found:"));
    assert!(draft.client_id().is_none());
}

#[tokio::test]
async fn clear_client_drops_generated_items() {
    let backend = MockBackend::new();
    let client = backend.seed_client("Acme Corp", None).await;
    let project = backend.seed_project(client.id, "Website Redesign").await;
    backend.seed_unbilled_entry(project.id, None, 3600).await;

    let mut draft = InvoiceDraft::new();
    populate_from_client(&backend, &mut draft, client.id, default_rate())
        .await
        .expect("populate");
    clear_client(&mut draft);

    assert!(draft.client_id().is_none());
    assert!(draft.line_items().is_empty());
}

#[tokio::test]
async fn submit_saves_the_invoice_and_its_items() {
    let backend = MockBackend::new();
    let client = backend.seed_client("Acme Corp", None).await;

    let mut draft = InvoiceDraft::new();
    draft.set_client_id(Some(client.id));
    draft.set_tax_rate(Decimal::TEN);
    draft.set_notes("Net 30");
    draft.add_line_item(LineItem::new("Design", Decimal::TWO, Decimal::ONE_HUNDRED, 0));
    draft.add_line_item(LineItem::new("Build", Decimal::from(3), Decimal::ONE_HUNDRED, 1));

    let invoice = submit_draft(&backend, &draft).await.expect("submit");

    assert!(invoice.invoice_number.starts_with("INV-"));
    assert_eq!(invoice.issue_date, draft.issue_date());
    assert_eq!(invoice.due_date, draft.due_date());

    let stored = backend.invoices().await.remove(0);
    assert_eq!(stored.notes.as_deref(), Some("Net 30"));
    assert_eq!(stored.tax_rate, Some(Decimal::TEN));
    assert_eq!(stored.subtotal, Decimal::from(500));
    assert_eq!(stored.tax_amount, Decimal::from(50));
    assert_eq!(stored.total, Decimal::from(550));

    let items = backend.line_items_for(invoice.id).await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].sort_order, 0);
    assert_eq!(items[0].description, "Design");
    assert_eq!(items[1].sort_order, 1);
    assert_eq!(items[1].description, "Build");
}

#[tokio::test]
async fn submit_omits_empty_notes_and_zero_tax() {
    let backend = MockBackend::new();
    let client = backend.seed_client("Acme Corp", None).await;

    let mut draft = InvoiceDraft::new();
    draft.set_client_id(Some(client.id));
    draft.add_line_item(LineItem::new("Design", Decimal::ONE, Decimal::ONE_HUNDRED, 0));

    submit_draft(&backend, &draft).await.expect("submit");

    let stored = backend.invoices().await.remove(0);
    assert!(stored.notes.is_none());
    assert!(stored.tax_rate.is_none());
    assert_eq!(stored.tax_amount, Decimal::ZERO);
}

#[tokio::test]
async fn submit_rejects_an_invalid_draft_without_touching_the_backend() {
    let backend = MockBackend::new();

    let err = submit_draft(&backend, &InvoiceDraft::new())
        .await
        .expect_err("empty draft");

    assert!(matches!(err, SubmitError::Validation(_)));
    assert!(err
        .to_string()
        .contains("Please select a client before saving."));
    assert!(backend.invoices().await.is_empty());
}

#[tokio::test]
async fn submit_persists_nothing_when_invoice_creation_fails() {
    let backend = MockBackend::new();
    let client = backend.seed_client("Acme Corp", None).await;
    backend.fail_command("create_invoice", "database is locked").await;

    let mut draft = InvoiceDraft::new();
    draft.set_client_id(Some(client.id));
    draft.add_line_item(LineItem::new("Design", Decimal::ONE, Decimal::ONE_HUNDRED, 0));

    let err = submit_draft(&backend, &draft).await.expect_err("create fails");

    assert!(matches!(err, SubmitError::CreateInvoice { .. }));
    assert!(backend.invoices().await.is_empty());
}

#[tokio::test]
async fn submit_reports_a_partially_saved_invoice() {
    let backend = MockBackend::new();
    let client = backend.seed_client("Acme Corp", None).await;
    backend
        .fail_command_after("add_line_item", 1, "database is locked")
        .await;

    let mut draft = InvoiceDraft::new();
    draft.set_client_id(Some(client.id));
    draft.add_line_item(LineItem::new("Design", Decimal::ONE, Decimal::ONE_HUNDRED, 0));
    draft.add_line_item(LineItem::new("Build", Decimal::ONE, Decimal::ONE_HUNDRED, 1));

    let err = submit_draft(&backend, &draft).await.expect_err("second item");

    match err {
        SubmitError::LineItems {
            invoice,
            failed_index,
            source,
        } => {
            assert_eq!(failed_index, 1);
            assert!(invoice.invoice_number.starts_with("INV-"));
            assert_eq!(source.user_message(), "database is locked");
            assert_eq!(backend.line_items_for(invoice.id).await.len(), 1);
        }
        other => panic!("expected LineItems, got {other:?}"),
    }
}
