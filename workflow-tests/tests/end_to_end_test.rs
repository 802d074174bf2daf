//! The full loop: track time, stop, bill it, save the invoice.

mod common;

use common::setup;
use invoice_builder::{populate_from_client, submit_draft, InvoiceDraft};
use rust_decimal::Decimal;

#[tokio::test]
async fn a_tracked_session_flows_into_an_invoice() {
    let ctx = setup();
    let backend = &ctx.backend;
    let client = backend
        .seed_client("Acme Corp", Some(Decimal::from(90)))
        .await;
    let project = backend.seed_project(client.id, "Website Redesign").await;

    // track a session through the real store
    ctx.timer
        .start(project.id, Some("API work".to_string()))
        .await;
    ctx.timer.stop().await;
    assert!(ctx.timer.error().await.is_none());

    // the stopped session is now unbilled time
    let entries = backend.time_entries().await;
    assert_eq!(entries.len(), 1);
    assert!(entries[0].is_billable);

    let rate = ctx.settings.default_hourly_rate().await;
    let mut draft = InvoiceDraft::new();
    populate_from_client(backend.as_ref(), &mut draft, client.id, rate)
        .await
        .expect("populate");

    assert_eq!(draft.client_id(), Some(client.id));
    assert_eq!(draft.line_items().len(), 1);
    assert_eq!(
        draft.line_items()[0].description(),
        "Website Redesign - API work"
    );
    assert_eq!(draft.line_items()[0].unit_price(), Decimal::from(90));

    let invoice = submit_draft(backend.as_ref(), &draft)
        .await
        .expect("submit");

    assert!(invoice.invoice_number.starts_with("INV-"));
    assert_eq!(backend.line_items_for(invoice.id).await.len(), 1);
    assert_eq!(backend.invoices().await.len(), 1);
}
