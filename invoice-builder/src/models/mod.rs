mod draft;
mod line_item;

pub use draft::InvoiceDraft;
pub use line_item::LineItem;
