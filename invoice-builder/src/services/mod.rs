mod populate;
mod submit;

pub use populate::{clear_client, populate_from_client};
pub use submit::{submit_draft, SubmitError};
