//! HTML template rendering handlers.

mod dashboard;
mod index;

pub use dashboard::{DASHBOARD_PAGE_SIZE, dashboard_handler};
pub use index::{SubmitForm, index_handler, submit_handler};
