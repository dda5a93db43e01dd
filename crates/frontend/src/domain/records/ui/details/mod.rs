//! Record details: view, edit and create share one page
//!
//! - view_model.rs: route state and commands over the stores
//! - view.rs: Leptos component

mod view;
mod view_model;

pub use view::RecordDetails;
pub use view_model::{RecordDetailsViewModel, NEW_RECORD_ID};
