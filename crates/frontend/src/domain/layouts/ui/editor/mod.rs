//! Layout editor for one entity
//!
//! - view_model.rs: working copy of the selected layout and its commands
//! - view.rs: Leptos component

mod view;
mod view_model;

pub use view::LayoutSettings;
pub use view_model::{LayoutEditorViewModel, NewLayoutForm};
