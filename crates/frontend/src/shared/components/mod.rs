pub mod badge;
pub mod dynamic_form;
pub mod error_banner;
pub mod field_input;
pub mod page_header;
pub mod record_table;

pub use badge::{Badge, BadgeVariant};
pub use dynamic_form::{DynamicForm, RecordDetailsView};
pub use error_banner::ErrorBanner;
pub use field_input::FieldInput;
pub use page_header::PageHeader;
pub use record_table::RecordTable;
