pub mod metadata_store;
pub mod record_store;

pub use metadata_store::MetadataStore;
pub use record_store::RecordStore;
