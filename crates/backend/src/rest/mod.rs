//! Structured data backend: a small collection-oriented REST protocol over
//! the metadata tables and every provisioned entity table.

pub mod codec;
pub mod handlers;
pub mod repository;
pub mod schema_sync;
pub mod service;

/// Metadata tables get JSON and boolean column decoding, entity tables get
/// the owner-based access rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Metadata,
    Entity,
}
