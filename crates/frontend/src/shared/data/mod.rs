//! Data access for the stores
//!
//! The stores only see the [`DataBackend`] and [`SchemaProvisioner`] traits;
//! the HTTP implementations talk to the backend, the in-memory ones back the
//! store tests.

mod backend;
mod http;
#[cfg(test)]
pub mod memory;

pub use backend::{
    decode_row, decode_rows, encode_row, DataBackend, DataError, DataResult, SchemaProvisioner,
};
pub use http::{HttpBackend, HttpProvisioner};
