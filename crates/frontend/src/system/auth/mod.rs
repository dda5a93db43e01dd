//! Session facade over the `/api/auth` endpoints

pub mod api;
pub mod context;
pub mod guard;
pub mod storage;

pub use context::{use_auth, AuthProvider, AuthState, SessionContext};
pub use guard::RequireAuth;
