pub mod functions;
pub mod rest;
pub mod routes;
pub mod shared;
pub mod state;
pub mod system;
