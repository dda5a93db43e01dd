pub mod list_view;
pub mod metadata;
pub mod provisioning;
pub mod record;
pub mod rest;
