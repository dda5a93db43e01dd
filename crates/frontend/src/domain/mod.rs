pub mod entities;
pub mod fields;
pub mod layouts;
pub mod records;
