pub mod db;
pub mod ddl;
