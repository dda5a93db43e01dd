pub mod create_entity_table;
