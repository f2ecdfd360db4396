pub mod hive;
pub mod token_list;
