// API data transfer objects
pub mod account;
pub mod common;
