// API-facing error types
pub mod account;

pub use account::AccountApiError;

#[cfg(test)]
mod account_test;
