pub mod account;
pub mod context;
pub mod identity;

pub use identity::Identity;
