// Stores layer - Data access and repository pattern
pub mod account_store;
pub mod uniqueness_guard;

pub use account_store::{AccountStore, DbAccountStore};
pub use uniqueness_guard::UniquenessGuard;
