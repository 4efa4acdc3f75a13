// Coordinators layer - Workflow orchestration
//
// Coordinators compose provider and store operations into the account
// workflows exposed by the API and CLI. They decide the order of stages
// without holding business rules themselves.

pub mod account_coordinator;

pub use account_coordinator::AccountCoordinator;
