//! Data access. Every function is scoped by the owning user id and returns
//! `Result<_, StoreError>`; a row of another user reads as missing.

pub mod accounts;
pub mod budget_categories;
pub mod categories;
pub mod debt_accounts;
pub mod error;
pub mod mapper;
pub mod preferences;
pub mod recurring_transactions;
pub mod transactions;
pub mod users;
pub mod variable_expenses;

pub use error::{StoreError, StoreResult};
pub use mapper::EntityMapper;
