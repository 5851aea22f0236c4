pub mod accounts;
pub mod auth;
pub mod budget_categories;
pub mod categories;
pub mod debts;
pub mod forecast;
pub mod health;
pub mod preferences;
pub mod recurring;
pub mod suggestions;
pub mod transactions;
pub mod users;
pub mod variable_expenses;
