pub mod initdb;
pub mod migrate_and_serve;
pub mod run_sql;
pub mod serve;

pub use initdb::init_database;
pub use migrate_and_serve::migrate_and_serve;
pub use run_sql::run_sql;
pub use serve::serve;
