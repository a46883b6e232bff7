//! Command implementations.

pub mod run;
pub mod schema;

pub use self::run::execute_run;
pub use self::schema::execute_schema;
