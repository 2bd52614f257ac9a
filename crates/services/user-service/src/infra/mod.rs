//! Infrastructure layer - store connections and migrations.

mod db;
mod document;
pub mod migrations;

pub use db::Database;
pub use document::DocumentDatabase;
pub use migrations::Migrator;
