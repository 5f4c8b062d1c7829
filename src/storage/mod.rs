pub mod sqlite;

pub use sqlite::{SqliteStorage, StoredReport};
