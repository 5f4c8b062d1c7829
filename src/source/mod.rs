// Sources for raw sales exports: local files and HTTP endpoints.

pub mod traits;
pub mod fetcher;

pub use fetcher::{source_for, FileSource, HttpSource};
pub use traits::SalesSource;
