pub mod error;
pub mod factory;
pub mod file;
pub mod http;
pub mod payload;
pub mod traits;

pub use error::SourceError;
pub use factory::SourceFactory;
pub use file::JsonFileSource;
pub use http::HttpCatalogSource;
pub use payload::{record_from_item, records_from_collection};
pub use traits::CatalogSource;
