mod config_error;
mod export_error;
mod lumen_error;
mod schema_error;
mod storage_error;
mod transport_error;

pub use config_error::ConfigError;
pub use export_error::ExportError;
pub use lumen_error::{LumenError, LumenResult};
pub use schema_error::SchemaError;
pub use storage_error::StorageError;
pub use transport_error::TransportError;
