pub mod config;
pub mod error;
pub mod params;
pub mod response;
pub mod status;

pub use config::{AppConfig, LoggerConfig};
pub use error::ReqlogError;
pub use params::QueryParams;
pub use response::{ResponseSnapshot, ResponseStatus};
pub use status::status_phrase;
