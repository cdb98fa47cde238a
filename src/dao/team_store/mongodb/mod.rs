mod config;
mod connection;
mod error;
mod models;
pub mod store;

pub use config::{DEFAULT_DB, MongoConfig};
pub use error::MongoDaoError;
pub use store::MongoTeamStore;
