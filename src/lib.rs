pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

#[cfg(feature = "lambda")]
pub use adapters::{dynamo::DynamoRepository, s3::S3Storage};
#[cfg(feature = "lambda")]
pub use config::lambda::LambdaConfig;

pub use adapters::{
    json_file::JsonFileRepository,
    local::LocalStorage,
    memory::{InMemoryRepository, InMemoryStorage},
};
pub use crate::core::ingest::IngestionEngine;
pub use domain::event::NotificationEvent;
pub use domain::model::{InvocationResponse, Person, PersonFields};
pub use utils::error::{IngestError, Result};
