pub mod ingest;
pub mod parser;

pub use crate::domain::model::{IngestionSummary, InvocationResponse, Person};
pub use crate::domain::ports::{ObjectStorage, PersonRepository};
pub use crate::utils::error::Result;
