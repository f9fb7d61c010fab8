// Adapters layer: concrete implementations of the domain ports.

pub mod json_file;
pub mod local;
pub mod memory;

#[cfg(feature = "lambda")]
pub mod dynamo;
#[cfg(feature = "lambda")]
pub mod s3;
