use crate::utils::error::{IngestError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_s3_bucket_name, validate_table_name, Validate,
};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaConfig {
    pub bucket: String,
    pub table: String,
    pub region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub force_path_style: bool,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| IngestError::MissingConfigError {
                    field: name.to_string(),
                })
        };

        let force_path_style = match lookup("S3_FORCE_PATH_STYLE").as_deref() {
            None | Some("") => false,
            Some(value) => value.parse::<bool>().map_err(|_| IngestError::InvalidConfigValueError {
                field: "S3_FORCE_PATH_STYLE".to_string(),
                value: value.to_string(),
                reason: "expected true or false".to_string(),
            })?,
        };

        Ok(Self {
            bucket: required("BUCKET_NAME")?,
            table: required("PEOPLE_TABLE")?,
            region: lookup("AWS_REGION").filter(|value| !value.is_empty()),
            s3_endpoint: lookup("S3_ENDPOINT_URL").filter(|value| !value.is_empty()),
            force_path_style,
        })
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_s3_bucket_name("bucket", &self.bucket)?;
        validate_table_name("table", &self.table)?;

        if let Some(region) = &self.region {
            validate_non_empty_string("region", region)?;
        }

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
