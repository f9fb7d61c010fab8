use crate::utils::error::{IngestError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> IngestError {
    IngestError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid(
            field_name,
            bucket_name,
            "S3 bucket name must be between 3 and 63 characters",
        ));
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            field_name,
            bucket_name,
            "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(invalid(
            field_name,
            bucket_name,
            "S3 bucket name cannot start or end with a hyphen",
        ));
    }

    Ok(())
}

pub fn validate_table_name(field_name: &str, table_name: &str) -> Result<()> {
    if table_name.len() < 3 || table_name.len() > 255 {
        return Err(invalid(
            field_name,
            table_name,
            "DynamoDB table name must be between 3 and 255 characters",
        ));
    }

    if !table_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(invalid(
            field_name,
            table_name,
            "DynamoDB table name can only contain letters, numbers, underscores, hyphens, and dots",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("store_path", "./people.json").is_ok());
        assert!(validate_path("store_path", "").is_err());
        assert!(validate_path("store_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_s3_bucket_name() {
        assert!(validate_s3_bucket_name("bucket", "people-uploads").is_ok());
        assert!(validate_s3_bucket_name("bucket", "ab").is_err());
        assert!(validate_s3_bucket_name("bucket", "People_Uploads").is_err());
        assert!(validate_s3_bucket_name("bucket", "-uploads").is_err());
    }

    #[test]
    fn test_validate_table_name() {
        assert!(validate_table_name("table", "people-table_v1").is_ok());
        assert!(validate_table_name("table", "pp").is_err());
        assert!(validate_table_name("table", "people table").is_err());
    }
}
