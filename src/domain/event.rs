use crate::utils::error::{IngestError, Result};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Object-created notification, as delivered by S3.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<NotificationRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    #[serde(default)]
    pub bucket: Option<S3Bucket>,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Object {
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl NotificationEvent {
    pub fn for_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let records = keys
            .into_iter()
            .map(|key| {
                let key: String = key.into();
                NotificationRecord {
                    s3: S3Entity {
                        bucket: None,
                        object: S3Object {
                            key: form_urlencoded::byte_serialize(key.as_bytes()).collect(),
                            size: None,
                        },
                    },
                }
            })
            .collect();
        Self { records }
    }
}

impl NotificationRecord {
    /// The object key, decoded from the form-urlencoded form S3 delivers
    /// (`+` for spaces, `%XX` escapes).
    pub fn object_key(&self) -> Result<String> {
        let key = decode_key(&self.s3.object.key);
        if key.trim().is_empty() {
            return Err(IngestError::EventError {
                message: "notification record has an empty object key".to_string(),
            });
        }
        Ok(key)
    }

    pub fn bucket_name(&self) -> Option<&str> {
        self.s3.bucket.as_ref().map(|bucket| bucket.name.as_str())
    }
}

fn decode_key(raw: &str) -> String {
    let mut pairs = form_urlencoded::parse(raw.as_bytes());
    match (pairs.next(), pairs.next()) {
        (Some((name, value)), None) if value.is_empty() => name.into_owned(),
        // Unescaped `&` or `=`: not an encoded key, keep it as delivered.
        _ => raw.to_string(),
    }
}

/// Local name for an object: the last non-empty path segment of its key.
pub fn working_file_name(key: &str) -> &str {
    key.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(key)
}
