use crate::domain::model::Person;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Object store holding the uploaded files.
pub trait ObjectStorage: Send + Sync {
    fn fetch(&self, key: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn store(
        &self,
        local_path: &Path,
        key: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Key-value store of people keyed by `documento`.
///
/// `put` is an upsert: a second write for the same `documento` replaces the first.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    async fn put(&self, person: &Person) -> Result<()>;
    async fn get(&self, documento: &str) -> Result<Option<Person>>;
    async fn scan_all(&self) -> Result<Vec<Person>>;
}
