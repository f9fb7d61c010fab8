use crate::domain::model::Person;
use crate::domain::ports::{ObjectStorage, PersonRepository};
use crate::utils::error::{IngestError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: impl Into<String>, data: Vec<u8>) {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), data);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl ObjectStorage for InMemoryStorage {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| IngestError::ObjectNotFoundError {
                key: key.to_string(),
            })
    }

    async fn store(&self, local_path: &Path, key: &str) -> Result<()> {
        let data = tokio::fs::read(local_path).await?;
        self.insert(key, data);
        Ok(())
    }
}

/// Ordered map of people; also counts write requests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    people: Arc<RwLock<BTreeMap<String, Person>>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PersonRepository for InMemoryRepository {
    async fn put(&self, person: &Person) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.people
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(person.documento().to_string(), person.clone());
        Ok(())
    }

    async fn get(&self, documento: &str) -> Result<Option<Person>> {
        let people = self.people.read().unwrap_or_else(PoisonError::into_inner);
        Ok(people.get(documento).cloned())
    }

    async fn scan_all(&self) -> Result<Vec<Person>> {
        let people = self.people.read().unwrap_or_else(PoisonError::into_inner);
        Ok(people.values().cloned().collect())
    }
}
