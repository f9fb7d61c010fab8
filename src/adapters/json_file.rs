use crate::domain::model::Person;
use crate::domain::ports::PersonRepository;
use crate::utils::error::{IngestError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// People kept as a JSON array in a single file.
///
/// Every `put` rewrites the whole file through a temporary sibling and a
/// rename, so a crash never leaves a half-written store behind.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    people: Mutex<BTreeMap<String, Person>>,
}

impl JsonFileRepository {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let people = match tokio::fs::read(&path).await {
            Ok(data) if data.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(data) => {
                let records: Vec<Person> = serde_json::from_slice(&data)?;
                records
                    .into_iter()
                    .map(|person| (person.documento().to_string(), person))
                    .collect()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Opened {} with {} people", path.display(), people.len());
        Ok(Self {
            path,
            people: Mutex::new(people),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, people: &BTreeMap<String, Person>) -> Result<()> {
        let records: Vec<&Person> = people.values().collect();
        let json = serde_json::to_vec_pretty(&records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl PersonRepository for JsonFileRepository {
    async fn put(&self, person: &Person) -> Result<()> {
        let mut people = self.people.lock().await;
        let mut updated = people.clone();
        updated.insert(person.documento().to_string(), person.clone());

        // Only a write that reached disk becomes visible.
        self.flush(&updated)
            .await
            .map_err(|e| IngestError::PersistenceError {
                message: format!("failed to save {}: {}", person.documento(), e),
            })?;
        *people = updated;
        Ok(())
    }

    async fn get(&self, documento: &str) -> Result<Option<Person>> {
        Ok(self.people.lock().await.get(documento).cloned())
    }

    async fn scan_all(&self) -> Result<Vec<Person>> {
        Ok(self.people.lock().await.values().cloned().collect())
    }
}
