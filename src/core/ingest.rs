use crate::core::parser::{LineOutcome, LineReader};
use crate::domain::event::{working_file_name, NotificationEvent};
use crate::domain::model::{IngestionSummary, InvocationResponse};
use crate::domain::ports::{ObjectStorage, PersonRepository};
use crate::utils::error::Result;
use std::fmt;
use tokio::io::AsyncBufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestPhase {
    Idle,
    FetchingObject,
    ParsingLines,
    PersistingEntities,
    Completed,
}

impl fmt::Display for IngestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::FetchingObject => "fetching object",
            Self::ParsingLines => "parsing lines",
            Self::PersistingEntities => "persisting entities",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Runs one invocation: every notified object is fetched, parsed line by
/// line, and each valid person written through the repository.
///
/// Holds no state between invocations; the collaborators are injected.
pub struct IngestionEngine<S: ObjectStorage, R: PersonRepository> {
    storage: S,
    repository: R,
}

impl<S: ObjectStorage, R: PersonRepository> IngestionEngine<S, R> {
    pub fn new(storage: S, repository: R) -> Self {
        Self {
            storage,
            repository,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Records are processed in order. A fetch or write failure aborts the
    /// rest of the invocation; writes already issued stay committed.
    pub async fn handle(&self, event: &NotificationEvent) -> Result<InvocationResponse> {
        enter("invocation", IngestPhase::Idle);
        tracing::info!(
            "Processing notification with {} record(s)",
            event.records.len()
        );

        let mut total = IngestionSummary::default();
        for record in &event.records {
            let key = record.object_key()?;
            if let Some(bucket) = record.bucket_name() {
                tracing::debug!("Record {} notified from bucket {}", key, bucket);
            }

            let summary = self.ingest_object(&key).await?;
            total.absorb(&summary);
        }

        tracing::info!(
            "{} people processed and saved ({} malformed lines skipped)",
            total.persisted,
            total.skipped
        );
        Ok(InvocationResponse::completed(&total))
    }

    pub async fn ingest_object(&self, key: &str) -> Result<IngestionSummary> {
        let file = working_file_name(key);
        enter(file, IngestPhase::FetchingObject);
        let data = self.storage.fetch(key).await?;
        tracing::debug!("Fetched {} ({} bytes)", key, data.len());

        self.ingest_reader(file, data.as_slice()).await
    }

    /// Streams `reader` through the line parser, writing each valid person
    /// as soon as it is parsed.
    pub async fn ingest_reader<B>(&self, source: &str, reader: B) -> Result<IngestionSummary>
    where
        B: AsyncBufRead + Unpin + Send,
    {
        enter(source, IngestPhase::ParsingLines);
        let mut lines = LineReader::new(reader);
        let mut summary = IngestionSummary::default();
        let mut persisting = false;

        while let Some(outcome) = lines.next_outcome().await? {
            match outcome {
                LineOutcome::Entity(person) => {
                    if !persisting {
                        enter(source, IngestPhase::PersistingEntities);
                        persisting = true;
                    }
                    self.repository.put(&person).await?;
                    summary.persisted += 1;
                }
                LineOutcome::Skipped(line) => {
                    tracing::warn!(
                        "Malformed line {} in {}: {:?} ({})",
                        line.line_number,
                        source,
                        line.raw,
                        line.reason
                    );
                    summary.skipped += 1;
                }
            }
        }

        enter(source, IngestPhase::Completed);
        tracing::info!(
            "{}: {} saved, {} skipped, {} lines read",
            source,
            summary.persisted,
            summary.skipped,
            lines.lines_read()
        );
        Ok(summary)
    }
}

fn enter(source: &str, phase: IngestPhase) {
    tracing::debug!("{}: {}", source, phase);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryRepository, InMemoryStorage};
    use crate::domain::model::Person;
    use crate::utils::error::IngestError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TWO_PEOPLE: &str = "CC,1234,Juan,Perez,juan@mail.com\nCE,5678,Ana,Gomez,ana@mail.com\n";

    fn engine_with(objects: &[(&str, &str)]) -> IngestionEngine<InMemoryStorage, InMemoryRepository> {
        let storage = InMemoryStorage::new();
        for (key, content) in objects {
            storage.insert(*key, content.as_bytes().to_vec());
        }
        IngestionEngine::new(storage, InMemoryRepository::new())
    }

    /// Accepts `limit` writes, then rejects every following one.
    struct FailingRepository {
        inner: InMemoryRepository,
        limit: usize,
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl PersonRepository for FailingRepository {
        async fn put(&self, person: &Person) -> Result<()> {
            if self.attempts.fetch_add(1, Ordering::SeqCst) >= self.limit {
                return Err(IngestError::PersistenceError {
                    message: format!("write rejected for {}", person.documento()),
                });
            }
            self.inner.put(person).await
        }

        async fn get(&self, documento: &str) -> Result<Option<Person>> {
            self.inner.get(documento).await
        }

        async fn scan_all(&self) -> Result<Vec<Person>> {
            self.inner.scan_all().await
        }
    }

    #[tokio::test]
    async fn test_two_valid_lines_are_persisted() {
        let engine = engine_with(&[("uploads/people.csv", TWO_PEOPLE)]);
        let response = engine
            .handle(&NotificationEvent::for_keys(["uploads/people.csv"]))
            .await
            .unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body.count, 2);
        assert_eq!(response.body.message, InvocationResponse::COMPLETED_MESSAGE);

        let juan = engine.repository().get("1234").await.unwrap().unwrap();
        assert_eq!(juan.tipo_documento(), "CC");
        assert_eq!(juan.nombre(), "Juan");
        assert_eq!(juan.apellido(), "Perez");
        assert_eq!(juan.correo(), "juan@mail.com");
        assert!(engine.repository().get("5678").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_malformed_line_is_skipped_without_write() {
        let engine = engine_with(&[(
            "people.csv",
            "malformateada\nCC,1234,Juan,Perez,juan@mail.com\n",
        )]);
        let summary = engine.ingest_object("people.csv").await.unwrap();

        assert_eq!(summary.persisted, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(engine.repository().write_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_required_fields_never_reach_repository() {
        let engine = engine_with(&[(
            "people.csv",
            "CC,,Juan,Perez,juan@mail.com\nCC,1234,,Perez,juan@mail.com\nCC,1,2,3\n",
        )]);
        let response = engine
            .handle(&NotificationEvent::for_keys(["people.csv"]))
            .await
            .unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body.count, 0);
        assert_eq!(engine.repository().write_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_lines_are_not_counted() {
        let engine = engine_with(&[("people.csv", "\n   \nCC,1234,Juan,Perez,juan@mail.com\n\n")]);
        let summary = engine.ingest_object("people.csv").await.unwrap();
        assert_eq!(
            summary,
            IngestionSummary {
                persisted: 1,
                skipped: 0
            }
        );
    }

    #[tokio::test]
    async fn test_count_accumulates_across_records() {
        let engine = engine_with(&[
            ("a.csv", TWO_PEOPLE),
            ("b.csv", "TI,9999,Luis,Diaz,luis@mail.com\nbad\n"),
        ]);
        let response = engine
            .handle(&NotificationEvent::for_keys(["a.csv", "b.csv"]))
            .await
            .unwrap();
        assert_eq!(response.body.count, 3);
    }

    #[tokio::test]
    async fn test_repeated_documento_is_last_write_wins() {
        let engine = engine_with(&[(
            "people.csv",
            "CC,1234,Juan,Perez,juan@mail.com\nCC,1234,Juan Carlos,Perez,jc@mail.com\n",
        )]);
        let response = engine
            .handle(&NotificationEvent::for_keys(["people.csv"]))
            .await
            .unwrap();

        // Both writes succeed, so the count reflects two persisted lines.
        assert_eq!(response.body.count, 2);
        let people = engine.repository().scan_all().await.unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].nombre(), "Juan Carlos");
        assert_eq!(people[0].correo(), "jc@mail.com");
    }

    #[tokio::test]
    async fn test_missing_object_aborts_invocation() {
        let engine = engine_with(&[("a.csv", TWO_PEOPLE)]);
        let result = engine
            .handle(&NotificationEvent::for_keys(["a.csv", "missing.csv"]))
            .await;

        assert!(matches!(
            result,
            Err(IngestError::ObjectNotFoundError { ref key }) if key == "missing.csv"
        ));
        // Writes for the first record are not rolled back.
        assert_eq!(engine.repository().scan_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_persistence_failure_stops_remaining_lines() {
        let storage = InMemoryStorage::new();
        storage.insert(
            "people.csv",
            b"CC,1,Uno,A,a@mail.com\nCC,2,Dos,B,b@mail.com\nCC,3,Tres,C,c@mail.com\n".to_vec(),
        );
        let repository = FailingRepository {
            inner: InMemoryRepository::new(),
            limit: 1,
            attempts: AtomicUsize::new(0),
        };
        let engine = IngestionEngine::new(storage, repository);

        let result = engine
            .handle(&NotificationEvent::for_keys(["people.csv"]))
            .await;

        assert!(matches!(result, Err(IngestError::PersistenceError { .. })));
        assert_eq!(engine.repository().attempts.load(Ordering::SeqCst), 2);
        let stored = engine.repository().scan_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].documento(), "1");
    }

    #[tokio::test]
    async fn test_empty_object_key_is_rejected() {
        let engine = engine_with(&[]);
        let result = engine.handle(&NotificationEvent::for_keys([""])).await;
        assert!(matches!(result, Err(IngestError::EventError { .. })));
    }

    #[test]
    fn test_phase_names() {
        let phases = [
            IngestPhase::Idle,
            IngestPhase::FetchingObject,
            IngestPhase::ParsingLines,
            IngestPhase::PersistingEntities,
            IngestPhase::Completed,
        ];
        let names: Vec<String> = phases.iter().map(ToString::to_string).collect();
        assert_eq!(
            names,
            [
                "idle",
                "fetching object",
                "parsing lines",
                "persisting entities",
                "completed"
            ]
        );
    }

    #[tokio::test]
    async fn test_encoded_notification_key_is_fetched_decoded() {
        let engine = engine_with(&[("incoming/new people.csv", TWO_PEOPLE)]);
        let event: NotificationEvent = serde_json::from_value(serde_json::json!({
            "Records": [{"s3": {"object": {"key": "incoming/new+people.csv"}}}]
        }))
        .unwrap();

        let response = engine.handle(&event).await.unwrap();
        assert_eq!(response.body.count, 2);
    }

    #[tokio::test]
    async fn test_empty_event_completes_with_zero() {
        let engine = engine_with(&[]);
        let response = engine.handle(&NotificationEvent::default()).await.unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body.count, 0);
    }
}
