use crate::domain::model::{Person, PersonFields};
use crate::domain::ports::PersonRepository;
use crate::utils::error::{IngestError, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;

const KEY_ATTRIBUTE: &str = "documento";

type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Clone)]
pub struct DynamoRepository {
    client: DynamoClient,
    table: String,
}

impl DynamoRepository {
    pub fn new(client: DynamoClient, table: String) -> Self {
        Self { client, table }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

fn persistence_error(operation: &str, err: impl std::error::Error) -> IngestError {
    IngestError::PersistenceError {
        message: format!("{} failed: {}", operation, DisplayErrorContext(&err)),
    }
}

pub(crate) fn to_item(person: &Person) -> Item {
    [
        ("tipo_documento", person.tipo_documento()),
        (KEY_ATTRIBUTE, person.documento()),
        ("nombre", person.nombre()),
        ("apellido", person.apellido()),
        ("correo", person.correo()),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), AttributeValue::S(value.to_string())))
    .collect()
}

pub(crate) fn from_item(item: &Item) -> Result<Person> {
    let text = |name: &str| item.get(name).and_then(|v| v.as_s().ok()).cloned();
    Person::new(PersonFields {
        tipo_documento: text("tipo_documento"),
        documento: text(KEY_ATTRIBUTE),
        nombre: text("nombre"),
        apellido: text("apellido"),
        correo: text("correo"),
    })
}

#[async_trait]
impl PersonRepository for DynamoRepository {
    async fn put(&self, person: &Person) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(to_item(person)))
            .send()
            .await
            .map_err(|e| persistence_error("PutItem", e))?;

        tracing::debug!("Saved {} to {}", person.documento(), self.table);
        Ok(())
    }

    async fn get(&self, documento: &str) -> Result<Option<Person>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key(KEY_ATTRIBUTE, AttributeValue::S(documento.to_string()))
            .send()
            .await
            .map_err(|e| persistence_error("GetItem", e))?;

        output.item.as_ref().map(from_item).transpose()
    }

    async fn scan_all(&self) -> Result<Vec<Person>> {
        let mut people = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| persistence_error("Scan", e))?;

            for item in output.items.unwrap_or_default() {
                people.push(from_item(&item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(people)
    }
}
