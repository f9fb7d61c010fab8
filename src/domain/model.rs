use crate::utils::error::{IngestError, Result};
use serde::{Deserialize, Serialize};

/// Raw, unvalidated input for a [`Person`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PersonFields {
    pub tipo_documento: Option<String>,
    pub documento: Option<String>,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub correo: Option<String>,
}

/// A validated person record, keyed by `documento`.
///
/// The only way to obtain one is [`Person::new`], which deserialization
/// also goes through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersonFields")]
pub struct Person {
    tipo_documento: String,
    documento: String,
    nombre: String,
    apellido: String,
    correo: String,
}

fn required(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(IngestError::ValidationError { field }),
    }
}

impl Person {
    pub fn new(fields: PersonFields) -> Result<Self> {
        let documento = required("documento", fields.documento)?;
        let nombre = required("nombre", fields.nombre)?;

        Ok(Self {
            tipo_documento: fields.tipo_documento.unwrap_or_default(),
            documento,
            nombre,
            apellido: fields.apellido.unwrap_or_default(),
            correo: fields.correo.unwrap_or_default(),
        })
    }

    pub fn documento(&self) -> &str {
        &self.documento
    }

    pub fn nombre(&self) -> &str {
        &self.nombre
    }

    pub fn apellido(&self) -> &str {
        &self.apellido
    }

    pub fn tipo_documento(&self) -> &str {
        &self.tipo_documento
    }

    pub fn correo(&self) -> &str {
        &self.correo
    }
}

impl TryFrom<PersonFields> for Person {
    type Error = IngestError;

    fn try_from(fields: PersonFields) -> Result<Self> {
        Person::new(fields)
    }
}

/// Tally for one object (or a whole invocation once merged).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionSummary {
    pub persisted: usize,
    pub skipped: usize,
}

impl IngestionSummary {
    pub fn absorb(&mut self, other: &IngestionSummary) {
        self.persisted += other.persisted;
        self.skipped += other.skipped;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

impl InvocationResponse {
    pub const COMPLETED_MESSAGE: &'static str = "File processed and saved";

    /// Malformed lines are a partial success: the status stays 200.
    pub fn completed(summary: &IngestionSummary) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody {
                message: Self::COMPLETED_MESSAGE.to_string(),
                count: summary.persisted,
            },
        }
    }
}
