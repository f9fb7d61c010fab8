use crate::domain::model::{Person, PersonFields};
use crate::utils::error::{IngestError, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Fields per line: `tipo_documento,documento,nombre,apellido,correo`.
pub const FIELD_COUNT: usize = 5;
pub const DELIMITER: char = ',';

#[derive(Debug)]
pub struct SkippedLine {
    pub line_number: usize,
    pub raw: String,
    pub reason: IngestError,
}

#[derive(Debug)]
pub enum LineOutcome {
    Entity(Person),
    Skipped(SkippedLine),
}

/// Parses one raw line. Blank lines yield `None`.
pub fn parse_line(line_number: usize, raw: &str) -> Option<LineOutcome> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    let parsed = match fields.as_slice() {
        [tipo_documento, documento, nombre, apellido, correo] => Person::new(PersonFields {
            tipo_documento: Some(tipo_documento.to_string()),
            documento: Some(documento.to_string()),
            nombre: Some(nombre.to_string()),
            apellido: Some(apellido.to_string()),
            correo: Some(correo.to_string()),
        }),
        _ => Err(IngestError::MalformedLineError {
            expected: FIELD_COUNT,
            found: fields.len(),
        }),
    };

    Some(match parsed {
        Ok(person) => LineOutcome::Entity(person),
        Err(reason) => LineOutcome::Skipped(SkippedLine {
            line_number,
            raw: line.to_string(),
            reason,
        }),
    })
}

pub fn parse_str(text: &str) -> impl Iterator<Item = LineOutcome> + '_ {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| parse_line(index + 1, line))
}

/// Streams outcomes from a buffered reader one line at a time.
pub struct LineReader<R> {
    lines: Lines<R>,
    line_number: usize,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }

    /// Next non-blank line's outcome, or `None` at end of input.
    /// Read failures (including invalid UTF-8) are returned as errors.
    pub async fn next_outcome(&mut self) -> Result<Option<LineOutcome>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_number += 1;
            if let Some(outcome) = parse_line(self.line_number, &line) {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    pub fn lines_read(&self) -> usize {
        self.line_number
    }
}
