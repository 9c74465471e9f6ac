use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::convert::parse_components;
use crate::errors::ExperimentError;

type EncodeFn<T> = Box<dyn Fn(&T) -> String + Send + Sync>;
type DecodeFn<T> = Box<dyn Fn(&RowView<'_>) -> Result<T, ExperimentError> + Send + Sync>;

struct MappedColumn<T> {
    name: String,
    encode: EncodeFn<T>,
}

/// Explicit column layout for one record type.
///
/// Declares, per column, the header name and how a record renders that cell.
/// Without a mapping the codec derives columns from the record type's serde
/// shape; a mapping takes over when the derived shape does not fit (composite
/// cells, renamed or reordered columns). Reading through a mapping needs a
/// row decoder registered with [`FieldMapping::decode_with`].
pub struct FieldMapping<T> {
    columns: Vec<MappedColumn<T>>,
    decode: Option<DecodeFn<T>>,
}

impl<T> FieldMapping<T> {
    /// Start an empty mapping.
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            decode: None,
        }
    }

    /// Append a column with its header `name` and cell encoder.
    pub fn column<F>(mut self, name: impl Into<String>, encode: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.columns.push(MappedColumn {
            name: name.into(),
            encode: Box::new(encode),
        });
        self
    }

    /// Register the row decoder used when reading through this mapping.
    pub fn decode_with<F>(mut self, decode: F) -> Self
    where
        F: Fn(&RowView<'_>) -> Result<T, ExperimentError> + Send + Sync + 'static,
    {
        self.decode = Some(Box::new(decode));
        self
    }

    /// Header names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|column| column.name.as_str())
            .collect()
    }

    fn encode_row(&self, record: &T) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| (column.encode)(record))
            .collect()
    }

    fn decode_row(&self, row: &RowView<'_>) -> Result<T, ExperimentError> {
        match &self.decode {
            Some(decode) => decode(row),
            None => Err(ExperimentError::InvalidArgument(
                "field mapping has no row decoder registered".into(),
            )),
        }
    }
}

impl<T> Default for FieldMapping<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FieldMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMapping")
            .field("columns", &self.column_names())
            .field("has_decoder", &self.decode.is_some())
            .finish()
    }
}

/// Borrowed view of one data row during mapped decoding.
///
/// Cells are addressed by header name. `line` is the 1-based physical line
/// in the source text; the header occupies line 1.
pub struct RowView<'a> {
    columns: &'a IndexMap<String, usize>,
    cells: &'a csv::StringRecord,
    line: u64,
}

impl<'a> RowView<'a> {
    /// 1-based line number of this row in the source text.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Raw cell under `column`.
    pub fn cell(&self, column: &str) -> Result<&'a str, ExperimentError> {
        let index = self
            .columns
            .get(column)
            .copied()
            .ok_or_else(|| self.row_error(format!("no column named '{column}'")))?;
        self.cells
            .get(index)
            .ok_or_else(|| self.row_error(format!("row too short for column '{column}'")))
    }

    /// Parse the cell under `column` with `FromStr`.
    pub fn parse<F>(&self, column: &str) -> Result<F, ExperimentError>
    where
        F: FromStr,
        F::Err: fmt::Display,
    {
        let raw = self.cell(column)?;
        raw.trim().parse::<F>().map_err(|err| {
            self.row_error(format!("cell '{raw}' in column '{column}' failed to parse: {err}"))
        })
    }

    /// Decode the composite cell under `column` as two components.
    pub fn vec2(&self, column: &str) -> Result<[f32; 2], ExperimentError> {
        let parts = parse_components(self.cell(column)?, 2)
            .map_err(|details| self.row_error(details))?;
        Ok([parts[0], parts[1]])
    }

    /// Decode the composite cell under `column` as three components.
    pub fn vec3(&self, column: &str) -> Result<[f32; 3], ExperimentError> {
        let parts = parse_components(self.cell(column)?, 3)
            .map_err(|details| self.row_error(details))?;
        Ok([parts[0], parts[1], parts[2]])
    }

    fn row_error(&self, details: String) -> ExperimentError {
        ExperimentError::MalformedRow {
            line: self.line,
            details,
        }
    }
}

/// Encode `records` as header-first tabular text.
///
/// With a mapping the header row always carries the mapped column names.
/// Without one, columns derive from the record type's serde field names, so
/// an empty slice yields empty text (there is no instance to take the
/// names from).
pub fn encode_records<T>(
    records: &[T],
    mapping: Option<&FieldMapping<T>>,
) -> Result<String, ExperimentError>
where
    T: Serialize,
{
    let mut buffer = Vec::new();
    write_records_to(&mut buffer, records, mapping, true)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Decode header-first tabular text into records.
///
/// Empty (or whitespace-only) text decodes to an empty collection. A row
/// whose cell count differs from the header fails with
/// [`ExperimentError::MalformedRow`] carrying the row's 1-based line number.
pub fn decode_records<T>(
    text: &str,
    mapping: Option<&FieldMapping<T>>,
) -> Result<Vec<T>, ExperimentError>
where
    T: DeserializeOwned,
{
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    match mapping {
        Some(mapping) => {
            let headers = reader.headers().map_err(map_csv_error)?.clone();
            let mut columns = IndexMap::with_capacity(headers.len());
            for (index, name) in headers.iter().enumerate() {
                columns.insert(name.to_string(), index);
            }
            for name in mapping.column_names() {
                if !columns.contains_key(name) {
                    return Err(ExperimentError::MalformedRow {
                        line: 1,
                        details: format!("header is missing mapped column '{name}'"),
                    });
                }
            }

            let mut records = Vec::new();
            for result in reader.records() {
                let row = result.map_err(map_csv_error)?;
                let line = row.position().map(|pos| pos.line()).unwrap_or_default();
                let view = RowView {
                    columns: &columns,
                    cells: &row,
                    line,
                };
                records.push(mapping.decode_row(&view)?);
            }
            Ok(records)
        }
        None => {
            let mut records = Vec::new();
            for result in reader.deserialize() {
                records.push(result.map_err(map_csv_error)?);
            }
            Ok(records)
        }
    }
}

/// Write `records` to `writer`, optionally preceded by the header row.
pub(crate) fn write_records_to<W, T>(
    writer: W,
    records: &[T],
    mapping: Option<&FieldMapping<T>>,
    include_header: bool,
) -> Result<(), ExperimentError>
where
    W: Write,
    T: Serialize,
{
    match mapping {
        Some(mapping) => {
            let mut out = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(writer);
            if include_header {
                out.write_record(mapping.column_names())
                    .map_err(map_csv_error)?;
            }
            for record in records {
                out.write_record(mapping.encode_row(record))
                    .map_err(map_csv_error)?;
            }
            out.flush()?;
        }
        None => {
            let mut out = csv::WriterBuilder::new()
                .has_headers(include_header)
                .from_writer(writer);
            for record in records {
                out.serialize(record).map_err(map_csv_error)?;
            }
            out.flush()?;
        }
    }
    Ok(())
}

/// Read and decode the record file at `path`, or `None` when it is absent.
pub(crate) fn read_file_records<T>(
    path: &Path,
    mapping: Option<&FieldMapping<T>>,
) -> Result<Option<Vec<T>>, ExperimentError>
where
    T: DeserializeOwned,
{
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ExperimentError::Io(err)),
    };
    decode_records(&text, mapping).map(Some)
}

/// True when `path` does not exist or exists with zero length.
pub(crate) fn file_missing_or_empty(path: &Path) -> Result<bool, ExperimentError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.len() == 0),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(true),
        Err(err) => Err(ExperimentError::Io(err)),
    }
}

fn map_csv_error(err: csv::Error) -> ExperimentError {
    match err.into_kind() {
        csv::ErrorKind::Io(err) => ExperimentError::Io(err),
        csv::ErrorKind::UnequalLengths { pos, expected_len, len } => {
            ExperimentError::MalformedRow {
                line: pos.as_ref().map(|pos| pos.line()).unwrap_or_default(),
                details: format!("expected {expected_len} cells, found {len}"),
            }
        }
        csv::ErrorKind::Deserialize { pos, err } => ExperimentError::MalformedRow {
            line: pos.as_ref().map(|pos| pos.line()).unwrap_or_default(),
            details: err.to_string(),
        },
        csv::ErrorKind::Utf8 { pos, err } => ExperimentError::MalformedRow {
            line: pos.as_ref().map(|pos| pos.line()).unwrap_or_default(),
            details: err.to_string(),
        },
        csv::ErrorKind::Serialize(details) => ExperimentError::InvalidArgument(details),
        other => ExperimentError::InvalidArgument(format!("record codec failure: {other:?}")),
    }
}
