// src/dataset/read.rs

use crate::error::{DashboardError, Result};
use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{fs, io::Cursor, path::Path, sync::Arc};
use tracing::debug;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const BATCH_SIZE: usize = 8192;

/// Read a headed CSV file into a single all-`Utf8` RecordBatch.
///
/// Every column is read as text; typing happens afterwards so that one bad
/// cell never rejects the whole file.
pub fn read_text_csv(path: &Path, source_name: &str) -> Result<RecordBatch> {
    let data = fs::read(path).map_err(|e| {
        DashboardError::data_load(source_name, format!("{}: {}", path.display(), e))
    })?;
    read_text_csv_bytes(&data, source_name)
}

pub fn read_text_csv_bytes(data: &[u8], source_name: &str) -> Result<RecordBatch> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    if data.iter().all(u8::is_ascii_whitespace) {
        return Err(DashboardError::data_load(source_name, "file is empty"));
    }

    // 1) header names only; inferred types are discarded
    let format = Format::default().with_header(true);
    let (inferred, _) = format
        .infer_schema(Cursor::new(data), Some(0))
        .map_err(|e| DashboardError::data_load(source_name, e))?;
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name().trim(), DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    // 2) read every row as text
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(BATCH_SIZE)
        .build(Cursor::new(data))
        .map_err(|e| DashboardError::data_load(source_name, e))?;
    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| DashboardError::data_load(source_name, e))?;
    let batch =
        concat_batches(&schema, &batches).map_err(|e| DashboardError::data_load(source_name, e))?;

    debug!(
        source = source_name,
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "read csv"
    );
    Ok(batch)
}

/// Fail with a `DataLoad` error unless every `required` column is present.
pub fn require_columns(batch: &RecordBatch, source_name: &str, required: &[&str]) -> Result<()> {
    let schema = batch.schema();
    for name in required {
        if schema.index_of(name).is_err() {
            return Err(DashboardError::data_load(
                source_name,
                format!("missing required column `{}`", name),
            ));
        }
    }
    Ok(())
}
