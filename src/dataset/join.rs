// src/dataset/join.rs

use crate::dataset::date_parser::clean_str;
use crate::error::{DashboardError, Result};
use arrow::{
    array::{Array, ArrayRef, StringArray, UInt32Array},
    compute::take,
    datatypes::{Field, Schema},
    record_batch::RecordBatch,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Lookup columns aligned row-for-row with the left table.
pub struct JoinedColumns {
    pub fields: Vec<Field>,
    pub columns: Vec<ArrayRef>,
    /// Left rows that found no lookup match.
    pub unmatched: usize,
}

/// Left outer join of `lookup` onto `left` on `left_key = lookup_key`.
///
/// Every left row is kept exactly once: keys are compared trimmed, and when
/// the lookup repeats a key the first occurrence wins. Unmatched rows get
/// nulls in every lookup column. The lookup key column itself is not
/// carried over; a lookup column whose name already exists on the left is
/// renamed with a `_lookup` suffix.
pub fn left_join(
    left: &RecordBatch,
    left_key: &str,
    lookup: &RecordBatch,
    lookup_key: &str,
) -> Result<JoinedColumns> {
    let left_keys = string_column(left, left_key)?;
    let lookup_keys = string_column(lookup, lookup_key)?;

    let mut positions: HashMap<&str, u32> = HashMap::with_capacity(lookup_keys.len());
    let mut duplicates = 0usize;
    for (row, key) in lookup_keys.iter().enumerate() {
        let Some(key) = key.map(clean_str) else {
            continue;
        };
        if positions.contains_key(key) {
            duplicates += 1;
            continue;
        }
        positions.insert(key, row as u32);
    }
    if duplicates > 0 {
        warn!(
            key = lookup_key,
            duplicates, "lookup has repeated keys; keeping the first of each"
        );
    }

    let indices: UInt32Array = left_keys
        .iter()
        .map(|key| key.and_then(|k| positions.get(clean_str(k)).copied()))
        .collect();
    let unmatched = indices.null_count();

    let left_schema = left.schema();
    let lookup_schema = lookup.schema();
    let mut fields = Vec::new();
    let mut columns = Vec::new();
    for (field, column) in lookup_schema.fields().iter().zip(lookup.columns()) {
        if field.name() == lookup_key {
            continue;
        }
        let name = output_name(&left_schema, field.name());
        let taken =
            take(column.as_ref(), &indices, None).map_err(|e| DashboardError::from_arrow(&name, e))?;
        fields.push(Field::new(name, field.data_type().clone(), true));
        columns.push(taken);
    }

    debug!(
        left_rows = left.num_rows(),
        lookup_rows = lookup.num_rows(),
        unmatched,
        "left join"
    );
    Ok(JoinedColumns {
        fields,
        columns,
        unmatched,
    })
}

fn output_name(left: &Schema, name: &str) -> String {
    if left.index_of(name).is_ok() {
        format!("{}_lookup", name)
    } else {
        name.to_string()
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DashboardError::missing_column(name))?;
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| DashboardError::wrong_type(name, "text"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::read::read_text_csv_bytes;

    #[test]
    fn keeps_every_left_row_and_nulls_misses() -> Result<()> {
        let left = read_text_csv_bytes(
            b"State/Province,Sales\nTexas,1\nNowhere,2\n Texas ,3\n,4\nOntario,5\n",
            "sales",
        )?;
        let lookup = read_text_csv_bytes(
            b"Full Name,Abbreviation,Sales\nTexas,TX,x\nOntario,ON,y\nTexas,XX,z\n",
            "regions",
        )?;

        let joined = left_join(&left, "State/Province", &lookup, "Full Name")?;

        assert_eq!(joined.unmatched, 2);
        let names: Vec<&str> = joined.fields.iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["Abbreviation", "Sales_lookup"]);

        let abbrev = joined.columns[0]
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(abbrev.len(), left.num_rows());
        assert_eq!(abbrev.value(0), "TX");
        assert!(abbrev.is_null(1));
        assert_eq!(abbrev.value(2), "TX");
        assert!(abbrev.is_null(3));
        assert_eq!(abbrev.value(4), "ON");
        Ok(())
    }

    #[test]
    fn missing_key_is_a_schema_error() -> Result<()> {
        let left = read_text_csv_bytes(b"State,Sales\nTexas,1\n", "sales")?;
        let lookup = read_text_csv_bytes(b"Full Name,Abbreviation\nTexas,TX\n", "regions")?;
        let err = match left_join(&left, "State/Province", &lookup, "Full Name") {
            Err(e) => e,
            Ok(_) => panic!("join on a missing key must fail"),
        };
        assert!(matches!(err, DashboardError::Schema { .. }));
        Ok(())
    }
}
