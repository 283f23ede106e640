use crate::dataset::date_parser::{
    clean_str, from_date32, month_abbreviation, month_year_label, parse_cell_date, to_date32,
};
use arrow::array::{
    Array, ArrayRef, Date32Array, Date32Builder, Float64Builder, Int32Builder, StringArray,
    StringBuilder,
};
use chrono::Datelike;
use std::sync::Arc;

/// Text → `Date32`; returns the array plus how many non-empty cells failed to parse.
pub fn to_date_column(text: &StringArray) -> (ArrayRef, usize) {
    let mut builder = Date32Builder::with_capacity(text.len());
    let mut unparsed = 0;
    for cell in text.iter() {
        match cell {
            Some(raw) => match parse_cell_date(raw) {
                Some(date) => builder.append_value(to_date32(date)),
                None => {
                    if !clean_str(raw).is_empty() {
                        unparsed += 1;
                    }
                    builder.append_null();
                }
            },
            None => builder.append_null(),
        }
    }
    (Arc::new(builder.finish()), unparsed)
}

/// Text → `Float64`; empty or non-numeric cells become null.
pub fn to_float_column(text: &StringArray) -> ArrayRef {
    let mut builder = Float64Builder::with_capacity(text.len());
    for cell in text.iter() {
        let value = cell
            .map(|raw| clean_str(raw).replace(',', ""))
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite());
        builder.append_option(value);
    }
    Arc::new(builder.finish())
}

/// Year, month abbreviation and `"<Month> <Year>"` label for every date.
pub struct CalendarColumns {
    pub year: ArrayRef,
    pub month: ArrayRef,
    pub label: ArrayRef,
}

pub fn calendar_columns(dates: &Date32Array) -> CalendarColumns {
    let mut year = Int32Builder::with_capacity(dates.len());
    let mut month = StringBuilder::with_capacity(dates.len(), dates.len() * 3);
    let mut label = StringBuilder::with_capacity(dates.len(), dates.len() * 8);

    for i in 0..dates.len() {
        match dates.is_valid(i).then(|| from_date32(dates.value(i))).flatten() {
            Some(date) => {
                year.append_value(date.year());
                month.append_value(month_abbreviation(date));
                label.append_value(month_year_label(date));
            }
            None => {
                year.append_null();
                month.append_null();
                label.append_null();
            }
        }
    }

    CalendarColumns {
        year: Arc::new(year.finish()),
        month: Arc::new(month.finish()),
        label: Arc::new(label.finish()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int32Array};

    #[test]
    fn dates_count_unparsed_cells_only() {
        let text = StringArray::from(vec![Some("45292"), Some("bogus"), None, Some(" ")]);
        let (dates, unparsed) = to_date_column(&text);
        let dates = dates.as_any().downcast_ref::<Date32Array>().unwrap();

        assert_eq!(unparsed, 1);
        assert_eq!(dates.value(0), 19_723);
        assert!(dates.is_null(1));
        assert!(dates.is_null(2));
        assert!(dates.is_null(3));
    }

    #[test]
    fn floats_tolerate_thousands_separators() {
        let text = StringArray::from(vec![Some("1,234.5"), Some("abc"), None, Some("-2")]);
        let floats = to_float_column(&text);
        let floats = floats.as_any().downcast_ref::<Float64Array>().unwrap();

        assert_eq!(floats.value(0), 1234.5);
        assert!(floats.is_null(1));
        assert!(floats.is_null(2));
        assert_eq!(floats.value(3), -2.0);
    }

    #[test]
    fn calendar_fields_follow_the_date() {
        let dates = Date32Array::from(vec![Some(19_723), None, Some(19_723 + 334)]);
        let cal = calendar_columns(&dates);
        let year = cal.year.as_any().downcast_ref::<Int32Array>().unwrap();
        let month = cal.month.as_any().downcast_ref::<StringArray>().unwrap();
        let label = cal.label.as_any().downcast_ref::<StringArray>().unwrap();

        assert_eq!(year.value(0), 2024);
        assert_eq!(month.value(0), "Jan");
        assert_eq!(label.value(0), "Jan 2024");
        assert!(year.is_null(1) && month.is_null(1) && label.is_null(1));
        assert_eq!(label.value(2), "Nov 2024");
    }
}
