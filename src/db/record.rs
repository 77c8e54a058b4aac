use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Map, Number, Value};
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::db::DbError;

/// One result row: column name to JSON value, in select-list order
pub type RowRecord = Map<String, Value>;

/// Convert a row of any shape into a [`RowRecord`].
///
/// Numbers and strings map directly. Anything without a JSON counterpart
/// (DECIMAL, dates and times, non-finite floats, binary) becomes its string form.
pub fn row_to_record(row: &MySqlRow) -> Result<RowRecord, DbError> {
    let mut record = RowRecord::new();

    for column in row.columns() {
        let value = column_value(row, column.ordinal()).map_err(|source| DbError::Conversion {
            column: column.name().to_string(),
            type_name: column.type_info().name().to_string(),
            source,
        })?;
        record.insert(column.name().to_string(), value);
    }

    Ok(record)
}

fn column_value(row: &MySqlRow, index: usize) -> Result<Value, sqlx::Error> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    let type_info = row.columns()[index].type_info();
    let type_name = type_info.name();

    let value = match type_name {
        "BOOLEAN" => Value::Bool(row.try_get::<bool, _>(index)?),
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" | "YEAR" => Value::from(row.try_get_unchecked::<u64, _>(index)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::from(row.try_get_unchecked::<i64, _>(index)?)
        }
        "FLOAT" => float_value(f64::from(row.try_get::<f32, _>(index)?)),
        "DOUBLE" => float_value(row.try_get::<f64, _>(index)?),
        // Sent as a decimal string on the wire; keep it exact
        "DECIMAL" => Value::String(row.try_get_unchecked::<String, _>(index)?),
        "DATE" => Value::String(row.try_get::<NaiveDate, _>(index)?.to_string()),
        "DATETIME" | "TIMESTAMP" => {
            Value::String(row.try_get::<NaiveDateTime, _>(index)?.to_string())
        }
        "TIME" => Value::String(row.try_get::<NaiveTime, _>(index)?.to_string()),
        "JSON" => {
            let raw = row.try_get_unchecked::<String, _>(index)?;
            serde_json::from_str(&raw).unwrap_or(Value::String(raw))
        }
        _ => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
    };

    Ok(value)
}

fn float_value(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(value.to_string()))
}
