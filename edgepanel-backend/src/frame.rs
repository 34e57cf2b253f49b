use chrono::{DateTime, Utc};
use edgepanel_core::{
    data::{Field, FieldValues, Frame},
    err::{bail, Context, Result},
};
use serde_json::Value;

use crate::Row;

/// Name of the frame produced for each query
pub const RESPONSE_FRAME_NAME: &str = "response";

/// Key whose values are parsed as the frame's time column
pub const TIME_FIELD: &str = "time";

/// Converts the query's result rows into a single data frame.
///
/// The columns are determined by the first row, ordered by key. Values
/// of `time` must be RFC3339 timestamps, numbers map to float columns
/// and strings to text columns. Keys holding any other type are skipped.
/// An empty result set produces no frame.
pub fn rows_to_frame(rows: &[Row]) -> Result<Option<Frame>> {
    let first = match rows.first() {
        Some(first) => first,
        None => return Ok(None),
    };

    let mut keys = first.keys().collect::<Vec<_>>();
    keys.sort();

    let mut frame = Frame::new(RESPONSE_FRAME_NAME);

    for key in keys {
        let values = match (key.as_str(), &first[key]) {
            (TIME_FIELD, _) => FieldValues::Time(column(rows, key, parse_time)?),
            (_, Value::Number(_)) => FieldValues::Float64(column(rows, key, as_f64)?),
            (_, Value::String(_)) => FieldValues::Utf8(column(rows, key, as_string)?),
            _ => continue,
        };

        frame = frame.with_field(Field::new(key.clone(), values));
    }

    Ok(Some(frame))
}

fn column<T>(rows: &[Row], key: &str, conv: impl Fn(&Value) -> Result<T>) -> Result<Vec<T>> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| match row.get(key) {
            Some(val) => {
                conv(val).with_context(|| format!("Invalid value for '{}' in row {}", key, idx))
            }
            None => bail!("Missing value for '{}' in row {}", key, idx),
        })
        .collect()
}

fn parse_time(val: &Value) -> Result<DateTime<Utc>> {
    let str = match val {
        Value::String(str) => str,
        other => bail!("Expected RFC3339 timestamp string, found: {}", other),
    };

    Ok(DateTime::parse_from_rfc3339(str)
        .with_context(|| format!("Failed to parse time '{}'", str))?
        .with_timezone(&Utc))
}

fn as_f64(val: &Value) -> Result<f64> {
    val.as_f64()
        .with_context(|| format!("Expected number, found: {}", val))
}

fn as_string(val: &Value) -> Result<String> {
    match val {
        Value::String(str) => Ok(str.clone()),
        other => bail!("Expected string, found: {}", other),
    }
}
