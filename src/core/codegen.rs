//! Command generation: render a table resource as `aws dynamodb create-table`.
//!
//! Flags are emitted in a fixed order and every JSON fragment has its object
//! keys sorted, so the same template always yields the same text. Capacity
//! units are coerced to integers in a fresh copy; the template is never
//! modified.

use super::error::Result;
use super::types::{kind_of, TableResource};
use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use std::io;

/// Command every rendered line starts with.
pub const CREATE_TABLE: &str = "aws dynamodb create-table";

const CAPACITY_FIELDS: [&str; 2] = ["ReadCapacityUnits", "WriteCapacityUnits"];

/// Render the create-table command for one table, terminated by a newline.
pub fn render(table: &TableResource<'_>, region: &str, endpoint_url: &str) -> Result<String> {
    let mut command = format!(
        "{} --region {} --endpoint-url {}",
        CREATE_TABLE, region, endpoint_url
    );

    command.push_str(" --table-name ");
    command.push_str(table.table_name()?);

    let attributes = table.attribute_definitions()?;
    if !attributes.is_empty() {
        push_json(&mut command, table, "--attribute-definitions", &sorted_list(attributes))?;
    }

    let key_schema = table.key_schema()?;
    if !key_schema.is_empty() {
        push_json(&mut command, table, "--key-schema", &sorted_list(key_schema))?;
    }

    if let Some(indexes) = table.local_secondary_indexes()? {
        push_indexes(&mut command, table, "--local-secondary-indexes", indexes)?;
    }
    if let Some(indexes) = table.global_secondary_indexes()? {
        push_indexes(&mut command, table, "--global-secondary-indexes", indexes)?;
    }

    if let Some(throughput) = table.provisioned_throughput()? {
        let coerced = provisioned_throughput(table, throughput)?;
        push_json(&mut command, table, "--provisioned-throughput", &coerced)?;
    }

    command.push('\n');
    Ok(command)
}

fn push_indexes(
    command: &mut String,
    table: &TableResource<'_>,
    flag: &str,
    indexes: &[Value],
) -> Result<()> {
    if indexes.is_empty() {
        return Ok(());
    }
    let coerced = indexes
        .iter()
        .map(|index| secondary_index(table, index))
        .collect::<Result<Vec<_>>>()?;
    push_json(command, table, flag, &Value::Array(coerced))
}

/// Append ` <flag> '<json>'`.
fn push_json(command: &mut String, table: &TableResource<'_>, flag: &str, value: &Value) -> Result<()> {
    let json = encode(value).map_err(|e| table.schema_error(format!("cannot encode {}: {}", flag, e)))?;
    command.push(' ');
    command.push_str(flag);
    command.push_str(" '");
    // Close the quote, emit an escaped quote, reopen.
    command.push_str(&json.replace('\'', r"'\''"));
    command.push('\'');
    Ok(())
}

/// Copy of an index definition with its throughput, if any, coerced.
fn secondary_index(table: &TableResource<'_>, index: &Value) -> Result<Value> {
    let mut out = sorted(index);
    if let Value::Object(fields) = &mut out {
        if let Some(throughput) = fields.get_mut("ProvisionedThroughput") {
            let coerced = match &*throughput {
                Value::Object(pt) => provisioned_throughput(table, pt)?,
                other => {
                    return Err(table.schema_error(format!(
                        "index ProvisionedThroughput must be an object, found {}",
                        kind_of(other)
                    )))
                }
            };
            *throughput = coerced;
        }
    }
    Ok(out)
}

/// Sorted copy of a throughput record with both capacity fields as integers.
fn provisioned_throughput(table: &TableResource<'_>, throughput: &Map<String, Value>) -> Result<Value> {
    let mut out = sorted_object(throughput);
    for field in CAPACITY_FIELDS {
        let raw = out
            .get(field)
            .ok_or_else(|| table.schema_error(format!("ProvisionedThroughput missing {}", field)))?;
        let units = capacity(raw).ok_or_else(|| {
            table.schema_error(format!("{} must be an integer, found {}", field, describe(raw)))
        })?;
        out.insert(field.to_string(), Value::from(units));
    }
    Ok(Value::Object(out))
}

/// Capacity units declared as a number or a numeric string.
fn capacity(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        other => kind_of(other).to_string(),
    }
}

/// Deep copy with every object's keys in sorted order. Array order is kept.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        Value::Object(fields) => Value::Object(sorted_object(fields)),
        scalar => scalar.clone(),
    }
}

fn sorted_list(items: &[Value]) -> Value {
    Value::Array(items.iter().map(sorted).collect())
}

fn sorted_object(fields: &Map<String, Value>) -> Map<String, Value> {
    let mut keys: Vec<&String> = fields.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|k| (k.clone(), sorted(&fields[k.as_str()])))
        .collect()
}

/// Single-line JSON with `", "` and `": "` separators and non-ASCII escaped.
fn encode(value: &Value) -> std::result::Result<String, serde_json::Error> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    value.serialize(&mut serializer)?;
    // Every byte written is ASCII.
    Ok(out.into_iter().map(char::from).collect())
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if (' '..='~').contains(&ch) {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units).iter() {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}
