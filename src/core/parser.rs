//! Template loading and format detection.
//!
//! Templates are read as YAML first, falling back to JSON. JSON documents that
//! YAML rejects (tab indentation, for example) still load through the fallback.
//! YAML short-form intrinsics (`!Ref`, `!GetAtt`, `!Sub`, ...) are rewritten to
//! their long JSON form so both encodings produce the same document.

use super::error::{Error, Result};
use super::types::RESOURCES_KEY;
use serde_json::{Map, Value};
use serde_yaml_ng::value::TaggedValue;
use std::path::Path;
use tracing::debug;

/// Parse a template file from disk.
pub fn parse_template_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    parse_template(&content, path)
}

/// Parse template text. `origin` is only used in error messages.
pub fn parse_template(content: &str, origin: &Path) -> Result<Value> {
    let yaml_err = match serde_yaml_ng::from_str::<serde_yaml_ng::Value>(content) {
        Ok(doc) => {
            debug!(path = %origin.display(), "template parsed as YAML");
            return yaml_to_json(doc);
        }
        Err(e) => e,
    };

    match serde_json::from_str::<Value>(content) {
        Ok(doc) => {
            debug!(path = %origin.display(), "template parsed as JSON");
            Ok(doc)
        }
        Err(json_err) => Err(Error::Format {
            path: origin.to_path_buf(),
            yaml: yaml_err.to_string(),
            json: json_err.to_string(),
        }),
    }
}

/// The template's `Resources` mapping.
pub fn resources(document: &Value) -> Result<&Map<String, Value>> {
    let root = match document {
        Value::Object(root) => root,
        _ => return Err(Error::Parse("top level must be a mapping".to_string())),
    };
    match root.get(RESOURCES_KEY) {
        Some(Value::Object(resources)) => Ok(resources),
        Some(_) => Err(Error::Parse(format!("{} must be a mapping", RESOURCES_KEY))),
        None => Err(Error::Parse(format!("missing {} section", RESOURCES_KEY))),
    }
}

/// Convert a YAML document into the JSON value model.
fn yaml_to_json(value: serde_yaml_ng::Value) -> Result<Value> {
    use serde_yaml_ng::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                object.insert(mapping_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => intrinsic(*tagged)?,
    })
}

fn mapping_key(key: serde_yaml_ng::Value) -> Result<String> {
    use serde_yaml_ng::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        _ => Err(Error::Parse("mapping keys must be scalars".to_string())),
    }
}

/// Expand a short-form intrinsic such as `!Ref Name` into `{"Ref": "Name"}`.
fn intrinsic(tagged: TaggedValue) -> Result<Value> {
    let tag = tagged.tag.to_string();
    let name = tag.trim_start_matches('!');
    let key = match name {
        "Ref" | "Condition" => name.to_string(),
        _ => format!("Fn::{}", name),
    };

    let value = match (name, yaml_to_json(tagged.value)?) {
        // `!GetAtt Resource.Attribute` is shorthand for a two-element list.
        ("GetAtt", Value::String(s)) => match s.split_once('.') {
            Some((resource, attribute)) => Value::Array(vec![
                Value::String(resource.to_string()),
                Value::String(attribute.to_string()),
            ]),
            None => Value::String(s),
        },
        (_, value) => value,
    };

    let mut object = Map::with_capacity(1);
    object.insert(key, value);
    Ok(Value::Object(object))
}
