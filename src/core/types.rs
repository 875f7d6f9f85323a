//! Typed views over a loaded CloudFormation template.
//!
//! The template stays a generic `serde_json::Value` so unconsumed fields are
//! carried through untouched. `TableResource` borrows one entry from the
//! `Resources` section and exposes the fields the serializer reads, failing
//! with a schema error when a field has the wrong shape.

use super::error::{Error, Result};
use serde_json::{Map, Value};

/// Type discriminator of DynamoDB table resources.
pub const TABLE_RESOURCE_TYPE: &str = "AWS::DynamoDB::Table";

/// Top-level key holding the resource mapping.
pub const RESOURCES_KEY: &str = "Resources";

/// Region used when none is given on the command line.
pub const DEFAULT_REGION: &str = "us-east-1";

/// DynamoDB Local's default listen address.
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:8000";

// ============================================================================
// Table resources
// ============================================================================

/// A borrowed view over one `AWS::DynamoDB::Table` entry.
#[derive(Debug, Clone, Copy)]
pub struct TableResource<'a> {
    id: &'a str,
    body: &'a Map<String, Value>,
}

impl<'a> TableResource<'a> {
    /// Wrap a resource body. The caller has already checked the type discriminator.
    pub fn new(id: &'a str, body: &'a Map<String, Value>) -> Self {
        Self { id, body }
    }

    /// Logical id of the resource within the template.
    pub fn id(&self) -> &'a str {
        self.id
    }

    /// Logical ids this resource must be created after.
    ///
    /// `DependsOn` may be a single id or a list of ids. An empty string means
    /// no dependency.
    pub fn dependencies(&self) -> Result<Vec<&'a str>> {
        match self.body.get("DependsOn") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(dep)) if dep.is_empty() => Ok(Vec::new()),
            Some(Value::String(dep)) => Ok(vec![dep.as_str()]),
            Some(Value::Array(deps)) => deps
                .iter()
                .map(|dep| match dep {
                    Value::String(s) => Ok(s.as_str()),
                    other => Err(self.mistyped("DependsOn", "a list of strings", other)),
                })
                .filter(|dep| !matches!(dep, Ok("")))
                .collect(),
            Some(other) => Err(self.mistyped("DependsOn", "a string or list of strings", other)),
        }
    }

    /// `Properties.TableName`.
    pub fn table_name(&self) -> Result<&'a str> {
        match self.required_property("TableName")? {
            Value::String(name) => Ok(name.as_str()),
            other => Err(self.mistyped("Properties.TableName", "a string", other)),
        }
    }

    /// `Properties.AttributeDefinitions`.
    pub fn attribute_definitions(&self) -> Result<&'a [Value]> {
        let value = self.required_property("AttributeDefinitions")?;
        self.as_list("Properties.AttributeDefinitions", value)
    }

    /// `Properties.KeySchema`.
    pub fn key_schema(&self) -> Result<&'a [Value]> {
        let value = self.required_property("KeySchema")?;
        self.as_list("Properties.KeySchema", value)
    }

    /// `Properties.LocalSecondaryIndexes`, if declared.
    pub fn local_secondary_indexes(&self) -> Result<Option<&'a [Value]>> {
        self.optional_list("LocalSecondaryIndexes")
    }

    /// `Properties.GlobalSecondaryIndexes`, if declared.
    pub fn global_secondary_indexes(&self) -> Result<Option<&'a [Value]>> {
        self.optional_list("GlobalSecondaryIndexes")
    }

    /// `Properties.ProvisionedThroughput`, if declared.
    pub fn provisioned_throughput(&self) -> Result<Option<&'a Map<String, Value>>> {
        match self.properties()?.get("ProvisionedThroughput") {
            None => Ok(None),
            Some(Value::Object(pt)) => Ok(Some(pt)),
            Some(other) => Err(self.mistyped(
                "Properties.ProvisionedThroughput",
                "an object",
                other,
            )),
        }
    }

    /// Build a schema error attributed to this resource.
    pub fn schema_error(&self, message: impl Into<String>) -> Error {
        Error::schema(self.id, message)
    }

    fn properties(&self) -> Result<&'a Map<String, Value>> {
        match self.body.get("Properties") {
            Some(Value::Object(props)) => Ok(props),
            Some(other) => Err(self.mistyped("Properties", "an object", other)),
            None => Err(self.schema_error("missing Properties")),
        }
    }

    fn required_property(&self, key: &str) -> Result<&'a Value> {
        self.properties()?
            .get(key)
            .ok_or_else(|| self.schema_error(format!("missing Properties.{}", key)))
    }

    fn optional_list(&self, key: &str) -> Result<Option<&'a [Value]>> {
        match self.properties()?.get(key) {
            None => Ok(None),
            Some(value) => self
                .as_list(&format!("Properties.{}", key), value)
                .map(Some),
        }
    }

    fn as_list(&self, field: &str, value: &'a Value) -> Result<&'a [Value]> {
        match value {
            Value::Array(items) => Ok(items.as_slice()),
            other => Err(self.mistyped(field, "a list", other)),
        }
    }

    fn mistyped(&self, field: &str, expected: &str, found: &Value) -> Error {
        self.schema_error(format!(
            "{} must be {}, found {}",
            field,
            expected,
            kind_of(found)
        ))
    }
}

/// Short name of a value's kind, for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Options
// ============================================================================

/// What to do when `DependsOn` edges form a cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CyclePolicy {
    /// Break the cycle where it is first entered and keep going.
    #[default]
    Truncate,
    /// Fail with a cycle error.
    Reject,
}

/// Target of the generated commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Region passed to `--region`
    pub region: String,

    /// Emulator address passed to `--endpoint-url`
    pub endpoint_url: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test body must be an object"),
        }
    }

    #[test]
    fn test_dependencies_absent() {
        let b = body(json!({"Type": TABLE_RESOURCE_TYPE}));
        let t = TableResource::new("t", &b);
        assert!(t.dependencies().unwrap().is_empty());
    }

    #[test]
    fn test_dependencies_single_and_empty() {
        let b = body(json!({"DependsOn": "other"}));
        assert_eq!(TableResource::new("t", &b).dependencies().unwrap(), vec!["other"]);

        let b = body(json!({"DependsOn": ""}));
        assert!(TableResource::new("t", &b).dependencies().unwrap().is_empty());
    }

    #[test]
    fn test_dependencies_list() {
        let b = body(json!({"DependsOn": ["a", "", "b"]}));
        assert_eq!(TableResource::new("t", &b).dependencies().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_dependencies_mistyped() {
        let b = body(json!({"DependsOn": 7}));
        let err = TableResource::new("t", &b).dependencies().unwrap_err();
        assert!(err.to_string().contains("DependsOn must be a string or list of strings"));
    }

    #[test]
    fn test_table_name_missing() {
        let b = body(json!({"Properties": {}}));
        let err = TableResource::new("t", &b).table_name().unwrap_err();
        assert!(matches!(err, Error::Schema { .. }));
        assert!(err.to_string().contains("missing Properties.TableName"));
    }

    #[test]
    fn test_table_name_not_string() {
        let b = body(json!({"Properties": {"TableName": {"Ref": "Name"}}}));
        let err = TableResource::new("t", &b).table_name().unwrap_err();
        assert!(err.to_string().contains("must be a string, found an object"));
    }

    #[test]
    fn test_missing_properties() {
        let b = body(json!({"Type": TABLE_RESOURCE_TYPE}));
        let err = TableResource::new("t", &b).key_schema().unwrap_err();
        assert!(err.to_string().contains("missing Properties"));
    }

    #[test]
    fn test_optional_lists() {
        let b = body(json!({"Properties": {"GlobalSecondaryIndexes": []}}));
        let t = TableResource::new("t", &b);
        assert!(t.local_secondary_indexes().unwrap().is_none());
        assert_eq!(t.global_secondary_indexes().unwrap().map(<[Value]>::len), Some(0));
    }

    #[test]
    fn test_provisioned_throughput_mistyped() {
        let b = body(json!({"Properties": {"ProvisionedThroughput": [1, 2]}}));
        let err = TableResource::new("t", &b).provisioned_throughput().unwrap_err();
        assert!(err.to_string().contains("must be an object, found a list"));
    }

    #[test]
    fn test_render_options_default() {
        let opts = RenderOptions::default();
        assert_eq!(opts.region, "us-east-1");
        assert_eq!(opts.endpoint_url, "http://localhost:8000");
    }
}
