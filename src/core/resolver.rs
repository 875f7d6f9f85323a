//! Table filtering and dependency-first creation order.
//!
//! Tables are placed depth-first: a table's `DependsOn` targets are placed
//! before the table itself, and tables without dependencies keep their
//! position in the template. A table is marked visited before its
//! dependencies are walked, so a cycle is cut at the point it is first
//! entered. `CyclePolicy::Reject` turns that cut into an error.

use super::error::{Error, Result};
use super::parser;
use super::types::{CyclePolicy, TableResource, TABLE_RESOURCE_TYPE};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Select the `AWS::DynamoDB::Table` entries of a resource mapping, in template order.
pub fn table_resources(resources: &Map<String, Value>) -> IndexMap<&str, TableResource<'_>> {
    resources
        .iter()
        .filter_map(|(id, resource)| {
            let body = resource.as_object()?;
            if body.get("Type").and_then(Value::as_str) == Some(TABLE_RESOURCE_TYPE) {
                Some((id.as_str(), TableResource::new(id, body)))
            } else {
                debug!(resource = %id, "skipping non-table resource");
                None
            }
        })
        .collect()
}

/// Build the table creation order for a template document.
pub fn order(document: &Value, policy: CyclePolicy) -> Result<Vec<TableResource<'_>>> {
    let resources = parser::resources(document)?;
    let tables = table_resources(resources);

    let mut placement = Placement {
        tables: &tables,
        resources,
        policy,
        visited: HashSet::with_capacity(tables.len()),
        path: Vec::new(),
        ordered: Vec::with_capacity(tables.len()),
    };
    for &id in tables.keys() {
        placement.place(id)?;
    }

    debug!(tables = placement.ordered.len(), "creation order resolved");
    Ok(placement.ordered)
}

/// State of one ordering pass.
struct Placement<'a, 't> {
    tables: &'t IndexMap<&'a str, TableResource<'a>>,
    resources: &'a Map<String, Value>,
    policy: CyclePolicy,
    /// Tables already placed or currently being placed
    visited: HashSet<&'a str>,
    /// Tables currently being placed, outermost first
    path: Vec<&'a str>,
    ordered: Vec<TableResource<'a>>,
}

impl<'a> Placement<'a, '_> {
    fn place(&mut self, id: &'a str) -> Result<()> {
        if self.visited.contains(id) {
            return self.revisit(id);
        }
        let Some(table) = self.tables.get(id).copied() else {
            return Ok(());
        };

        self.visited.insert(id);
        self.path.push(id);

        for dep in table.dependencies()? {
            if self.tables.contains_key(dep) {
                self.place(dep)?;
            } else if self.resources.contains_key(dep) {
                debug!(resource = %id, dependency = %dep, "ignoring dependency on non-table resource");
            } else {
                return Err(table.schema_error(format!("depends on unknown resource '{}'", dep)));
            }
        }

        self.path.pop();
        self.ordered.push(table);
        Ok(())
    }

    /// A visited table still on the path means the walk has come back around a cycle.
    fn revisit(&self, id: &str) -> Result<()> {
        let Some(start) = self.path.iter().position(|&p| p == id) else {
            return Ok(());
        };

        let mut cycle: Vec<String> = self.path[start..].iter().map(|p| p.to_string()).collect();
        cycle.push(id.to_string());

        match self.policy {
            CyclePolicy::Reject => Err(Error::Cycle { path: cycle }),
            CyclePolicy::Truncate => {
                warn!(cycle = %cycle.join(" -> "), "dependency cycle truncated");
                Ok(())
            }
        }
    }
}
