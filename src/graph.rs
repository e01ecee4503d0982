// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Graph and Template Primitives
//!
//! A [`ResourceGraph`] maps logical identifiers to [`ResourceDefinition`]s.
//! Cross-references between definitions are symbolic (`Ref` /
//! `Fn::GetAtt` markers); concrete values are resolved by the downstream
//! provisioning engine. Partial graphs produced by the builders are merged
//! with an explicit disjointness check, and the finished graph is validated
//! for referential completeness before it leaves the synthesizer.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{TopologyError, TopologyResult};

/// A single declarative resource definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDefinition {
    #[serde(rename = "Type")]
    pub resource_type: String,

    #[serde(rename = "DependsOn", skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Value>,

    #[serde(rename = "CreationPolicy", skip_serializing_if = "Option::is_none")]
    pub creation_policy: Option<Value>,

    #[serde(rename = "DeletionPolicy", skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<String>,

    #[serde(rename = "Properties")]
    pub properties: Value,
}

impl ResourceDefinition {
    /// Create a definition with the given declared type and property bag
    pub fn new(resource_type: impl Into<String>, properties: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            depends_on: None,
            creation_policy: None,
            deletion_policy: None,
            properties,
        }
    }

    /// Declare an explicit dependency on another logical identifier
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends_on = Some(Value::String(name.into()));
        self
    }

    /// Attach a creation policy
    pub fn creation_policy(mut self, policy: Value) -> Self {
        self.creation_policy = Some(policy);
        self
    }

    /// Attach a deletion policy
    pub fn deletion_policy(mut self, policy: impl Into<String>) -> Self {
        self.deletion_policy = Some(policy.into());
        self
    }
}

/// An exported stack output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "Value")]
    pub value: Value,

    #[serde(rename = "Export", skip_serializing_if = "Option::is_none")]
    pub export: Option<Value>,
}

impl Output {
    pub fn new(description: impl Into<String>, value: Value) -> Self {
        Self {
            description: description.into(),
            value,
            export: None,
        }
    }
}

/// A template input parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub parameter_type: String,

    #[serde(rename = "Default", skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// The accumulated logical-identifier to definition mapping for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResourceGraph {
    resources: BTreeMap<String, ResourceDefinition>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph holding a single named definition
    pub fn of(name: impl Into<String>, definition: ResourceDefinition) -> Self {
        let mut graph = Self::new();
        graph.insert(name, definition);
        graph
    }

    pub fn insert(&mut self, name: impl Into<String>, definition: ResourceDefinition) {
        self.resources.insert(name.into(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&ResourceDefinition> {
        self.resources.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ResourceDefinition)> {
        self.resources.iter()
    }

    /// Logical identifiers of every resource with the given declared type
    pub fn of_type<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.resources
            .iter()
            .filter(move |(_, def)| def.resource_type == resource_type)
            .map(|(name, _)| name.as_str())
    }

    /// Union this graph with another partial graph
    ///
    /// Partial graphs are disjoint by construction (identifier prefixes are
    /// partitioned across builders); a key collision therefore signals an
    /// internal invariant failure, never something to overwrite.
    pub fn merge(&mut self, other: ResourceGraph) -> TopologyResult<()> {
        for (name, definition) in other.resources {
            if self.resources.contains_key(&name) {
                return Err(TopologyError::InvariantViolation(format!(
                    "duplicate logical identifier during graph merge: {name}"
                )));
            }
            self.resources.insert(name, definition);
        }
        Ok(())
    }

    /// Verify that every symbolic reference resolves within the graph
    ///
    /// References may also target the given external identifiers (template
    /// parameters) or `AWS::*` pseudo parameters. A dangling reference is a
    /// construction defect.
    pub fn validate_references(&self, external: &BTreeSet<String>) -> TopologyResult<()> {
        for (name, definition) in &self.resources {
            let mut targets = Vec::new();
            collect_references(&definition.properties, &mut targets);
            if let Some(depends_on) = &definition.depends_on {
                collect_depends_on(depends_on, &mut targets);
            }

            for target in targets {
                let resolves = self.resources.contains_key(&target)
                    || external.contains(&target)
                    || target.starts_with("AWS::");
                if !resolves {
                    return Err(TopologyError::InvariantViolation(format!(
                        "dangling reference from {name} to {target}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl IntoIterator for ResourceGraph {
    type Item = (String, ResourceDefinition);
    type IntoIter = std::collections::btree_map::IntoIter<String, ResourceDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}

fn collect_references(value: &Value, targets: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(name)) = map.get("Ref") {
                    targets.push(name.clone());
                    return;
                }
                if let Some(Value::Array(parts)) = map.get("Fn::GetAtt") {
                    if let Some(Value::String(name)) = parts.first() {
                        targets.push(name.clone());
                    }
                    return;
                }
            }
            for nested in map.values() {
                collect_references(nested, targets);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_references(item, targets);
            }
        }
        _ => {}
    }
}

fn collect_depends_on(value: &Value, targets: &mut Vec<String>) {
    match value {
        Value::String(name) => targets.push(name.clone()),
        Value::Array(items) => {
            for item in items {
                collect_depends_on(item, targets);
            }
        }
        _ => {}
    }
}

/// Symbolic reference to another definition's logical identifier
pub fn reference(name: impl Into<String>) -> Value {
    json!({ "Ref": name.into() })
}

/// Symbolic attribute lookup on another definition
pub fn get_att(name: impl Into<String>, attribute: impl Into<String>) -> Value {
    json!({ "Fn::GetAtt": [name.into(), attribute.into()] })
}

/// Symbolic string join
pub fn join(separator: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [separator, parts] })
}

/// A `Name` tag joining the stack name with the given suffix parts
pub fn name_tag(suffixes: &[&str]) -> Value {
    if suffixes.is_empty() {
        return json!({ "Key": "Name", "Value": reference(crate::naming::STACK_NAME) });
    }
    let mut parts = vec![reference(crate::naming::STACK_NAME)];
    parts.extend(suffixes.iter().map(|s| Value::String((*s).to_string())));
    json!({ "Key": "Name", "Value": join("-", parts) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn subnet_definition() -> ResourceDefinition {
        ResourceDefinition::new(
            "AWS::EC2::Subnet",
            json!({ "VpcId": reference("VPC"), "CidrBlock": "10.0.0.0/20" }),
        )
    }

    #[test]
    fn test_serializes_to_template_shape() {
        let definition = subnet_definition();
        let value = serde_json::to_value(&definition).unwrap();
        assert_eq!(
            value,
            json!({
                "Type": "AWS::EC2::Subnet",
                "Properties": {
                    "VpcId": { "Ref": "VPC" },
                    "CidrBlock": "10.0.0.0/20",
                },
            })
        );
    }

    #[test]
    fn test_depends_on_and_policies_serialize_when_present() {
        let definition = ResourceDefinition::new("AWS::EC2::Instance", json!({}))
            .depends_on("InternetGatewayAttachment")
            .deletion_policy("Retain");
        let value = serde_json::to_value(&definition).unwrap();
        assert_eq!(value["DependsOn"], json!("InternetGatewayAttachment"));
        assert_eq!(value["DeletionPolicy"], json!("Retain"));
        assert!(value.get("CreationPolicy").is_none());
    }

    #[test]
    fn test_merge_rejects_duplicate_identifiers() {
        let mut graph = ResourceGraph::of("PublicSubnet1", subnet_definition());
        let clashing = ResourceGraph::of("PublicSubnet1", subnet_definition());

        let err = graph.merge(clashing).unwrap_err();
        assert!(matches!(err, TopologyError::InvariantViolation(_)));
    }

    #[test]
    fn test_merge_unions_disjoint_graphs() {
        let mut graph = ResourceGraph::of("PublicSubnet1", subnet_definition());
        graph
            .merge(ResourceGraph::of("AppSubnet1", subnet_definition()))
            .unwrap();
        assert_eq!(graph.len(), 2);
        assert!(graph.contains("PublicSubnet1"));
        assert!(graph.contains("AppSubnet1"));
    }

    #[test]
    fn test_validate_references_detects_dangling() {
        let graph = ResourceGraph::of("AppSubnet1", subnet_definition());
        let err = graph.validate_references(&BTreeSet::new()).unwrap_err();
        assert_eq!(
            err,
            TopologyError::InvariantViolation(
                "dangling reference from AppSubnet1 to VPC".to_string()
            )
        );
    }

    #[test]
    fn test_validate_references_resolves_parameters_and_pseudo() {
        let mut graph = ResourceGraph::of(
            "Instance",
            ResourceDefinition::new(
                "AWS::EC2::Instance",
                json!({
                    "ImageId": reference("LatestAmiId"),
                    "Tags": [name_tag(&["nat"])],
                }),
            ),
        );
        graph.insert(
            "VPC",
            ResourceDefinition::new("AWS::EC2::VPC", json!({})),
        );

        let external = BTreeSet::from(["LatestAmiId".to_string()]);
        graph.validate_references(&external).unwrap();
    }

    #[test]
    fn test_get_att_references_are_collected() {
        let graph = ResourceGraph::of(
            "NatGateway1",
            ResourceDefinition::new(
                "AWS::EC2::NatGateway",
                json!({ "AllocationId": get_att("EIP1", "AllocationId") }),
            ),
        );
        let err = graph.validate_references(&BTreeSet::new()).unwrap_err();
        assert!(err.to_string().contains("EIP1"));
    }
}
