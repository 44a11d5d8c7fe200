//! Stacks: a provider, resource nodes and named outputs.
//!
//! Resources are added in dependency order. Every reference a resource holds
//! must point at a node already in the stack, so a stack can never contain a
//! dangling reference and the resulting graph is acyclic by construction.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use super::graph::{DependencyKind, GraphResult, ResourceDependency, ResourceGraph};
use crate::error::{Error, Result};
use crate::expr::{is_valid_identifier, Expr, Reference, ResourceAddress};
use crate::resources::provider::PROVIDER_SOURCE;
use crate::resources::{AwsProvider, Resource};

/// Handle to a resource declared in a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    address: ResourceAddress,
}

impl ResourceRef {
    /// Address of the resource.
    pub fn address(&self) -> &ResourceAddress {
        &self.address
    }

    /// Reference to one of its attributes.
    pub fn attr(&self, attribute: &str) -> Reference {
        self.address.attr(attribute)
    }

    /// Reference to its `id`.
    pub fn id(&self) -> Reference {
        self.attr("id")
    }

    /// Reference to its `arn`.
    pub fn arn(&self) -> Reference {
        self.attr("arn")
    }
}

/// A dependency recorded on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDependency {
    /// Resource that must exist first
    pub target: ResourceAddress,
    /// How the dependency was introduced
    pub kind: DependencyKind,
    /// Referenced attribute, for reference dependencies
    pub attribute: Option<String>,
}

/// One declared resource with its rendered properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    address: ResourceAddress,
    properties: Value,
    dependencies: Vec<NodeDependency>,
}

impl ResourceNode {
    /// Address of the resource.
    pub fn address(&self) -> &ResourceAddress {
        &self.address
    }

    /// Terraform attribute map.
    pub fn properties(&self) -> &Value {
        &self.properties
    }

    /// One property by name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Dependencies in declaration order.
    pub fn dependencies(&self) -> &[NodeDependency] {
        &self.dependencies
    }

    /// Addresses listed under `depends_on`.
    pub fn explicit_dependencies(&self) -> impl Iterator<Item = &ResourceAddress> {
        self.dependencies
            .iter()
            .filter(|d| d.kind == DependencyKind::Explicit)
            .map(|d| &d.target)
    }

    fn to_terraform(&self) -> Value {
        let mut body = self.properties.clone();
        let explicit: Vec<String> = self
            .explicit_dependencies()
            .map(ToString::to_string)
            .collect();
        if !explicit.is_empty() {
            if let Some(map) = body.as_object_mut() {
                map.insert("depends_on".to_string(), json!(explicit));
            }
        }
        body
    }
}

/// A named output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// Output value
    pub value: Expr,
    /// Optional description
    pub description: Option<String>,
}

/// A self-contained group of resources sharing one provider.
#[derive(Debug, Clone)]
pub struct Stack {
    name: String,
    provider: AwsProvider,
    resources: IndexMap<ResourceAddress, ResourceNode>,
    outputs: IndexMap<String, Output>,
}

impl Stack {
    /// Create an empty stack.
    pub fn new(name: impl Into<String>, provider: AwsProvider) -> Result<Self> {
        let name = name.into();
        if !is_valid_identifier(&name) {
            return Err(Error::InvalidIdentifier(name));
        }
        info!(stack = %name, region = %provider.region, "Creating stack");
        Ok(Self {
            name,
            provider,
            resources: IndexMap::new(),
            outputs: IndexMap::new(),
        })
    }

    /// Stack name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Provider configuration.
    pub fn provider(&self) -> &AwsProvider {
        &self.provider
    }

    /// Declare a resource.
    pub fn add_resource<R: Resource>(&mut self, logical_id: &str, resource: R) -> Result<ResourceRef> {
        self.add_resource_with_deps(logical_id, resource, &[])
    }

    /// Declare a resource that must also wait for `depends_on`.
    pub fn add_resource_with_deps<R: Resource>(
        &mut self,
        logical_id: &str,
        resource: R,
        depends_on: &[&ResourceRef],
    ) -> Result<ResourceRef> {
        let address = ResourceAddress::new(R::TYPE, logical_id)?;
        if self.resources.contains_key(&address) {
            return Err(Error::DuplicateResource {
                stack: self.name.clone(),
                address: address.to_string(),
            });
        }
        resource.validate()?;

        let mut dependencies: Vec<NodeDependency> = Vec::new();
        for reference in resource.references() {
            self.ensure_declared(&address.to_string(), &reference.target)?;
            let dep = NodeDependency {
                target: reference.target.clone(),
                kind: DependencyKind::Reference,
                attribute: Some(reference.attribute.clone()),
            };
            if !dependencies.contains(&dep) {
                dependencies.push(dep);
            }
        }
        for handle in depends_on {
            self.ensure_declared(&address.to_string(), handle.address())?;
            dependencies.push(NodeDependency {
                target: handle.address().clone(),
                kind: DependencyKind::Explicit,
                attribute: None,
            });
        }

        let properties = serde_json::to_value(&resource)?;
        debug!(
            stack = %self.name,
            resource = %address,
            dependencies = dependencies.len(),
            "Declared resource"
        );

        let node = ResourceNode {
            address: address.clone(),
            properties,
            dependencies,
        };
        self.resources.insert(address.clone(), node);
        Ok(ResourceRef { address })
    }

    /// Register a named output.
    pub fn add_output(&mut self, name: &str, value: impl Into<Expr>) -> Result<()> {
        self.add_output_with_description(name, value, None)
    }

    /// Register a named output with a description.
    pub fn add_output_with_description(
        &mut self,
        name: &str,
        value: impl Into<Expr>,
        description: Option<String>,
    ) -> Result<()> {
        if !is_valid_identifier(name) {
            return Err(Error::InvalidIdentifier(name.to_string()));
        }
        if self.outputs.contains_key(name) {
            return Err(Error::DuplicateOutput {
                stack: self.name.clone(),
                name: name.to_string(),
            });
        }
        let value = value.into();
        for reference in value.references() {
            self.ensure_declared(&format!("output.{name}"), &reference.target)?;
        }
        debug!(stack = %self.name, output = name, "Registered output");
        self.outputs.insert(
            name.to_string(),
            Output { value, description },
        );
        Ok(())
    }

    fn ensure_declared(&self, from: &str, target: &ResourceAddress) -> Result<()> {
        if self.resources.contains_key(target) {
            Ok(())
        } else {
            Err(Error::UnknownReference {
                stack: self.name.clone(),
                from: from.to_string(),
                target: target.to_string(),
            })
        }
    }

    /// Resources in declaration order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceNode> {
        self.resources.values()
    }

    /// Look up a resource by type and logical id.
    pub fn resource(&self, resource_type: &str, logical_id: &str) -> Option<&ResourceNode> {
        self.resources.values().find(|n| {
            n.address.resource_type == resource_type && n.address.logical_id == logical_id
        })
    }

    /// Number of resources.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Outputs in registration order.
    pub fn outputs(&self) -> impl Iterator<Item = (&str, &Output)> {
        self.outputs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// One output by name.
    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs.get(name)
    }

    /// Build the dependency graph of this stack.
    pub fn dependency_graph(&self) -> GraphResult<ResourceGraph> {
        let mut graph = ResourceGraph::new();
        for node in self.resources.values() {
            graph.add_node(node.address.clone());
        }
        for node in self.resources.values() {
            for dep in &node.dependencies {
                let mut edge = ResourceDependency::new(
                    dep.target.to_string(),
                    node.address.to_string(),
                    dep.kind,
                );
                if let Some(attribute) = &dep.attribute {
                    edge = edge.with_attribute(attribute.clone());
                }
                graph.add_dependency(edge)?;
            }
        }
        Ok(graph)
    }

    /// Checks the stack is ready for synthesis.
    pub fn validate(&self) -> Result<()> {
        if self.resources.is_empty() {
            return Err(Error::invalid_resource(
                self.name.clone(),
                "stack declares no resources",
            ));
        }
        self.dependency_graph()?.get_execution_order()?;
        Ok(())
    }

    /// Render the stack as a Terraform JSON document.
    pub fn to_terraform_json(&self) -> Result<Value> {
        let mut resources = Map::new();
        for node in self.resources.values() {
            let by_type = resources
                .entry(node.address.resource_type.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(map) = by_type.as_object_mut() {
                map.insert(node.address.logical_id.clone(), node.to_terraform());
            }
        }

        let mut outputs = Map::new();
        for (name, output) in &self.outputs {
            let mut body = Map::new();
            body.insert("value".to_string(), serde_json::to_value(&output.value)?);
            if let Some(description) = &output.description {
                body.insert("description".to_string(), json!(description));
            }
            outputs.insert(name.clone(), Value::Object(body));
        }

        let mut document = Map::new();
        document.insert(
            "terraform".to_string(),
            json!({
                "required_providers": {
                    "aws": {
                        "source": PROVIDER_SOURCE,
                        "version": self.provider.version,
                    }
                }
            }),
        );
        document.insert(
            "provider".to_string(),
            json!({ "aws": [serde_json::to_value(&self.provider)?] }),
        );
        document.insert("resource".to_string(), Value::Object(resources));
        if !outputs.is_empty() {
            document.insert("output".to_string(), Value::Object(outputs));
        }
        Ok(Value::Object(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{FlowLog, S3Bucket, S3BucketVersioning, VersioningStatus};

    fn stack() -> Stack {
        Stack::new("test-stack", AwsProvider::default()).unwrap()
    }

    #[test]
    fn test_invalid_stack_name() {
        assert!(Stack::new("bad name", AwsProvider::default()).is_err());
    }

    #[test]
    fn test_add_resource_records_reference() {
        let mut stack = stack();
        let bucket = stack.add_resource("bucket", S3Bucket::new("my-bucket")).unwrap();
        stack
            .add_resource(
                "versioning",
                S3BucketVersioning::new(bucket.id(), VersioningStatus::Disabled),
            )
            .unwrap();

        let node = stack.resource("aws_s3_bucket_versioning", "versioning").unwrap();
        assert_eq!(node.dependencies().len(), 1);
        assert_eq!(node.dependencies()[0].target, *bucket.address());
        assert_eq!(node.dependencies()[0].attribute.as_deref(), Some("id"));
        assert_eq!(stack.resource_count(), 2);
    }

    #[test]
    fn test_duplicate_resource_rejected() {
        let mut stack = stack();
        stack.add_resource("bucket", S3Bucket::new("a-bucket")).unwrap();
        let err = stack
            .add_resource("bucket", S3Bucket::new("b-bucket"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateResource { .. }));
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let mut stack = stack();
        let ghost = ResourceAddress::new("aws_s3_bucket", "ghost").unwrap();
        let err = stack
            .add_resource("fl", FlowLog::to_s3("vpc-1", ghost.attr("arn")))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownReference { .. }));
        assert_eq!(stack.resource_count(), 0);
    }

    #[test]
    fn test_output_must_reference_declared_resource() {
        let mut stack = stack();
        let ghost = ResourceAddress::new("aws_s3_bucket", "ghost").unwrap();
        assert!(stack.add_output("arn", ghost.attr("arn")).is_err());

        let bucket = stack.add_resource("bucket", S3Bucket::new("a-bucket")).unwrap();
        stack.add_output("arn", bucket.arn()).unwrap();
        assert!(matches!(
            stack.add_output("arn", bucket.arn()),
            Err(Error::DuplicateOutput { .. })
        ));
    }

    #[test]
    fn test_explicit_dependency_rendered() {
        let mut stack = stack();
        let a = stack.add_resource("a", S3Bucket::new("a-bucket")).unwrap();
        stack
            .add_resource_with_deps("b", S3Bucket::new("b-bucket"), &[&a])
            .unwrap();
        let doc = stack.to_terraform_json().unwrap();
        assert_eq!(
            doc["resource"]["aws_s3_bucket"]["b"]["depends_on"],
            json!(["aws_s3_bucket.a"])
        );
        assert!(doc["resource"]["aws_s3_bucket"]["a"].get("depends_on").is_none());
    }

    #[test]
    fn test_terraform_document_layout() {
        let mut stack = stack();
        let bucket = stack.add_resource("bucket", S3Bucket::new("a-bucket")).unwrap();
        stack.add_output("bucket_output", bucket.arn()).unwrap();

        let doc = stack.to_terraform_json().unwrap();
        assert_eq!(
            doc["terraform"]["required_providers"]["aws"]["source"],
            json!("hashicorp/aws")
        );
        assert_eq!(doc["provider"]["aws"][0]["region"], json!("us-east-1"));
        assert_eq!(
            doc["output"]["bucket_output"]["value"],
            json!("${aws_s3_bucket.bucket.arn}")
        );
    }

    #[test]
    fn test_empty_stack_invalid() {
        assert!(stack().validate().is_err());
    }
}
