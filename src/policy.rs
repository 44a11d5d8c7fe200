//! IAM policy documents.
//!
//! Documents are built as typed values and only turned into JSON when attached
//! to a role. Statement resources are [`Expr`]s so a policy can be scoped to the
//! ARN of a resource declared in the same stack.
//!
//! ```rust,ignore
//! let trust = PolicyDocument::new(vec![
//!     Statement::allow()
//!         .action("sts:AssumeRole")
//!         .principal(Principal::service("vpc-flow-logs.amazonaws.com")),
//! ]);
//! trust.validate()?;
//! ```

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::expr::{Expr, Reference};

/// The only policy grammar version AWS accepts for new documents.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Statement effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    /// Grant the listed actions
    Allow,
    /// Refuse the listed actions
    Deny,
}

/// Who a trust statement applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Principal {
    /// An AWS service principal, e.g. `vpc-flow-logs.amazonaws.com`
    Service(String),
}

impl Principal {
    /// A service principal.
    pub fn service(name: impl Into<String>) -> Self {
        Self::Service(name.into())
    }
}

/// A single policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    /// Allow or deny
    pub effect: Effect,
    /// Principal, for trust policies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    /// Actions, `service:Operation`
    #[serde(serialize_with = "one_or_many")]
    pub action: Vec<String>,
    /// Resources the actions apply to
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        serialize_with = "one_or_many"
    )]
    pub resource: Vec<Expr>,
}

impl Statement {
    /// Start an `Allow` statement.
    pub fn allow() -> Self {
        Self::with_effect(Effect::Allow)
    }

    /// Start a `Deny` statement.
    pub fn deny() -> Self {
        Self::with_effect(Effect::Deny)
    }

    fn with_effect(effect: Effect) -> Self {
        Self {
            effect,
            principal: None,
            action: Vec::new(),
            resource: Vec::new(),
        }
    }

    /// Add one action.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action.push(action.into());
        self
    }

    /// Add several actions.
    pub fn actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.action.extend(actions.into_iter().map(Into::into));
        self
    }

    /// Set the principal.
    pub fn principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Add a resource.
    pub fn resource(mut self, resource: impl Into<Expr>) -> Self {
        self.resource.push(resource.into());
        self
    }

    fn validate(&self, index: usize) -> Result<()> {
        if self.action.is_empty() {
            return Err(Error::InvalidPolicy(format!(
                "statement {index} has no actions"
            )));
        }
        for action in &self.action {
            let well_formed = action
                .split_once(':')
                .is_some_and(|(service, op)| !service.is_empty() && !op.is_empty());
            if !well_formed {
                return Err(Error::InvalidPolicy(format!(
                    "statement {index} has malformed action '{action}'"
                )));
            }
        }
        if self.principal.is_none() && self.resource.is_empty() {
            return Err(Error::InvalidPolicy(format!(
                "statement {index} names neither a principal nor a resource"
            )));
        }
        if let Some(resource) = self.resource.iter().find(|r| is_bare_wildcard(r)) {
            return Err(Error::InvalidPolicy(format!(
                "statement {index} grants access to '{}'; scope it to a specific ARN",
                resource.as_literal().unwrap_or_default()
            )));
        }
        Ok(())
    }
}

/// An IAM policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    /// Grammar version, always [`POLICY_VERSION`]
    pub version: String,
    /// Statements
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    /// A document with the current grammar version.
    pub fn new(statement: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement,
        }
    }

    /// Checks the document against the policy grammar.
    pub fn validate(&self) -> Result<()> {
        if self.version != POLICY_VERSION {
            return Err(Error::InvalidPolicy(format!(
                "unsupported version '{}', expected '{POLICY_VERSION}'",
                self.version
            )));
        }
        if self.statement.is_empty() {
            return Err(Error::InvalidPolicy(
                "document has no statements".to_string(),
            ));
        }
        for (index, statement) in self.statement.iter().enumerate() {
            statement.validate(index)?;
        }
        Ok(())
    }

    /// True if every statement names a principal (a trust policy).
    pub fn is_trust_policy(&self) -> bool {
        self.statement.iter().all(|s| s.principal.is_some())
    }

    /// References to other resources used in statement resources.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.statement
            .iter()
            .flat_map(|s| s.resource.iter())
            .flat_map(Expr::references)
    }

    /// Serializes the document to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn is_bare_wildcard(resource: &Expr) -> bool {
    resource.as_literal().is_some_and(|s| s.trim() == "*")
}

fn one_or_many<T, S>(items: &[T], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    if let [single] = items {
        single.serialize(serializer)
    } else {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

/// Serializes a document as a JSON string property (`assume_role_policy`, `policy`).
pub fn serialize_as_json<S: Serializer>(
    document: &PolicyDocument,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let json = document.to_json().map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&json)
}
