//! IAM role and inline role policy.

use serde::Serialize;

use super::Resource;
use crate::error::{Error, Result};
use crate::expr::{Expr, Reference};
use crate::policy::{serialize_as_json, PolicyDocument};

/// `aws_iam_role`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IamRole {
    /// Role name
    pub name: Expr,
    /// Trust policy, serialized as a JSON string
    #[serde(serialize_with = "serialize_as_json")]
    pub assume_role_policy: PolicyDocument,
}

impl IamRole {
    /// A role trusted through `assume_role_policy`.
    pub fn new(name: impl Into<Expr>, assume_role_policy: PolicyDocument) -> Self {
        Self {
            name: name.into(),
            assume_role_policy,
        }
    }
}

impl Resource for IamRole {
    const TYPE: &'static str = "aws_iam_role";

    fn references(&self) -> Vec<&Reference> {
        self.name
            .references()
            .chain(self.assume_role_policy.references())
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::invalid_resource(Self::TYPE, "name is empty"));
        }
        self.assume_role_policy.validate()?;
        if !self.assume_role_policy.is_trust_policy() {
            return Err(Error::InvalidPolicy(
                "every statement of an assume-role policy needs a principal".to_string(),
            ));
        }
        Ok(())
    }
}

/// `aws_iam_role_policy`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IamRolePolicy {
    /// Policy name, unique per role
    pub name: Expr,
    /// Role id the policy is attached to
    pub role: Expr,
    /// Permissions, serialized as a JSON string
    #[serde(serialize_with = "serialize_as_json")]
    pub policy: PolicyDocument,
}

impl IamRolePolicy {
    /// An inline policy for `role`.
    pub fn new(name: impl Into<Expr>, role: impl Into<Expr>, policy: PolicyDocument) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            policy,
        }
    }
}

impl Resource for IamRolePolicy {
    const TYPE: &'static str = "aws_iam_role_policy";

    fn references(&self) -> Vec<&Reference> {
        self.name
            .references()
            .chain(self.role.references())
            .chain(self.policy.references())
            .collect()
    }

    fn validate(&self) -> Result<()> {
        self.policy.validate()?;
        if self.policy.statement.iter().any(|s| s.principal.is_some()) {
            return Err(Error::InvalidPolicy(
                "identity policies may not name a principal".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ResourceAddress;
    use crate::policy::{Principal, Statement};

    fn trust() -> PolicyDocument {
        PolicyDocument::new(vec![Statement::allow()
            .action("sts:AssumeRole")
            .principal(Principal::service("vpc-flow-logs.amazonaws.com"))])
    }

    #[test]
    fn test_role_serializes_policy_as_string() {
        let role = IamRole::new("r", trust());
        role.validate().unwrap();
        let value = serde_json::to_value(&role).unwrap();
        let policy = value["assume_role_policy"].as_str().unwrap();
        assert!(policy.contains("sts:AssumeRole"));
        assert!(policy.contains("vpc-flow-logs.amazonaws.com"));
    }

    #[test]
    fn test_role_rejects_permission_policy() {
        let doc = PolicyDocument::new(vec![Statement::allow()
            .action("logs:PutLogEvents")
            .resource("arn:aws:logs:us-east-1:123456789012:log-group:x:*")]);
        assert!(IamRole::new("r", doc).validate().is_err());
    }

    #[test]
    fn test_role_policy_references() {
        let role = ResourceAddress::new("aws_iam_role", "role").unwrap();
        let lg = ResourceAddress::new("aws_cloudwatch_log_group", "lg").unwrap();
        let doc = PolicyDocument::new(vec![Statement::allow()
            .action("logs:PutLogEvents")
            .resource(Expr::reference(lg.attr("arn")).concat(":*"))]);
        let policy = IamRolePolicy::new("default_policy", role.attr("id"), doc);
        policy.validate().unwrap();

        let targets: Vec<String> = policy
            .references()
            .iter()
            .map(|r| r.target.to_string())
            .collect();
        assert_eq!(targets, vec!["aws_iam_role.role", "aws_cloudwatch_log_group.lg"]);

        let value = serde_json::to_value(&policy).unwrap();
        assert!(value["policy"]
            .as_str()
            .unwrap()
            .contains("${aws_cloudwatch_log_group.lg.arn}:*"));
    }

    #[test]
    fn test_role_policy_rejects_principal() {
        let policy = IamRolePolicy::new("p", "role-id", trust());
        assert!(policy.validate().is_err());
    }
}
