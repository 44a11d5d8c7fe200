//! CloudWatch Logs log group.

use serde::Serialize;

use super::Resource;
use crate::error::{Error, Result};
use crate::expr::{Expr, Reference};

/// Retention periods (days) CloudWatch Logs accepts.
pub const ALLOWED_RETENTION_DAYS: [u32; 22] = [
    1, 3, 5, 7, 14, 30, 60, 90, 120, 150, 180, 365, 400, 545, 731, 1096, 1827, 2192, 2557, 2922,
    3288, 3653,
];

/// `aws_cloudwatch_log_group`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudwatchLogGroup {
    /// Log group name
    pub name: Expr,
    /// Days to keep events; `None` keeps them forever
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_in_days: Option<u32>,
}

impl CloudwatchLogGroup {
    /// A log group keeping events for `retention_in_days`.
    pub fn new(name: impl Into<Expr>, retention_in_days: u32) -> Self {
        Self {
            name: name.into(),
            retention_in_days: Some(retention_in_days),
        }
    }
}

impl Resource for CloudwatchLogGroup {
    const TYPE: &'static str = "aws_cloudwatch_log_group";

    fn references(&self) -> Vec<&Reference> {
        self.name.references().collect()
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::invalid_resource(Self::TYPE, "name is empty"));
        }
        match self.retention_in_days {
            Some(days) if !ALLOWED_RETENTION_DAYS.contains(&days) => Err(Error::invalid_resource(
                Self::TYPE,
                format!("retention of {days} days is not supported by CloudWatch Logs"),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_log_group_serialization() {
        let lg = CloudwatchLogGroup::new("/vpcflowlogs/vpc-1", 1);
        lg.validate().unwrap();
        assert_eq!(
            serde_json::to_value(&lg).unwrap(),
            json!({"name": "/vpcflowlogs/vpc-1", "retention_in_days": 1})
        );
    }

    #[test]
    fn test_unsupported_retention() {
        assert!(CloudwatchLogGroup::new("/x", 2).validate().is_err());
        assert!(CloudwatchLogGroup::new("/x", 14).validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(CloudwatchLogGroup::new("", 1).validate().is_err());
    }
}
