//! Flow-log record layout.
//!
//! VPC flow logs accept a custom format made of `${field}` tokens. The order of
//! the tokens is the column order of every emitted record, so downstream parsers
//! depend on it never changing.

use crate::expr::escape_literal;

/// Canonical flow-log fields, in record order.
pub const FIELD_NAMES: [&str; 29] = [
    "version",
    "account-id",
    "interface-id",
    "srcaddr",
    "dstaddr",
    "srcport",
    "dstport",
    "protocol",
    "packets",
    "bytes",
    "start",
    "end",
    "action",
    "log-status",
    "vpc-id",
    "subnet-id",
    "instance-id",
    "tcp-flags",
    "type",
    "pkt-srcaddr",
    "pkt-dstaddr",
    "region",
    "az-id",
    "sublocation-type",
    "sublocation-id",
    "pkt-src-aws-service",
    "pkt-dst-aws-service",
    "flow-direction",
    "traffic-path",
];

/// Wraps one field name in flow-log interpolation syntax.
pub fn field_token(name: &str) -> String {
    format!("${{{name}}}")
}

/// Builds the `log_format` string for the given fields.
pub fn format_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(field_token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The flow-log format covering every canonical field.
///
/// This is the value AWS receives. When written into Terraform JSON as a
/// literal it is escaped by the plan layer, see [`escaped_log_format`].
pub fn log_format() -> String {
    format_fields(FIELD_NAMES)
}

/// The log format as it appears inside Terraform JSON (`$${version} ...`).
pub fn escaped_log_format() -> String {
    escape_literal(&log_format())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_token() {
        assert_eq!(field_token("srcaddr"), "${srcaddr}");
    }

    #[test]
    fn test_log_format_has_every_field_in_order() {
        let format = log_format();
        let tokens: Vec<&str> = format.split(' ').collect();
        assert_eq!(tokens.len(), 29);
        for (token, name) in tokens.iter().zip(FIELD_NAMES) {
            assert_eq!(*token, format!("${{{name}}}"));
        }
        assert!(format.starts_with("${version} ${account-id} ${interface-id}"));
        assert!(format.ends_with("${flow-direction} ${traffic-path}"));
    }

    #[test]
    fn test_log_format_single_spaces() {
        let format = log_format();
        assert!(!format.contains("  "));
        assert!(!format.starts_with(' '));
        assert!(!format.ends_with(' '));
    }

    #[test]
    fn test_escaped_log_format() {
        let escaped = escaped_log_format();
        assert!(escaped.starts_with("$${version} $${account-id}"));
        assert_eq!(escaped.matches("$${").count(), 29);
    }

    #[test]
    fn test_format_fields_subset() {
        assert_eq!(
            format_fields(["srcaddr", "dstaddr"]),
            "${srcaddr} ${dstaddr}"
        );
        assert_eq!(format_fields(std::iter::empty()), "");
    }
}
