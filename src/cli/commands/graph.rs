//! Graph command - show creation order and dependency edges
//!
//! Prints each stack's resources in the order Terraform can create them,
//! with the resources each one waits for. `--dot` emits Graphviz instead.

use super::{select_stacks, CommandContext, Runnable};
use anyhow::Result;
use clap::Parser;
use flowlog_stacks::plan::{DependencyKind, ResourceDependency};
use serde_json::{json, Map, Value};

/// Arguments for graph command
#[derive(Parser, Debug, Clone)]
pub struct GraphArgs {
    /// Only show this stack
    #[arg(short = 's', long)]
    pub stack: Option<String>,

    /// Emit Graphviz DOT
    #[arg(long)]
    pub dot: bool,
}

fn describe(dep: &ResourceDependency) -> String {
    match dep.kind {
        DependencyKind::Reference => {
            format!("{}.{}", dep.from, dep.attribute.as_deref().unwrap_or("id"))
        }
        DependencyKind::Explicit => format!("{} (depends_on)", dep.from),
    }
}

impl GraphArgs {
    /// Execute the graph command
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let app = ctx.app()?;
        let stacks = select_stacks(&app, self.stack.as_deref())?;

        if self.dot {
            for stack in stacks {
                ctx.output.raw(&stack.dependency_graph()?.to_dot(stack.name()));
            }
            return Ok(0);
        }

        let mut documents = Map::new();
        for stack in stacks {
            let graph = stack.dependency_graph()?;
            let order = graph.get_execution_order()?;

            if ctx.output.is_json() {
                let edges: Vec<ResourceDependency> = order
                    .iter()
                    .flat_map(|address| graph.get_direct_dependencies(address))
                    .collect();
                documents.insert(
                    stack.name().to_string(),
                    json!({ "order": order, "dependencies": edges }),
                );
                continue;
            }

            ctx.output.stack_header(stack.name());
            let rows: Vec<Vec<String>> = order
                .iter()
                .enumerate()
                .map(|(i, address)| {
                    let waits_for: Vec<String> = graph
                        .get_direct_dependencies(address)
                        .iter()
                        .map(describe)
                        .collect();
                    vec![(i + 1).to_string(), address.clone(), waits_for.join(", ")]
                })
                .collect();
            ctx.output.table(&["#", "resource", "waits for"], &rows);
        }

        if ctx.output.is_json() {
            ctx.output.json(&Value::Object(documents));
        }
        Ok(0)
    }
}

impl Runnable for GraphArgs {
    fn run(&self, ctx: &mut CommandContext) -> Result<i32> {
        self.execute(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_args() {
        let args = GraphArgs::try_parse_from(["graph", "--dot", "-s", "vpc-flowlogs-loggroup"])
            .unwrap();
        assert!(args.dot);
        assert_eq!(args.stack.as_deref(), Some("vpc-flowlogs-loggroup"));
    }

    #[test]
    fn test_describe_dependency() {
        let reference = ResourceDependency::new(
            "aws_iam_role.iam-role",
            "aws_flow_log.fl",
            DependencyKind::Reference,
        )
        .with_attribute("arn");
        assert_eq!(describe(&reference), "aws_iam_role.iam-role.arn");

        let explicit = ResourceDependency::new(
            "aws_iam_role_policy.iam-role-policy",
            "aws_flow_log.fl",
            DependencyKind::Explicit,
        );
        assert_eq!(
            describe(&explicit),
            "aws_iam_role_policy.iam-role-policy (depends_on)"
        );
    }
}
