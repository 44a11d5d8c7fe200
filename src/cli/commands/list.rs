//! List command - list stacks with their resource and output counts

use super::{CommandContext, Runnable};
use anyhow::Result;
use clap::Parser;
use serde_json::{json, Value};

/// Arguments for list command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Also list the resources of each stack
    #[arg(long)]
    pub resources: bool,
}

impl ListArgs {
    /// Execute the list command
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let app = ctx.app()?;

        if ctx.output.is_json() {
            let stacks: Vec<Value> = app
                .stacks()
                .map(|stack| {
                    let resources: Vec<String> =
                        stack.resources().map(|n| n.address().to_string()).collect();
                    json!({
                        "name": stack.name(),
                        "region": stack.provider().region,
                        "resources": resources,
                        "outputs": stack.outputs().map(|(name, _)| name).collect::<Vec<_>>(),
                    })
                })
                .collect();
            ctx.output.json(&Value::Array(stacks));
            return Ok(0);
        }

        ctx.output.section(&format!("Stacks for {}", ctx.settings.vpc_id));
        let rows: Vec<Vec<String>> = app
            .stacks()
            .map(|stack| {
                vec![
                    stack.name().to_string(),
                    stack.provider().region.clone(),
                    stack.resource_count().to_string(),
                    stack.outputs().count().to_string(),
                ]
            })
            .collect();
        ctx.output
            .table(&["stack", "region", "resources", "outputs"], &rows);

        if self.resources {
            for stack in app.stacks() {
                let items: Vec<String> =
                    stack.resources().map(|n| n.address().to_string()).collect();
                ctx.output.list(stack.name(), &items);
            }
        }
        Ok(0)
    }
}

impl Runnable for ListArgs {
    fn run(&self, ctx: &mut CommandContext) -> Result<i32> {
        self.execute(ctx)
    }
}
