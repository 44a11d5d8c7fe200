//! Outputs command - list the named outputs of each stack

use super::{select_stacks, CommandContext, Runnable};
use anyhow::Result;
use clap::Parser;
use serde_json::{json, Map, Value};

/// Arguments for outputs command
#[derive(Parser, Debug, Clone)]
pub struct OutputsArgs {
    /// Only list outputs of this stack
    #[arg(short = 's', long)]
    pub stack: Option<String>,
}

impl OutputsArgs {
    /// Execute the outputs command
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let app = ctx.app()?;
        let stacks = select_stacks(&app, self.stack.as_deref())?;

        if ctx.output.is_json() {
            let mut documents = Map::new();
            for stack in stacks {
                let outputs: Map<String, Value> = stack
                    .outputs()
                    .map(|(name, output)| (name.to_string(), json!(output.value.render())))
                    .collect();
                documents.insert(stack.name().to_string(), Value::Object(outputs));
            }
            ctx.output.json(&Value::Object(documents));
            return Ok(0);
        }

        for stack in stacks {
            ctx.output.stack_header(stack.name());
            let rows: Vec<Vec<String>> = stack
                .outputs()
                .map(|(name, output)| {
                    vec![
                        name.to_string(),
                        output.value.render(),
                        output.description.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            ctx.output.table(&["output", "value", "description"], &rows);
        }
        Ok(0)
    }
}

impl Runnable for OutputsArgs {
    fn run(&self, ctx: &mut CommandContext) -> Result<i32> {
        self.execute(ctx)
    }
}
