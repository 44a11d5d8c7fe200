//! Plan command - print Terraform JSON without writing files

use super::{select_stacks, CommandContext, Runnable};
use anyhow::Result;
use clap::Parser;
use serde_json::{Map, Value};

/// Arguments for plan command
#[derive(Parser, Debug, Clone)]
pub struct PlanArgs {
    /// Only print this stack
    #[arg(short = 's', long)]
    pub stack: Option<String>,
}

impl PlanArgs {
    /// Execute the plan command
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let app = ctx.app()?;
        let stacks = select_stacks(&app, self.stack.as_deref())?;

        if ctx.output.is_json() {
            let mut documents = Map::new();
            for stack in &stacks {
                stack.validate()?;
                documents.insert(stack.name().to_string(), stack.to_terraform_json()?);
            }
            ctx.output.json(&Value::Object(documents));
            return Ok(0);
        }

        for stack in stacks {
            stack.validate()?;
            ctx.output.stack_header(stack.name());
            ctx.output
                .raw(&serde_json::to_string_pretty(&stack.to_terraform_json()?)?);
        }
        Ok(0)
    }
}

impl Runnable for PlanArgs {
    fn run(&self, ctx: &mut CommandContext) -> Result<i32> {
        self.execute(ctx)
    }
}
