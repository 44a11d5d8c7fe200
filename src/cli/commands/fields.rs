//! Fields command - print the flow log record format

use super::{CommandContext, Runnable};
use anyhow::Result;
use clap::Parser;
use flowlog_stacks::log_format::{escaped_log_format, log_format, FIELD_NAMES};
use serde_json::json;

/// Arguments for fields command
#[derive(Parser, Debug, Clone)]
pub struct FieldsArgs {
    /// Print the form embedded in Terraform JSON (`$${...}`)
    #[arg(long)]
    pub escaped: bool,

    /// Print one field name per line instead of the format string
    #[arg(long, conflicts_with = "escaped")]
    pub list: bool,
}

impl FieldsArgs {
    /// The format string this invocation prints
    pub fn format(&self) -> String {
        if self.escaped {
            escaped_log_format()
        } else {
            log_format()
        }
    }

    /// Execute the fields command
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        if ctx.output.is_json() {
            ctx.output.json(&json!({
                "format": self.format(),
                "fields": FIELD_NAMES,
            }));
            return Ok(0);
        }

        if self.list {
            for name in FIELD_NAMES {
                ctx.output.raw(name);
            }
        } else {
            ctx.output.raw(&self.format());
        }
        Ok(0)
    }
}

impl Runnable for FieldsArgs {
    fn run(&self, ctx: &mut CommandContext) -> Result<i32> {
        self.execute(ctx)
    }
}
