//! Synth command - write Terraform JSON for every stack
//!
//! This module implements the `synth` subcommand.

use super::{CommandContext, Runnable};
use anyhow::{Context, Result};
use clap::Parser;
use flowlog_stacks::plan::app::{DEFAULT_OUTDIR, MANIFEST_FILE_NAME};
use std::path::PathBuf;

/// Arguments for synth command
#[derive(Parser, Debug, Clone)]
pub struct SynthArgs {
    /// Directory the stacks and manifest are written to
    #[arg(short = 'o', long, default_value = DEFAULT_OUTDIR)]
    pub outdir: PathBuf,
}

impl SynthArgs {
    /// Execute the synth command
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        ctx.output.banner("SYNTH");

        let app = ctx.app()?;
        if self.outdir.join(MANIFEST_FILE_NAME).exists() {
            ctx.output.warning(&format!(
                "Overwriting previous synthesis in {}",
                self.outdir.display()
            ));
        }
        ctx.output
            .info(&format!("Writing stacks to {}", self.outdir.display()));
        let manifest = app
            .write(&self.outdir)
            .with_context(|| format!("Failed to synthesize into {}", self.outdir.display()))?;

        if ctx.output.is_json() {
            ctx.output.json(&serde_json::to_value(&manifest)?);
            return Ok(0);
        }

        for stack in app.stacks() {
            ctx.output.stack_header(stack.name());
            let entry = &manifest.stacks[stack.name()];
            ctx.output.raw(&format!(
                "{} resources, {} outputs -> {}",
                stack.resource_count(),
                stack.outputs().count(),
                self.outdir.join(&entry.synthesized_stack_path).display()
            ));
        }

        ctx.output.elapsed("Synthesis");
        ctx.output.success(&format!(
            "Synthesized {} stacks into {}",
            manifest.stacks.len(),
            self.outdir.display()
        ));
        ctx.output.hint(&format!(
            "Run 'terraform init && terraform plan' inside {}/stacks/<stack>",
            self.outdir.display()
        ));
        ctx.output.flush();
        Ok(0)
    }
}

impl Runnable for SynthArgs {
    fn run(&self, ctx: &mut CommandContext) -> Result<i32> {
        self.execute(ctx)
    }
}
