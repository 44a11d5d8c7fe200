//! Subcommands module for the flowlog-stacks CLI
//!
//! This module contains all the subcommand implementations.

pub mod fields;
pub mod graph;
pub mod list;
pub mod outputs;
pub mod plan;
pub mod synth;

use crate::cli::output::OutputFormatter;
use anyhow::Result;
use flowlog_stacks::config::Settings;
use flowlog_stacks::plan::{App, Stack};
use flowlog_stacks::stacks::build_app;

/// Common context shared between commands
pub struct CommandContext {
    /// Effective settings after file, environment and CLI overrides
    pub settings: Settings,
    /// Output formatter
    pub output: OutputFormatter,
}

impl CommandContext {
    /// Create a new command context from CLI arguments
    pub fn new(cli: &crate::cli::Cli, settings: Settings) -> Self {
        let output = OutputFormatter::new(!cli.no_color, cli.is_json(), cli.verbosity());

        Self { settings, output }
    }

    /// Build the app from the effective settings
    pub fn app(&self) -> Result<App> {
        self.output
            .debug(&format!("Building stacks for {}", self.settings.vpc_id));
        Ok(build_app(&self.settings)?)
    }
}

/// Select one stack by name, or every stack when `name` is `None`
pub fn select_stacks<'a>(app: &'a App, name: Option<&str>) -> Result<Vec<&'a Stack>> {
    match name {
        Some(name) => Ok(vec![app.stack(name)?]),
        None => Ok(app.stacks().collect()),
    }
}

/// Trait for runnable commands
pub trait Runnable {
    /// Execute the command
    fn run(&self, ctx: &mut CommandContext) -> Result<i32>;
}
