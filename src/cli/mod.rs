//! CLI module for flowlog-stacks
//!
//! This module provides the command-line interface, including argument
//! parsing, settings overrides, and subcommand handling.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// flowlog-stacks - VPC flow log stacks for Terraform
///
/// Builds the S3 and CloudWatch log group flow-log stacks for a VPC and
/// synthesizes them to Terraform JSON.
#[derive(Parser, Debug, Clone)]
#[command(name = "flowlog-stacks")]
#[command(author = "flowlog-stacks Contributors")]
#[command(version)]
#[command(about = "Synthesize VPC flow log stacks to Terraform JSON", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to settings file
    #[arg(short = 'c', long, global = true, env = "FLOWLOGS_CONFIG")]
    pub config: Option<PathBuf>,

    /// VPC id (overrides settings)
    #[arg(long, global = true)]
    pub vpc_id: Option<String>,

    /// AWS region (overrides settings)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Extra tag applied to every resource (key=value)
    #[arg(short = 't', long = "tag", global = true, action = clap::ArgAction::Append)]
    pub tags: Vec<String>,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write every stack and the manifest to an output directory
    Synth(commands::synth::SynthArgs),

    /// Print the Terraform JSON of one or all stacks
    Plan(commands::plan::PlanArgs),

    /// Show the resource dependency graph
    Graph(commands::graph::GraphArgs),

    /// List the named outputs of each stack
    Outputs(commands::outputs::OutputsArgs),

    /// Print the flow log record format
    Fields(commands::fields::FieldsArgs),

    /// List the stacks
    List(commands::list::ListArgs),
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }

    /// Check if JSON output is requested
    pub fn is_json(&self) -> bool {
        matches!(self.output, OutputFormat::Json)
    }
}
