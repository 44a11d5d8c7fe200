//! The application root and its synthesis to disk.
//!
//! Synthesis writes one Terraform JSON document per stack plus a manifest:
//!
//! ```text
//! <outdir>/
//! ├── manifest.json
//! └── stacks/
//!     ├── vpc-flowlogs-s3/cdk.tf.json
//!     └── vpc-flowlogs-loggroup/cdk.tf.json
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::stack::Stack;
use crate::error::{Error, Result};

/// File name of each synthesized stack document.
pub const STACK_FILE_NAME: &str = "cdk.tf.json";

/// File name of the manifest.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Default output directory.
pub const DEFAULT_OUTDIR: &str = "cdktf.out";

/// One stack entry in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestStack {
    /// Stack name
    pub name: String,
    /// Directory Terraform runs in, relative to the output directory
    pub working_directory: String,
    /// Stack document, relative to the output directory
    pub synthesized_stack_path: String,
}

/// Index of a synthesized app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Version of the tool that wrote the manifest
    pub version: String,
    /// Stacks by name
    pub stacks: BTreeMap<String, ManifestStack>,
}

/// A synthesized stack document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedStack {
    /// Stack name
    pub name: String,
    /// Pretty-printed Terraform JSON
    pub document: String,
}

/// A set of independent stacks synthesized together.
#[derive(Debug, Clone, Default)]
pub struct App {
    stacks: IndexMap<String, Stack>,
}

impl App {
    /// Create an empty app.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stack; names must be unique.
    pub fn add_stack(&mut self, stack: Stack) -> Result<()> {
        if self.stacks.contains_key(stack.name()) {
            return Err(Error::DuplicateStack(stack.name().to_string()));
        }
        self.stacks.insert(stack.name().to_string(), stack);
        Ok(())
    }

    /// Stacks in the order they were added.
    pub fn stacks(&self) -> impl Iterator<Item = &Stack> {
        self.stacks.values()
    }

    /// One stack by name.
    pub fn stack(&self, name: &str) -> Result<&Stack> {
        self.stacks
            .get(name)
            .ok_or_else(|| Error::StackNotFound(name.to_string()))
    }

    /// Render every stack to Terraform JSON.
    ///
    /// Output is a pure function of the stacks, so repeated synthesis of the
    /// same settings yields byte-identical documents.
    pub fn synth(&self) -> Result<Vec<SynthesizedStack>> {
        self.stacks
            .values()
            .map(|stack| {
                stack.validate()?;
                let document = serde_json::to_string_pretty(&stack.to_terraform_json()?)?;
                Ok(SynthesizedStack {
                    name: stack.name().to_string(),
                    document,
                })
            })
            .collect()
    }

    /// The manifest describing where each stack is written.
    pub fn manifest(&self) -> Manifest {
        let stacks = self
            .stacks
            .keys()
            .map(|name| {
                let working_directory = format!("stacks/{name}");
                let entry = ManifestStack {
                    name: name.clone(),
                    synthesized_stack_path: format!("{working_directory}/{STACK_FILE_NAME}"),
                    working_directory,
                };
                (name.clone(), entry)
            })
            .collect();
        Manifest {
            version: env!("CARGO_PKG_VERSION").to_string(),
            stacks,
        }
    }

    /// Synthesize and write every stack below `outdir`.
    pub fn write(&self, outdir: &Path) -> Result<Manifest> {
        let synthesized = self.synth()?;
        let manifest = self.manifest();

        for stack in &synthesized {
            let entry = &manifest.stacks[&stack.name];
            let dir = outdir.join(&entry.working_directory);
            fs::create_dir_all(&dir).map_err(|source| Error::SynthWrite {
                path: dir.clone(),
                source,
            })?;
            write_file(&outdir.join(&entry.synthesized_stack_path), &stack.document)?;
            info!(stack = %stack.name, path = %dir.display(), "Synthesized stack");
        }

        let manifest_json = serde_json::to_string_pretty(&manifest)?;
        write_file(&outdir.join(MANIFEST_FILE_NAME), &manifest_json)?;
        info!(
            stacks = manifest.stacks.len(),
            outdir = %outdir.display(),
            "Wrote manifest"
        );
        Ok(manifest)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, format!("{contents}\n")).map_err(|source| Error::SynthWrite {
        path: path.to_path_buf(),
        source,
    })
}
