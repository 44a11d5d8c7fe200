//! Plan assembly: stacks, their dependency graphs, and synthesis.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                               App                                    │
//! │            (independent stacks, synthesized together)                │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                    │
//!          ┌─────────────────────────┴─────────────────────────┐
//!          ▼                                                   ▼
//! ┌─────────────────────┐                           ┌─────────────────────┐
//! │        Stack        │                           │        Stack        │
//! │ (provider, nodes,   │                           │ (provider, nodes,   │
//! │  outputs)           │                           │  outputs)           │
//! └─────────────────────┘                           └─────────────────────┘
//!          │                                                   │
//!          ▼                                                   ▼
//! ┌─────────────────────┐                           ┌─────────────────────┐
//! │   ResourceGraph     │                           │   ResourceGraph     │
//! │ (ordering, cycles)  │                           │ (ordering, cycles)  │
//! └─────────────────────┘                           └─────────────────────┘
//! ```

pub mod app;
pub mod graph;
pub mod stack;

pub use app::{App, Manifest, ManifestStack, SynthesizedStack};
pub use graph::{DependencyKind, GraphError, GraphResult, ResourceDependency, ResourceGraph};
pub use stack::{NodeDependency, Output, ResourceNode, ResourceRef, Stack};
