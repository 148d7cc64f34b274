//! `docgen_core` is the model engine of the docgen documentation generator. It
//! reads the linked model file produced by the document linker, builds the
//! model graph of state machines, sequence diagrams, APIs and applications,
//! resolves the numeric references between records, and orders the messages
//! of sequence diagrams for rendering.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Linked model file
//!   → Reader (checks the header, reads fixed-size blocks)
//!   → Record decoder (tagged variable-length records, borrowed from the block)
//!   → Builder (section mode machine, creates groups, states, timelines, nodes)
//!   → Resolver (replaces state and node ids with references, pairs functions)
//!   → Walker (orders message sends across timelines)
//! ```
//!
//! ## Modules
//!
//! - [`record`] — The record tags and layouts, with [`decode_record`] and [`Record::encode`].
//! - [`model`] — The arena-backed model graph and its typed ids.
//! - [`lookup`] — Hash-bucketed lookup tables and `$name` macro expansion.
//! - [`config`] — Configuration loading from `docgen.toml`.
//!
//! ## Key Types
//!
//! - [`ModelReader`] / [`ModelWriter`] — Block level access to linked model files.
//! - [`ModelBuilder`] — Turns decoded records into a [`Model`].
//! - [`LoadedModel`] — A built and linked model together with its header.
//! - [`SequenceWalker`] — The emission order of a sequence diagram.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docgen_core::SequenceWalker;
//! use docgen_core::load_model;
//! use std::path::Path;
//!
//! let loaded = load_model(Path::new("docs.gdsl")).unwrap();
//!
//! for (group, _) in loaded.groups() {
//!     let mut walker = SequenceWalker::new(&loaded);
//!     for emission in walker.emissions(group) {
//!         let message = loaded.message(emission.message);
//!         println!("{}", message.name);
//!     }
//! }
//! ```

pub use builder::*;
pub use config::*;
pub use error::*;
pub use loader::*;
pub use lookup::*;
pub use model::*;
pub use name::*;
pub use reader::*;
pub use record::*;
pub use resolver::*;
pub use walker::*;
pub use writer::*;

mod builder;
pub mod config;
#[allow(unused_assignments)]
mod error;
mod loader;
pub mod lookup;
pub mod model;
mod name;
mod reader;
pub mod record;
mod resolver;
mod walker;
mod writer;

#[cfg(test)]
mod __fixtures;
