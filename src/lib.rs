//! # j2ecore
//!
//! Extracts a structural Ecore metamodel from Java sources and exports it
//! as XMI: classes, interfaces, and enums become classifiers; fields become
//! attributes or references; methods become operations.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project     → directory scan, driver (two-pass run shape)
//!   ↓
//! interchange → Ecore XMI export
//!   ↓
//! mapping     → source→metamodel engine (walker, resolvers, deferred refs)
//!   ↓
//! ecore       → metamodel data model, structural validation
//!   ↓
//! parser      → logos lexer, recursive-descent Java subset parser, AST
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! let package = j2ecore::generate(Path::new("./src-java"), Path::new("model.ecore"))?;
//! println!("extracted {} classifiers", package.user_classifiers().count());
//! # Ok::<(), j2ecore::ModelError>(())
//! ```
//!
//! Cross-file references always resolve regardless of declaration order:
//! pass 1 walks every file and defers class-typed fields and supertype
//! clauses; pass 2 resolves them against the completed registry.

/// Parser: logos lexer, recursive-descent parser, typed AST
pub mod parser;

/// Metamodel data model and structural validation
pub mod ecore;

/// Mapping engine: walker, resolvers, two-phase deferred resolution
pub mod mapping;

/// Ecore XMI export
pub mod interchange;

/// Directory scanning and driver
pub mod project;

mod error;

pub use ecore::{Classifier, ClassifierId, Feature, Package};
pub use error::ModelError;
pub use mapping::MetamodelStore;
pub use project::{generate, generate_metamodel, scan_java_files};
