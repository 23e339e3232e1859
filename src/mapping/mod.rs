//! The source-to-metamodel mapping engine.
//!
//! Two strictly ordered passes over shared, single-threaded state:
//!
//! ```text
//! pass 1 (per file, in discovery order)
//!   walker  → register classifiers, inline attributes/operations,
//!             defer class-typed fields and supertype clauses
//! pass 2 (exactly once, after the last file)
//!   references → resolve every deferred request against the complete
//!                registry, pair opposites, drop unresolvables with a log
//! ```
//!
//! Resolution of canonical names to classifiers never fails: unknown names
//! fall back to the sentinel, array/map shapes synthesize cached wrapper
//! classifiers.

pub mod classifier;
pub mod features;
pub mod naming;
pub mod references;
pub mod store;
pub mod type_name;
pub mod walker;

pub use classifier::{primitive_id, resolve_classifier};
pub use features::{
    add_attribute, add_enum_literal, add_operation, add_parameter, add_reference, set_return_type,
};
pub use naming::{resolve_operation_name, RENAMED_OPERATION_PREFIX};
pub use references::resolve_deferred;
pub use store::{DeferredReferenceRequest, DeferredSupertype, MetamodelStore};
pub use type_name::{primitive_name, type_name, SENTINEL_NAME};
pub use walker::walk_unit;
