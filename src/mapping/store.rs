//! The metamodel store: the context object threaded through the whole run.
//!
//! Owns the root [`Package`], the pending-request lists that carry pass-1
//! deferrals into pass 2, and the synthesis cache for wrapper classifiers.
//! There is no global state; isolated runs get isolated stores.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::ecore::{ClassifierId, Package};

/// A class-typed field recorded in pass 1 and resolved in pass 2.
#[derive(Debug, Clone)]
pub struct DeferredReferenceRequest {
    pub source: ClassifierId,
    /// Unresolved target class name, as canonical text.
    pub target_name: String,
    pub reference_name: SmolStr,
    pub containment: bool,
}

/// An `extends`/`implements` clause recorded in pass 1 and resolved in
/// pass 2, so supertype linking is independent of file traversal order.
#[derive(Debug, Clone)]
pub struct DeferredSupertype {
    pub source: ClassifierId,
    pub target_name: String,
}

/// Process-wide mutable state for one extraction run.
#[derive(Debug, Default)]
pub struct MetamodelStore {
    pub package: Package,
    pending_supertypes: Vec<DeferredSupertype>,
    pending_references: Vec<DeferredReferenceRequest>,
    synthetic_cache: FxHashMap<String, ClassifierId>,
    package_named: bool,
}

impl MetamodelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the package after the first `package` declaration seen; later
    /// declarations are ignored.
    pub fn set_package_name(&mut self, name: &str) {
        if self.package_named {
            return;
        }
        self.package.set_name(name);
        self.package_named = true;
    }

    /// Record a supertype link for pass 2.
    pub fn defer_supertype(&mut self, source: ClassifierId, target_name: String) {
        self.pending_supertypes
            .push(DeferredSupertype { source, target_name });
    }

    /// Record a class-typed field for pass 2. Appending in walk order keeps
    /// requests grouped by source classifier in discovery order.
    pub fn defer_reference(
        &mut self,
        source: ClassifierId,
        target_name: String,
        reference_name: &str,
        containment: bool,
    ) {
        self.pending_references.push(DeferredReferenceRequest {
            source,
            target_name,
            reference_name: SmolStr::new(reference_name),
            containment,
        });
    }

    pub(crate) fn take_pending_supertypes(&mut self) -> Vec<DeferredSupertype> {
        std::mem::take(&mut self.pending_supertypes)
    }

    pub(crate) fn take_pending_references(&mut self) -> Vec<DeferredReferenceRequest> {
        std::mem::take(&mut self.pending_references)
    }

    pub fn pending_reference_count(&self) -> usize {
        self.pending_references.len()
    }

    /// Look up a previously synthesized wrapper by canonical name.
    pub fn cached_synthetic(&self, canonical: &str) -> Option<ClassifierId> {
        self.synthetic_cache.get(canonical).copied()
    }

    pub fn cache_synthetic(&mut self, canonical: String, id: ClassifierId) {
        self.synthetic_cache.insert(canonical, id);
    }

    /// Hand the finished package over once both passes are complete.
    pub fn into_package(self) -> Package {
        self.package
    }
}
