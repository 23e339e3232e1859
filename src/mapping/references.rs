//! Pass 2: deferred supertype and reference resolution.
//!
//! A field whose declared type is a class not yet registered (declared
//! later, or in another file) cannot be resolved while walking files in
//! discovery order, so pass 1 records requests instead. This pass runs
//! exactly once, after the last file has been walked, and consumes every
//! request against the now-complete registry. Running it earlier would
//! silently drop legitimate forward references.

use crate::ecore::{Feature, FeatureRef, Package, UNBOUNDED};

use super::classifier::resolve_wrapper;
use super::features::add_reference;
use super::store::MetamodelStore;

/// Consume every pending request. Unresolvable targets are dropped with a
/// diagnostic; this pass never fails.
pub fn resolve_deferred(store: &mut MetamodelStore) {
    // Supertypes first, so inheritance is in place before references land.
    for request in store.take_pending_supertypes() {
        match store.package.lookup_class(&request.target_name) {
            Some(target) => {
                if let Some(class) = store.package.class_mut(request.source) {
                    class.supertypes.push(target);
                }
            }
            None => tracing::warn!(
                source = store.package.classifier_name(request.source),
                target = %request.target_name,
                "dropping unresolved supertype"
            ),
        }
    }

    // Requests were appended in walk order, which keeps them grouped by
    // source classifier in discovery order and field-declaration order
    // within a classifier.
    for request in store.take_pending_references() {
        // Plain names resolve against registered classes; array and map
        // shaped names retrieve or synthesize their wrapper classifier.
        let target = match store.package.lookup_class(&request.target_name) {
            Some(target) => target,
            None => match resolve_wrapper(store, &request.target_name) {
                Some(target) => target,
                None => {
                    tracing::warn!(
                        source = store.package.classifier_name(request.source),
                        reference = %request.reference_name,
                        target = %request.target_name,
                        "dropping deferred reference with unresolved target"
                    );
                    continue;
                }
            },
        };

        let upper = if request.containment { UNBOUNDED } else { 1 };

        // Greedy opposite discovery: the first existing reference on the
        // target whose type is the source class, in declaration order. A
        // later, more specific match is never reconsidered.
        let opposite = store.package.class(target).and_then(|class| {
            class.features.iter().enumerate().find_map(|(i, f)| match f {
                Feature::Reference(r) if r.target == request.source => Some(i),
                _ => None,
            })
        });

        let Some(index) = add_reference(
            &mut store.package,
            request.source,
            &request.reference_name,
            target,
            0,
            upper,
            request.containment,
        ) else {
            continue;
        };

        if let Some(opposite_index) = opposite {
            link_opposites(
                &mut store.package,
                FeatureRef {
                    class: request.source,
                    feature: index,
                },
                FeatureRef {
                    class: target,
                    feature: opposite_index,
                },
            );
        }
    }
}

/// Link two references as opposites, keeping symmetry: if `b` was already
/// paired with something else, the stale partner is unlinked first.
fn link_opposites(package: &mut Package, a: FeatureRef, b: FeatureRef) {
    if let Some(stale) = set_opposite(package, b, Some(a)) {
        if stale != a {
            set_opposite(package, stale, None);
        }
    }
    set_opposite(package, a, Some(b));
}

fn set_opposite(
    package: &mut Package,
    at: FeatureRef,
    value: Option<FeatureRef>,
) -> Option<FeatureRef> {
    let reference = package
        .class_mut(at.class)
        .and_then(|c| c.features.get_mut(at.feature))
        .and_then(|f| match f {
            Feature::Reference(r) => Some(r),
            Feature::Attribute(_) => None,
        })?;
    std::mem::replace(&mut reference.opposite, value)
}
