//! Operation naming conflicts with implied accessors.
//!
//! An operation named like the getter/setter a feature implies would clash
//! in generated code, so the first conflicting feature wins: it gets a
//! documentation annotation recording the original operation name, and the
//! operation is renamed with a fixed prefix.

use smol_str::SmolStr;

use crate::ecore::{builtin, Annotation, DataClass, Feature};

/// Prefix applied to operations that collide with an implied accessor.
pub const RENAMED_OPERATION_PREFIX: &str = "op_";

/// Check `candidate` against the class's current features, in declaration
/// order. On the first conflict the feature is annotated and the renamed
/// candidate returned; otherwise the candidate passes through unchanged.
pub fn resolve_operation_name(class: &mut DataClass, candidate: &str) -> SmolStr {
    for feature in &mut class.features {
        if conflicts(feature, candidate) {
            tracing::debug!(
                class = %class.name,
                feature = %feature.name(),
                operation = candidate,
                "operation name collides with implied accessor, renaming"
            );
            let message = format!(
                "Operation '{candidate}' collides with the accessor implied by \
                 feature '{}' and was renamed",
                feature.name()
            );
            feature.annotations_mut().push(Annotation::documentation(message));
            return SmolStr::new(format!("{RENAMED_OPERATION_PREFIX}{candidate}"));
        }
    }
    SmolStr::new(candidate)
}

fn conflicts(feature: &Feature, candidate: &str) -> bool {
    let implied_get = accessor_name("get", feature.name());
    let implied_set = accessor_name("set", feature.name());
    if candidate.eq_ignore_ascii_case(&implied_get) || candidate.eq_ignore_ascii_case(&implied_set)
    {
        return true;
    }
    // `is` accessors are only implied for boolean attributes.
    if let Feature::Attribute(attribute) = feature {
        if attribute.ty == builtin::EBOOLEAN {
            return candidate.eq_ignore_ascii_case(&accessor_name("is", feature.name()));
        }
    }
    false
}

fn accessor_name(prefix: &str, feature_name: &str) -> String {
    let mut name = String::with_capacity(prefix.len() + feature_name.len());
    name.push_str(prefix);
    let mut chars = feature_name.chars();
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.push_str(chars.as_str());
    }
    name
}
