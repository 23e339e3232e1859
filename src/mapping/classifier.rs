//! Canonical name → classifier resolution.
//!
//! Resolution never fails: a name that matches nothing falls back to the
//! sentinel, reflecting a best-effort policy toward unresolvable or
//! external types. Array and map shapes synthesize wrapper classifiers,
//! cached by canonical name so the same name always resolves to the same
//! classifier instance.

use smol_str::SmolStr;

use crate::ecore::{
    builtin, Attribute, ClassifierId, Classifier, Feature, Reference, UNBOUNDED,
};

use super::store::MetamodelStore;

/// Builtin classifier id for a canonical primitive name.
pub fn primitive_id(name: &str) -> Option<ClassifierId> {
    Some(match name {
        "EInt" => builtin::EINT,
        "EBoolean" => builtin::EBOOLEAN,
        "EByte" => builtin::EBYTE,
        "EShort" => builtin::ESHORT,
        "ELong" => builtin::ELONG,
        "EFloat" => builtin::EFLOAT,
        "EDouble" => builtin::EDOUBLE,
        "EChar" => builtin::ECHAR,
        "EString" => builtin::ESTRING,
        _ => return None,
    })
}

/// Resolve a canonical name against the current registry.
///
/// Resolution order, first match wins:
/// 1. primitive table;
/// 2. registered class or enumeration by simple name;
/// 3. `T[]` → retrieve-or-synthesize an array wrapper;
/// 4. `Map<K, V>` → retrieve-or-synthesize a map entry plus wrapper;
/// 5. the sentinel.
pub fn resolve_classifier(store: &mut MetamodelStore, name: &str) -> ClassifierId {
    if let Some(id) = primitive_id(name) {
        return id;
    }

    if let Some(id) = store.package.lookup(name) {
        match store.package.classifier(id) {
            Classifier::Class(_) | Classifier::Enum(_) => return id,
            Classifier::Primitive(_) | Classifier::Sentinel => {}
        }
    }

    if let Some(id) = resolve_wrapper(store, name) {
        return id;
    }

    tracing::trace!(name, "canonical name did not resolve, using sentinel");
    builtin::EOBJECT
}

/// Retrieve or synthesize the wrapper for an array or map shaped canonical
/// name. Plain names return `None`; pass 2 uses this to give array and map
/// typed fields a concrete target instead of dropping them.
pub(crate) fn resolve_wrapper(store: &mut MetamodelStore, name: &str) -> Option<ClassifierId> {
    if let Some(component) = name.strip_suffix("[]") {
        return Some(array_wrapper(store, name, component));
    }

    if let Some((key, value)) = split_map_arguments(name) {
        let (key, value) = (key.to_string(), value.to_string());
        return Some(map_wrapper(store, name, &key, &value));
    }

    None
}

/// Wrapper class exposing one unbounded containment reference `values` to
/// the component classifier.
fn array_wrapper(store: &mut MetamodelStore, canonical: &str, component: &str) -> ClassifierId {
    if let Some(id) = store.cached_synthetic(canonical) {
        return id;
    }

    let component_id = resolve_classifier(store, component);
    let wrapper_name = format!("{}Array", store.package.classifier_name(component_id));
    let wrapper = store.package.add_class(&wrapper_name, false, false);
    if let Some(class) = store.package.class_mut(wrapper) {
        class.features.push(Feature::Reference(Reference {
            name: SmolStr::new("values"),
            target: component_id,
            lower: 0,
            upper: UNBOUNDED,
            containment: true,
            opposite: None,
            annotations: Vec::new(),
        }));
    }

    store.cache_synthetic(canonical.to_string(), wrapper);
    tracing::debug!(canonical, wrapper = %wrapper_name, "synthesized array wrapper");
    wrapper
}

/// Entry classifier (key attribute + value reference) plus a wrapper class
/// holding an unbounded containment reference to the entries.
fn map_wrapper(
    store: &mut MetamodelStore,
    canonical: &str,
    key: &str,
    value: &str,
) -> ClassifierId {
    if let Some(id) = store.cached_synthetic(canonical) {
        return id;
    }

    let key_id = resolve_classifier(store, key);
    let value_id = resolve_classifier(store, value);

    // Entry keys must be datatypes; class-typed keys degrade to string keys.
    let key_type = match store.package.classifier(key_id) {
        Classifier::Primitive(_) => key_id,
        _ => builtin::ESTRING,
    };

    let key_name = store.package.classifier_name(key_id).to_string();
    let value_name = store.package.classifier_name(value_id).to_string();
    let entry_name = format!("{key_name}To{value_name}MapEntry");
    let wrapper_name = format!("{key_name}To{value_name}Map");

    let entry = store.package.add_class(&entry_name, false, false);
    if let Some(class) = store.package.class_mut(entry) {
        class.features.push(Feature::Attribute(Attribute {
            name: SmolStr::new("key"),
            ty: key_type,
            annotations: Vec::new(),
        }));
        class.features.push(Feature::Reference(Reference {
            name: SmolStr::new("value"),
            target: value_id,
            lower: 0,
            upper: 1,
            containment: false,
            opposite: None,
            annotations: Vec::new(),
        }));
    }

    let wrapper = store.package.add_class(&wrapper_name, false, false);
    if let Some(class) = store.package.class_mut(wrapper) {
        class.features.push(Feature::Reference(Reference {
            name: SmolStr::new("entries"),
            target: entry,
            lower: 0,
            upper: UNBOUNDED,
            containment: true,
            opposite: None,
            annotations: Vec::new(),
        }));
    }

    store.cache_synthetic(canonical.to_string(), wrapper);
    tracing::debug!(canonical, wrapper = %wrapper_name, "synthesized map wrapper");
    wrapper
}

/// Split `Map<K, V>` into its two top-level arguments, if the name has that
/// shape. Nested angle brackets in the arguments are respected.
fn split_map_arguments(name: &str) -> Option<(&str, &str)> {
    let inner = name.strip_prefix("Map<")?.strip_suffix('>')?;
    let mut depth = 0u32;
    let mut split = None;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                if split.is_some() {
                    // More than two top-level arguments: not a map shape.
                    return None;
                }
                split = Some(i);
            }
            _ => {}
        }
    }
    let i = split?;
    let key = inner[..i].trim();
    let value = inner[i + 1..].trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}
