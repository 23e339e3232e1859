//! Feature and operation construction.
//!
//! Append-only builders over a classifier's feature and operation lists.
//! Attribute appends are unconditional: duplicate attribute names across a
//! class are permitted source-fidelity behavior, not validated here.

use smol_str::SmolStr;

use crate::ecore::{
    Attribute, ClassifierId, EnumLiteral, Feature, Operation, Package, Parameter, Reference,
};

use super::naming::resolve_operation_name;

/// Append an attribute to a class. No duplicate-name detection by design.
pub fn add_attribute(package: &mut Package, class: ClassifierId, name: &str, ty: ClassifierId) {
    if let Some(class) = package.class_mut(class) {
        class.features.push(Feature::Attribute(Attribute {
            name: SmolStr::new(name),
            ty,
            annotations: Vec::new(),
        }));
    }
}

/// Append a reference feature and return its index in the feature list.
pub fn add_reference(
    package: &mut Package,
    class: ClassifierId,
    name: &str,
    target: ClassifierId,
    lower: u32,
    upper: i32,
    containment: bool,
) -> Option<usize> {
    let class = package.class_mut(class)?;
    class.features.push(Feature::Reference(Reference {
        name: SmolStr::new(name),
        target,
        lower,
        upper,
        containment,
        opposite: None,
        annotations: Vec::new(),
    }));
    Some(class.features.len() - 1)
}

/// Append an operation, passing the candidate name through accessor
/// conflict resolution first. Returns the operation's index for parameter
/// and return-type wiring.
pub fn add_operation(package: &mut Package, class: ClassifierId, name: &str) -> Option<usize> {
    let class = package.class_mut(class)?;
    let resolved = resolve_operation_name(class, name);
    class.operations.push(Operation {
        name: resolved,
        params: Vec::new(),
        return_type: None,
    });
    Some(class.operations.len() - 1)
}

pub fn add_parameter(
    package: &mut Package,
    class: ClassifierId,
    operation: usize,
    name: &str,
    ty: ClassifierId,
) {
    if let Some(op) = package
        .class_mut(class)
        .and_then(|c| c.operations.get_mut(operation))
    {
        op.params.push(Parameter {
            name: SmolStr::new(name),
            ty,
        });
    }
}

pub fn set_return_type(
    package: &mut Package,
    class: ClassifierId,
    operation: usize,
    ty: Option<ClassifierId>,
) {
    if let Some(op) = package
        .class_mut(class)
        .and_then(|c| c.operations.get_mut(operation))
    {
        op.return_type = ty;
    }
}

/// Append an enum literal; ordinals are the caller's discipline (strictly
/// increasing declaration order).
pub fn add_enum_literal(package: &mut Package, enumeration: ClassifierId, name: &str, value: u32) {
    if let crate::ecore::Classifier::Enum(e) = package.classifier_mut(enumeration) {
        e.literals.push(EnumLiteral {
            name: SmolStr::new(name),
            value,
        });
    }
}
