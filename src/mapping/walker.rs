//! Pass 1: walking compilation units into the store.
//!
//! Dispatches per declaration kind in file-declaration order. Each declared
//! classifier is registered immediately; primitive-typed fields and
//! operations are extracted inline, while class-typed fields and supertype
//! clauses become deferred requests for pass 2.

use crate::parser::{
    ClassDecl, CompilationUnit, EnumDecl, FieldDecl, InterfaceDecl, MethodDecl, TypeArg, TypeDecl,
    TypeRef, TypeRefKind,
};

use super::classifier::{primitive_id, resolve_classifier};
use super::features::{
    add_attribute, add_enum_literal, add_operation, add_parameter, set_return_type,
};
use super::store::MetamodelStore;
use super::type_name::type_name;
use crate::ecore::ClassifierId;

/// Walk one file's declarations into the store.
pub fn walk_unit(store: &mut MetamodelStore, unit: &CompilationUnit) {
    if let Some(package) = &unit.package {
        // The package is named after the last segment of the first package
        // declaration encountered.
        let simple = package.rsplit('.').next().unwrap_or(package);
        store.set_package_name(simple);
    }

    for decl in &unit.types {
        match decl {
            TypeDecl::Class(class) => walk_class(store, class),
            TypeDecl::Interface(interface) => walk_interface(store, interface),
            TypeDecl::Enum(enumeration) => walk_enum(store, enumeration),
        }
    }
}

fn walk_class(store: &mut MetamodelStore, decl: &ClassDecl) {
    let id = store.package.add_class(&decl.name, decl.is_abstract, false);
    tracing::trace!(class = %decl.name, "registered class");

    if let Some(superclass) = &decl.extends {
        store.defer_supertype(id, type_name(Some(superclass)));
    }
    for interface in &decl.implements {
        store.defer_supertype(id, type_name(Some(interface)));
    }

    for field in &decl.fields {
        walk_field(store, id, field);
    }
    for method in &decl.methods {
        walk_method(store, id, method);
    }
}

fn walk_interface(store: &mut MetamodelStore, decl: &InterfaceDecl) {
    let id = store.package.add_class(&decl.name, true, true);
    tracing::trace!(interface = %decl.name, "registered interface");

    for extended in &decl.extends {
        store.defer_supertype(id, type_name(Some(extended)));
    }
}

fn walk_enum(store: &mut MetamodelStore, decl: &EnumDecl) {
    let id = store.package.add_enum(&decl.name);
    tracing::trace!(enumeration = %decl.name, "registered enum");

    // Ordinals are declaration order from zero, regardless of any explicit
    // constructor values in the source.
    for (ordinal, constant) in decl.constants.iter().enumerate() {
        add_enum_literal(&mut store.package, id, constant, ordinal as u32);
    }
}

fn walk_field(store: &mut MetamodelStore, class: ClassifierId, field: &FieldDecl) {
    // Only the first declarator of a multi-declarator field is mapped.
    let Some(name) = field.names.first() else {
        return;
    };

    let canonical = type_name(Some(&field.ty));
    if let Some(primitive) = primitive_id(&canonical) {
        add_attribute(&mut store.package, class, name, primitive);
        return;
    }

    // Collection fields defer a non-containment reference to the element
    // type; every other class-typed field defers a containment reference.
    if let Some(element) = collection_element(&field.ty) {
        store.defer_reference(class, type_name(Some(element)), name, false);
    } else {
        store.defer_reference(class, canonical, name, true);
    }
}

fn walk_method(store: &mut MetamodelStore, class: ClassifierId, method: &MethodDecl) {
    let Some(operation) = add_operation(&mut store.package, class, &method.name) else {
        return;
    };

    for param in &method.params {
        let ty = resolve_classifier(store, &type_name(Some(&param.ty)));
        add_parameter(&mut store.package, class, operation, &param.name, ty);
    }

    let return_type = method
        .return_type
        .as_ref()
        .map(|ty| resolve_classifier(store, &type_name(Some(ty))));
    set_return_type(&mut store.package, class, operation, return_type);
}

/// Element type of a single-argument `List`/`Set` field, if it has that shape.
fn collection_element(ty: &TypeRef) -> Option<&TypeRef> {
    if ty.dims != 0 {
        return None;
    }
    let TypeRefKind::Named { path, args } = &ty.kind else {
        return None;
    };
    let simple = path.last()?;
    if simple != "List" && simple != "Set" {
        return None;
    }
    match args.as_slice() {
        [TypeArg::Type(element)] => Some(element),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_java;

    fn walked(sources: &[&str]) -> MetamodelStore {
        let mut store = MetamodelStore::new();
        for source in sources {
            let unit = parse_java(source).expect("parse");
            walk_unit(&mut store, &unit);
        }
        store
    }

    #[test]
    fn primitive_fields_become_attributes_inline() {
        let store = walked(&["class P { int count; String label; }"]);
        let id = store.package.lookup_class("P").expect("P");
        let class = store.package.class(id).expect("class");
        assert_eq!(class.features.len(), 2);
        assert_eq!(store.pending_reference_count(), 0);
    }

    #[test]
    fn class_typed_fields_are_deferred() {
        let store = walked(&["class A { B child; List<B> items; }"]);
        assert_eq!(store.pending_reference_count(), 2);
        let id = store.package.lookup_class("A").expect("A");
        let class = store.package.class(id).expect("class");
        assert!(class.features.is_empty(), "references must wait for pass 2");
    }

    #[test]
    fn package_name_first_declaration_wins() {
        let store = walked(&[
            "package com.example.shop; class A {}",
            "package com.example.other; class B {}",
        ]);
        assert_eq!(store.package.name, "shop");
    }

    #[test]
    fn enum_ordinals_follow_declaration_order() {
        let store = walked(&["enum Color { RED(5), GREEN(99), BLUE; }"]);
        let id = store.package.lookup("Color").expect("Color");
        let e = store.package.enumeration(id).expect("enum");
        let ordinals: Vec<_> = e.literals.iter().map(|l| l.value).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
    }

    #[test]
    fn interfaces_register_abstract() {
        let store = walked(&["interface Payable {}"]);
        let id = store.package.lookup_class("Payable").expect("Payable");
        let class = store.package.class(id).expect("class");
        assert!(class.is_interface);
        assert!(class.is_abstract);
    }

    #[test]
    fn operation_parameters_and_returns_resolve() {
        let store = walked(&[
            "class Order {}",
            "class Svc { Order find(int id); void drop(Order o); int[] ids(); }",
        ]);
        let id = store.package.lookup_class("Svc").expect("Svc");
        let class = store.package.class(id).expect("class");
        assert_eq!(class.operations.len(), 3);

        let find = &class.operations[0];
        assert_eq!(
            find.return_type,
            store.package.lookup_class("Order"),
        );
        assert_eq!(find.params[0].ty, crate::ecore::builtin::EINT);

        assert_eq!(class.operations[1].return_type, None);

        // `int[]` return synthesizes the array wrapper.
        let wrapper = class.operations[2].return_type.expect("wrapper");
        assert_eq!(store.package.classifier_name(wrapper), "EIntArray");
    }
}
