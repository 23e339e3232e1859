//! Engine-level tests: walking parsed sources through both passes and
//! checking the resulting package, independent of the filesystem driver.

use j2ecore::ecore::{builtin, Feature, FeatureRef, Package, Reference, UNBOUNDED};
use j2ecore::mapping::{resolve_deferred, walk_unit, MetamodelStore};
use j2ecore::parser::parse_java;

/// Walk each source as its own file, in order, then run pass 2.
fn extract(sources: &[&str]) -> Package {
    let mut store = MetamodelStore::new();
    for source in sources {
        let unit = parse_java(source).expect("parse");
        walk_unit(&mut store, &unit);
    }
    resolve_deferred(&mut store);
    store.into_package()
}

fn reference<'a>(package: &'a Package, class: &str, name: &str) -> &'a Reference {
    let id = package.lookup_class(class).expect(class);
    let class = package.class(id).expect("class");
    class
        .features
        .iter()
        .find_map(|f| match f {
            Feature::Reference(r) if r.name == name => Some(r),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no reference `{name}` on `{class:?}`"))
}

#[test]
fn forward_reference_resolves_when_target_file_comes_later() {
    let package = extract(&["class A { B child; }", "class B {}"]);
    let b = package.lookup_class("B").expect("B");

    let child = reference(&package, "A", "child");
    assert_eq!(child.target, b);
    assert!(child.containment);
    assert_eq!(child.lower, 0);
    assert_eq!(child.upper, UNBOUNDED);
}

#[test]
fn supertypes_are_independent_of_file_order() {
    for sources in [
        &["class C1 extends C2 {}", "class C2 {}"],
        &["class C2 {}", "class C1 extends C2 {}"],
    ] {
        let package = extract(sources);
        let c1 = package.lookup_class("C1").expect("C1");
        let c2 = package.lookup_class("C2").expect("C2");
        let supertypes = &package.class(c1).expect("class").supertypes;
        assert!(supertypes.contains(&c2), "sources: {sources:?}");
    }
}

#[test]
fn implements_clauses_link_like_extends() {
    let package = extract(&[
        "class Invoice implements Payable, Auditable {}",
        "interface Payable {}",
        "interface Auditable {}",
    ]);
    let invoice = package.lookup_class("Invoice").expect("Invoice");
    assert_eq!(package.class(invoice).expect("class").supertypes.len(), 2);
}

#[test]
fn bidirectional_references_pair_symmetrically() {
    let package = extract(&["class A { B children; }", "class B { A parent; }"]);
    let a = package.lookup_class("A").expect("A");
    let b = package.lookup_class("B").expect("B");

    let children = reference(&package, "A", "children");
    let parent = reference(&package, "B", "parent");

    assert_eq!(
        children.opposite,
        Some(FeatureRef {
            class: b,
            feature: 0
        })
    );
    assert_eq!(
        parent.opposite,
        Some(FeatureRef {
            class: a,
            feature: 0
        })
    );
}

#[test]
fn opposite_pairing_is_greedy_on_first_typed_match() {
    // Q declares two P-typed references; each incoming pairing takes the
    // first, so the later pairing steals it and the stale link is cleared.
    let package = extract(&["class P { Q link; }", "class Q { P one; P two; }"]);
    let p = package.lookup_class("P").expect("P");
    let q = package.lookup_class("Q").expect("Q");

    let link = reference(&package, "P", "link");
    let one = reference(&package, "Q", "one");
    let two = reference(&package, "Q", "two");

    assert_eq!(
        link.opposite,
        Some(FeatureRef {
            class: q,
            feature: 1
        })
    );
    assert_eq!(
        two.opposite,
        Some(FeatureRef {
            class: p,
            feature: 0
        })
    );
    assert_eq!(one.opposite, None, "stale pairing must be unlinked");
}

#[test]
fn collection_fields_become_non_containment_single_bound_references() {
    let package = extract(&["class Cart { List<Item> items; Set<Item> extras; }", "class Item {}"]);
    let items = reference(&package, "Cart", "items");
    assert!(!items.containment);
    assert_eq!(items.upper, 1);
    let extras = reference(&package, "Cart", "extras");
    assert!(!extras.containment);
}

#[test]
fn unresolved_reference_targets_are_dropped_quietly() {
    let package = extract(&["class A { External thing; int kept; }"]);
    let a = package.lookup_class("A").expect("A");
    let class = package.class(a).expect("class");
    // Only the attribute survives; the run still completes.
    assert_eq!(class.features.len(), 1);
    assert_eq!(class.features[0].name(), "kept");
}

#[test]
fn enum_ordinals_ignore_explicit_values() {
    let package = extract(&["enum Color { RED(0xff0000), GREEN(0x00ff00), BLUE(0x0000ff); }"]);
    let id = package.lookup("Color").expect("Color");
    let colors = package.enumeration(id).expect("enum");
    let pairs: Vec<(&str, u32)> = colors
        .literals
        .iter()
        .map(|l| (l.name.as_str(), l.value))
        .collect();
    assert_eq!(pairs, vec![("RED", 0), ("GREEN", 1), ("BLUE", 2)]);
}

#[test]
fn accessor_collision_renames_operation_and_annotates_feature() {
    let package = extract(&[
        "class Person { String name; String getName() { return name; } String getOther() { return null; } }",
    ]);
    let person = package.lookup_class("Person").expect("Person");
    let class = package.class(person).expect("class");

    let names: Vec<&str> = class.operations.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["op_getName", "getOther"]);

    match &class.features[0] {
        Feature::Attribute(attribute) => {
            assert_eq!(attribute.annotations.len(), 1);
            assert!(attribute.annotations[0]
                .details
                .iter()
                .any(|(k, v)| k == "documentation" && v.contains("getName")));
        }
        other => panic!("expected attribute, got {other:?}"),
    }
}

#[test]
fn array_return_types_share_one_cached_wrapper() {
    let package = extract(&[
        "class A { int[] first() { return null; } }",
        "class B { int[] second() { return null; } }",
    ]);
    let a = package.lookup_class("A").expect("A");
    let b = package.lookup_class("B").expect("B");
    let first = package.class(a).expect("A").operations[0]
        .return_type
        .expect("return");
    let second = package.class(b).expect("B").operations[0]
        .return_type
        .expect("return");
    assert_eq!(first, second, "same canonical name, same wrapper instance");

    let wrapper = package.class(first).expect("wrapper");
    assert_eq!(wrapper.name, "EIntArray");
    assert_eq!(wrapper.features.len(), 1);
    match &wrapper.features[0] {
        Feature::Reference(values) => {
            assert_eq!(values.name, "values");
            assert_eq!(values.target, builtin::EINT);
            assert_eq!(values.upper, UNBOUNDED);
            assert!(values.containment);
        }
        other => panic!("expected reference, got {other:?}"),
    }
}

#[test]
fn array_fields_resolve_to_the_synthetic_wrapper() {
    let package = extract(&["class C { int[] values; }"]);
    let wrapper = package.lookup_class("EIntArray").expect("wrapper");

    let field = reference(&package, "C", "values");
    assert_eq!(field.target, wrapper);
    assert!(field.containment);
    assert_eq!(field.upper, UNBOUNDED);

    let wrapper_class = package.class(wrapper).expect("class");
    assert_eq!(wrapper_class.features.len(), 1);
    match &wrapper_class.features[0] {
        Feature::Reference(values) => {
            assert_eq!(values.name, "values");
            assert_eq!(values.target, builtin::EINT);
            assert_eq!(values.upper, UNBOUNDED);
            assert!(values.containment);
        }
        other => panic!("expected reference, got {other:?}"),
    }
}

#[test]
fn map_fields_resolve_to_the_synthetic_map_wrapper() {
    let package = extract(&["class Index { Map<String, Entry> byName; }", "class Entry {}"]);
    let wrapper = package.lookup_class("EStringToEntryMap").expect("wrapper");
    let by_name = reference(&package, "Index", "byName");
    assert_eq!(by_name.target, wrapper);
    assert!(package.lookup_class("EStringToEntryMapEntry").is_some());
}

#[test]
fn unknown_parameter_types_fall_back_to_the_sentinel() {
    let package = extract(&["class S { void accept(com.example.External arg) {} }"]);
    let s = package.lookup_class("S").expect("S");
    let operation = &package.class(s).expect("class").operations[0];
    assert_eq!(operation.params[0].ty, builtin::EOBJECT);
}

#[test]
fn duplicate_attribute_names_are_preserved() {
    // Source fidelity: two fields with the same name both map.
    let package = extract(&["class D { int value; long value; }"]);
    let d = package.lookup_class("D").expect("D");
    let class = package.class(d).expect("class");
    assert_eq!(class.features.len(), 2);
    assert_eq!(class.features[0].name(), "value");
    assert_eq!(class.features[1].name(), "value");
}
