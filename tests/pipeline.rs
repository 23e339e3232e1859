//! End-to-end pipeline tests: source directory in, `.ecore` file out.

use std::path::Path;

use j2ecore::{generate, generate_metamodel};

fn write_file(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).expect("write source");
}

#[test]
fn full_run_produces_a_resolved_exported_model() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_file(
        dir.path(),
        "Library.java",
        r#"
        package demo.library;

        public class Library {
            String name;
            Shelf shelf;

            public String getName() { return name; }
            public int countBooks() { return 0; }
        }
        "#,
    );
    write_file(
        dir.path(),
        "Shelf.java",
        r#"
        package demo.library;

        public class Shelf {
            Library library;
            List<Book> books;
        }
        "#,
    );
    write_file(
        dir.path(),
        "Book.java",
        r#"
        package demo.library;

        public class Book {
            String title;
            int pages;
            Genre genre;
        }
        "#,
    );
    write_file(
        dir.path(),
        "Genre.java",
        "package demo.library; public enum Genre { FICTION, NONFICTION, REFERENCE }",
    );

    let out = dir.path().join("library.ecore");
    let package = generate(dir.path(), &out).expect("generate");

    assert_eq!(package.name, "library");
    assert!(package.lookup_class("Library").is_some());
    assert!(package.lookup_class("Shelf").is_some());
    assert!(package.lookup_class("Book").is_some());
    assert!(package.lookup("Genre").is_some());

    let xml = std::fs::read_to_string(&out).expect("read output");
    assert!(xml.contains("nsPrefix=\"library\""));
    // Library.shelf / Shelf.library pair up bidirectionally.
    assert!(xml.contains("eOpposite=\"#//Shelf/library\""));
    assert!(xml.contains("eOpposite=\"#//Library/shelf\""));
    // The accessor collision on `name` renamed the operation.
    assert!(xml.contains("name=\"op_getName\""));
    assert!(xml.contains("<eLiterals name=\"NONFICTION\" value=\"1\"/>"));
}

#[test]
fn file_order_does_not_change_the_outcome() {
    // Same declarations split across differently named files, so the sorted
    // traversal visits them in opposite orders.
    let build = |first: &str, second: &str| {
        let dir = tempfile::tempdir().expect("tempdir");
        write_file(dir.path(), first, "class Parent { Child child; }");
        write_file(dir.path(), second, "class Child { Parent owner; }");
        generate_metamodel(dir.path()).expect("generate")
    };

    for package in [build("A.java", "Z.java"), build("Z.java", "A.java")] {
        let parent = package.lookup_class("Parent").expect("Parent");
        let child = package.lookup_class("Child").expect("Child");
        let class = package.class(parent).expect("class");
        assert_eq!(class.features.len(), 1);
        match &class.features[0] {
            j2ecore::Feature::Reference(r) => {
                assert_eq!(r.target, child);
                assert!(r.opposite.is_some());
            }
            other => panic!("expected reference, got {other:?}"),
        }
    }
}

#[test]
fn broken_file_skipped_rest_of_run_survives() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_file(dir.path(), "Fine.java", "class Fine { int x; }");
    write_file(dir.path(), "Broken.java", "clazz Oops (");

    let package = generate_metamodel(dir.path()).expect("generate");
    assert!(package.lookup_class("Fine").is_some());
    assert!(package.lookup_class("Oops").is_none());
}
