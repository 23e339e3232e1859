//! Structural validation of the produced metamodel.
//!
//! Runs before export, mirroring the diagnostician step of the original
//! pipeline: validation failures are fatal to export only, never to the
//! extraction run that produced the package.

use rustc_hash::FxHashSet;

use super::model::{Classifier, ClassifierId, Feature, Package};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// One validation finding.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{tag}: {}", self.message)
    }
}

/// True if any diagnostic is error severity.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

/// Validate the package for structural well-formedness.
pub fn validate(package: &Package) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if package.name.is_empty() {
        diagnostics.push(Diagnostic::error("package has no name".to_string()));
    }

    let mut seen_names: FxHashSet<&str> = FxHashSet::default();
    for (id, classifier) in package.classifiers() {
        let name = classifier.name();
        if name.is_empty() {
            diagnostics.push(Diagnostic::error(format!(
                "classifier {} has an empty name",
                id.0
            )));
        } else if !seen_names.insert(name) {
            diagnostics.push(Diagnostic::error(format!(
                "duplicate classifier name `{name}`"
            )));
        }

        match classifier {
            Classifier::Class(class) => {
                validate_class(package, id, class, &mut diagnostics);
            }
            Classifier::Enum(enumeration) => {
                for literal in &enumeration.literals {
                    if literal.name.is_empty() {
                        diagnostics.push(Diagnostic::error(format!(
                            "enum `{}` has a literal with an empty name",
                            enumeration.name
                        )));
                    }
                }
            }
            Classifier::Primitive(_) | Classifier::Sentinel => {}
        }
    }

    diagnostics
}

fn validate_class(
    package: &Package,
    id: ClassifierId,
    class: &crate::ecore::DataClass,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for &supertype in &class.supertypes {
        if !in_range(package, supertype) {
            diagnostics.push(Diagnostic::error(format!(
                "class `{}` has an out-of-range supertype id {}",
                class.name, supertype.0
            )));
        } else if package.class(supertype).is_none() {
            diagnostics.push(Diagnostic::error(format!(
                "class `{}` extends non-class classifier `{}`",
                class.name,
                package.classifier_name(supertype)
            )));
        }
    }

    for (index, feature) in class.features.iter().enumerate() {
        if feature.name().is_empty() {
            diagnostics.push(Diagnostic::error(format!(
                "class `{}` has a feature with an empty name",
                class.name
            )));
        }
        match feature {
            Feature::Attribute(attribute) => {
                if !in_range(package, attribute.ty) {
                    diagnostics.push(Diagnostic::error(format!(
                        "attribute `{}.{}` has an out-of-range type id",
                        class.name, attribute.name
                    )));
                } else if package.class(attribute.ty).is_some() {
                    diagnostics.push(Diagnostic::error(format!(
                        "attribute `{}.{}` is typed by a class, expected a datatype",
                        class.name, attribute.name
                    )));
                }
            }
            Feature::Reference(reference) => {
                if !in_range(package, reference.target) {
                    diagnostics.push(Diagnostic::error(format!(
                        "reference `{}.{}` has an out-of-range target id",
                        class.name, reference.name
                    )));
                    continue;
                }
                if reference.upper == 0 || reference.upper < -1 {
                    diagnostics.push(Diagnostic::error(format!(
                        "reference `{}.{}` has invalid upper bound {}",
                        class.name, reference.name, reference.upper
                    )));
                }
                if let Some(opposite) = reference.opposite {
                    validate_opposite(package, id, index, class, reference, opposite, diagnostics);
                }
            }
        }
    }
}

fn validate_opposite(
    package: &Package,
    id: ClassifierId,
    index: usize,
    class: &crate::ecore::DataClass,
    reference: &crate::ecore::Reference,
    opposite: crate::ecore::FeatureRef,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(other_class) = package.class(opposite.class) else {
        diagnostics.push(Diagnostic::error(format!(
            "reference `{}.{}` has an opposite on a non-class classifier",
            class.name, reference.name
        )));
        return;
    };
    match other_class.features.get(opposite.feature) {
        Some(Feature::Reference(other)) => {
            let symmetric = other.opposite
                == Some(crate::ecore::FeatureRef {
                    class: id,
                    feature: index,
                });
            if !symmetric {
                diagnostics.push(Diagnostic::error(format!(
                    "opposite of `{}.{}` (`{}.{}`) does not point back",
                    class.name, reference.name, other_class.name, other.name
                )));
            }
            if reference.containment && other.containment {
                diagnostics.push(Diagnostic::warning(format!(
                    "references `{}.{}` and `{}.{}` are mutual containments",
                    class.name, reference.name, other_class.name, other.name
                )));
            }
        }
        _ => diagnostics.push(Diagnostic::error(format!(
            "opposite of `{}.{}` is not a reference feature",
            class.name, reference.name
        ))),
    }
}

fn in_range(package: &Package, id: ClassifierId) -> bool {
    (id.index()) < package.len()
}
