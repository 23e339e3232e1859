//! Metamodel data model and structural validation.

pub mod model;
pub mod validate;

pub use model::{
    builtin, Annotation, Attribute, Classifier, ClassifierId, DataClass, EnumClassifier,
    EnumLiteral, Feature, FeatureRef, Operation, Package, Parameter, PrimitiveKind, Reference,
    GENMODEL_SOURCE, UNBOUNDED,
};
pub use validate::{has_errors, validate, Diagnostic, Severity};
