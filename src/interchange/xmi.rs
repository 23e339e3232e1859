//! Ecore XMI serialization.
//!
//! Writes the produced [`Package`] as a standard `.ecore` document:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <ecore:EPackage xmi:version="2.0" xmlns:xmi="http://www.omg.org/XMI"
//!                 xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
//!                 xmlns:ecore="http://www.eclipse.org/emf/2002/Ecore"
//!                 name="shop" nsURI="https://www.example.org/shop" nsPrefix="shop">
//!   <eClassifiers xsi:type="ecore:EClass" name="Order">
//!     <eStructuralFeatures xsi:type="ecore:EAttribute" name="total"
//!         eType="ecore:EDataType http://www.eclipse.org/emf/2002/Ecore#//EInt"/>
//!   </eClassifiers>
//! </ecore:EPackage>
//! ```
//!
//! Builtin datatypes and the sentinel serialize as references into the
//! Ecore builtin package; everything else is package-local (`#//Name`).

use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::ecore::{
    has_errors, validate, Annotation, Classifier, ClassifierId, DataClass, EnumClassifier,
    Feature, Package, Severity,
};
use crate::error::ModelError;

/// Namespace URIs for the Ecore XMI dialect.
pub mod namespace {
    pub const XMI: &str = "http://www.omg.org/XMI";
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
    pub const ECORE: &str = "http://www.eclipse.org/emf/2002/Ecore";
}

/// Validate the package, then write it to `path` as Ecore XMI.
///
/// Validation failures are fatal to the export step only: the caller keeps
/// the (possibly ill-formed) package it passed in.
pub fn export_model(package: &Package, path: &Path) -> Result<(), ModelError> {
    let diagnostics = validate(package);
    for diagnostic in diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
    {
        tracing::warn!(%diagnostic, "model validation warning");
    }
    if has_errors(&diagnostics) {
        let messages: Vec<String> = diagnostics.iter().map(|d| d.to_string()).collect();
        return Err(ModelError::Validation(messages.join("\n")));
    }
    tracing::debug!("model validation passed");

    let bytes = write_xmi(package)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Serialize the package to XMI bytes, without validating first.
pub fn write_xmi(package: &Package) -> Result<Vec<u8>, ModelError> {
    XmiWriter::new().write(package)
}

/// Ecore XMI document writer.
pub struct XmiWriter;

impl XmiWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(&self, package: &Package) -> Result<Vec<u8>, ModelError> {
        let mut buffer = Vec::new();
        let mut writer = Writer::new_with_indent(&mut buffer, b' ', 2);

        write_event(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;

        let mut root = BytesStart::new("ecore:EPackage");
        root.push_attribute(("xmi:version", "2.0"));
        root.push_attribute(("xmlns:xmi", namespace::XMI));
        root.push_attribute(("xmlns:xsi", namespace::XSI));
        root.push_attribute(("xmlns:ecore", namespace::ECORE));
        root.push_attribute(("name", package.name.as_str()));
        root.push_attribute(("nsURI", package.ns_uri.as_str()));
        root.push_attribute(("nsPrefix", package.ns_prefix.as_str()));
        write_event(&mut writer, Event::Start(root))?;

        for (_, classifier) in package.user_classifiers() {
            match classifier {
                Classifier::Class(class) => self.write_class(&mut writer, package, class)?,
                Classifier::Enum(enumeration) => self.write_enum(&mut writer, enumeration)?,
                // Builtins never appear past the user_classifiers filter.
                Classifier::Primitive(_) | Classifier::Sentinel => {}
            }
        }

        write_event(&mut writer, Event::End(BytesEnd::new("ecore:EPackage")))?;

        buffer.push(b'\n');
        Ok(buffer)
    }

    fn write_class<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        package: &Package,
        class: &DataClass,
    ) -> Result<(), ModelError> {
        let mut start = BytesStart::new("eClassifiers");
        start.push_attribute(("xsi:type", "ecore:EClass"));
        start.push_attribute(("name", class.name.as_str()));
        if class.is_abstract {
            start.push_attribute(("abstract", "true"));
        }
        if class.is_interface {
            start.push_attribute(("interface", "true"));
        }
        if !class.supertypes.is_empty() {
            let supertypes: Vec<String> = class
                .supertypes
                .iter()
                .map(|&id| format!("#//{}", package.classifier_name(id)))
                .collect();
            start.push_attribute(("eSuperTypes", supertypes.join(" ").as_str()));
        }

        if class.features.is_empty() && class.operations.is_empty() {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        for feature in &class.features {
            self.write_feature(writer, package, feature)?;
        }
        for operation in &class.operations {
            self.write_operation(writer, package, operation)?;
        }
        write_event(writer, Event::End(BytesEnd::new("eClassifiers")))
    }

    fn write_feature<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        package: &Package,
        feature: &Feature,
    ) -> Result<(), ModelError> {
        let mut start = BytesStart::new("eStructuralFeatures");
        let annotations = match feature {
            Feature::Attribute(attribute) => {
                start.push_attribute(("xsi:type", "ecore:EAttribute"));
                start.push_attribute(("name", attribute.name.as_str()));
                start.push_attribute(("eType", type_href(package, attribute.ty).as_str()));
                &attribute.annotations
            }
            Feature::Reference(reference) => {
                start.push_attribute(("xsi:type", "ecore:EReference"));
                start.push_attribute(("name", reference.name.as_str()));
                start.push_attribute(("eType", type_href(package, reference.target).as_str()));
                if reference.lower != 0 {
                    start.push_attribute(("lowerBound", reference.lower.to_string().as_str()));
                }
                if reference.upper != 1 {
                    start.push_attribute(("upperBound", reference.upper.to_string().as_str()));
                }
                if reference.containment {
                    start.push_attribute(("containment", "true"));
                }
                if let Some(opposite) = reference.opposite {
                    if let Some(other) = package.class(opposite.class) {
                        if let Some(other_feature) = other.features.get(opposite.feature) {
                            let href =
                                format!("#//{}/{}", other.name, other_feature.name());
                            start.push_attribute(("eOpposite", href.as_str()));
                        }
                    }
                }
                &reference.annotations
            }
        };

        if annotations.is_empty() {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        for annotation in annotations {
            self.write_annotation(writer, annotation)?;
        }
        write_event(writer, Event::End(BytesEnd::new("eStructuralFeatures")))
    }

    fn write_operation<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        package: &Package,
        operation: &crate::ecore::Operation,
    ) -> Result<(), ModelError> {
        let mut start = BytesStart::new("eOperations");
        start.push_attribute(("name", operation.name.as_str()));
        if let Some(return_type) = operation.return_type {
            start.push_attribute(("eType", type_href(package, return_type).as_str()));
        }

        if operation.params.is_empty() {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        for param in &operation.params {
            let mut param_start = BytesStart::new("eParameters");
            param_start.push_attribute(("name", param.name.as_str()));
            param_start.push_attribute(("eType", type_href(package, param.ty).as_str()));
            write_event(writer, Event::Empty(param_start))?;
        }
        write_event(writer, Event::End(BytesEnd::new("eOperations")))
    }

    fn write_enum<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        enumeration: &EnumClassifier,
    ) -> Result<(), ModelError> {
        let mut start = BytesStart::new("eClassifiers");
        start.push_attribute(("xsi:type", "ecore:EEnum"));
        start.push_attribute(("name", enumeration.name.as_str()));

        if enumeration.literals.is_empty() {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        for literal in &enumeration.literals {
            let mut literal_start = BytesStart::new("eLiterals");
            literal_start.push_attribute(("name", literal.name.as_str()));
            if literal.value != 0 {
                literal_start.push_attribute(("value", literal.value.to_string().as_str()));
            }
            write_event(writer, Event::Empty(literal_start))?;
        }
        write_event(writer, Event::End(BytesEnd::new("eClassifiers")))
    }

    fn write_annotation<W: std::io::Write>(
        &self,
        writer: &mut Writer<W>,
        annotation: &Annotation,
    ) -> Result<(), ModelError> {
        let mut start = BytesStart::new("eAnnotations");
        start.push_attribute(("source", annotation.source.as_str()));

        if annotation.details.is_empty() {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        for (key, value) in &annotation.details {
            let mut detail = BytesStart::new("details");
            detail.push_attribute(("key", key.as_str()));
            detail.push_attribute(("value", value.as_str()));
            write_event(writer, Event::Empty(detail))?;
        }
        write_event(writer, Event::End(BytesEnd::new("eAnnotations")))
    }
}

impl Default for XmiWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// eType href for a classifier: builtin datatypes and the sentinel point
/// into the Ecore builtin package, everything else is package-local.
fn type_href(package: &Package, id: ClassifierId) -> String {
    match package.classifier(id) {
        Classifier::Primitive(primitive) => format!(
            "ecore:EDataType http://www.eclipse.org/emf/2002/Ecore#//{}",
            primitive.name()
        ),
        Classifier::Sentinel => {
            "ecore:EClass http://www.eclipse.org/emf/2002/Ecore#//EObject".to_string()
        }
        Classifier::Class(class) => format!("#//{}", class.name),
        Classifier::Enum(enumeration) => format!("#//{}", enumeration.name),
    }
}

fn write_event<W: std::io::Write>(
    writer: &mut Writer<W>,
    event: Event<'_>,
) -> Result<(), ModelError> {
    writer
        .write_event(event)
        .map_err(|e| ModelError::xml(format!("write error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecore::{builtin, Attribute, FeatureRef, Reference, UNBOUNDED};
    use smol_str::SmolStr;

    fn xmi_string(package: &Package) -> String {
        String::from_utf8(write_xmi(package).expect("write")).expect("utf8")
    }

    fn sample_package() -> Package {
        let mut package = Package::new();
        package.set_name("shop");

        let order = package.add_class("Order", false, false);
        let item = package.add_class("Item", false, false);

        if let Some(class) = package.class_mut(order) {
            class.features.push(Feature::Attribute(Attribute {
                name: SmolStr::new("total"),
                ty: builtin::EINT,
                annotations: Vec::new(),
            }));
            class.features.push(Feature::Reference(Reference {
                name: SmolStr::new("items"),
                target: item,
                lower: 0,
                upper: UNBOUNDED,
                containment: true,
                opposite: Some(FeatureRef {
                    class: item,
                    feature: 0,
                }),
                annotations: Vec::new(),
            }));
        }
        if let Some(class) = package.class_mut(item) {
            class.features.push(Feature::Reference(Reference {
                name: SmolStr::new("order"),
                target: order,
                lower: 0,
                upper: 1,
                containment: false,
                opposite: Some(FeatureRef {
                    class: order,
                    feature: 1,
                }),
                annotations: Vec::new(),
            }));
        }
        package
    }

    #[test]
    fn package_header_attributes() {
        let xml = xmi_string(&sample_package());
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<ecore:EPackage"));
        assert!(xml.contains("name=\"shop\""));
        assert!(xml.contains("nsURI=\"https://www.example.org/shop\""));
        assert!(xml.contains("nsPrefix=\"shop\""));
    }

    #[test]
    fn builtins_are_not_serialized_as_classifiers() {
        let xml = xmi_string(&sample_package());
        assert!(!xml.contains("name=\"EInt\""));
        assert!(xml.contains("ecore:EDataType http://www.eclipse.org/emf/2002/Ecore#//EInt"));
    }

    #[test]
    fn references_carry_multiplicity_containment_and_opposite() {
        let xml = xmi_string(&sample_package());
        assert!(xml.contains("xsi:type=\"ecore:EReference\""));
        assert!(xml.contains("upperBound=\"-1\""));
        assert!(xml.contains("containment=\"true\""));
        assert!(xml.contains("eOpposite=\"#//Item/order\""));
        assert!(xml.contains("eOpposite=\"#//Order/items\""));
    }

    #[test]
    fn enums_and_literals() {
        let mut package = Package::new();
        let colors = package.add_enum("Color");
        crate::mapping::add_enum_literal(&mut package, colors, "RED", 0);
        crate::mapping::add_enum_literal(&mut package, colors, "GREEN", 1);
        let xml = xmi_string(&package);
        assert!(xml.contains("xsi:type=\"ecore:EEnum\""));
        assert!(xml.contains("<eLiterals name=\"RED\"/>"));
        assert!(xml.contains("<eLiterals name=\"GREEN\" value=\"1\"/>"));
    }

    #[test]
    fn annotations_serialize_with_details() {
        let mut package = Package::new();
        let class = package.add_class("C", false, false);
        if let Some(c) = package.class_mut(class) {
            c.features.push(Feature::Attribute(Attribute {
                name: SmolStr::new("name"),
                ty: builtin::ESTRING,
                annotations: vec![Annotation::documentation("original name 'getName'")],
            }));
        }
        let xml = xmi_string(&package);
        assert!(xml.contains("eAnnotations source=\"http://www.eclipse.org/emf/2002/GenModel\""));
        assert!(xml.contains("key=\"documentation\""));
    }

    #[test]
    fn validation_failure_blocks_export() {
        let mut package = Package::new();
        package.add_class("Dup", false, false);
        package.add_class("Dup", false, false);
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.ecore");
        let result = export_model(&package, &path);
        assert!(matches!(result, Err(ModelError::Validation(_))));
        assert!(!path.exists());
    }

    #[test]
    fn export_writes_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("shop.ecore");
        export_model(&sample_package(), &path).expect("export");
        let contents = std::fs::read_to_string(&path).expect("read");
        assert!(contents.contains("<ecore:EPackage"));
    }
}
