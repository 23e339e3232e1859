//! Arena-style metamodel representation.
//!
//! The [`Package`] owns every classifier and hands out [`ClassifierId`]
//! indices. Classifiers and features are exhaustively matched tagged unions;
//! there is no dynamic dispatch and no silent fallback at this layer.
//!
//! ```text
//! Package
//! ├── classifiers: Vec<Classifier>        (builtins first, then declaration order)
//! └── by_name: IndexMap<SmolStr, ClassifierId>  (first registration wins)
//! ```

use indexmap::IndexMap;
use smol_str::SmolStr;

/// Upper bound value for unbounded multiplicity.
pub const UNBOUNDED: i32 = -1;

/// Annotation source URI used for documentation annotations.
pub const GENMODEL_SOURCE: &str = "http://www.eclipse.org/emf/2002/GenModel";

/// Index of a classifier within its [`Package`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassifierId(pub u32);

impl ClassifierId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Fixed ids of the pre-registered builtin classifiers.
pub mod builtin {
    use super::ClassifierId;

    pub const EINT: ClassifierId = ClassifierId(0);
    pub const EBOOLEAN: ClassifierId = ClassifierId(1);
    pub const EBYTE: ClassifierId = ClassifierId(2);
    pub const ESHORT: ClassifierId = ClassifierId(3);
    pub const ELONG: ClassifierId = ClassifierId(4);
    pub const EFLOAT: ClassifierId = ClassifierId(5);
    pub const EDOUBLE: ClassifierId = ClassifierId(6);
    pub const ECHAR: ClassifierId = ClassifierId(7);
    pub const ESTRING: ClassifierId = ClassifierId(8);
    /// The sentinel "any object" classifier.
    pub const EOBJECT: ClassifierId = ClassifierId(9);

    pub const COUNT: u32 = 10;
}

/// The builtin Ecore datatypes the engine maps Java primitives onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    EInt,
    EBoolean,
    EByte,
    EShort,
    ELong,
    EFloat,
    EDouble,
    EChar,
    EString,
}

impl PrimitiveKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::EInt => "EInt",
            Self::EBoolean => "EBoolean",
            Self::EByte => "EByte",
            Self::EShort => "EShort",
            Self::ELong => "ELong",
            Self::EFloat => "EFloat",
            Self::EDouble => "EDouble",
            Self::EChar => "EChar",
            Self::EString => "EString",
        }
    }
}

/// A named type in the metamodel.
#[derive(Debug, Clone)]
pub enum Classifier {
    /// Builtin Ecore datatype.
    Primitive(PrimitiveKind),
    /// Class or interface with features, operations, and supertypes.
    Class(DataClass),
    /// Enumeration with ordered literals.
    Enum(EnumClassifier),
    /// The fallback "any object" type (EObject).
    Sentinel,
}

impl Classifier {
    pub fn name(&self) -> &str {
        match self {
            Classifier::Primitive(p) => p.name(),
            Classifier::Class(c) => &c.name,
            Classifier::Enum(e) => &e.name,
            Classifier::Sentinel => "EObject",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataClass {
    pub name: SmolStr,
    pub is_abstract: bool,
    pub is_interface: bool,
    pub supertypes: Vec<ClassifierId>,
    pub features: Vec<Feature>,
    pub operations: Vec<Operation>,
}

impl DataClass {
    fn new(name: SmolStr, is_abstract: bool, is_interface: bool) -> Self {
        Self {
            name,
            is_abstract,
            is_interface,
            supertypes: Vec::new(),
            features: Vec::new(),
            operations: Vec::new(),
        }
    }
}

/// An attribute or reference owned by a [`DataClass`].
#[derive(Debug, Clone)]
pub enum Feature {
    Attribute(Attribute),
    Reference(Reference),
}

impl Feature {
    pub fn name(&self) -> &str {
        match self {
            Feature::Attribute(a) => &a.name,
            Feature::Reference(r) => &r.name,
        }
    }

    pub fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        match self {
            Feature::Attribute(a) => &mut a.annotations,
            Feature::Reference(r) => &mut r.annotations,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: SmolStr,
    pub ty: ClassifierId,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone)]
pub struct Reference {
    pub name: SmolStr,
    pub target: ClassifierId,
    pub lower: u32,
    /// Upper bound; [`UNBOUNDED`] for many-valued references.
    pub upper: i32,
    pub containment: bool,
    /// Back-reference of a bidirectional association. Symmetric by
    /// construction: if `a.opposite` points at `b`, `b.opposite` points at `a`.
    pub opposite: Option<FeatureRef>,
    pub annotations: Vec<Annotation>,
}

/// Position of a feature: owning classifier plus index into its feature list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureRef {
    pub class: ClassifierId,
    pub feature: usize,
}

#[derive(Debug, Clone)]
pub struct Operation {
    pub name: SmolStr,
    pub params: Vec<Parameter>,
    /// `None` for void operations.
    pub return_type: Option<ClassifierId>,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: SmolStr,
    pub ty: ClassifierId,
}

#[derive(Debug, Clone)]
pub struct EnumClassifier {
    pub name: SmolStr,
    pub literals: Vec<EnumLiteral>,
}

#[derive(Debug, Clone)]
pub struct EnumLiteral {
    pub name: SmolStr,
    pub value: u32,
}

/// A source/details annotation attached to a model element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub source: String,
    pub details: Vec<(String, String)>,
}

impl Annotation {
    /// Documentation annotation in GenModel style.
    pub fn documentation(text: impl Into<String>) -> Self {
        Self {
            source: GENMODEL_SOURCE.to_string(),
            details: vec![("documentation".to_string(), text.into())],
        }
    }
}

// ============================================================================
// PACKAGE
// ============================================================================

/// The root namespace owning every classifier produced by a run.
#[derive(Debug, Clone)]
pub struct Package {
    pub name: SmolStr,
    pub ns_uri: String,
    pub ns_prefix: String,
    classifiers: Vec<Classifier>,
    by_name: IndexMap<SmolStr, ClassifierId>,
}

impl Package {
    /// Create a package with the builtin datatypes and the sentinel
    /// pre-registered at fixed ids.
    pub fn new() -> Self {
        let mut package = Self {
            name: SmolStr::new("model"),
            ns_uri: "https://www.example.org/model".to_string(),
            ns_prefix: "model".to_string(),
            classifiers: Vec::new(),
            by_name: IndexMap::new(),
        };
        for kind in [
            PrimitiveKind::EInt,
            PrimitiveKind::EBoolean,
            PrimitiveKind::EByte,
            PrimitiveKind::EShort,
            PrimitiveKind::ELong,
            PrimitiveKind::EFloat,
            PrimitiveKind::EDouble,
            PrimitiveKind::EChar,
            PrimitiveKind::EString,
        ] {
            package.register(Classifier::Primitive(kind));
        }
        package.register(Classifier::Sentinel);
        debug_assert_eq!(package.classifiers.len() as u32, builtin::COUNT);
        package
    }

    /// Set the package name and derive prefix and URI from it.
    pub fn set_name(&mut self, name: &str) {
        self.name = SmolStr::new(name);
        self.ns_prefix = name.to_lowercase();
        self.ns_uri = format!("https://www.example.org/{name}");
    }

    fn register(&mut self, classifier: Classifier) -> ClassifierId {
        let id = ClassifierId(self.classifiers.len() as u32);
        let name = SmolStr::new(classifier.name());
        self.classifiers.push(classifier);
        // First registration of a name wins; duplicates stay reachable by id
        // and are reported by validation.
        self.by_name.entry(name).or_insert(id);
        id
    }

    /// Append a class or interface classifier.
    pub fn add_class(&mut self, name: &str, is_abstract: bool, is_interface: bool) -> ClassifierId {
        self.register(Classifier::Class(DataClass::new(
            SmolStr::new(name),
            is_abstract,
            is_interface,
        )))
    }

    /// Append an enumeration classifier.
    pub fn add_enum(&mut self, name: &str) -> ClassifierId {
        self.register(Classifier::Enum(EnumClassifier {
            name: SmolStr::new(name),
            literals: Vec::new(),
        }))
    }

    pub fn classifier(&self, id: ClassifierId) -> &Classifier {
        &self.classifiers[id.index()]
    }

    pub fn classifier_mut(&mut self, id: ClassifierId) -> &mut Classifier {
        &mut self.classifiers[id.index()]
    }

    pub fn classifier_name(&self, id: ClassifierId) -> &str {
        self.classifier(id).name()
    }

    /// The class behind `id`, if it is one.
    pub fn class(&self, id: ClassifierId) -> Option<&DataClass> {
        match self.classifier(id) {
            Classifier::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn class_mut(&mut self, id: ClassifierId) -> Option<&mut DataClass> {
        match self.classifier_mut(id) {
            Classifier::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn enumeration(&self, id: ClassifierId) -> Option<&EnumClassifier> {
        match self.classifier(id) {
            Classifier::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Look up any classifier by registered name.
    pub fn lookup(&self, name: &str) -> Option<ClassifierId> {
        self.by_name.get(name).copied()
    }

    /// Look up a registered class or interface by simple name.
    pub fn lookup_class(&self, name: &str) -> Option<ClassifierId> {
        let id = self.lookup(name)?;
        self.class(id).map(|_| id)
    }

    pub fn is_builtin(&self, id: ClassifierId) -> bool {
        id.0 < builtin::COUNT
    }

    /// All classifiers, builtins included, in registration order.
    pub fn classifiers(&self) -> impl Iterator<Item = (ClassifierId, &Classifier)> {
        self.classifiers
            .iter()
            .enumerate()
            .map(|(i, c)| (ClassifierId(i as u32), c))
    }

    /// Classifiers declared or synthesized during the run, in registration
    /// order. These are the ones serialized as `eClassifiers`.
    pub fn user_classifiers(&self) -> impl Iterator<Item = (ClassifierId, &Classifier)> {
        self.classifiers().skip(builtin::COUNT as usize)
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }
}

impl Default for Package {
    fn default() -> Self {
        Self::new()
    }
}
