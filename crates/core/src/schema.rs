//! Schema model structs for serde deserialization.
//!
//! This module defines the versioned API schema the generator consumes: a
//! group identity, a dependency list, and an ordered list of named type and
//! resource definitions. The generation core works on these already-parsed
//! values; reading and validating schema files belongs to the driver.

use serde::Deserialize;

/// Root of one schema file: everything needed to generate one module.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDocument {
    /// Group identity of the API described by this schema.
    #[serde(default)]
    pub group: GroupId,
    /// API version string, e.g. `v1` or `v1beta2`.
    pub version: String,
    /// Packages this schema references, each pinned to one version.
    /// Package names are unique within the list.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    /// Ordered top-level definitions. Order is preserved in the output.
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

/// Group identity: an optional group name and an optional module path
/// override for the generated file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupId {
    /// Group name, e.g. `apps` or `example.com`. Absent for core APIs.
    #[serde(default)]
    pub name: Option<String>,
    /// Explicit module path, overriding the `group@version/mod.ts` default.
    #[serde(default)]
    pub module: Option<String>,
}

/// One pinned package dependency.
#[derive(Debug, Clone, Deserialize)]
pub struct Dependency {
    /// Package name as used in reference scopes.
    pub package: String,
    /// Pinned version, e.g. `v0.3.0`.
    pub version: String,
}

/// A named top-level schema entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
    /// Declared name; becomes the exported identifier.
    pub name: String,
    /// Description and deprecation flag.
    #[serde(flatten)]
    pub metadata: Metadata,
    /// The definition's value. `resource` types are only valid here.
    pub value: Type,
}

/// Description and deprecation metadata carried by definitions and properties.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    /// Human-readable description, reproduced verbatim in doc blocks.
    #[serde(default)]
    pub description: Option<String>,
    /// Marks the declaration as deprecated in the emitted doc block.
    #[serde(default)]
    pub deprecated: bool,
}

/// The schema's type algebra. A closed union: every consumption site
/// matches exhaustively so a new variant is a compile-time-checked change.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Type {
    /// Text, optionally restricted to an enumerated set of values.
    String {
        /// When present, compiles to a literal union of the quoted values.
        #[serde(rename = "enum", default)]
        allowed: Option<Vec<String>>,
    },
    /// Whole number. No range modeling.
    Integer,
    /// Floating-point number. No precision modeling.
    Float,
    /// Boolean.
    Boolean,
    /// Homogeneous list.
    Array {
        /// Element type.
        values: Box<Type>,
    },
    /// String-keyed map.
    Map {
        /// Value type.
        values: Box<Type>,
    },
    /// Structural object with named properties and optional inheritance.
    Object {
        /// Own properties, in declared order.
        #[serde(default)]
        properties: Vec<Property>,
        /// Inherited parents, each a reference to another object type.
        #[serde(default)]
        inherit: Vec<TypeReference>,
    },
    /// Alternation of the listed types, in declared order.
    Union {
        /// Variants. Order is significant; never sorted or deduplicated.
        values: Vec<Type>,
    },
    /// A nullable wrapper around the inner type.
    Optional {
        /// The inner type.
        value: Box<Type>,
    },
    /// A reference to a definition, local or in another module/package.
    Reference {
        /// The referenced target.
        target: TypeReference,
    },
    /// An API object with identity/metadata semantics. Only valid as a
    /// definition's direct value, never nested.
    Resource {
        /// Properties, including the mandatory `metadata` reference.
        #[serde(default)]
        properties: Vec<Property>,
        /// Whether instances live in a namespace or cluster-wide.
        #[serde(default)]
        scope: ResourceScope,
    },
    /// No type information available; compiles to an opaque placeholder.
    Unknown,
}

/// A named member of an object or resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Property {
    /// Property name, quoted in the output when not a valid identifier.
    pub name: String,
    /// Required properties render as `name: T`; everything else renders as
    /// the nullable `name?: T | null` form.
    #[serde(default)]
    pub required: bool,
    /// Description and deprecation flag.
    #[serde(flatten)]
    pub metadata: Metadata,
    /// The property's value type.
    pub value: Type,
}

/// Target of a reference type.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeReference {
    /// Name of the referenced definition.
    pub name: String,
    /// Where the target lives. Absent means the same module: the name must
    /// resolve to a definition declared in the same generation.
    #[serde(default)]
    pub scope: Option<ReferenceScope>,
}

/// Location of a referenced definition outside the current module.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceScope {
    /// Group of the target API. Absent for groupless core APIs.
    #[serde(default)]
    pub group: Option<String>,
    /// Version of the target API.
    pub version: String,
    /// Package holding the target module. Absent means a sibling module of
    /// the same generation set, imported by relative path.
    #[serde(default)]
    pub package: Option<String>,
}

/// Resource scoping: namespaced (the default) or cluster-wide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceScope {
    /// Instances live inside a namespace.
    #[default]
    Namespace,
    /// Instances are cluster-wide.
    Cluster,
}

impl ResourceScope {
    /// The scope string used in generated type arguments and factory calls.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Cluster => "cluster",
        }
    }
}
