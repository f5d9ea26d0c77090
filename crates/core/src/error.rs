//! Error types for module generation.
//!
//! All generation failures are fatal and non-retryable: the caller gets a
//! descriptive error and no output. A failed generation never leaves a
//! partially rendered module behind.

use thiserror::Error;

use crate::r#gen::Phase;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A fatal generation failure.
#[derive(Debug, Error)]
pub enum Error {
    /// Two top-level definitions registered the same name.
    #[error("duplicate top-level declaration `{name}`")]
    DuplicateDeclaration {
        /// The colliding raw name.
        name: String,
    },

    /// A local reference names a type that was never declared in this module.
    #[error("reference to undeclared local type `{name}`")]
    UndeclaredReference {
        /// The missing declaration name.
        name: String,
    },

    /// A deferred binding was read before the identifier table was resolved.
    #[error("identifier `{name}` was read before the module was resolved")]
    UnresolvedName {
        /// The raw name behind the binding.
        name: String,
    },

    /// A `resource` type appeared somewhere other than a definition's direct value.
    #[error(
        "definition `{definition}` nests a resource type; resources are only valid as top-level definitions"
    )]
    NestedResource {
        /// The definition whose type tree contains the nested resource.
        definition: String,
    },

    /// A resource definition is missing its `metadata` reference property,
    /// declares more than one, or holds a non-reference value in it.
    #[error(
        "resource definition `{definition}` must declare exactly one `metadata` property holding a reference type"
    )]
    ResourceMetadata {
        /// The offending resource definition.
        definition: String,
    },

    /// A remote api-kind import names a package absent from the dependency map.
    #[error("no version pinned for dependency `{package}`")]
    MissingDependency {
        /// The unpinned package name.
        package: String,
    },

    /// A type-only import statement ended up holding a value-required member.
    /// The merge rule in the import table makes this unreachable; hitting it
    /// means an internal invariant was violated.
    #[error("type-only import of `{path}` contains the value member `{member}`")]
    TypeOnlyImport {
        /// Resolved path of the statement.
        path: String,
        /// The value-required member.
        member: String,
    },

    /// An operation was attempted in the wrong module phase.
    #[error("cannot {action} while the module is in the {phase:?} phase")]
    InvalidPhase {
        /// The phase the module was actually in.
        phase: Phase,
        /// What was attempted.
        action: &'static str,
    },
}
