//! Schema-driven TypeScript module generation.
//!
//! `tsgen-core` compiles a versioned API schema, a tree of type and
//! resource definitions, into the source text of one TypeScript module:
//! a deduplicated, deterministically ordered import block followed by the
//! exported declarations in schema order. The same schema always produces
//! byte-identical output.
//!
//! The crate is a library only; reading schema files, choosing output
//! locations, and logging belong to the driver binary.
//!
//! ```
//! use tsgen_core::{generate, GenerateOptions};
//! use tsgen_core::schema::SchemaDocument;
//!
//! let schema: SchemaDocument = serde_json::from_str(
//!     r#"{ "version": "v1", "definitions": [
//!         { "name": "Color", "value": { "type": "string", "enum": ["red", "green"] } }
//!     ] }"#,
//! )?;
//! let module = generate(&schema, GenerateOptions::default())?;
//! assert!(module.contains("export type Color = \"red\" | \"green\";"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod emitter;
pub mod error;
pub mod r#gen;
pub mod schema;

pub use emitter::generate;
pub use error::{Error, Result};
pub use r#gen::{Context, Engine, GenerateOptions, Packaging};
