//! Schema to TypeScript module generation.
//!
//! This module is a thin wrapper around the generation pipeline:
//! 1. Context: derive render parameters from the schema and options
//! 2. Validate: check every resource definition before assembly starts
//! 3. Assemble: push synthetic members, then one member per definition
//! 4. Render: apply, resolve, render (see `gen`)

use crate::error::Result;
use crate::r#gen::defs::{
    api_version_member, compile_definition, resource_base_member, resource_metadata,
};
use crate::r#gen::{Context, GenerateOptions, Module};
use crate::schema::{SchemaDocument, Type};

/// Generate the TypeScript module for one schema document.
///
/// The output starts with the import block (when anything is imported),
/// followed by the `APIVersion` member, the resource base alias when the
/// schema declares resources, and the definitions in schema order.
pub fn generate(schema: &SchemaDocument, options: GenerateOptions) -> Result<String> {
    let ctx = Context::new(schema, options);

    // Resource validation happens before any member applies, so a bad
    // resource can never leave a half-assembled module behind. The first
    // resource's metadata reference shapes the base alias; later resources
    // are checked but do not alter it.
    let mut base_metadata = None;
    for definition in &schema.definitions {
        if let Type::Resource { properties, .. } = &definition.value {
            let target = resource_metadata(&definition.name, properties)?;
            if base_metadata.is_none() {
                base_metadata = Some(target);
            }
        }
    }

    let mut module = Module::new();
    module.push(api_version_member(ctx.api_version().to_string()))?;
    if let Some(metadata) = base_metadata {
        module.push(resource_base_member(metadata))?;
    }
    for definition in &schema.definitions {
        module.push(compile_definition(definition.clone()))?;
    }
    module.render(&ctx)
}
