//! Definition-level generators.
//!
//! Each top-level schema definition becomes one module member: plain types
//! compile to exported aliases, objects to interfaces, and resources to an
//! interface plus a factory constant plus a list alias. Two synthetic
//! members frame them: the `APIVersion` constant every module starts with,
//! and the resource base alias added when the schema declares resources.

use crate::error::{Error, Result};
use crate::r#gen::compile::{compile, compile_property, compile_reference, PropertyGen};
use crate::r#gen::imports::{ImportSource, UseOptions};
use crate::r#gen::module::{Generator, Module, RenderFn, Scope};
use crate::r#gen::utils::doc_block;
use crate::schema::{
    Definition, Metadata, Property, ResourceScope, Type, TypeReference,
};

/// Name of the synthetic version constant and its type.
pub(crate) const API_VERSION_NAME: &str = "APIVersion";

/// Name of the synthetic base alias resource interfaces extend.
pub(crate) const RESOURCE_BASE_NAME: &str = "ApiKind";

/// Runtime library members backing resource artifacts.
const FACTORY_MEMBER: &str = "makeApiKind";
const LIST_MEMBER: &str = "ApiList";

/// The version member every module starts with: a const holding the
/// `group/version` literal and a same-named type for its literal type.
pub(crate) fn api_version_member(api_version: String) -> Generator {
    Generator::new(move |module| {
        let binding = module.declare(API_VERSION_NAME)?;
        Ok(Box::new(move |scope: &Scope<'_>| {
            let name = scope.binding(&binding)?;
            Ok(format!(
                "export const {name} = \"{api_version}\";\nexport type {name} = typeof {name};"
            ))
        }))
    })
}

/// The base alias resource interfaces extend. Declared once per module,
/// with the metadata type taken from the module's first resource.
pub(crate) fn resource_base_member(metadata: TypeReference) -> Generator {
    Generator::new(move |module| {
        let binding = module.declare(RESOURCE_BASE_NAME)?;
        let metadata = compile_reference(&metadata, module)?;
        Ok(Box::new(move |scope: &Scope<'_>| {
            let name = scope.binding(&binding)?;
            let version = scope.declared(API_VERSION_NAME)?;
            let metadata = metadata(scope)?;
            Ok(format!(
                "type {name}<K extends string, S extends string = \"namespace\"> = {{\n  \
                 apiVersion: typeof {version};\n  \
                 kind: K;\n  \
                 metadata: {metadata};\n  \
                 scope?: S;\n}};"
            ))
        }))
    })
}

/// Extract the mandatory `metadata` reference of a resource definition.
/// Exactly one property literally named `metadata` must exist and hold a
/// reference type.
pub(crate) fn resource_metadata(name: &str, properties: &[Property]) -> Result<TypeReference> {
    let mut candidates = properties.iter().filter(|p| p.name == "metadata");
    match (candidates.next(), candidates.next()) {
        (
            Some(Property {
                value: Type::Reference { target },
                ..
            }),
            None,
        ) => Ok(target.clone()),
        _ => Err(Error::ResourceMetadata {
            definition: name.to_string(),
        }),
    }
}

/// Compile one schema definition into a module member.
pub(crate) fn compile_definition(definition: Definition) -> Generator {
    Generator::new(move |module| {
        let Definition {
            name,
            metadata,
            value,
        } = definition;
        match value {
            Type::Object {
                properties,
                inherit,
            } => interface_member(name, metadata, properties, inherit, module),
            Type::Resource { properties, scope } => {
                resource_member(name, metadata, properties, scope, module)
            }
            other => alias_member(name, metadata, other, module),
        }
    })
}

/// `export type Name = <expr>;` with the definition's doc block. Scoped
/// references take this path too, which re-exports the imported type under
/// its local name.
fn alias_member(
    name: String,
    metadata: Metadata,
    value: Type,
    module: &mut Module,
) -> Result<RenderFn> {
    let binding = module.declare(&name)?;
    let expr = compile(&value, &name, module)?;
    Ok(Box::new(move |scope: &Scope<'_>| {
        let doc = doc_block(&metadata, 0).unwrap_or_default();
        Ok(format!(
            "{doc}export type {} = {};",
            scope.binding(&binding)?,
            expr(scope)?
        ))
    }))
}

/// `export interface Name extends ... { ... }` with per-property doc
/// blocks.
fn interface_member(
    name: String,
    metadata: Metadata,
    properties: Vec<Property>,
    inherit: Vec<TypeReference>,
    module: &mut Module,
) -> Result<RenderFn> {
    let binding = module.declare(&name)?;
    let mut parents = Vec::with_capacity(inherit.len());
    for parent in &inherit {
        parents.push(compile_reference(parent, module)?);
    }
    let mut members = Vec::with_capacity(properties.len());
    for property in &properties {
        members.push(compile_property(property, &name, module)?);
    }
    Ok(Box::new(move |scope: &Scope<'_>| {
        let rendered_parents = parents
            .iter()
            .map(|parent| parent(scope))
            .collect::<Result<Vec<_>>>()?;
        let doc = doc_block(&metadata, 0).unwrap_or_default();
        let head = interface_head(&scope.binding(&binding)?, &rendered_parents);
        Ok(format!(
            "{doc}{head} {}",
            interface_body(&members, scope)?
        ))
    }))
}

fn interface_head(name: &str, parents: &[String]) -> String {
    if parents.is_empty() {
        format!("export interface {name}")
    } else {
        format!("export interface {name} extends {}", parents.join(", "))
    }
}

fn interface_body(members: &[PropertyGen], scope: &Scope<'_>) -> Result<String> {
    if members.is_empty() {
        return Ok("{}".to_string());
    }
    let mut body = String::from("{\n");
    for member in members {
        if let Some(doc) = doc_block(&member.metadata, 1) {
            body.push_str(&doc);
        }
        body.push_str(&format!("  {};\n", member.render(scope)?));
    }
    body.push('}');
    Ok(body)
}

/// The three exports of a resource definition: the interface extending the
/// base alias, the factory constant, and the list alias.
fn resource_member(
    name: String,
    metadata: Metadata,
    properties: Vec<Property>,
    resource_scope: ResourceScope,
    module: &mut Module,
) -> Result<RenderFn> {
    // Presence and shape of the metadata property were checked before
    // assembly started; the base alias renders its type.
    resource_metadata(&name, &properties)?;

    let binding = module.declare(&name)?;
    let list_binding = module.declare(&format!("{name}List"))?;
    let factory = module.import(ImportSource::runtime(), FACTORY_MEMBER, UseOptions::value())?;
    let list = module.import(ImportSource::runtime(), LIST_MEMBER, UseOptions::type_only())?;

    let mut members = Vec::new();
    for property in &properties {
        if property.name == "metadata" {
            continue;
        }
        members.push(compile_property(property, &name, module)?);
    }

    Ok(Box::new(move |scope: &Scope<'_>| {
        let name = scope.binding(&binding)?;
        let list_name = scope.binding(&list_binding)?;
        let factory = scope.binding(&factory)?;
        let list = scope.binding(&list)?;
        let base = scope.declared(RESOURCE_BASE_NAME)?;
        let version = scope.declared(API_VERSION_NAME)?;

        let base_args = match resource_scope {
            ResourceScope::Namespace => format!("{base}<\"{name}\">"),
            ResourceScope::Cluster => format!("{base}<\"{name}\", \"cluster\">"),
        };
        let doc = doc_block(&metadata, 0).unwrap_or_default();
        let head = format!("export interface {name} extends {base_args}");
        let body = interface_body(&members, scope)?;

        Ok(format!(
            "{doc}{head} {body}\n\n\
             export const {name} = {factory}({version}, \"{name}\", \"{}\");\n\n\
             export type {list_name} = {list}<{name}>;",
            resource_scope.as_str()
        ))
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn property(json: &str) -> Property {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_resource_metadata_accepts_single_reference() {
        let properties = vec![
            property(r#"{ "name": "spec", "value": { "type": "unknown" } }"#),
            property(
                r#"{ "name": "metadata", "required": true,
                     "value": { "type": "reference", "target": { "name": "ObjectMeta" } } }"#,
            ),
        ];
        let target = resource_metadata("Widget", &properties).unwrap();
        assert_eq!(target.name, "ObjectMeta");
    }

    #[test]
    fn test_resource_metadata_rejects_missing_and_duplicate() {
        let missing = vec![property(r#"{ "name": "spec", "value": { "type": "unknown" } }"#)];
        assert!(matches!(
            resource_metadata("Widget", &missing),
            Err(Error::ResourceMetadata { .. })
        ));

        let meta =
            r#"{ "name": "metadata", "value": { "type": "reference", "target": { "name": "M" } } }"#;
        let duplicated = vec![property(meta), property(meta)];
        assert!(matches!(
            resource_metadata("Widget", &duplicated),
            Err(Error::ResourceMetadata { .. })
        ));
    }

    #[test]
    fn test_resource_metadata_rejects_non_reference() {
        let properties = vec![property(
            r#"{ "name": "metadata", "value": { "type": "string" } }"#,
        )];
        assert!(matches!(
            resource_metadata("Widget", &properties),
            Err(Error::ResourceMetadata { .. })
        ));
    }
}
