//! Recursive type compiler.
//!
//! Walks a schema type bottom-up during a member's apply stage, registering
//! whatever imports the type needs, and returns a render closure producing
//! the TypeScript type expression. References resolve late: local targets
//! are looked up against the module's declarations at render time, so they
//! may point at definitions that appear later in the schema.

use crate::error::{Error, Result};
use crate::r#gen::imports::{ImportSource, UseOptions};
use crate::r#gen::module::{Module, RenderFn, Scope};
use crate::r#gen::utils::{escape_string, quote_key};
use crate::schema::{Metadata, Property, Type, TypeReference};

/// Compile a type to a render closure for its TypeScript expression.
///
/// `owner` names the definition whose tree is being compiled; it only
/// appears in error messages.
pub(crate) fn compile(ty: &Type, owner: &str, module: &mut Module) -> Result<RenderFn> {
    match ty {
        Type::String { allowed: None } => Ok(literal("string")),
        Type::String {
            allowed: Some(values),
        } => {
            // An empty value set would leave no legal inhabitant; fall back
            // to the unrestricted form.
            if values.is_empty() {
                return Ok(literal("string"));
            }
            let union = values
                .iter()
                .map(|v| format!("\"{}\"", escape_string(v)))
                .collect::<Vec<_>>()
                .join(" | ");
            Ok(Box::new(move |_| Ok(union.clone())))
        }
        Type::Integer | Type::Float => Ok(literal("number")),
        Type::Boolean => Ok(literal("boolean")),
        Type::Unknown => Ok(literal("unknown")),
        Type::Array { values } => {
            // Union and nullable elements need grouping so the suffix
            // applies to the whole element type.
            let grouped = matches!(**values, Type::Union { .. } | Type::Optional { .. });
            let inner = compile(values, owner, module)?;
            Ok(Box::new(move |scope| {
                let inner = inner(scope)?;
                Ok(if grouped {
                    format!("({inner})[]")
                } else {
                    format!("{inner}[]")
                })
            }))
        }
        Type::Map { values } => {
            let inner = compile(values, owner, module)?;
            Ok(Box::new(move |scope| {
                Ok(format!("Record<string, {}>", inner(scope)?))
            }))
        }
        Type::Optional { value } => {
            let inner = compile(value, owner, module)?;
            Ok(Box::new(move |scope| Ok(format!("{} | null", inner(scope)?))))
        }
        Type::Union { values } => {
            let mut variants = Vec::with_capacity(values.len());
            for value in values {
                variants.push(compile(value, owner, module)?);
            }
            Ok(Box::new(move |scope| {
                let rendered = variants
                    .iter()
                    .map(|variant| variant(scope))
                    .collect::<Result<Vec<_>>>()?;
                Ok(rendered.join(" | "))
            }))
        }
        Type::Reference { target } => compile_reference(target, module),
        Type::Object {
            properties,
            inherit,
        } => compile_inline_object(properties, inherit, owner, module),
        Type::Resource { .. } => Err(Error::NestedResource {
            definition: owner.to_string(),
        }),
    }
}

fn literal(text: &'static str) -> RenderFn {
    Box::new(move |_| Ok(text.to_string()))
}

/// Compile a reference. Targets outside the module become type-only
/// imports; local targets resolve against the declaration table when the
/// expression renders.
pub(crate) fn compile_reference(target: &TypeReference, module: &mut Module) -> Result<RenderFn> {
    match &target.scope {
        None => {
            let raw = target.name.clone();
            Ok(Box::new(move |scope| scope.declared(&raw)))
        }
        Some(scope) => {
            let source = match &scope.package {
                Some(package) => {
                    ImportSource::api(package, scope.group.as_deref(), &scope.version)
                }
                None => ImportSource::sibling(scope.group.as_deref(), &scope.version),
            };
            let binding = module.import(source, &target.name, UseOptions::type_only())?;
            Ok(Box::new(move |scope| scope.binding(&binding)))
        }
    }
}

/// A compiled object or resource property.
pub(crate) struct PropertyGen {
    /// The rendered key, quoted when necessary.
    pub key: String,
    /// Whether the member renders in the `key?: T | null` form.
    pub optional: bool,
    /// Description and deprecation carried into interface doc blocks.
    pub metadata: Metadata,
    /// Render closure for the value type expression.
    pub value: RenderFn,
}

impl PropertyGen {
    /// Render the member as `key: T` or `key?: T | null`.
    pub fn render(&self, scope: &Scope<'_>) -> Result<String> {
        let value = (self.value)(scope)?;
        if self.optional {
            Ok(format!("{}?: {value} | null", self.key))
        } else {
            Ok(format!("{}: {value}", self.key))
        }
    }
}

/// Compile one property. Non-required properties become optional nullable
/// members; an explicit optional wrapper on a non-required property is
/// unwrapped so `null` is not stated twice.
pub(crate) fn compile_property(
    property: &Property,
    owner: &str,
    module: &mut Module,
) -> Result<PropertyGen> {
    let optional = !property.required;
    let value_ty = match (&property.value, optional) {
        (Type::Optional { value }, true) => value.as_ref(),
        (other, _) => other,
    };
    Ok(PropertyGen {
        key: quote_key(&property.name),
        optional,
        metadata: property.metadata.clone(),
        value: compile(value_ty, owner, module)?,
    })
}

/// Compile a nested object to a single-line literal, intersected with its
/// inherited parents. Property descriptions have nowhere to go in this
/// form and are dropped; top-level objects render as interfaces instead.
fn compile_inline_object(
    properties: &[Property],
    inherit: &[TypeReference],
    owner: &str,
    module: &mut Module,
) -> Result<RenderFn> {
    let mut parents = Vec::with_capacity(inherit.len());
    for parent in inherit {
        parents.push(compile_reference(parent, module)?);
    }
    let mut members = Vec::with_capacity(properties.len());
    for property in properties {
        members.push(compile_property(property, owner, module)?);
    }
    Ok(Box::new(move |scope| {
        let mut parts = parents
            .iter()
            .map(|parent| parent(scope))
            .collect::<Result<Vec<_>>>()?;
        let body = if members.is_empty() {
            "{}".to_string()
        } else {
            let rendered = members
                .iter()
                .map(|member| member.render(scope))
                .collect::<Result<Vec<_>>>()?;
            format!("{{ {} }}", rendered.join("; "))
        };
        parts.push(body);
        Ok(parts.join(" & "))
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::r#gen::context::{Context, GenerateOptions};
    use crate::r#gen::module::Generator;
    use crate::schema::SchemaDocument;

    fn render_type(schema_json: &str, type_json: &str) -> Result<String> {
        let schema: SchemaDocument = serde_json::from_str(schema_json).unwrap();
        let ty: Type = serde_json::from_str(type_json).unwrap();
        let ctx = Context::new(&schema, GenerateOptions::default());
        let mut module = Module::new();
        module
            .push(Generator::new(move |module| {
                let expr = compile(&ty, "Test", module)?;
                Ok(Box::new(move |scope: &Scope<'_>| {
                    Ok(format!("type Out = {};", expr(scope)?))
                }))
            }))
            .unwrap();
        module.render(&ctx)
    }

    fn expr(type_json: &str) -> String {
        let out = render_type(r#"{ "version": "v1" }"#, type_json).unwrap();
        let line = out
            .lines()
            .find(|line| line.starts_with("type Out = "))
            .unwrap();
        line.strip_prefix("type Out = ")
            .unwrap()
            .strip_suffix(';')
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(expr(r#"{ "type": "string" }"#), "string");
        assert_eq!(expr(r#"{ "type": "integer" }"#), "number");
        assert_eq!(expr(r#"{ "type": "float" }"#), "number");
        assert_eq!(expr(r#"{ "type": "boolean" }"#), "boolean");
        assert_eq!(expr(r#"{ "type": "unknown" }"#), "unknown");
    }

    #[test]
    fn test_string_enum_quotes_values_in_order() {
        assert_eq!(
            expr(r#"{ "type": "string", "enum": ["red", "green", "blue"] }"#),
            "\"red\" | \"green\" | \"blue\""
        );
        assert_eq!(expr(r#"{ "type": "string", "enum": [] }"#), "string");
    }

    #[test]
    fn test_array_groups_union_elements() {
        assert_eq!(
            expr(r#"{ "type": "array", "values": { "type": "string" } }"#),
            "string[]"
        );
        assert_eq!(
            expr(
                r#"{ "type": "array", "values": { "type": "union", "values": [
                    { "type": "string" }, { "type": "integer" }
                ] } }"#
            ),
            "(string | number)[]"
        );
    }

    #[test]
    fn test_map_and_optional() {
        assert_eq!(
            expr(r#"{ "type": "map", "values": { "type": "boolean" } }"#),
            "Record<string, boolean>"
        );
        assert_eq!(
            expr(r#"{ "type": "optional", "value": { "type": "string" } }"#),
            "string | null"
        );
    }

    #[test]
    fn test_union_preserves_declared_order() {
        assert_eq!(
            expr(
                r#"{ "type": "union", "values": [
                    { "type": "boolean" }, { "type": "string" }, { "type": "integer" }
                ] }"#
            ),
            "boolean | string | number"
        );
    }

    #[test]
    fn test_inline_object() {
        assert_eq!(
            expr(
                r#"{ "type": "object", "properties": [
                    { "name": "id", "required": true, "value": { "type": "string" } },
                    { "name": "count", "value": { "type": "integer" } }
                ] }"#
            ),
            "{ id: string; count?: number | null }"
        );
        assert_eq!(expr(r#"{ "type": "object" }"#), "{}");
    }

    #[test]
    fn test_remote_reference_imports_member() {
        let out = render_type(
            r#"{ "version": "v1", "dependencies": [
                { "package": "widgets", "version": "v0.3.0" }
            ] }"#,
            r#"{ "type": "reference", "target": { "name": "Widget",
                "scope": { "group": "apps", "version": "v1", "package": "widgets" } } }"#,
        )
        .unwrap();
        assert!(out.contains(
            "import type { Widget } from \"https://deno.land/x/widgets@v0.3.0/apps@v1/mod.ts\";"
        ));
        assert!(out.contains("type Out = Widget;"));
    }

    #[test]
    fn test_sibling_reference_uses_relative_path() {
        let out = render_type(
            r#"{ "group": { "name": "apps" }, "version": "v1" }"#,
            r#"{ "type": "reference", "target": { "name": "ObjectMeta",
                "scope": { "group": "meta", "version": "v1" } } }"#,
        )
        .unwrap();
        assert!(out.contains("import type { ObjectMeta } from \"../meta@v1/mod.ts\";"));
    }

    #[test]
    fn test_nested_resource_is_rejected() {
        let err = render_type(
            r#"{ "version": "v1" }"#,
            r#"{ "type": "array", "values": { "type": "resource", "properties": [] } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::NestedResource { .. }));
    }

    #[test]
    fn test_required_optional_property_keeps_null_inline() {
        assert_eq!(
            expr(
                r#"{ "type": "object", "properties": [
                    { "name": "note", "required": true,
                      "value": { "type": "optional", "value": { "type": "string" } } }
                ] }"#
            ),
            "{ note: string | null }"
        );
    }
}
