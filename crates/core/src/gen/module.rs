//! Two-phase module assembly.
//!
//! A `Module` collects member generators, then `render` drives them through
//! two stages: apply, where every member registers its declarations and
//! imports, and render, where final identifier spellings exist and each
//! member produces its text fragment. Splitting the stages lets any member
//! reference any identifier in the module, including ones registered by
//! later members, without a separate symbol pre-pass.

use std::mem;

use crate::error::{Error, Result};
use crate::r#gen::context::Context;
use crate::r#gen::imports::{ImportSource, ImportTable, UseOptions};
use crate::r#gen::names::{NameId, NameTable};

/// Lifecycle of a module. Each generation moves strictly forward through
/// these phases; registration is only legal while applying and spelling
/// lookups only while rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Accepting member generators.
    #[default]
    Created,
    /// Running member apply stages.
    Applying,
    /// Assigning final identifier spellings.
    Resolving,
    /// Producing output text.
    Rendering,
    /// Output produced. Terminal; consuming `render` makes this state
    /// unobservable from outside.
    Done,
}

/// A deferred handle to an identifier, valid to read only at render time.
#[derive(Debug, Clone)]
pub enum Binding {
    /// A top-level declaration owned by this module.
    Declared(NameId),
    /// A symbol imported from another module.
    Imported {
        /// Source module of the symbol.
        source: ImportSource,
        /// Exported member name at the source.
        member: String,
    },
}

/// The render stage of a member: produces the member's text fragment once
/// identifier spellings are final.
pub type RenderFn = Box<dyn Fn(&Scope<'_>) -> Result<String>>;

/// One module member. The wrapped apply stage registers the member's
/// declarations and imports, then returns the render stage.
pub struct Generator(Box<dyn FnOnce(&mut Module) -> Result<RenderFn>>);

impl Generator {
    /// Wrap an apply stage.
    pub fn new(apply: impl FnOnce(&mut Module) -> Result<RenderFn> + 'static) -> Self {
        Self(Box::new(apply))
    }

    fn apply(self, module: &mut Module) -> Result<RenderFn> {
        (self.0)(module)
    }
}

/// One module under assembly.
#[derive(Default)]
pub struct Module {
    names: NameTable,
    imports: ImportTable,
    members: Vec<Generator>,
    phase: Phase,
}

impl Module {
    /// An empty module accepting members.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member. Members render in the order they were pushed.
    pub fn push(&mut self, member: Generator) -> Result<()> {
        if self.phase != Phase::Created {
            return Err(Error::InvalidPhase {
                phase: self.phase,
                action: "add a member",
            });
        }
        self.members.push(member);
        Ok(())
    }

    /// Register a top-level declaration. Only legal from a member's apply
    /// stage; the returned binding is readable once rendering starts.
    pub fn declare(&mut self, raw: &str) -> Result<Binding> {
        if self.phase != Phase::Applying {
            return Err(Error::InvalidPhase {
                phase: self.phase,
                action: "declare an identifier",
            });
        }
        Ok(Binding::Declared(self.names.declare(raw)?))
    }

    /// Register a use of an imported symbol. Only legal from a member's
    /// apply stage. Repeated uses of the same source and member merge.
    pub fn import(
        &mut self,
        source: ImportSource,
        member: &str,
        options: UseOptions,
    ) -> Result<Binding> {
        if self.phase != Phase::Applying {
            return Err(Error::InvalidPhase {
                phase: self.phase,
                action: "import a symbol",
            });
        }
        self.imports.use_member(source.clone(), member, options);
        Ok(Binding::Imported {
            source,
            member: member.to_string(),
        })
    }

    /// Assemble the module text. Consumes the module, so a second render of
    /// the same assembly cannot compile.
    ///
    /// Runs every member's apply stage in member order, registers one
    /// identifier per distinct imported symbol, freezes spellings, then
    /// renders the import block followed by each member's fragment.
    /// Fragments are separated by blank lines; members rendering to nothing
    /// are dropped. The output ends with a newline.
    pub fn render(mut self, ctx: &Context) -> Result<String> {
        if self.phase != Phase::Created {
            return Err(Error::InvalidPhase {
                phase: self.phase,
                action: "render",
            });
        }

        self.phase = Phase::Applying;
        let members = mem::take(&mut self.members);
        let mut renderers = Vec::with_capacity(members.len());
        for member in members {
            renderers.push(member.apply(&mut self)?);
        }
        let Self { names, imports, .. } = &mut self;
        imports.apply(names);

        self.phase = Phase::Resolving;
        self.names.resolve();

        self.phase = Phase::Rendering;
        let scope = Scope { module: &self, ctx };
        let mut fragments = Vec::with_capacity(renderers.len() + 1);
        if let Some(block) = self.imports.render(&self.names, ctx)? {
            fragments.push(block);
        }
        for renderer in &renderers {
            let fragment = renderer(&scope)?;
            if !fragment.is_empty() {
                fragments.push(fragment);
            }
        }
        let mut out = fragments.join("\n\n");
        out.push('\n');
        self.phase = Phase::Done;
        Ok(out)
    }
}

/// Render-time view of a module: resolved identifier spellings plus the
/// generation context.
pub struct Scope<'a> {
    module: &'a Module,
    ctx: &'a Context,
}

impl Scope<'_> {
    /// Final spelling behind a binding.
    pub fn binding(&self, binding: &Binding) -> Result<String> {
        let id = match binding {
            Binding::Declared(id) => *id,
            Binding::Imported { source, member } => self.module.imports.name_of(source, member)?,
        };
        Ok(self.module.names.spelling(id)?.to_string())
    }

    /// Spelling of a top-level declaration looked up by raw name. This is
    /// how local references resolve, and it is what makes forward
    /// references work: by render time every declaration in the module is
    /// registered, whichever member declared it.
    pub fn declared(&self, raw: &str) -> Result<String> {
        let id = self.module.names.declaration(raw)?;
        Ok(self.module.names.spelling(id)?.to_string())
    }

    /// The generation context.
    pub fn ctx(&self) -> &Context {
        self.ctx
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::r#gen::context::GenerateOptions;
    use crate::schema::SchemaDocument;

    fn ctx() -> Context {
        let schema: SchemaDocument =
            serde_json::from_str(r#"{ "version": "v1" }"#).unwrap();
        Context::new(&schema, GenerateOptions::default())
    }

    fn alias_member(name: &'static str, body: &'static str) -> Generator {
        Generator::new(move |module| {
            let binding = module.declare(name)?;
            Ok(Box::new(move |scope: &Scope<'_>| {
                Ok(format!("export type {} = {body};", scope.binding(&binding)?))
            }))
        })
    }

    #[test]
    fn test_members_render_in_push_order() {
        let mut module = Module::new();
        module.push(alias_member("A", "string")).unwrap();
        module.push(alias_member("B", "number")).unwrap();
        let out = module.render(&ctx()).unwrap();
        assert_eq!(out, "export type A = string;\n\nexport type B = number;\n");
    }

    #[test]
    fn test_forward_reference_resolves() {
        let mut module = Module::new();
        module
            .push(Generator::new(|module| {
                let binding = module.declare("First")?;
                Ok(Box::new(move |scope: &Scope<'_>| {
                    Ok(format!(
                        "export type {} = {}[];",
                        scope.binding(&binding)?,
                        scope.declared("Second")?
                    ))
                }))
            }))
            .unwrap();
        module.push(alias_member("Second", "string")).unwrap();
        let out = module.render(&ctx()).unwrap();
        assert!(out.starts_with("export type First = Second[];\n"));
    }

    #[test]
    fn test_undeclared_reference_fails_at_render() {
        let mut module = Module::new();
        module
            .push(Generator::new(|module| {
                let binding = module.declare("Broken")?;
                Ok(Box::new(move |scope: &Scope<'_>| {
                    Ok(format!(
                        "export type {} = {};",
                        scope.binding(&binding)?,
                        scope.declared("Missing")?
                    ))
                }))
            }))
            .unwrap();
        assert!(matches!(
            module.render(&ctx()),
            Err(Error::UndeclaredReference { .. })
        ));
    }

    #[test]
    fn test_declaration_wins_raw_name_over_import() {
        let mut module = Module::new();
        module
            .push(Generator::new(|module| {
                let imported = module.import(
                    ImportSource::runtime(),
                    "ApiList",
                    UseOptions::type_only(),
                )?;
                let binding = module.declare("ApiList")?;
                Ok(Box::new(move |scope: &Scope<'_>| {
                    Ok(format!(
                        "export type {} = {}<string>;",
                        scope.binding(&binding)?,
                        scope.binding(&imported)?
                    ))
                }))
            }))
            .unwrap();
        let out = module.render(&ctx()).unwrap();
        assert!(out.contains("import type { ApiList as ApiList_ }"));
        assert!(out.contains("export type ApiList = ApiList_<string>;"));
    }

    #[test]
    fn test_empty_fragments_are_dropped() {
        let mut module = Module::new();
        module
            .push(Generator::new(|_| {
                Ok(Box::new(|_: &Scope<'_>| Ok(String::new())))
            }))
            .unwrap();
        module.push(alias_member("A", "string")).unwrap();
        let out = module.render(&ctx()).unwrap();
        assert_eq!(out, "export type A = string;\n");
    }

    #[test]
    fn test_registration_outside_apply_is_rejected() {
        let mut module = Module::new();
        assert!(matches!(
            module.declare("Early"),
            Err(Error::InvalidPhase { .. })
        ));
    }
}
