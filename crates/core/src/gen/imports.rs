//! Per-module import table.
//!
//! External symbol references are deduplicated by source identity (the
//! "module URN") and member. Paths are computed per render from the
//! packaging and engine selectors, never cached. The rendered import block
//! groups remote sources before local ones and sorts everything
//! lexicographically for byte-identical output across runs.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::r#gen::context::{module_dir, Context, Packaging};
use crate::r#gen::names::{NameId, NameTable};

/// Host prefix for hosted-URL remote imports.
const REMOTE_HOST: &str = "https://deno.land/x";

/// Scope prefix for bare-specifier remote imports.
const BARE_SCOPE: &str = "@apis";

/// The runtime support library backing generated resource artifacts.
/// Lib-kind imports always use this pinned version, independent of the
/// schema's dependency map.
const RUNTIME_PACKAGE: &str = "api_runtime";
const RUNTIME_VERSION: &str = "v0.5.0";
const RUNTIME_MODULE: &str = "mod";

/// The one api-kind package that is always available and therefore
/// emitted without a version segment.
const BUILTIN_PACKAGE: &str = "builtin";

/// Remote source kinds. Api packages are versioned through the schema's
/// dependency map; lib packages ship with the generator at a fixed version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RemoteKind {
    /// A generated API package referenced by the schema.
    Api,
    /// The runtime support library.
    Lib,
}

/// Identity key for an import source. Distinct identities never merge,
/// even when they would resolve to the same path. The derived ordering is
/// the canonical registration order used during resolution, which makes
/// suffix assignment independent of `use` call order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImportSource {
    /// A package-hosted module, keyed by kind, package, and sub-path.
    Remote {
        /// Versioning behavior of the package.
        kind: RemoteKind,
        /// Package name.
        package: String,
        /// Extension-less sub-path inside the package.
        path: String,
    },
    /// A sibling module of the same generation set, keyed by its
    /// root-relative file path.
    Local {
        /// Root-relative path of the target module file.
        path: String,
    },
}

impl ImportSource {
    /// The import source for the runtime support library.
    pub fn runtime() -> Self {
        Self::Remote {
            kind: RemoteKind::Lib,
            package: RUNTIME_PACKAGE.to_string(),
            path: RUNTIME_MODULE.to_string(),
        }
    }

    /// The module of an API living in a dependency package.
    pub fn api(package: &str, group: Option<&str>, version: &str) -> Self {
        Self::Remote {
            kind: RemoteKind::Api,
            package: package.to_string(),
            path: format!("{}/{RUNTIME_MODULE}", module_dir(group, version)),
        }
    }

    /// The module of a sibling API generated alongside this one. Siblings
    /// follow the default layout; module path overrides do not apply to
    /// them.
    pub fn sibling(group: Option<&str>, version: &str) -> Self {
        Self::Local {
            path: format!("{}/{RUNTIME_MODULE}.ts", module_dir(group, version)),
        }
    }

    /// Compute the path this source resolves to under the given context.
    /// Computed per render; never cached.
    pub(crate) fn resolved_path(&self, ctx: &Context) -> Result<String> {
        match self {
            Self::Local { path } => Ok(relative_path(ctx.module_path(), path)),
            Self::Remote {
                kind: RemoteKind::Lib,
                package,
                path,
            } => Ok(remote_path(ctx, package, Some(RUNTIME_VERSION), path)),
            Self::Remote {
                kind: RemoteKind::Api,
                package,
                path,
            } => {
                if package == BUILTIN_PACKAGE {
                    return Ok(remote_path(ctx, package, None, path));
                }
                let version = ctx.dependency_version(package)?;
                Ok(remote_path(ctx, package, Some(version), path))
            }
        }
    }
}

/// Compose a remote path under the selected packaging and engine.
fn remote_path(ctx: &Context, package: &str, version: Option<&str>, sub: &str) -> String {
    let ext = ctx.engine().remote_extension();
    match ctx.packaging() {
        Packaging::HostedUrl => match version {
            Some(version) => format!("{REMOTE_HOST}/{package}@{version}/{sub}{ext}"),
            None => format!("{REMOTE_HOST}/{package}/{sub}{ext}"),
        },
        Packaging::BareSpecifier => format!("{BARE_SCOPE}/{package}/{sub}{ext}"),
    }
}

/// Path of `to` relative to the directory of the importing module, always
/// carrying an explicit `./` or `../` prefix.
fn relative_path(from_module: &str, to: &str) -> String {
    let from_dirs: Vec<&str> = match from_module.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let (to_dirs, to_file) = match to.rsplit_once('/') {
        Some((dir, file)) => (dir.split('/').collect::<Vec<_>>(), file),
        None => (Vec::new(), to),
    };

    let mut common = 0;
    while common < from_dirs.len() && common < to_dirs.len() && from_dirs[common] == to_dirs[common]
    {
        common += 1;
    }

    let ups = from_dirs.len() - common;
    let mut parts: Vec<&str> = Vec::new();
    if ups == 0 {
        parts.push(".");
    } else {
        parts.extend(std::iter::repeat_n("..", ups));
    }
    parts.extend(&to_dirs[common..]);
    parts.push(to_file);
    parts.join("/")
}

/// Options for one `use` of an imported member.
#[derive(Debug, Clone)]
pub struct UseOptions {
    /// Preferred local spelling; sticky on first assignment only.
    pub alias: Option<String>,
    /// Whether this usage needs the symbol only in type position.
    pub type_only: bool,
}

impl UseOptions {
    /// A type-position-only usage.
    pub fn type_only() -> Self {
        Self {
            alias: None,
            type_only: true,
        }
    }

    /// A usage that needs the symbol at runtime.
    pub fn value() -> Self {
        Self {
            alias: None,
            type_only: false,
        }
    }
}

#[derive(Debug)]
struct Import {
    alias: Option<String>,
    type_only: bool,
    name: Option<NameId>,
}

/// All imports from one source, keyed by member for deduplication and
/// lexicographic statement ordering.
#[derive(Debug, Default)]
struct ImportedModule {
    imports: BTreeMap<String, Import>,
}

/// Registry of every external symbol one module imports.
#[derive(Debug, Default)]
pub(crate) struct ImportTable {
    modules: BTreeMap<ImportSource, ImportedModule>,
}

impl ImportTable {
    /// Record a usage of `member` from `source`. Repeated calls merge: a
    /// value-requiring usage downgrades a prior type-only import to a full
    /// import, and the alias sticks from the first call that set one.
    pub fn use_member(&mut self, source: ImportSource, member: &str, options: UseOptions) {
        let module = self.modules.entry(source).or_default();
        let import = module
            .imports
            .entry(member.to_string())
            .or_insert_with(|| Import {
                alias: None,
                type_only: true,
                name: None,
            });
        import.type_only = import.type_only && options.type_only;
        if import.alias.is_none() {
            import.alias = options.alias;
        }
    }

    /// Register one identifier per distinct imported symbol. Runs last in
    /// the apply phase, in canonical source/member order, so the resulting
    /// spellings do not depend on `use` call order.
    pub fn apply(&mut self, names: &mut NameTable) {
        for module in self.modules.values_mut() {
            for (member, import) in &mut module.imports {
                let raw = import.alias.as_deref().unwrap_or(member);
                import.name = Some(names.import(raw));
            }
        }
    }

    /// The identifier assigned to an imported symbol.
    pub fn name_of(&self, source: &ImportSource, member: &str) -> Result<NameId> {
        self.modules
            .get(source)
            .and_then(|module| module.imports.get(member))
            .and_then(|import| import.name)
            .ok_or_else(|| Error::UnresolvedName {
                name: member.to_string(),
            })
    }

    /// Render the import block: remote statements before local ones, each
    /// bucket sorted by resolved path. Returns `None` when nothing is
    /// imported.
    pub fn render(&self, names: &NameTable, ctx: &Context) -> Result<Option<String>> {
        if self.modules.is_empty() {
            return Ok(None);
        }
        let mut remote: Vec<(String, String)> = Vec::new();
        let mut local: Vec<(String, String)> = Vec::new();
        for (source, module) in &self.modules {
            let path = source.resolved_path(ctx)?;
            let statement = render_statement(module, names, &path)?;
            match source {
                ImportSource::Remote { .. } => remote.push((path, statement)),
                ImportSource::Local { .. } => local.push((path, statement)),
            }
        }
        remote.sort_by(|a, b| a.0.cmp(&b.0));
        local.sort_by(|a, b| a.0.cmp(&b.0));
        let lines: Vec<String> = remote
            .into_iter()
            .chain(local)
            .map(|(_, statement)| statement)
            .collect();
        Ok(Some(lines.join("\n")))
    }
}

/// Render one import statement. The statement is type-only when every
/// member stayed type-only; otherwise it is a value import with inline
/// `type` markers on the members that did.
fn render_statement(module: &ImportedModule, names: &NameTable, path: &str) -> Result<String> {
    let statement_type_only = module.imports.values().all(|import| import.type_only);
    let mut items = Vec::with_capacity(module.imports.len());
    for (member, import) in &module.imports {
        if statement_type_only && !import.type_only {
            return Err(Error::TypeOnlyImport {
                path: path.to_string(),
                member: member.clone(),
            });
        }
        let id = import.name.ok_or_else(|| Error::UnresolvedName {
            name: member.clone(),
        })?;
        let spelling = names.spelling(id)?;
        let mut item = if spelling == member {
            member.clone()
        } else {
            format!("{member} as {spelling}")
        };
        if import.type_only && !statement_type_only {
            item = format!("type {item}");
        }
        items.push(item);
    }
    let keyword = if statement_type_only {
        "import type"
    } else {
        "import"
    };
    Ok(format!(
        "{keyword} {{ {} }} from \"{path}\";",
        items.join(", ")
    ))
}
