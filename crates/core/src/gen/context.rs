//! Per-generation render parameters.
//!
//! A `Context` is derived once from the schema document plus the caller's
//! packaging/engine selection, and stays immutable for the generation's
//! lifetime. Each generation owns its own context; nothing is shared
//! between concurrent generations except the immutable schema values.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::schema::SchemaDocument;

/// Import grammar for remote sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packaging {
    /// Versioned `https://` URLs for remote modules.
    HostedUrl,
    /// Scoped bare package specifiers for remote modules.
    BareSpecifier,
}

/// Runtime conventions governing remote-module path construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Deno-style paths: remote sub-paths carry a `.ts` extension.
    Deno,
    /// Node-style paths: remote sub-paths carry a `.js` extension.
    Node,
}

impl Engine {
    /// File extension appended to remote sub-paths. The engine selector
    /// affects nothing else.
    pub fn remote_extension(self) -> &'static str {
        match self {
            Self::Deno => ".ts",
            Self::Node => ".js",
        }
    }
}

/// Caller-facing generation options.
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// Remote import grammar.
    pub packaging: Packaging,
    /// Remote path conventions.
    pub engine: Engine,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            packaging: Packaging::HostedUrl,
            engine: Engine::Deno,
        }
    }
}

/// Immutable render parameters for one module generation.
#[derive(Debug, Clone)]
pub struct Context {
    api_version: String,
    dependencies: BTreeMap<String, String>,
    packaging: Packaging,
    engine: Engine,
    module_path: String,
}

impl Context {
    /// Derive a context from a schema document and generation options.
    pub fn new(schema: &SchemaDocument, options: GenerateOptions) -> Self {
        let api_version = match &schema.group.name {
            Some(group) => format!("{group}/{}", schema.version),
            None => schema.version.clone(),
        };
        let module_path = schema.group.module.clone().unwrap_or_else(|| {
            format!(
                "{}/mod.ts",
                module_dir(schema.group.name.as_deref(), &schema.version)
            )
        });
        let dependencies = schema
            .dependencies
            .iter()
            .map(|d| (d.package.clone(), d.version.clone()))
            .collect();
        Self {
            api_version,
            dependencies,
            packaging: options.packaging,
            engine: options.engine,
            module_path,
        }
    }

    /// The derived API version literal: `group/version`, or the bare
    /// version for groupless APIs.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Root-relative path of the module being generated.
    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    /// Selected remote import grammar.
    pub fn packaging(&self) -> Packaging {
        self.packaging
    }

    /// Selected remote path conventions.
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Pinned version for a dependency package.
    pub fn dependency_version(&self, package: &str) -> Result<&str> {
        self.dependencies
            .get(package)
            .map(String::as_str)
            .ok_or_else(|| Error::MissingDependency {
                package: package.to_string(),
            })
    }
}

/// Directory holding the module for a given group/version pair:
/// `group@version`, or the bare version for groupless APIs.
pub fn module_dir(group: Option<&str>, version: &str) -> String {
    match group {
        Some(group) => format!("{group}@{version}"),
        None => version.to_string(),
    }
}
