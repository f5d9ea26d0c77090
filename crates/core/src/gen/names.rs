//! Per-module identifier table.
//!
//! Every identifier a module needs is registered here during the apply
//! phase; final spellings are assigned once during resolve and are
//! immutable afterwards. Declarations are semantically fixed by the schema
//! and never renamed; same-named imports are disambiguated with
//! deterministic suffixes, reproducible across runs.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// How an identifier is used. Ordering doubles as resolution priority:
/// declarations win the raw spelling over imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum NameKind {
    Declaration,
    Import,
}

/// Stable handle to one registered identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameId(usize);

#[derive(Debug)]
struct NameEntry {
    raw: String,
    kind: NameKind,
    spelling: Option<String>,
}

/// Registry of every identifier one module declares or imports.
#[derive(Debug, Default)]
pub(crate) struct NameTable {
    entries: Vec<NameEntry>,
    declarations: HashMap<String, NameId>,
}

impl NameTable {
    /// Register a top-level declaration. A second declaration with the same
    /// raw name is a fatal error, unlike import collisions which resolve
    /// to suffixed spellings.
    pub fn declare(&mut self, raw: &str) -> Result<NameId> {
        if self.declarations.contains_key(raw) {
            return Err(Error::DuplicateDeclaration {
                name: raw.to_string(),
            });
        }
        let id = NameId(self.entries.len());
        self.entries.push(NameEntry {
            raw: raw.to_string(),
            kind: NameKind::Declaration,
            spelling: None,
        });
        self.declarations.insert(raw.to_string(), id);
        Ok(id)
    }

    /// Register one imported symbol. Collisions are allowed and resolve to
    /// deterministic suffixed spellings.
    pub fn import(&mut self, raw: &str) -> NameId {
        let id = NameId(self.entries.len());
        self.entries.push(NameEntry {
            raw: raw.to_string(),
            kind: NameKind::Import,
            spelling: None,
        });
        id
    }

    /// Look up a declaration by raw name. Used to resolve same-module
    /// references; failing here means the schema referenced a local type
    /// that was never declared.
    pub fn declaration(&self, raw: &str) -> Result<NameId> {
        self.declarations
            .get(raw)
            .copied()
            .ok_or_else(|| Error::UndeclaredReference {
                name: raw.to_string(),
            })
    }

    /// Assign final spellings. Registrations are grouped by raw name and
    /// ordered by (kind priority, registration order): the first entry
    /// keeps the raw spelling, the second becomes `raw_`, later entries
    /// become `raw_<i>`.
    pub fn resolve(&mut self) {
        let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, entry) in self.entries.iter().enumerate() {
            groups.entry(entry.raw.clone()).or_default().push(index);
        }
        for (raw, mut indices) in groups {
            indices.sort_by_key(|&i| (self.entries[i].kind, i));
            for (position, &index) in indices.iter().enumerate() {
                let spelling = match position {
                    0 => raw.clone(),
                    1 => format!("{raw}_"),
                    p => format!("{raw}_{p}"),
                };
                self.entries[index].spelling = Some(spelling);
            }
        }
    }

    /// Final spelling for a registered identifier. Fails when called
    /// before `resolve` has run.
    pub fn spelling(&self, id: NameId) -> Result<&str> {
        let NameId(index) = id;
        match self.entries.get(index) {
            Some(entry) => entry
                .spelling
                .as_deref()
                .ok_or_else(|| Error::UnresolvedName {
                    name: entry.raw.clone(),
                }),
            None => Err(Error::UnresolvedName {
                name: format!("#{index}"),
            }),
        }
    }
}
