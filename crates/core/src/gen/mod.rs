//! Module generation pipeline.
//!
//! Generation runs in two stages over a shared `Module`:
//! 1. Apply: every member registers its declarations and imported symbols;
//!    the import table registers one identifier per distinct symbol last,
//!    in canonical order.
//! 2. Render: identifier spellings are final; the import block and each
//!    member produce their text fragments.
//!
//! The separation allows:
//! - Forward references between definitions without a symbol pre-pass
//! - Deterministic collision suffixes independent of registration order
//! - Import paths computed per render from the packaging/engine selectors
//!
//! ## Module Structure
//!
//! - `context`: per-generation render parameters (`Context`, selectors)
//! - `module`: two-phase assembler (`Module`, `Generator`, `Scope`)
//! - `names`: identifier table with deterministic collision resolution
//! - `imports`: import table, path computation, import-block rendering
//! - `compile`: recursive type compiler (schema type -> TS expression)
//! - `defs`: definition-level members and the synthetic framing members
//! - `utils`: doc blocks, escaping, property-key quoting

pub(crate) mod compile;
pub mod context;
pub(crate) mod defs;
mod imports;
mod module;
mod names;
pub mod utils;

// Re-export the assembly surface
pub use context::{Context, Engine, GenerateOptions, Packaging};
pub use imports::{ImportSource, RemoteKind, UseOptions};
pub use module::{Binding, Generator, Module, Phase, RenderFn, Scope};
pub use names::NameId;
