//! Common utilities for TypeScript text generation.
//!
//! Escaping, property-key quoting, and doc-block rendering shared across
//! the type compiler and definition-level generators.

use crate::schema::Metadata;

/// Check if a name is a valid TypeScript identifier and can be used as a
/// property key without quoting.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use inside a double-quoted TypeScript literal.
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a property key when it is not a valid identifier.
pub fn quote_key(name: &str) -> String {
    if is_valid_identifier(name) {
        name.to_string()
    } else {
        format!("\"{}\"", escape_string(name))
    }
}

/// Render the doc block for a declaration or property.
///
/// The description is reproduced verbatim, one source line per comment
/// line, with any literal `*/` escaped so it cannot terminate the block.
/// A `@deprecated` line is appended when flagged. Returns `None` when
/// there is neither a description nor a deprecation, and the returned
/// block always ends with a newline so the declaration follows directly.
pub fn doc_block(metadata: &Metadata, indent: usize) -> Option<String> {
    let description = metadata.description.as_deref().unwrap_or("");
    if description.is_empty() && !metadata.deprecated {
        return None;
    }

    let pad = "  ".repeat(indent);
    let mut out = format!("{pad}/**\n");
    for line in description.lines() {
        if line.is_empty() {
            out.push_str(&format!("{pad} *\n"));
        } else {
            out.push_str(&format!("{pad} * {}\n", line.replace("*/", "*\\/")));
        }
    }
    if metadata.deprecated {
        out.push_str(&format!("{pad} * @deprecated\n"));
    }
    out.push_str(&format!("{pad} */\n"));
    Some(out)
}
