// Mapping-entry DSL parser

pub mod entry;
pub mod lexer;

use anyhow::{anyhow, Result};

use crate::mapping::MappingEntry;

// Public API re-exports
pub use entry::parse_entry;

/// Parse one mapping entry, rejecting trailing input
pub fn parse_mapping_entry(input: &str) -> Result<MappingEntry> {
    match parse_entry(input) {
        Ok((_, entry)) => Ok(entry),
        Err(e) => Err(anyhow!("Invalid chart entry '{}': {:?}", input.trim(), e)),
    }
}

/// Parse `name=entry` as given on the command line
pub fn parse_named_entry(input: &str) -> Result<(String, MappingEntry)> {
    let (name, entry) = input
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected <name>=<entry>, got '{}'", input))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Chart name is empty in '{}'", input));
    }
    Ok((name.to_string(), parse_mapping_entry(entry)?))
}
