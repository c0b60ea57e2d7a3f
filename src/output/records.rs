//! Module records: the final, serializable shape of the hierarchy
//!
//! ```json
//! [{ "module": "Billing", "Description": "...", "Submodules": { "Invoices": "..." } }]
//! ```

use crate::inference::{ModuleMap, ModuleNode};
use crate::Result;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::path::Path;

/// One module of the output document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleRecord {
    pub module: String,

    #[serde(rename = "Description")]
    pub description: String,

    /// Submodule name and description pairs, in first-seen order
    #[serde(rename = "Submodules", serialize_with = "serialize_ordered_map")]
    pub submodules: Vec<(String, String)>,
}

impl ModuleRecord {
    /// Builds the record for a summarized module
    ///
    /// Submodules without a description are left out. Returns None when
    /// neither the module nor any submodule has a description.
    pub fn from_module(module: &ModuleNode) -> Option<Self> {
        let submodules: Vec<(String, String)> = module
            .submodules
            .iter()
            .filter(|sub| !sub.description.is_empty())
            .map(|sub| (sub.name.clone(), sub.description.clone()))
            .collect();

        if module.description.is_empty() && submodules.is_empty() {
            return None;
        }

        let description = if module.description.is_empty() {
            format!("Module for {}", module.name)
        } else {
            module.description.clone()
        };

        Some(Self {
            module: module.name.clone(),
            description,
            submodules,
        })
    }
}

/// Records for every module that passes the description filter, in order
pub fn build_records(modules: &ModuleMap) -> Vec<ModuleRecord> {
    modules.iter().filter_map(ModuleRecord::from_module).collect()
}

fn serialize_ordered_map<S>(
    pairs: &[(String, String)],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (name, description) in pairs {
        map.serialize_entry(name, description)?;
    }
    map.end()
}

/// Renders records as a JSON array
///
/// # Arguments
///
/// * `modules` - The records to render
/// * `pretty` - Indent the output
pub fn to_json(modules: &[ModuleRecord], pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(modules)?
    } else {
        serde_json::to_string(modules)?
    };
    Ok(json)
}

/// Writes records as JSON to `path`
pub fn write_json(modules: &[ModuleRecord], path: &Path, pretty: bool) -> Result<()> {
    let json = to_json(modules, pretty)?;
    std::fs::write(path, json)?;
    Ok(())
}
