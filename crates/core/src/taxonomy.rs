//! Loads a taxonomy file into a [`DefinitionNode`] tree.
//!
//! ```toml
//! [scales]
//! size = "{0,1,2,4,8}"
//!
//! [groups.spacing.padding]
//! all = ["p-{px,$size}"]
//! t = ["pt-{px,$size}"]
//!
//! [overrides."spacing.padding"]
//! all = ["t"]
//! ```
//!
//! Leaf patterns have `$scale` references substituted and are then brace
//! expanded. An `[overrides]` key names the group the annotation belongs to;
//! the empty key `""` refers to the root.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::braces::expand_braces;
use crate::compile::compile;
use crate::definition::{DefinitionNode, Group};
use crate::error::TaxonomyError;
use crate::table::CompiledTable;

/// The utility taxonomy shipped with the crate.
pub const BUNDLED_TAXONOMY: &str = include_str!("../data/taxonomy.toml");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTaxonomy {
    #[serde(default)]
    scales: IndexMap<String, String>,
    #[serde(default)]
    groups: IndexMap<String, RawNode>,
    #[serde(default)]
    overrides: IndexMap<String, IndexMap<String, Vec<String>>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNode {
    Leaf(Vec<String>),
    Group(IndexMap<String, RawNode>),
}

pub fn parse_taxonomy(source: &str) -> Result<DefinitionNode, TaxonomyError> {
    let raw: RawTaxonomy =
        toml::from_str(source).map_err(|err| TaxonomyError::Parse(err.to_string()))?;

    let mut root = build_group(&raw.groups, &raw.scales)?;
    for (path, entries) in &raw.overrides {
        let segments = if path.is_empty() {
            Vec::new()
        } else {
            path.split('.').collect::<Vec<_>>()
        };
        let Some(group) = root.descendant_group_mut(&segments) else {
            return Err(TaxonomyError::UnknownGroup { path: path.clone() });
        };
        for (child, siblings) in entries {
            group.set_override(child.as_str(), siblings.iter().map(String::as_str));
        }
    }

    Ok(DefinitionNode::Group(root))
}

/// Parses and compiles a taxonomy in one step.
pub fn compile_taxonomy(source: &str) -> Result<CompiledTable, TaxonomyError> {
    let tree = parse_taxonomy(source)?;
    Ok(compile(&tree)?)
}

fn build_group(
    children: &IndexMap<String, RawNode>,
    scales: &IndexMap<String, String>,
) -> Result<Group, TaxonomyError> {
    let mut group = Group::new();
    for (name, node) in children {
        let child = match node {
            RawNode::Leaf(patterns) => DefinitionNode::Leaf(expand_leaf(patterns, scales)?),
            RawNode::Group(inner) => DefinitionNode::Group(build_group(inner, scales)?),
        };
        group.insert_child(name.as_str(), child);
    }
    Ok(group)
}

fn expand_leaf(
    patterns: &[String],
    scales: &IndexMap<String, String>,
) -> Result<Vec<String>, TaxonomyError> {
    let mut classes = Vec::new();
    for pattern in patterns {
        let substituted = substitute_scales(pattern, scales)?;
        let expanded =
            expand_braces(&substituted).map_err(|cause| TaxonomyError::InvalidPattern {
                pattern: pattern.clone(),
                cause,
            })?;
        for class in expanded {
            if !classes.contains(&class) {
                classes.push(class);
            }
        }
    }
    Ok(classes)
}

fn substitute_scales(
    pattern: &str,
    scales: &IndexMap<String, String>,
) -> Result<String, TaxonomyError> {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let name_len = after
            .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
            .unwrap_or(after.len());
        let name = &after[..name_len];
        let Some(value) = scales.get(name) else {
            return Err(TaxonomyError::UnknownScale {
                name: name.to_string(),
                pattern: pattern.to_string(),
            });
        };
        out.push_str(value);
        rest = &after[name_len..];
    }
    out.push_str(rest);

    Ok(out)
}
