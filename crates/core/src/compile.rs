//! Flattens a definition tree into a [`CompiledTable`].
//!
//! The walk is depth-first with an accumulated path. Leaves assign their
//! classes to the current path; after a group's children are walked, its
//! override annotation is resolved against the group's own path, so
//! `spacing.padding` declaring `all: [t]` yields
//! `spacing.padding.all -> [spacing.padding.t]`.
//!
//! Overrides naming a subgroup apply to every leaf group beneath it, which
//! keeps the resulting map keyed by the same paths classes resolve to.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::definition::{DefinitionNode, Group};
use crate::error::DefinitionError;
use crate::path::{GroupPath, is_valid_segment};
use crate::table::CompiledTable;

const ROOT_LABEL: &str = "<root>";

pub fn compile(root: &DefinitionNode) -> Result<CompiledTable, DefinitionError> {
    let DefinitionNode::Group(group) = root else {
        return Err(DefinitionError::RootLeaf);
    };

    let mut compiler = Compiler::default();
    compiler.walk_group(group, None)?;

    tracing::debug!(
        classes = compiler.definitions.len(),
        overrides = compiler.overrides.len(),
        "compiled definition tree"
    );

    let table = CompiledTable::from_parts(compiler.definitions, compiler.overrides);
    if let Some((_, group)) = table.first_unknown_group() {
        return Err(DefinitionError::EmptyGroup {
            group: group.to_string(),
        });
    }
    Ok(table)
}

#[derive(Default)]
struct Compiler {
    definitions: IndexMap<String, GroupPath>,
    overrides: IndexMap<GroupPath, Vec<GroupPath>>,
}

impl Compiler {
    fn walk_group(&mut self, group: &Group, path: Option<&GroupPath>) -> Result<(), DefinitionError> {
        for (name, child) in group.children() {
            if !is_valid_segment(name) {
                return Err(DefinitionError::InvalidName {
                    group: label(path),
                    name: name.clone(),
                });
            }
            let child_path = GroupPath::join(path, name);
            match child {
                DefinitionNode::Leaf(classes) => self.assign(classes, &child_path)?,
                DefinitionNode::Group(inner) => self.walk_group(inner, Some(&child_path))?,
            }
        }

        for (source, targets) in group.overrides() {
            let Some(source_node) = group.child(source) else {
                return Err(DefinitionError::UnknownOverrideSource {
                    group: label(path),
                    name: source.clone(),
                });
            };

            let mut evicted = Vec::new();
            for target in targets {
                let Some(target_node) = group.child(target) else {
                    return Err(DefinitionError::UnknownOverrideTarget {
                        group: label(path),
                        source_name: source.clone(),
                        target: target.clone(),
                    });
                };
                for target_path in leaf_paths(target_node, GroupPath::join(path, target))? {
                    if !evicted.contains(&target_path) {
                        evicted.push(target_path);
                    }
                }
            }

            for source_path in leaf_paths(source_node, GroupPath::join(path, source))? {
                let entry = self.overrides.entry(source_path).or_default();
                for target_path in &evicted {
                    if !entry.contains(target_path) {
                        entry.push(target_path.clone());
                    }
                }
            }
        }

        Ok(())
    }

    fn assign(&mut self, classes: &[String], path: &GroupPath) -> Result<(), DefinitionError> {
        for class in classes {
            match self.definitions.entry(class.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(path.clone());
                }
                Entry::Occupied(slot) if slot.get() == path => {}
                Entry::Occupied(slot) => {
                    return Err(DefinitionError::DuplicateClass {
                        class: class.clone(),
                        first: slot.get().to_string(),
                        second: path.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Leaf groups under `node`; a subgroup with none cannot take part in an override.
fn leaf_paths(node: &DefinitionNode, path: GroupPath) -> Result<Vec<GroupPath>, DefinitionError> {
    let mut paths = Vec::new();
    collect_leaf_paths(node, path.clone(), &mut paths);
    if paths.is_empty() {
        return Err(DefinitionError::EmptyGroup {
            group: path.to_string(),
        });
    }
    Ok(paths)
}

fn collect_leaf_paths(node: &DefinitionNode, path: GroupPath, out: &mut Vec<GroupPath>) {
    match node {
        DefinitionNode::Leaf(_) => {
            if !out.contains(&path) {
                out.push(path);
            }
        }
        DefinitionNode::Group(group) => {
            for (name, child) in group.children() {
                collect_leaf_paths(child, path.child(name), out);
            }
        }
    }
}

fn label(path: Option<&GroupPath>) -> String {
    path.map(|path| path.to_string())
        .unwrap_or_else(|| ROOT_LABEL.to_string())
}
