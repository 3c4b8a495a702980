use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::path::GroupPath;

/// Flat lookup tables produced by the definition compiler.
///
/// `definitions` maps each literal class to its group; `overrides` maps a group
/// to the groups it evicts. The serialized form is the persisted artifact
/// loaded at startup:
///
/// ```json
/// {
///   "definitions": { "p-4": "spacing.padding.all" },
///   "overrides": { "spacing.padding.all": ["spacing.padding.t"] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledTable {
    #[serde(default)]
    definitions: IndexMap<String, GroupPath>,
    #[serde(default)]
    overrides: IndexMap<GroupPath, Vec<GroupPath>>,
}

impl CompiledTable {
    pub fn new(
        definitions: IndexMap<String, GroupPath>,
        overrides: IndexMap<GroupPath, Vec<GroupPath>>,
    ) -> Result<Self, TableError> {
        let table = Self {
            definitions,
            overrides,
        };
        table.validate()?;
        Ok(table)
    }

    pub(crate) fn from_parts(
        definitions: IndexMap<String, GroupPath>,
        overrides: IndexMap<GroupPath, Vec<GroupPath>>,
    ) -> Self {
        Self {
            definitions,
            overrides,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let table: Self =
            serde_json::from_str(json).map_err(|err| TableError::Parse(err.to_string()))?;
        table.validate()?;
        tracing::debug!(
            classes = table.definitions.len(),
            overrides = table.overrides.len(),
            "loaded compiled table"
        );
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String, TableError> {
        serde_json::to_string_pretty(self).map_err(|err| TableError::Serialize(err.to_string()))
    }

    pub fn group_of(&self, class: &str) -> Option<&GroupPath> {
        self.definitions.get(class)
    }

    /// Groups evicted by `group`; empty when it declares none.
    pub fn overrides_of(&self, group: &GroupPath) -> &[GroupPath] {
        self.overrides
            .get(group)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn definitions(&self) -> &IndexMap<String, GroupPath> {
        &self.definitions
    }

    pub fn overrides(&self) -> &IndexMap<GroupPath, Vec<GroupPath>> {
        &self.overrides
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// True when some class belongs to `path` or to a group beneath it.
    pub fn has_group(&self, path: &GroupPath) -> bool {
        self.definitions
            .values()
            .any(|group| group.starts_with(path))
    }

    /// Every override source and target must name a populated group.
    pub fn validate(&self) -> Result<(), TableError> {
        match self.first_unknown_group() {
            Some((source, group)) => Err(TableError::UnknownGroup {
                source_group: source.to_string(),
                group: group.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn first_unknown_group(&self) -> Option<(&GroupPath, &GroupPath)> {
        self.overrides.iter().find_map(|(source, targets)| {
            std::iter::once(source)
                .chain(targets)
                .find(|group| !self.has_group(group))
                .map(|group| (source, group))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::CompiledTable;
    use crate::error::TableError;
    use crate::path::GroupPath;

    const PADDING_TABLE: &str = r#"{
        "definitions": {
            "p-4": "spacing.padding.all",
            "p-8": "spacing.padding.all",
            "pt-4": "spacing.padding.t"
        },
        "overrides": {
            "spacing.padding.all": ["spacing.padding.t"]
        }
    }"#;

    fn path(raw: &str) -> GroupPath {
        GroupPath::parse(raw).expect("path should parse")
    }

    #[test]
    fn loads_persisted_table() {
        let table = CompiledTable::from_json(PADDING_TABLE).expect("table should load");
        assert_eq!(table.len(), 3);
        assert_eq!(table.group_of("p-8"), Some(&path("spacing.padding.all")));
        assert_eq!(
            table.overrides_of(&path("spacing.padding.all")),
            &[path("spacing.padding.t")]
        );
        assert!(table.overrides_of(&path("spacing.padding.t")).is_empty());
        assert_eq!(table.group_of("m-4"), None);
    }

    #[test]
    fn json_output_reloads_identically() {
        let table = CompiledTable::from_json(PADDING_TABLE).expect("table should load");
        let json = table.to_json().expect("table should serialize");
        assert!(json.contains("\"pt-4\": \"spacing.padding.t\""));
        assert_eq!(CompiledTable::from_json(&json), Ok(table));
    }

    #[test]
    fn accepts_missing_overrides_field() {
        let table = CompiledTable::from_json(r#"{ "definitions": { "flex": "layout.display" } }"#)
            .expect("table should load");
        assert!(table.overrides().is_empty());
    }

    #[test]
    fn rejects_override_to_unknown_group() {
        let json = r#"{
            "definitions": { "p-4": "spacing.padding.all" },
            "overrides": { "spacing.padding.all": ["spacing.padding.x"] }
        }"#;
        assert_eq!(
            CompiledTable::from_json(json),
            Err(TableError::UnknownGroup {
                source_group: "spacing.padding.all".to_string(),
                group: "spacing.padding.x".to_string(),
            })
        );
    }

    #[test]
    fn override_may_name_group_prefix() {
        let json = r#"{
            "definitions": { "p-4": "spacing.padding.all", "m-4": "spacing.margin.all" },
            "overrides": { "spacing.padding.all": ["spacing.margin"] }
        }"#;
        assert!(CompiledTable::from_json(json).is_ok());
    }

    #[test]
    fn rejects_malformed_paths() {
        let json = r#"{ "definitions": { "p-4": "spacing..all" } }"#;
        assert!(matches!(
            CompiledTable::from_json(json),
            Err(TableError::Parse(_))
        ));
    }
}
