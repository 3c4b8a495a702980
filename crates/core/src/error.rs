//! Error types for taxonomy loading, definition compilation and compiled tables.

/// Defects in a definition tree. These are programmer errors in the taxonomy
/// and are reported at build time, never at resolution time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    /// The tree root is a leaf, so its classes have no group path.
    #[error("definition root must be a group, not a leaf")]
    RootLeaf,

    /// A child name cannot be used as a path segment.
    #[error("invalid group name `{name}` in group `{group}`")]
    InvalidName { group: String, name: String },

    /// The same literal class is assigned to two different groups.
    #[error("class `{class}` is assigned to both `{first}` and `{second}`")]
    DuplicateClass {
        class: String,
        first: String,
        second: String,
    },

    /// An override annotation is keyed by a name that is not a child.
    #[error("override in group `{group}` names unknown child `{name}`")]
    UnknownOverrideSource { group: String, name: String },

    /// An override annotation lists a sibling that does not exist.
    #[error("override `{source_name}` in group `{group}` targets unknown sibling `{target}`")]
    UnknownOverrideTarget {
        group: String,
        source_name: String,
        target: String,
    },

    /// An override source or target holds no classes, so it can never match.
    #[error("override refers to group `{group}` which has no classes")]
    EmptyGroup { group: String },
}

/// Failures loading, validating or writing a compiled table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("failed to parse compiled table: {0}")]
    Parse(String),

    #[error("failed to serialize compiled table: {0}")]
    Serialize(String),

    #[error("invalid group path `{0}`")]
    InvalidPath(String),

    /// An override entry references a group with no classes beneath it.
    #[error("override for `{source_group}` refers to unknown group `{group}`")]
    UnknownGroup { source_group: String, group: String },
}

/// Failures expanding a single brace pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BraceError {
    #[error("unmatched `{brace}` at byte {offset}")]
    Unbalanced { brace: char, offset: usize },

    #[error("range `{range}` produces more than {limit} values")]
    RangeTooLarge { range: String, limit: usize },

    #[error("pattern expands to more than {limit} names")]
    TooManyExpansions { limit: usize },
}

/// Failures turning a taxonomy file into a definition tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyError {
    #[error("failed to parse taxonomy: {0}")]
    Parse(String),

    #[error("unknown scale `${name}` in pattern `{pattern}`")]
    UnknownScale { name: String, pattern: String },

    #[error("invalid pattern `{pattern}`: {cause}")]
    InvalidPattern {
        pattern: String,
        #[source]
        cause: BraceError,
    },

    /// An `[overrides]` entry is keyed by a path that is not a group.
    #[error("overrides declared for unknown group `{path}`")]
    UnknownGroup { path: String },

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}
