use std::sync::Arc;

use crate::path::GroupPath;
use crate::table::CompiledTable;

/// Where a recognized token belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a, 't> {
    /// Leading `state:` selector including its colon, or `""`.
    pub variant: &'t str,
    pub group: &'a GroupPath,
    pub overrides: &'a [GroupPath],
}

/// Maps tokens onto groups of a compiled table.
///
/// A token is `[variant:]<prefix><key>`, where the variant is a leading run of
/// non-colon characters followed by a colon. Tokens whose key is not in the
/// table, or that lack the configured prefix, are unrecognized.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: Arc<CompiledTable>,
    prefix: String,
}

impl Classifier {
    pub fn new(table: Arc<CompiledTable>) -> Self {
        Self::with_prefix(table, "")
    }

    pub fn with_prefix(table: Arc<CompiledTable>, prefix: impl Into<String>) -> Self {
        Self {
            table,
            prefix: prefix.into(),
        }
    }

    pub fn table(&self) -> &CompiledTable {
        &self.table
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn classify<'a, 't>(&'a self, token: &'t str) -> Option<Classification<'a, 't>> {
        let (variant, key) = self.split_token(token)?;
        let group = self.table.group_of(key)?;
        Some(Classification {
            variant,
            group,
            overrides: self.table.overrides_of(group),
        })
    }

    /// Splits `token` into its variant and prefix-stripped key.
    ///
    /// The variant is taken only when the remainder carries the prefix;
    /// otherwise the whole token must start with it.
    pub fn split_token<'t>(&self, token: &'t str) -> Option<(&'t str, &'t str)> {
        if let Some(colon) = token.find(':').filter(|&idx| idx > 0) {
            let (variant, rest) = token.split_at(colon + 1);
            if let Some(key) = rest.strip_prefix(self.prefix.as_str()) {
                return Some((variant, key));
            }
        }
        token
            .strip_prefix(self.prefix.as_str())
            .map(|key| ("", key))
    }
}
