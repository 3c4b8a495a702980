//! Merges an ordered token list so that later tokens win their group.
//!
//! Tokens in the same variant and group collapse to the last one. A token whose
//! group declares overrides also evicts already-accepted tokens of the
//! overridden groups under the same variant. Eviction only looks backward:
//! a specific token written after a general one survives alongside it, which
//! matches the stylesheet order where specific utilities win anyway.
//!
//! Unrecognized tokens pass through once, at their first position.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::classify::{Classification, Classifier};
use crate::classnames::{ClassValue, class_names};
use crate::path::GroupPath;
use crate::table::CompiledTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CascadeKey<'a, 't> {
    Group {
        variant: &'t str,
        group: &'a GroupPath,
    },
    Verbatim(&'t str),
}

/// Resolves `tokens` with `classify`, returning the winners ordered by the
/// first insertion of their slot.
pub fn merge<'a, 't, I, F>(tokens: I, mut classify: F) -> Vec<&'t str>
where
    I: IntoIterator<Item = &'t str>,
    F: FnMut(&'t str) -> Option<Classification<'a, 't>>,
{
    let mut state: IndexMap<CascadeKey<'a, 't>, &'t str> = IndexMap::new();

    for token in tokens {
        let Some(Classification {
            variant,
            group,
            overrides,
        }) = classify(token)
        else {
            state.entry(CascadeKey::Verbatim(token)).or_insert(token);
            continue;
        };

        for overridden in overrides {
            let key = CascadeKey::Group {
                variant,
                group: overridden,
            };
            if let Some(evicted) = state.shift_remove(&key) {
                tracing::trace!(%evicted, by = %token, group = %overridden, "evicted class");
            }
        }

        state.insert(CascadeKey::Group { variant, group }, token);
    }

    state.into_values().collect()
}

/// A classifier bound to the merge, resolving whole class strings.
#[derive(Debug, Clone)]
pub struct Cascader {
    classifier: Classifier,
}

impl Cascader {
    pub fn new(table: Arc<CompiledTable>) -> Self {
        Self {
            classifier: Classifier::new(table),
        }
    }

    pub fn with_prefix(table: Arc<CompiledTable>, prefix: impl Into<String>) -> Self {
        Self {
            classifier: Classifier::with_prefix(table, prefix),
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn resolve_tokens<'t, I>(&self, tokens: I) -> Vec<&'t str>
    where
        I: IntoIterator<Item = &'t str>,
    {
        merge(tokens, |token| self.classifier.classify(token))
    }

    /// Splits `classes` on whitespace and joins the winners with single spaces.
    pub fn resolve(&self, classes: &str) -> String {
        self.resolve_tokens(classes.split_whitespace()).join(" ")
    }

    /// Concatenates class arguments, then resolves them.
    pub fn cx(&self, args: &[ClassValue]) -> String {
        self.resolve(&class_names(args))
    }
}
