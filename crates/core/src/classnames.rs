//! Conditional class-name concatenation.
//!
//! Arguments are strings, nested lists, or `(name, enabled)` toggles; maps of
//! name to flag convert into lists of toggles. Empty strings and disabled
//! toggles are skipped and the rest are joined with single spaces.

use std::collections::BTreeMap;

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassValue {
    Str(String),
    List(Vec<ClassValue>),
    Toggle(String, bool),
}

pub fn class_names(args: &[ClassValue]) -> String {
    let mut parts = Vec::new();
    collect(args, &mut parts);
    parts.join(" ")
}

fn collect<'v>(values: &'v [ClassValue], parts: &mut Vec<&'v str>) {
    for value in values {
        match value {
            ClassValue::Str(name) | ClassValue::Toggle(name, true) if !name.is_empty() => {
                parts.push(name)
            }
            ClassValue::List(inner) => collect(inner, parts),
            _ => {}
        }
    }
}

impl From<&str> for ClassValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ClassValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ClassValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl<S: Into<String>> From<(S, bool)> for ClassValue {
    fn from((name, enabled): (S, bool)) -> Self {
        Self::Toggle(name.into(), enabled)
    }
}

impl<T: Into<ClassValue>> From<Option<T>> for ClassValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::List(Vec::new()))
    }
}

impl<T: Into<ClassValue>> From<Vec<T>> for ClassValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ClassValue>, const N: usize> From<[T; N]> for ClassValue {
    fn from(values: [T; N]) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> From<IndexMap<S, bool>> for ClassValue {
    fn from(values: IndexMap<S, bool>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> From<BTreeMap<S, bool>> for ClassValue {
    fn from(values: BTreeMap<S, bool>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}
