use indexmap::IndexMap;

/// A node of the class definition tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionNode {
    /// Literal class names belonging to the enclosing path.
    Leaf(Vec<String>),
    Group(Group),
}

impl DefinitionNode {
    pub fn leaf<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Leaf(classes.into_iter().map(Into::into).collect())
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Leaf(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Leaf(_) => None,
        }
    }
}

impl From<Group> for DefinitionNode {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

/// Named children plus the override annotation for those children.
///
/// `overrides` maps a child name to the sibling names it evicts. Child order is
/// kept for readability of the compiled output only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    children: IndexMap<String, DefinitionNode>,
    overrides: IndexMap<String, Vec<String>>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_child(mut self, name: impl Into<String>, node: impl Into<DefinitionNode>) -> Self {
        self.insert_child(name, node);
        self
    }

    pub fn with_leaf<I, S>(self, name: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_child(name, DefinitionNode::leaf(classes))
    }

    pub fn with_override<I, S>(mut self, child: impl Into<String>, siblings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_override(child, siblings);
        self
    }

    pub fn insert_child(&mut self, name: impl Into<String>, node: impl Into<DefinitionNode>) {
        self.children.insert(name.into(), node.into());
    }

    pub fn set_override<I, S>(&mut self, child: impl Into<String>, siblings: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overrides
            .insert(child.into(), siblings.into_iter().map(Into::into).collect());
    }

    pub fn children(&self) -> &IndexMap<String, DefinitionNode> {
        &self.children
    }

    pub fn overrides(&self) -> &IndexMap<String, Vec<String>> {
        &self.overrides
    }

    pub fn child(&self, name: &str) -> Option<&DefinitionNode> {
        self.children.get(name)
    }

    /// Walks `segments` down from this group, returning the group found there.
    pub fn descendant_group_mut(&mut self, segments: &[&str]) -> Option<&mut Group> {
        let Some((first, rest)) = segments.split_first() else {
            return Some(self);
        };
        self.children
            .get_mut(*first)?
            .as_group_mut()?
            .descendant_group_mut(rest)
    }
}
