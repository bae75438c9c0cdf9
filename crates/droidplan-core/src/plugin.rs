/// A plugin applied to the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDeclaration {
    /// Position in the descriptor's `[[plugins]]` array.
    pub index: usize,
    pub id: String,
    pub version: Option<String>,
}

/// `before` must be applied strictly before `after`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginConstraint {
    pub before: String,
    pub after: String,
}

impl PluginConstraint {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}
