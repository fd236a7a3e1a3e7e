//! Compiler configuration.

/// Name of the class whose constructor runs first.
pub const DEFAULT_ENTRY_CLASS: &str = "Main";

/// Options controlling a [`Compiler`](crate::Compiler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Class whose constructor instruction 0 jumps to.
    pub entry_class: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            entry_class: DEFAULT_ENTRY_CLASS.to_string(),
        }
    }
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry_class(mut self, name: impl Into<String>) -> Self {
        self.entry_class = name.into();
        self
    }
}
