//! Virtual machine configuration.

/// Deepest call nesting allowed before `StackOverflow`.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmOptions {
    /// Maximum number of active method frames, the entry frame included.
    pub max_call_depth: usize,
}

impl Default for VmOptions {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl VmOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}
