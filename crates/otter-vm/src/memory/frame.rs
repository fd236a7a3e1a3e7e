use otter_core::ObjectRef;

use super::SegmentStore;

/// Activation record of one method call.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub method: String,
    pub locals: SegmentStore,
    pub temporaries: SegmentStore,
    /// Object INSTANCE addresses resolve against.
    pub instance: Option<ObjectRef>,
    /// Instruction to resume at in the caller. `None` for the entry frame.
    pub return_address: Option<usize>,
}

impl Frame {
    pub fn new(method: impl Into<String>, instance: Option<ObjectRef>) -> Self {
        Self {
            method: method.into(),
            locals: SegmentStore::new(),
            temporaries: SegmentStore::new(),
            instance,
            return_address: None,
        }
    }

    pub fn is_entry(&self) -> bool {
        self.return_address.is_none()
    }
}
