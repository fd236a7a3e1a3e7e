//! Runtime memory.
//!
//! GLOBAL cells live for the whole run, CONSTANT cells come from the
//! program's constant table, LOCAL and TEMPORARY cells belong to the active
//! frame and INSTANCE cells to the active frame's object.

mod frame;
mod heap;
mod segment;

pub use frame::Frame;
pub use heap::Heap;
pub use segment::SegmentStore;

use otter_core::{Address, ConstantTable, ObjectRef, RuntimeError, ScopeKind, Value};

/// Name of the frame the entry constructor runs in.
pub const ENTRY_FRAME: &str = "<entry>";

#[derive(Debug, Clone, Default)]
pub struct RuntimeMemory {
    globals: SegmentStore,
    heap: Heap,
    /// Active call stack; the last frame executes.
    frames: Vec<Frame>,
    /// Records prepared by `ERA` and not yet entered.
    pending: Vec<Frame>,
}

impl RuntimeMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and open the entry frame with a fresh instance.
    pub fn reset(&mut self) {
        self.globals.clear();
        self.heap.clear();
        self.pending.clear();
        self.frames.clear();
        let instance = self.heap.allocate();
        self.frames.push(Frame::new(ENTRY_FRAME, Some(instance)));
    }

    pub fn globals(&self) -> &SegmentStore {
        &self.globals
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// Number of active frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn current(&self) -> Result<&Frame, RuntimeError> {
        self.frames.last().ok_or_else(no_frame)
    }

    pub fn current_mut(&mut self) -> Result<&mut Frame, RuntimeError> {
        self.frames.last_mut().ok_or_else(no_frame)
    }

    /// Instance of the active frame.
    pub fn current_instance(&self) -> Result<ObjectRef, RuntimeError> {
        self.current()?
            .instance
            .ok_or_else(|| RuntimeError::NullReference {
                name: "self".to_string(),
            })
    }

    // ==========================================================================
    // Frames
    // ==========================================================================

    pub fn prepare(&mut self, frame: Frame) {
        self.pending.push(frame);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Make the most recently prepared record the active frame.
    pub fn enter(&mut self, return_address: usize) -> Result<&Frame, RuntimeError> {
        let mut frame = self
            .pending
            .pop()
            .ok_or_else(|| malformed("call without a prepared activation record"))?;
        frame.return_address = Some(return_address);
        self.frames.push(frame);
        self.current()
    }

    /// Pop the active frame.
    pub fn leave(&mut self) -> Result<Frame, RuntimeError> {
        if self.frames.len() <= 1 {
            return Err(malformed("return from the entry frame"));
        }
        self.frames.pop().ok_or_else(no_frame)
    }

    // ==========================================================================
    // Cells
    // ==========================================================================

    /// Value stored at `address`, as seen from the active frame.
    pub fn load(&self, address: Address, constants: &ConstantTable) -> Result<Value, RuntimeError> {
        let frame = self.current()?;
        let value = match address.scope {
            ScopeKind::Global => self.globals.get(address),
            ScopeKind::Constant => constants.get(address),
            ScopeKind::Local => frame.locals.get(address),
            ScopeKind::Temporary => frame.temporaries.get(address),
            ScopeKind::Instance => self.instance_store(frame)?.get(address),
        };
        value.cloned().ok_or(RuntimeError::UninitializedRead {
            address: address.to_raw(),
        })
    }

    /// Store into the active frame's view of memory.
    pub fn store(&mut self, address: Address, value: Value) -> Result<(), RuntimeError> {
        let Self {
            globals,
            heap,
            frames,
            ..
        } = self;
        let frame = frames.last_mut().ok_or_else(no_frame)?;
        store_in(globals, heap, frame, address, value)
    }

    /// Store into the most recently prepared record, for `PARAM`.
    pub fn store_pending(&mut self, address: Address, value: Value) -> Result<(), RuntimeError> {
        let Self {
            globals,
            heap,
            pending,
            ..
        } = self;
        let frame = pending
            .last_mut()
            .ok_or_else(|| malformed("parameter without a prepared activation record"))?;
        store_in(globals, heap, frame, address, value)
    }

    fn instance_store(&self, frame: &Frame) -> Result<&SegmentStore, RuntimeError> {
        let object = frame.instance.ok_or_else(|| RuntimeError::NullReference {
            name: "self".to_string(),
        })?;
        self.heap
            .get(object)
            .ok_or_else(|| malformed(format!("dangling object #{}", object.0)))
    }
}

fn store_in(
    globals: &mut SegmentStore,
    heap: &mut Heap,
    frame: &mut Frame,
    address: Address,
    value: Value,
) -> Result<(), RuntimeError> {
    match address.scope {
        ScopeKind::Global => globals.set(address, value),
        ScopeKind::Constant => {
            return Err(RuntimeError::WriteToConstant {
                address: address.to_raw(),
            });
        }
        ScopeKind::Local => frame.locals.set(address, value),
        ScopeKind::Temporary => frame.temporaries.set(address, value),
        ScopeKind::Instance => {
            let object = frame.instance.ok_or_else(|| RuntimeError::NullReference {
                name: "self".to_string(),
            })?;
            heap.get_mut(object)
                .ok_or_else(|| malformed(format!("dangling object #{}", object.0)))?
                .set(address, value);
        }
    }
    Ok(())
}

fn no_frame() -> RuntimeError {
    malformed("no active frame")
}

fn malformed(message: impl Into<String>) -> RuntimeError {
    RuntimeError::MalformedProgram {
        ip: 0,
        message: message.into(),
    }
}
