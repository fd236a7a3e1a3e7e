use otter_core::{Address, TypeKind, Value};

/// Cells of one scope, one growable vector per type segment.
///
/// A cell is `None` until something is stored in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentStore {
    cells: [Vec<Option<Value>>; TypeKind::ALL.len()],
}

impl SegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, address: Address) -> Option<&Value> {
        self.cells[address.kind.index()]
            .get(address.offset as usize)
            .and_then(Option::as_ref)
    }

    /// Store `value`, growing the segment as needed.
    pub fn set(&mut self, address: Address, value: Value) {
        let segment = &mut self.cells[address.kind.index()];
        let offset = address.offset as usize;
        if segment.len() <= offset {
            segment.resize(offset + 1, None);
        }
        segment[offset] = Some(value);
    }

    /// Number of initialized cells.
    pub fn initialized(&self) -> usize {
        self.cells
            .iter()
            .map(|segment| segment.iter().filter(|cell| cell.is_some()).count())
            .sum()
    }

    pub fn clear(&mut self) {
        for segment in &mut self.cells {
            segment.clear();
        }
    }
}
