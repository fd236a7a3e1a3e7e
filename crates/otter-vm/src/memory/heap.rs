use otter_core::ObjectRef;

use super::SegmentStore;

/// Storage for object instances.
///
/// Objects live until the VM is reset; nothing is collected while a program
/// runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Heap {
    objects: Vec<SegmentStore>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh instance with every attribute uninitialized.
    pub fn allocate(&mut self) -> ObjectRef {
        self.objects.push(SegmentStore::new());
        let object = ObjectRef(self.objects.len() - 1);
        log::debug!("allocated object #{}", object.0);
        object
    }

    pub fn get(&self, object: ObjectRef) -> Option<&SegmentStore> {
        self.objects.get(object.0)
    }

    pub fn get_mut(&mut self, object: ObjectRef) -> Option<&mut SegmentStore> {
        self.objects.get_mut(object.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otter_core::{Address, ScopeKind, TypeKind, Value};

    #[test]
    fn objects_have_independent_attributes() {
        let mut heap = Heap::new();
        let a = heap.allocate();
        let b = heap.allocate();
        assert_ne!(a, b);

        let attr = Address::new(ScopeKind::Instance, TypeKind::Int, 0).unwrap();
        heap.get_mut(a).unwrap().set(attr, Value::Int(7));
        assert_eq!(heap.get(a).unwrap().get(attr), Some(&Value::Int(7)));
        assert_eq!(heap.get(b).unwrap().get(attr), None);
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn unknown_handles_resolve_to_nothing() {
        let heap = Heap::new();
        assert!(heap.get(ObjectRef(3)).is_none());
        assert!(heap.is_empty());
    }
}
