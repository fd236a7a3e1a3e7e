//! Compilation context: every class, method, symbol table and allocator of
//! one compilation, plus the current class/method cursor.
//!
//! ## Table layout
//!
//! ```text
//! globals ◄── Base.attributes ◄── Derived.attributes ◄── Derived.m.locals
//!             Base.methods    ◄── Derived.methods
//! ```
//!
//! A method's locals are chained to its class's attributes, which are chained
//! to the parent class's attributes and finally to the global variables, so
//! one [`TableArena::search`] resolves any name visible from a method body.

use rustc_hash::FxHashMap;

use otter_core::{AccessModifier, CompilationError, DataType, SEGMENT_SIZE, ScopeKind, Variable};

use crate::memory::{CompilationMemory, Memory};
use crate::scope::{
    ClassId, ClassScope, MethodId, MethodKind, MethodScope, TableArena, TableId, constructor_key,
};

type Result<T> = std::result::Result<T, CompilationError>;

/// Name of the global variable table.
const GLOBAL_TABLE: &str = "global";

/// All declarative state of one compilation.
#[derive(Debug)]
pub struct CompilationContext {
    classes: Vec<ClassScope>,
    class_index: FxHashMap<String, ClassId>,
    methods: Vec<MethodScope>,
    variables: TableArena<Variable>,
    method_tables: TableArena<MethodId>,
    globals: TableId,
    memory: CompilationMemory,
    current_class: Option<ClassId>,
    current_method: Option<MethodId>,
    /// Variable the next `add_dimension` applies to.
    last_declared: Option<(TableId, String)>,
}

impl Default for CompilationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilationContext {
    pub fn new() -> Self {
        let mut variables = TableArena::new();
        let globals = variables.create(GLOBAL_TABLE, None);
        Self {
            classes: Vec::new(),
            class_index: FxHashMap::default(),
            methods: Vec::new(),
            variables,
            method_tables: TableArena::new(),
            globals,
            memory: CompilationMemory::new(),
            current_class: None,
            current_method: None,
            last_declared: None,
        }
    }

    // ==========================================================================
    // Accessors
    // ==========================================================================

    pub fn class(&self, id: ClassId) -> &ClassScope {
        &self.classes[id.0]
    }

    pub fn method(&self, id: MethodId) -> &MethodScope {
        &self.methods[id.0]
    }

    pub fn method_mut(&mut self, id: MethodId) -> &mut MethodScope {
        &mut self.methods[id.0]
    }

    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        self.class_index.get(name).copied()
    }

    pub fn current_class(&self) -> Option<ClassId> {
        self.current_class
    }

    pub fn current_method(&self) -> Option<MethodId> {
        self.current_method
    }

    pub fn memory(&self) -> &CompilationMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut CompilationMemory {
        &mut self.memory
    }

    pub fn into_memory(self) -> CompilationMemory {
        self.memory
    }

    /// The enclosing class, or an error naming the construct that needs one.
    pub fn require_class(&self, member: &str) -> Result<ClassId> {
        self.current_class
            .ok_or_else(|| CompilationError::NoEnclosingClass {
                member: member.to_string(),
            })
    }

    /// The enclosing method, or an error naming the construct that needs one.
    pub fn require_method(&self, construct: &str) -> Result<MethodId> {
        self.current_method
            .ok_or_else(|| CompilationError::NoEnclosingMethod {
                construct: construct.to_string(),
            })
    }

    /// Table new names go into and lookups start from.
    pub fn current_table(&self) -> TableId {
        match (self.current_method, self.current_class) {
            (Some(method), _) => self.methods[method.0].locals,
            (None, Some(class)) => self.classes[class.0].attributes,
            (None, None) => self.globals,
        }
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Resolve a variable visible from the current scope.
    pub fn lookup_variable(&self, name: &str) -> Result<&Variable> {
        self.variables
            .search(self.current_table(), name)
            .ok_or_else(|| CompilationError::UnknownVariable {
                name: name.to_string(),
            })
    }

    /// Variable declared directly in `table`.
    pub fn local_variable(&self, table: TableId, name: &str) -> Option<&Variable> {
        self.variables.get(table, name)
    }

    /// Resolve a type name to a primitive or a declared class.
    pub fn resolve_type(&self, name: &str) -> Result<DataType> {
        if let Some(primitive) = DataType::primitive(name) {
            return Ok(primitive);
        }
        let known = self.class_index.contains_key(name)
            || self
                .current_class
                .is_some_and(|id| self.classes[id.0].name == name);
        if known {
            Ok(DataType::Object(name.to_string()))
        } else {
            Err(CompilationError::UnknownType {
                name: name.to_string(),
            })
        }
    }

    /// Find `key` in the method table of `class` or its ancestors.
    pub fn find_method(&self, class: ClassId, key: &str) -> Option<MethodId> {
        self.method_tables
            .search(self.classes[class.0].methods, key)
            .copied()
    }

    /// Resolve a method by name on a class named in a variable's type.
    pub fn find_method_on(&self, class_name: &str, method: &str) -> Result<MethodId> {
        let class = self
            .find_class(class_name)
            .ok_or_else(|| CompilationError::UnknownType {
                name: class_name.to_string(),
            })?;
        self.find_method(class, method)
            .ok_or_else(|| CompilationError::UnknownMethod {
                method: method.to_string(),
                class: class_name.to_string(),
            })
    }

    /// The constructor of `class_name`.
    pub fn find_constructor(&self, class_name: &str) -> Result<MethodId> {
        let class = self
            .find_class(class_name)
            .ok_or_else(|| CompilationError::UnknownType {
                name: class_name.to_string(),
            })?;
        self.method_tables
            .get(self.classes[class.0].methods, &constructor_key(class_name))
            .copied()
            .ok_or_else(|| CompilationError::UnknownMethod {
                method: class_name.to_string(),
                class: class_name.to_string(),
            })
    }

    /// Formal parameters of a method, in declaration order.
    pub fn parameters(&self, method: MethodId) -> Result<Vec<Variable>> {
        let scope = &self.methods[method.0];
        scope
            .parameters
            .iter()
            .map(|name| {
                self.variables
                    .get(scope.locals, name)
                    .cloned()
                    .ok_or_else(|| {
                        CompilationError::internal(format!("parameter '{name}' has no symbol"))
                    })
            })
            .collect()
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// Register a class and make it current.
    ///
    /// On error a detached class becomes current instead, so the body can
    /// still be traversed; nothing declared in it is reachable afterwards.
    pub fn declare_class(&mut self, name: &str, parent: Option<&str>) -> Result<ClassId> {
        let parent_id = match parent {
            Some(parent_name) => match self.find_class(parent_name) {
                Some(id) => Some(id),
                None => {
                    self.push_detached_class(name);
                    return Err(CompilationError::ParentClassNotFound {
                        class: name.to_string(),
                        parent: parent_name.to_string(),
                    });
                }
            },
            None => None,
        };
        if self.class_index.contains_key(name) {
            self.push_detached_class(name);
            return Err(CompilationError::DuplicateSymbol {
                name: name.to_string(),
                scope: "classes".to_string(),
            });
        }

        let (attribute_parent, method_parent, memory) = match parent_id {
            Some(id) => {
                let parent = &self.classes[id.0];
                (parent.attributes, Some(parent.methods), parent.memory.clone())
            }
            None => (self.globals, None, Memory::new(ScopeKind::Instance)),
        };
        let attributes = self.variables.create(name, Some(attribute_parent));
        let methods = self.method_tables.create(name, method_parent);

        let id = ClassId(self.classes.len());
        self.classes
            .push(ClassScope::new(name, parent_id, attributes, methods, memory));
        self.class_index.insert(name.to_string(), id);
        self.current_class = Some(id);
        self.current_method = None;
        log::debug!("declared class {name} (parent: {parent:?})");
        Ok(id)
    }

    fn push_detached_class(&mut self, name: &str) {
        let attributes = self.variables.create(name, Some(self.globals));
        let methods = self.method_tables.create(name, None);
        let id = ClassId(self.classes.len());
        let scope = ClassScope::new(
            name,
            None,
            attributes,
            methods,
            Memory::new(ScopeKind::Instance),
        );
        self.classes.push(scope.detach());
        self.current_class = Some(id);
        self.current_method = None;
    }

    /// Leave the current class body.
    pub fn end_class(&mut self) {
        self.current_class = None;
        self.current_method = None;
        self.last_declared = None;
    }

    /// Register a method or constructor of the current class and make it
    /// current. `key` is the method-table key; `None` opens a detached
    /// method that nothing can call.
    ///
    /// On a duplicate key a detached method becomes current instead.
    pub fn declare_method(
        &mut self,
        name: &str,
        key: Option<&str>,
        kind: MethodKind,
        access: AccessModifier,
        entry: usize,
    ) -> Result<MethodId> {
        let class_id = self.require_class(name)?;
        let class = &self.classes[class_id.0];
        let locals = self.variables.create(name, Some(class.attributes));
        let methods_table = class.methods;
        let detached_class = class.detached;

        let id = MethodId(self.methods.len());
        let mut scope = MethodScope::new(name, kind, access, class_id, locals, entry);

        let registered = match key {
            Some(key) if !detached_class => self.method_tables.add(methods_table, key, id),
            _ => {
                scope.detached = true;
                Ok(())
            }
        };
        if let Err(duplicate) = &registered {
            scope.detached = true;
            log::debug!("method {name} already declared in {}", duplicate.found_in);
        }
        self.methods.push(scope);
        self.current_method = Some(id);
        self.last_declared = None;
        self.memory.reset_temporaries();

        match registered {
            Ok(()) => {
                log::debug!(
                    "declared {kind:?} {name} of {} at {entry}",
                    self.classes[class_id.0].name
                );
                Ok(id)
            }
            Err(duplicate) => Err(CompilationError::DuplicateSymbol {
                name: name.to_string(),
                scope: duplicate.found_in,
            }),
        }
    }

    /// Leave the current method body.
    pub fn end_method(&mut self) {
        self.current_method = None;
        self.last_declared = None;
    }

    /// Declare a variable in the current scope.
    ///
    /// The storage class follows the cursor: LOCAL inside a method,
    /// INSTANCE in a class body, GLOBAL at the top level.
    pub fn declare_variable(
        &mut self,
        name: &str,
        data_type: DataType,
        access: Option<AccessModifier>,
    ) -> Result<Variable> {
        let table = self.current_table();
        if let Some(found) = self.variables.search(table, name) {
            let owner = self
                .variables
                .chain(table)
                .find(|id| self.variables.get(*id, name).is_some())
                .map(|id| self.variables.table(id).name().to_string())
                .unwrap_or_default();
            log::debug!("{name} already declared at {}", found.address);
            return Err(CompilationError::DuplicateSymbol {
                name: name.to_string(),
                scope: owner,
            });
        }

        let address = self.current_allocator()?.next_available(data_type.kind())?;
        let mut variable = Variable::new(name, data_type, address);
        variable.access = access;

        self.variables
            .add(table, name, variable.clone())
            .map_err(|duplicate| CompilationError::DuplicateSymbol {
                name: name.to_string(),
                scope: duplicate.found_in,
            })?;
        self.last_declared = Some((table, name.to_string()));
        log::debug!(
            "declared {} {name}: {} at {}",
            address.scope,
            variable.data_type,
            address
        );
        Ok(variable)
    }

    /// Append a parameter name to the current method.
    pub fn push_parameter(&mut self, method: MethodId, name: &str) {
        self.methods[method.0].parameters.push(name.to_string());
    }

    /// Add an axis to the most recently declared variable.
    pub fn add_dimension(&mut self, size: u32) -> Result<()> {
        let (table, name) = self
            .last_declared
            .clone()
            .ok_or_else(|| CompilationError::internal("dimension without a declared variable"))?;
        if size == 0 {
            return Err(CompilationError::InvalidDimension { name, size });
        }
        let variable = self
            .variables
            .get_mut(table, &name)
            .ok_or_else(|| CompilationError::internal(format!("'{name}' vanished")))?;
        variable.add_dimension(size);
        Ok(())
    }

    /// Compute the multipliers of the most recently declared array and
    /// reserve the rest of its cells right after its first one.
    pub fn finalize_dimensions(&mut self) -> Result<Variable> {
        let (table, name) = self
            .last_declared
            .clone()
            .ok_or_else(|| CompilationError::internal("dimension without a declared variable"))?;
        let variable = self
            .variables
            .get_mut(table, &name)
            .ok_or_else(|| CompilationError::internal(format!("'{name}' vanished")))?;
        let address = variable.address;
        let size = variable
            .populate_dimensions()
            .filter(|size| *size <= SEGMENT_SIZE)
            .ok_or(CompilationError::OutOfMemory {
                scope: address.scope,
                kind: address.kind,
            })?;
        let extra = size - 1;

        if extra > 0 {
            let chunk = self
                .allocator_for(address.scope)?
                .next_chunk(address.kind, extra)?;
            if chunk.offset != address.offset + 1 {
                return Err(CompilationError::internal(format!(
                    "array '{name}' is not contiguous: {address} then {chunk}"
                )));
            }
        }

        let variable = self
            .variables
            .get(table, &name)
            .cloned()
            .ok_or_else(|| CompilationError::internal(format!("'{name}' vanished")))?;
        log::debug!("array {name} spans {size} cells from {}", variable.address);
        Ok(variable)
    }

    // ==========================================================================
    // Allocators
    // ==========================================================================

    /// Allocator new variables of the current scope come from.
    fn current_allocator(&mut self) -> Result<&mut Memory> {
        let scope = match (self.current_method, self.current_class) {
            (Some(_), _) => ScopeKind::Local,
            (None, Some(_)) => ScopeKind::Instance,
            (None, None) => ScopeKind::Global,
        };
        self.allocator_for(scope)
    }

    /// Allocator owning cells of `scope` for the current cursor.
    pub fn allocator_for(&mut self, scope: ScopeKind) -> Result<&mut Memory> {
        match scope {
            ScopeKind::Global => Ok(&mut self.memory.global),
            ScopeKind::Temporary => Ok(&mut self.memory.temporaries),
            ScopeKind::Local => {
                let method = self.require_method("local variable")?;
                Ok(&mut self.methods[method.0].memory)
            }
            ScopeKind::Instance => {
                let class = self.require_class("attribute")?;
                Ok(&mut self.classes[class.0].memory)
            }
            ScopeKind::Constant => Err(CompilationError::internal(
                "constants are allocated by value",
            )),
        }
    }
}
