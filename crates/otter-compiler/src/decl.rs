//! Declaration callbacks: classes, methods, parameters, variables and
//! array dimensions.

use otter_core::{AccessModifier, CompilationError, DataType, Quad, Variable};

use crate::compiler::{Compiler, ENTRY_JUMP, Result};
use crate::scope::{MethodKind, constructor_key};

fn parse_access(name: &str) -> Result<AccessModifier> {
    AccessModifier::parse(name).ok_or_else(|| CompilationError::UnknownAccessModifier {
        name: name.to_string(),
    })
}

impl Compiler {
    // ==========================================================================
    // Classes
    // ==========================================================================

    /// Open a class body.
    pub fn add_class(&mut self, name: &str, parent: Option<&str>) -> Result<()> {
        self.track(|c| c.ctx.declare_class(name, parent).map(|_| ()))
    }

    /// Close the current class body.
    pub fn end_class(&mut self) {
        self.ctx.end_class();
    }

    // ==========================================================================
    // Methods
    // ==========================================================================

    /// Open a method body of the current class.
    ///
    /// The method's entry is the next quadruple to be emitted.
    pub fn add_method(&mut self, name: &str, access: &str) -> Result<()> {
        self.track(|c| {
            let access = parse_access(access)?;
            let entry = c.emitter.next_index();
            c.ctx
                .declare_method(name, Some(name), MethodKind::Method, access, entry)?;
            Ok(())
        })
    }

    /// Open the constructor body of the current class.
    ///
    /// The constructor of the entry class becomes the target of
    /// instruction 0.
    pub fn add_constructor(&mut self, name: &str, access: &str) -> Result<()> {
        self.track(|c| {
            let class_id = c.ctx.require_class(name)?;
            let class = c.ctx.class(class_id);
            let class_name = class.name.clone();
            let detached_class = class.detached;
            let access = parse_access(access)?;
            let entry = c.emitter.next_index();

            let name_matches = name == class_name;
            let key = constructor_key(&class_name);
            let declared = c.ctx.declare_method(
                name,
                name_matches.then_some(key.as_str()),
                MethodKind::Constructor,
                access,
                entry,
            );
            // The body is traversed either way, so the constructor always
            // gets its instance slot.
            let method = c.ctx.require_method(name)?;
            let instance_type = DataType::Object(class_name.clone());
            let address = c.ctx.memory_mut().global.next_available(instance_type.kind())?;
            let scope = c.ctx.method_mut(method);
            scope.return_type = Some(instance_type.clone());
            scope.return_slot = Some(Variable::new(
                format!("{class_name}.instance"),
                instance_type,
                address,
            ));

            if !name_matches {
                return Err(CompilationError::ConstructorNameMismatch {
                    name: name.to_string(),
                    class: class_name,
                });
            }
            declared?;

            if class_name == c.options.entry_class && !detached_class {
                c.emitter.patch(ENTRY_JUMP, entry)?;
                c.entry_patched = true;
                log::debug!("entry point {class_name} at {entry}");
            }
            Ok(())
        })
    }

    /// Close the current method body.
    ///
    /// Void methods get an implicit `RETURN`, constructors an
    /// `END_CONSTRUCTOR`; every body ends with `END_FUNC`.
    pub fn end_method(&mut self) -> Result<()> {
        self.track(|c| {
            let id = c.ctx.require_method("end of method")?;
            let method = c.ctx.method(id);
            if method.is_constructor() {
                let slot = method.return_slot.clone().ok_or_else(|| {
                    CompilationError::internal("constructor without an instance slot")
                })?;
                c.emitter.emit(Quad::EndConstructor { slot });
            } else if method.is_void() {
                c.emitter.emit(Quad::Return);
            } else if !method.returns_value {
                log::warn!(
                    "method {} can end without returning a value; callers read a stale result",
                    method.name
                );
            }
            c.emitter.emit(Quad::EndFunc);
            c.ctx.end_method();
            Ok(())
        })
    }

    /// Declare the next formal parameter of the current method.
    pub fn add_argument(&mut self, name: &str, type_name: &str) -> Result<()> {
        self.track(|c| {
            let method = c.ctx.require_method(name)?;
            let data_type = c.ctx.resolve_type(type_name)?;
            c.ctx.declare_variable(name, data_type, None)?;
            c.ctx.push_parameter(method, name);
            Ok(())
        })
    }

    /// Set the return type of the current method and reserve its GLOBAL
    /// return slot.
    pub fn add_return_type(&mut self, type_name: &str) -> Result<()> {
        self.track(|c| {
            let method = c.ctx.require_method("return type")?;
            let data_type = c.ctx.resolve_type(type_name)?;
            let address = c.ctx.memory_mut().global.next_available(data_type.kind())?;
            let scope = c.ctx.method_mut(method);
            let slot = Variable::new(format!("{}.return", scope.name), data_type.clone(), address);
            scope.return_type = Some(data_type);
            scope.return_slot = Some(slot);
            Ok(())
        })
    }

    // ==========================================================================
    // Variables
    // ==========================================================================

    /// Declare a variable in the current scope (GLOBAL, INSTANCE or LOCAL).
    pub fn add_variable(&mut self, name: &str, type_name: &str) -> Result<()> {
        self.track(|c| {
            let data_type = c.ctx.resolve_type(type_name)?;
            c.ctx.declare_variable(name, data_type, None)?;
            Ok(())
        })
    }

    /// Declare an attribute of the current class.
    pub fn add_attribute(&mut self, name: &str, type_name: &str, access: &str) -> Result<()> {
        self.track(|c| {
            c.ctx.require_class(name)?;
            let access = parse_access(access)?;
            let data_type = c.ctx.resolve_type(type_name)?;
            c.ctx.declare_variable(name, data_type, Some(access))?;
            Ok(())
        })
    }

    /// Add an axis to the variable declared last.
    pub fn add_dimension(&mut self, size: u32) -> Result<()> {
        self.track(|c| c.ctx.add_dimension(size))
    }

    /// Finish the variable declared last: compute its multipliers and
    /// reserve the rest of its cells.
    pub fn finalize_dimensions(&mut self) -> Result<()> {
        self.track(|c| c.ctx.finalize_dimensions().map(|_| ()))
    }
}
