//! The fetch-decode-execute loop.

use otter_core::{
    Address, CompiledProgram, ConstantTable, DataType, EraTarget, ObjectRef, Quad, RuntimeError,
    Value, Variable,
};

use crate::console::Console;
use crate::memory::{Frame, RuntimeMemory};
use crate::ops;
use crate::options::VmOptions;

/// What to do after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Jump(usize),
    Halt,
}

/// Executes a compiled program.
#[derive(Debug)]
pub struct VirtualMachine {
    program: CompiledProgram,
    options: VmOptions,
    memory: RuntimeMemory,
    ip: usize,
    executed: u64,
}

impl VirtualMachine {
    pub fn new(program: CompiledProgram) -> Self {
        Self::with_options(program, VmOptions::default())
    }

    pub fn with_options(program: CompiledProgram, options: VmOptions) -> Self {
        Self {
            program,
            options,
            memory: RuntimeMemory::new(),
            ip: 0,
            executed: 0,
        }
    }

    pub fn program(&self) -> &CompiledProgram {
        &self.program
    }

    pub fn options(&self) -> &VmOptions {
        &self.options
    }

    /// Memory as left by the last run.
    pub fn memory(&self) -> &RuntimeMemory {
        &self.memory
    }

    /// Index of the instruction that ran last.
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Number of instructions executed by the last run.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Run from instruction 0 until the entry frame's `END_FUNC`.
    ///
    /// Every run starts from fresh memory.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run<C: Console>(&mut self, console: &mut C) -> Result<(), RuntimeError> {
        self.memory.reset();
        self.ip = 0;
        self.executed = 0;

        loop {
            let ip = self.ip;
            let quad = self
                .program
                .get(ip)
                .ok_or_else(|| RuntimeError::MalformedProgram {
                    ip,
                    message: "instruction pointer ran past the end of the program".to_string(),
                })?;
            log::trace!("{ip:>4}  {quad}");

            let mut executor = Executor {
                memory: &mut self.memory,
                constants: self.program.constants(),
                options: &self.options,
                console: &mut *console,
            };
            let flow = executor.execute(ip, quad).map_err(|error| at_instruction(ip, error))?;
            self.executed += 1;

            match flow {
                Flow::Next => self.ip += 1,
                Flow::Jump(target) => self.ip = target,
                Flow::Halt => {
                    log::debug!("halted after {} instructions", self.executed);
                    return Ok(());
                }
            }
        }
    }
}

/// Attach the instruction index to calling-convention errors.
fn at_instruction(ip: usize, error: RuntimeError) -> RuntimeError {
    match error {
        RuntimeError::MalformedProgram { message, .. } => {
            RuntimeError::MalformedProgram { ip, message }
        }
        other => other,
    }
}

// ============================================================================
// Instruction execution
// ============================================================================

struct Executor<'a, C> {
    memory: &'a mut RuntimeMemory,
    constants: &'a ConstantTable,
    options: &'a VmOptions,
    console: &'a mut C,
}

impl<C: Console> Executor<'_, C> {
    fn execute(&mut self, ip: usize, quad: &Quad) -> Result<Flow, RuntimeError> {
        match quad {
            Quad::Binary {
                op,
                left,
                right,
                result,
            } => {
                let value = ops::binary(*op, &self.read(left)?, &self.read(right)?)?;
                self.write(result, value)?;
                Ok(Flow::Next)
            }

            Quad::Not { operand, result } => {
                let value = ops::not(&self.read(operand)?)?;
                self.write(result, value)?;
                Ok(Flow::Next)
            }

            Quad::Assign { source, target } => {
                let value = self.read(source)?;
                self.write(target, value)?;
                Ok(Flow::Next)
            }

            Quad::Goto { target } => Ok(Flow::Jump(resolved(*target)?)),

            Quad::GotoF { condition, target } => {
                if self.condition(condition)? {
                    Ok(Flow::Next)
                } else {
                    Ok(Flow::Jump(resolved(*target)?))
                }
            }

            Quad::GotoT { condition, target } => {
                if self.condition(condition)? {
                    Ok(Flow::Jump(resolved(*target)?))
                } else {
                    Ok(Flow::Next)
                }
            }

            Quad::Read { target } => {
                let input = self
                    .console
                    .read_line()?
                    .ok_or_else(|| RuntimeError::Io("unexpected end of input".to_string()))?;
                let value = Value::parse_input(&input, &target.data_type).ok_or_else(|| {
                    RuntimeError::InvalidInput {
                        input: input.clone(),
                        expected: target.data_type.to_string(),
                    }
                })?;
                self.write(target, value)?;
                Ok(Flow::Next)
            }

            Quad::Write { source } => {
                let value = self.read(source)?;
                self.console.write_line(&value.to_string())?;
                Ok(Flow::Next)
            }

            Quad::VerAccs {
                index,
                lower,
                upper,
            } => {
                let index = self.int(index, "[]")?;
                if index < *lower || index >= *upper {
                    return Err(RuntimeError::IndexOutOfBounds {
                        index,
                        lower: *lower,
                        upper: *upper,
                    });
                }
                Ok(Flow::Next)
            }

            Quad::ProdLit {
                operand,
                factor,
                result,
            } => {
                let scaled = self.int(operand, "*")?.checked_mul(*factor).ok_or_else(|| {
                    RuntimeError::IntegerOverflow {
                        op: "*".to_string(),
                    }
                })?;
                self.write(result, Value::Int(scaled))?;
                Ok(Flow::Next)
            }

            Quad::AddLit {
                operand,
                base,
                result,
            } => {
                let offset = self.int(operand, "+")?;
                let raw = i64::from(*base)
                    .checked_add(offset)
                    .and_then(|raw| u32::try_from(raw).ok())
                    .ok_or_else(|| RuntimeError::IndexOutOfBounds {
                        index: offset,
                        lower: 0,
                        upper: i64::from(u32::MAX - *base),
                    })?;
                let element = Address::from_raw(raw)?;
                // The pointer cell itself is written, never dereferenced.
                self.memory.store(result.address, Value::Pointer(element))?;
                Ok(Flow::Next)
            }

            Quad::Era { target, method } => {
                let instance = match target {
                    EraTarget::Constructor { .. } => self.memory.heap_mut().allocate(),
                    EraTarget::SelfInstance => self.memory.current_instance()?,
                    EraTarget::Instance(variable) => self.object(variable)?,
                };
                log::debug!("ERA {method} on object #{}", instance.0);
                self.memory.prepare(Frame::new(method.clone(), Some(instance)));
                Ok(Flow::Next)
            }

            Quad::Param { source, target } => {
                let value = self.read(source)?;
                self.memory.store_pending(target.address, value)?;
                Ok(Flow::Next)
            }

            Quad::Gosub { method, entry } => {
                if self.memory.depth() >= self.options.max_call_depth {
                    return Err(RuntimeError::StackOverflow {
                        depth: self.options.max_call_depth,
                    });
                }
                self.memory.enter(ip + 1)?;
                log::debug!("GOSUB {method} -> {entry} (depth {})", self.memory.depth());
                Ok(Flow::Jump(*entry))
            }

            Quad::Return => self.return_to_caller(),

            Quad::EndConstructor { slot } => {
                let instance = self.memory.current_instance()?;
                self.memory.store(slot.address, Value::Object(instance))?;
                self.return_to_caller()
            }

            Quad::EndFunc => {
                if self.memory.current()?.is_entry() {
                    Ok(Flow::Halt)
                } else {
                    self.return_to_caller()
                }
            }
        }
    }

    /// Pop the active frame. In the entry frame execution just goes on.
    fn return_to_caller(&mut self) -> Result<Flow, RuntimeError> {
        if self.memory.current()?.is_entry() {
            return Ok(Flow::Next);
        }
        let frame = self.memory.leave()?;
        let resume = frame.return_address.ok_or_else(|| RuntimeError::MalformedProgram {
            ip: 0,
            message: format!("frame '{}' has no return address", frame.method),
        })?;
        log::debug!("RETURN from {} -> {resume}", frame.method);
        Ok(Flow::Jump(resume))
    }

    // ==========================================================================
    // Operand access
    // ==========================================================================

    /// Cell an operand designates: array pointers are followed once.
    fn locate(&self, variable: &Variable) -> Result<Address, RuntimeError> {
        if !variable.is_pointer() {
            return Ok(variable.address);
        }
        match self.memory.load(variable.address, self.constants)? {
            Value::Pointer(element) => Ok(element),
            other => Err(RuntimeError::MalformedProgram {
                ip: 0,
                message: format!(
                    "pointer cell {} holds a {} value",
                    variable.address,
                    other.type_name()
                ),
            }),
        }
    }

    fn read(&self, variable: &Variable) -> Result<Value, RuntimeError> {
        let address = self.locate(variable)?;
        self.memory.load(address, self.constants)
    }

    fn write(&mut self, variable: &Variable, value: Value) -> Result<(), RuntimeError> {
        let address = self.locate(variable)?;
        self.memory.store(address, value)
    }

    fn int(&self, variable: &Variable, op: &str) -> Result<i64, RuntimeError> {
        let value = self.read(variable)?;
        value.as_int().ok_or_else(|| RuntimeError::TypeMismatch {
            op: op.to_string(),
            left: value.type_name(),
            right: DataType::Int.kind().name(),
        })
    }

    fn condition(&self, variable: &Variable) -> Result<bool, RuntimeError> {
        let value = self.read(variable)?;
        value.as_bool().ok_or_else(|| RuntimeError::TypeMismatch {
            op: "if".to_string(),
            left: value.type_name(),
            right: "bool",
        })
    }

    /// The object held by `variable`, for calls through it.
    fn object(&self, variable: &Variable) -> Result<ObjectRef, RuntimeError> {
        let null = || RuntimeError::NullReference {
            name: variable.name.clone(),
        };
        match self.read(variable) {
            Ok(Value::Object(object)) => Ok(object),
            Ok(_) | Err(RuntimeError::UninitializedRead { .. }) => Err(null()),
            Err(other) => Err(other),
        }
    }
}

fn resolved(target: Option<usize>) -> Result<usize, RuntimeError> {
    target.ok_or_else(|| RuntimeError::MalformedProgram {
        ip: 0,
        message: "jump was never back-patched".to_string(),
    })
}
