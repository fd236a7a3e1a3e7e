//! Shared helpers for end-to-end tests.
//!
//! The helpers drive the compiler the way a parse-tree walker would: operands
//! and operators are pushed in source order and every precedence checkpoint
//! is called once the right-hand side of an operator is complete.

#![allow(dead_code)]

use otter::prelude::*;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A leaf of an expression.
#[derive(Debug, Clone, Copy)]
pub enum Term<'a> {
    Var(&'a str),
    Int(&'a str),
    Float(&'a str),
    Bool(&'a str),
    Str(&'a str),
}

pub fn push(c: &mut Compiler, term: Term<'_>) {
    match term {
        Term::Var(name) => c.push_variable(name).unwrap(),
        Term::Int(lit) => c.push_constant("int", lit).unwrap(),
        Term::Float(lit) => c.push_constant("float", lit).unwrap(),
        Term::Bool(lit) => c.push_constant("bool", lit).unwrap(),
        Term::Str(lit) => c.push_constant("string", lit).unwrap(),
    }
}

/// Run every checkpoint from the tightest tier outwards.
pub fn reduce(c: &mut Compiler) {
    c.check_pending_not().unwrap();
    c.check_pending_mul_div().unwrap();
    c.check_pending_sum_sub().unwrap();
    c.check_pending_relational().unwrap();
    c.check_pending_and_or().unwrap();
}

/// Push `left op right` and reduce it.
pub fn binary(c: &mut Compiler, left: Term<'_>, op: &str, right: Term<'_>) {
    push(c, left);
    c.push_operator(op).unwrap();
    push(c, right);
    reduce(c);
}

/// `target = term`
pub fn assign(c: &mut Compiler, target: &str, term: Term<'_>) {
    c.push_variable(target).unwrap();
    c.push_operator("=").unwrap();
    push(c, term);
    c.assign().unwrap();
}

/// `target = left op right`
pub fn assign_binary(c: &mut Compiler, target: &str, left: Term<'_>, op: &str, right: Term<'_>) {
    c.push_variable(target).unwrap();
    c.push_operator("=").unwrap();
    binary(c, left, op, right);
    c.assign().unwrap();
}

/// `write term`
pub fn write(c: &mut Compiler, term: Term<'_>) {
    push(c, term);
    c.write_quad().unwrap();
}

/// `read name`
pub fn read(c: &mut Compiler, name: &str) {
    c.push_variable(name).unwrap();
    c.read_quad().unwrap();
}

/// Push `name[indices...]` as an element pointer.
pub fn element(c: &mut Compiler, name: &str, indices: &[Term<'_>]) {
    c.push_variable(name).unwrap();
    for index in indices {
        push(c, *index);
        reduce(c);
        c.resolve_array_index().unwrap();
    }
    c.complete_array_index().unwrap();
}

/// A compiler positioned inside `Main`'s constructor.
pub fn main_body() -> Compiler {
    let mut c = Compiler::new();
    open_main(&mut c);
    c
}

pub fn open_main(c: &mut Compiler) {
    c.add_class("Main", None).unwrap();
    c.add_constructor("Main", "public").unwrap();
}

pub fn close_main(c: &mut Compiler) {
    c.end_method().unwrap();
    c.end_class();
}

/// Close `Main`, compile and run with no input.
pub fn run(c: Compiler) -> Result<Vec<String>, OtterError> {
    run_with_input(c, &[])
}

pub fn run_with_input(mut c: Compiler, input: &[&str]) -> Result<Vec<String>, OtterError> {
    init_logging();
    close_main(&mut c);
    let mut console = BufferedConsole::with_input(input.iter().copied());
    otter::execute(c, &mut console)?;
    Ok(console.into_output())
}

pub fn strings(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}
