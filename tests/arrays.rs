mod common;

use common::*;
use otter::otter_core::{ScopeKind, TypeKind};
use otter::prelude::*;

fn declare_array(c: &mut Compiler, name: &str, type_name: &str, dims: &[u32]) {
    c.add_variable(name, type_name).unwrap();
    for size in dims {
        c.add_dimension(*size).unwrap();
    }
    c.finalize_dimensions().unwrap();
}

/// `name[indices] = term`
fn store(c: &mut Compiler, name: &str, indices: &[Term<'_>], term: Term<'_>) {
    element(c, name, indices);
    c.push_operator("=").unwrap();
    push(c, term);
    reduce(c);
    c.assign().unwrap();
}

#[test]
fn fill_and_read_back() {
    // for (i = 0; i < 3; i = i + 1) { a[i] = i * 2 }   write a[2]; write a[0] + a[1]
    let mut c = main_body();
    declare_array(&mut c, "a", "int", &[3]);
    c.add_variable("i", "int").unwrap();
    assign(&mut c, "i", Term::Int("0"));
    c.start_for();
    binary(&mut c, Term::Var("i"), "<", Term::Int("3"));
    c.start_for_increment().unwrap();
    assign_binary(&mut c, "i", Term::Var("i"), "+", Term::Int("1"));
    c.start_for_body().unwrap();
    element(&mut c, "a", &[Term::Var("i")]);
    c.push_operator("=").unwrap();
    binary(&mut c, Term::Var("i"), "*", Term::Int("2"));
    c.assign().unwrap();
    c.end_for().unwrap();

    element(&mut c, "a", &[Term::Int("2")]);
    c.write_quad().unwrap();

    element(&mut c, "a", &[Term::Int("0")]);
    c.push_operator("+").unwrap();
    element(&mut c, "a", &[Term::Int("1")]);
    reduce(&mut c);
    c.write_quad().unwrap();

    assert_eq!(run(c).unwrap(), strings(&["4", "2"]));
}

#[test]
fn two_dimensions_are_row_major() {
    let mut c = main_body();
    declare_array(&mut c, "grid", "int", &[2, 3]);
    store(&mut c, "grid", &[Term::Int("1"), Term::Int("2")], Term::Int("7"));
    store(&mut c, "grid", &[Term::Int("0"), Term::Int("2")], Term::Int("5"));
    element(&mut c, "grid", &[Term::Int("1"), Term::Int("2")]);
    c.write_quad().unwrap();
    element(&mut c, "grid", &[Term::Int("0"), Term::Int("2")]);
    c.write_quad().unwrap();

    close_main(&mut c);
    let program = c.finish().unwrap();
    let mut console = BufferedConsole::new();
    let mut vm = VirtualMachine::new(program);
    vm.run(&mut console).unwrap();
    assert_eq!(console.output(), ["7", "5"]);

    // grid starts at LOCAL int 0; [1][2] is cell 1 * 3 + 2.
    let cell = otter::otter_core::Address::from_raw(10_005).unwrap();
    let entry = vm.memory().current().unwrap();
    assert_eq!(entry.locals.get(cell), Some(&Value::Int(7)));
}

#[test]
fn index_past_the_end_is_a_segmentation_fault() {
    let mut c = main_body();
    declare_array(&mut c, "a", "int", &[3]);
    c.add_variable("i", "int").unwrap();
    assign(&mut c, "i", Term::Int("3"));
    store(&mut c, "a", &[Term::Var("i")], Term::Int("1"));
    let error = run(c).unwrap_err();
    assert_eq!(
        error,
        OtterError::Runtime(RuntimeError::IndexOutOfBounds {
            index: 3,
            lower: 0,
            upper: 3
        })
    );
    assert!(error.to_string().contains("segmentation fault"));
}

#[test]
fn every_valid_index_is_accepted() {
    let mut c = main_body();
    declare_array(&mut c, "a", "float", &[3]);
    for (index, value) in [("0", "0.5"), ("1", "1.5"), ("2", "2.5")] {
        store(&mut c, "a", &[Term::Int(index)], Term::Float(value));
    }
    for index in ["0", "1", "2"] {
        element(&mut c, "a", &[Term::Int(index)]);
        c.write_quad().unwrap();
    }
    assert_eq!(run(c).unwrap(), strings(&["0.5", "1.5", "2.5"]));
}

#[test]
fn nested_index_expressions() {
    // b[a[1]] = 9; write b[2]
    let mut c = main_body();
    declare_array(&mut c, "a", "int", &[2]);
    declare_array(&mut c, "b", "int", &[3]);
    store(&mut c, "a", &[Term::Int("1")], Term::Int("2"));

    c.push_variable("b").unwrap();
    element(&mut c, "a", &[Term::Int("1")]);
    c.resolve_array_index().unwrap();
    c.complete_array_index().unwrap();
    c.push_operator("=").unwrap();
    push(&mut c, Term::Int("9"));
    c.assign().unwrap();

    element(&mut c, "b", &[Term::Int("2")]);
    c.write_quad().unwrap();
    assert_eq!(run(c).unwrap(), strings(&["9"]));
}

#[test]
fn arrays_are_passed_element_wise() {
    // int sum(int v[3]) { return v[0] + v[1] + v[2] }
    let mut c = Compiler::new();
    c.add_class("Main", None).unwrap();
    c.add_method("sum", "public").unwrap();
    c.add_argument("v", "int").unwrap();
    c.add_dimension(3).unwrap();
    c.finalize_dimensions().unwrap();
    c.add_return_type("int").unwrap();
    element(&mut c, "v", &[Term::Int("0")]);
    c.push_operator("+").unwrap();
    element(&mut c, "v", &[Term::Int("1")]);
    reduce(&mut c);
    c.push_operator("+").unwrap();
    element(&mut c, "v", &[Term::Int("2")]);
    reduce(&mut c);
    c.return_quad(true).unwrap();
    c.end_method().unwrap();

    c.add_constructor("Main", "public").unwrap();
    declare_array(&mut c, "data", "int", &[3]);
    for (index, value) in [("0", "1"), ("1", "2"), ("2", "3")] {
        store(&mut c, "data", &[Term::Int(index)], Term::Int(value));
    }
    c.allocate_call_frame(&CallTarget::SelfInstance, "sum")
        .unwrap();
    c.push_variable("data").unwrap();
    c.bind_call_argument().unwrap();
    c.complete_method_call().unwrap();
    c.write_quad().unwrap();

    assert_eq!(run(c).unwrap(), strings(&["6"]));
}

#[test]
fn array_arguments_must_match_in_shape() {
    let mut c = Compiler::new();
    c.add_class("Main", None).unwrap();
    c.add_method("take", "public").unwrap();
    c.add_argument("v", "int").unwrap();
    c.add_dimension(3).unwrap();
    c.finalize_dimensions().unwrap();
    c.end_method().unwrap();

    c.add_constructor("Main", "public").unwrap();
    declare_array(&mut c, "small", "int", &[2]);
    c.allocate_call_frame(&CallTarget::SelfInstance, "take")
        .unwrap();
    c.push_variable("small").unwrap();
    assert!(matches!(
        c.bind_call_argument(),
        Err(CompilationError::ArgumentTypeMismatch { position: 1, .. })
    ));
}

#[test]
fn variables_after_a_large_array_start_past_its_last_cell() {
    let mut c = main_body();
    declare_array(&mut c, "table", "int", &[10, 100]);
    c.add_variable("after", "int").unwrap();
    let after = c.context().lookup_variable("after").unwrap();
    assert_eq!(after.address.to_raw(), 11_000);

    assign(&mut c, "after", Term::Int("42"));
    store(&mut c, "table", &[Term::Int("9"), Term::Int("99")], Term::Int("1"));
    write(&mut c, Term::Var("after"));
    element(&mut c, "table", &[Term::Int("9"), Term::Int("99")]);
    c.write_quad().unwrap();
    assert_eq!(run(c).unwrap(), strings(&["42", "1"]));
}

#[test]
fn arrays_that_do_not_fit_are_rejected() {
    let mut c = main_body();
    c.add_variable("huge", "int").unwrap();
    c.add_dimension(65_536).unwrap();
    c.add_dimension(65_536).unwrap();
    let overflow = CompilationError::OutOfMemory {
        scope: ScopeKind::Local,
        kind: TypeKind::Int,
    };
    assert_eq!(c.finalize_dimensions(), Err(overflow.clone()));

    c.add_variable("wide", "float").unwrap();
    c.add_dimension(2_001).unwrap();
    assert_eq!(
        c.finalize_dimensions(),
        Err(CompilationError::OutOfMemory {
            scope: ScopeKind::Local,
            kind: TypeKind::Float,
        })
    );

    close_main(&mut c);
    let errors = c.finish().unwrap_err();
    assert_eq!(errors.as_slice()[0], overflow);
    assert_eq!(errors.len(), 2);
}

#[test]
fn indexing_mistakes_are_semantic_errors() {
    let mut c = main_body();
    c.add_variable("x", "int").unwrap();
    declare_array(&mut c, "g", "int", &[2, 2]);

    c.push_variable("x").unwrap();
    push(&mut c, Term::Int("0"));
    assert_eq!(
        c.resolve_array_index(),
        Err(CompilationError::NotIndexable { name: "x".into() })
    );

    c.push_variable("g").unwrap();
    push(&mut c, Term::Int("0"));
    c.resolve_array_index().unwrap();
    assert_eq!(
        c.complete_array_index(),
        Err(CompilationError::IncompleteIndex {
            name: "g".into(),
            expected: 2,
            got: 1
        })
    );

    assert_eq!(
        c.add_dimension(0),
        Err(CompilationError::InvalidDimension {
            name: "g".into(),
            size: 0
        })
    );
}
