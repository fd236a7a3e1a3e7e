//! Performance benchmarks for the Otter pipeline.
//!
//! Programs are built through the compiler callbacks the same way a
//! parse-tree walker would drive them:
//! - Compilation: quadruple generation for long straight-line methods
//! - Execution: loop-heavy programs on the virtual machine
//!
//! ## Profiling with Puffin
//!
//! Run with the `profile-with-puffin` feature to collect scope timings:
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use otter::prelude::*;
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

/// Initialize puffin profiler.
#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

/// Call at the end of each benchmark iteration to flush profiling data.
#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

// ============================================================================
// Program builders
// ============================================================================

fn open_main(c: &mut Compiler) {
    c.add_class("Main", None).unwrap();
    c.add_constructor("Main", "public").unwrap();
}

fn close_main(c: &mut Compiler) {
    c.end_method().unwrap();
    c.end_class();
}

/// `target = left op right` where both sides are plain operands.
fn assign_binary(c: &mut Compiler, target: &str, left: &str, op: &str, right: (&str, &str)) {
    c.push_variable(target).unwrap();
    c.push_operator("=").unwrap();
    c.push_variable(left).unwrap();
    c.push_operator(op).unwrap();
    push_term(c, right);
    reduce(c);
    c.assign().unwrap();
}

/// `("var", name)` or `(type, literal)`.
fn push_term(c: &mut Compiler, (kind, text): (&str, &str)) {
    if kind == "var" {
        c.push_variable(text).unwrap();
    } else {
        c.push_constant(kind, text).unwrap();
    }
}

fn reduce(c: &mut Compiler) {
    c.check_pending_mul_div().unwrap();
    c.check_pending_sum_sub().unwrap();
    c.check_pending_relational().unwrap();
}

/// `for (i = 0; i < n; i = i + 1) { sum = sum + i * 2 }  write sum`
fn counting_loop(iterations: u64) -> Compiler {
    let bound = iterations.to_string();
    let mut c = Compiler::new();
    open_main(&mut c);
    c.add_variable("i", "int").unwrap();
    c.add_variable("sum", "int").unwrap();

    c.push_variable("sum").unwrap();
    c.push_operator("=").unwrap();
    c.push_constant("int", "0").unwrap();
    c.assign().unwrap();
    c.push_variable("i").unwrap();
    c.push_operator("=").unwrap();
    c.push_constant("int", "0").unwrap();
    c.assign().unwrap();

    c.start_for();
    c.push_variable("i").unwrap();
    c.push_operator("<").unwrap();
    c.push_constant("int", &bound).unwrap();
    reduce(&mut c);
    c.start_for_increment().unwrap();
    assign_binary(&mut c, "i", "i", "+", ("int", "1"));
    c.start_for_body().unwrap();
    c.push_variable("sum").unwrap();
    c.push_operator("=").unwrap();
    c.push_variable("sum").unwrap();
    c.push_operator("+").unwrap();
    c.push_variable("i").unwrap();
    c.push_operator("*").unwrap();
    c.push_constant("int", "2").unwrap();
    reduce(&mut c);
    c.assign().unwrap();
    c.end_for().unwrap();

    c.push_variable("sum").unwrap();
    c.write_quad().unwrap();
    close_main(&mut c);
    c
}

/// Fill `a[size]` with squares, then sum it back through element pointers.
fn array_sweep(size: u32) -> Compiler {
    let bound = size.to_string();
    let mut c = Compiler::new();
    open_main(&mut c);
    c.add_variable("a", "int").unwrap();
    c.add_dimension(size).unwrap();
    c.finalize_dimensions().unwrap();
    c.add_variable("i", "int").unwrap();
    c.add_variable("sum", "int").unwrap();

    for pass in 0..2 {
        c.push_variable("i").unwrap();
        c.push_operator("=").unwrap();
        c.push_constant("int", "0").unwrap();
        c.assign().unwrap();
        c.start_for();
        c.push_variable("i").unwrap();
        c.push_operator("<").unwrap();
        c.push_constant("int", &bound).unwrap();
        reduce(&mut c);
        c.start_for_increment().unwrap();
        assign_binary(&mut c, "i", "i", "+", ("int", "1"));
        c.start_for_body().unwrap();
        if pass == 0 {
            // a[i] = i * i
            c.push_variable("a").unwrap();
            c.push_variable("i").unwrap();
            c.resolve_array_index().unwrap();
            c.complete_array_index().unwrap();
            c.push_operator("=").unwrap();
            c.push_variable("i").unwrap();
            c.push_operator("*").unwrap();
            c.push_variable("i").unwrap();
            reduce(&mut c);
            c.assign().unwrap();
        } else {
            // sum = sum + a[i]
            c.push_variable("sum").unwrap();
            c.push_operator("=").unwrap();
            c.push_variable("sum").unwrap();
            c.push_operator("+").unwrap();
            c.push_variable("a").unwrap();
            c.push_variable("i").unwrap();
            c.resolve_array_index().unwrap();
            c.complete_array_index().unwrap();
            reduce(&mut c);
            c.assign().unwrap();
        }
        c.end_for().unwrap();
    }

    c.push_variable("sum").unwrap();
    c.write_quad().unwrap();
    close_main(&mut c);
    c
}

/// A constructor with `statements` assignments of the form `x = x + k`.
fn straight_line(statements: usize) -> Compiler {
    let mut c = Compiler::new();
    open_main(&mut c);
    c.add_variable("x", "int").unwrap();
    c.add_variable("y", "float").unwrap();
    for k in 0..statements {
        let literal = (k % 100).to_string();
        assign_binary(&mut c, "x", "x", "+", ("int", &literal));
        assign_binary(&mut c, "y", "y", "*", ("float", "1.5"));
    }
    close_main(&mut c);
    c
}

// ============================================================================
// Benchmarks
// ============================================================================

/// Quadruple generation for growing method bodies.
fn compile_benchmarks(c: &mut Criterion) {
    setup_profiler();

    let mut group = c.benchmark_group("compile/straight_line");
    for statements in [10usize, 100, 500] {
        group.throughput(Throughput::Elements(statements as u64 * 2));
        group.bench_with_input(
            BenchmarkId::from_parameter(statements),
            &statements,
            |b, &statements| {
                b.iter(|| {
                    let program = straight_line(black_box(statements)).finish().unwrap();
                    end_profiling_frame();
                    black_box(program.len())
                });
            },
        );
    }
    group.finish();
}

/// Execution of precompiled loop programs.
fn execution_benchmarks(c: &mut Criterion) {
    setup_profiler();

    let mut group = c.benchmark_group("vm/counting_loop");
    for iterations in [1_000u64, 10_000, 100_000] {
        let program = counting_loop(iterations).finish().unwrap();
        group.throughput(Throughput::Elements(iterations));
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            &program,
            |b, program| {
                b.iter(|| {
                    let mut vm = VirtualMachine::new(program.clone());
                    let mut console = BufferedConsole::new();
                    vm.run(&mut console).unwrap();
                    end_profiling_frame();
                    black_box(vm.executed())
                });
            },
        );
    }
    group.finish();

    let mut group = c.benchmark_group("vm/array_sweep");
    for size in [100u32, 1_000] {
        let program = array_sweep(size).finish().unwrap();
        group.throughput(Throughput::Elements(u64::from(size) * 2));
        group.bench_with_input(BenchmarkId::from_parameter(size), &program, |b, program| {
            b.iter(|| {
                let mut vm = VirtualMachine::new(program.clone());
                let mut console = BufferedConsole::new();
                vm.run(&mut console).unwrap();
                end_profiling_frame();
                black_box(console.into_output())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, compile_benchmarks, execution_benchmarks);
criterion_main!(benches);
