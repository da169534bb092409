//! Benchmark for the fetch-decode-execute loop.
//!
//! Run with: cargo bench -p ls8-executor --bench step_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ls8_executor::decode::opcode;
use ls8_executor::Cpu;

/// Counted loop: R0 counts down from 200 by adding 255 (mod 256) until the
/// compare against zero takes the JNE fall-through.
fn countdown_image() -> Vec<u8> {
    vec![
        opcode::LDI,
        0,
        200,
        opcode::LDI,
        1,
        255,
        opcode::LDI,
        2,
        0,
        opcode::LDI,
        3,
        12,
        opcode::ADD,
        0,
        1,
        opcode::CMP,
        0,
        2,
        opcode::JNE,
        3,
        opcode::HLT,
    ]
}

fn bench_countdown(c: &mut Criterion) {
    let image = countdown_image();

    c.bench_function("countdown-200", |b| {
        b.iter(|| {
            let mut cpu = Cpu::new();
            cpu.load_program(&image).unwrap();
            cpu.run().unwrap();
            black_box(cpu.cycle())
        })
    });
}

fn bench_single_step(c: &mut Criterion) {
    c.bench_function("single-step-ldi", |b| {
        b.iter(|| {
            let mut cpu = Cpu::new();
            cpu.load_program(&[opcode::LDI, 0, 42, opcode::HLT]).unwrap();
            cpu.step().unwrap();
            black_box(cpu.regs.get(0).unwrap())
        })
    });
}

criterion_group!(benches, bench_countdown, bench_single_step);
criterion_main!(benches);
