use criterion::{criterion_group, criterion_main, Criterion};
use lattice::{
    builtins::Builtins, lexer::SUGGESTED_TOKENS_CAPACITY, parser::parse_program, symbols::Env,
    token::Token,
};
use std::hint::black_box;

static INPUT: &str = include_str!("../../demos/fodo.ll");

fn parser(input: &str, tokens: &mut Vec<Token>, builtins: &Builtins) {
    let mut env = Env::new(builtins);
    let program = parse_program(input, tokens, &mut env).unwrap();
    _ = black_box(program);
}

fn criterion_benchmark(c: &mut Criterion) {
    // Redeclarations are allowed, so the repeated demo is still a valid program.
    let input = INPUT.repeat(64);
    let builtins = Builtins::standard();
    let mut tokens = Vec::with_capacity(SUGGESTED_TOKENS_CAPACITY * 2);

    c.bench_function("parser", |b| {
        b.iter(|| {
            tokens.clear();
            black_box(parser(black_box(&input), &mut tokens, &builtins));
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
