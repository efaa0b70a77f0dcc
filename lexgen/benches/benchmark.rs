use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazy_static::lazy_static;
use lexgen::gen::generate;
use lexgen::parser::Config;
use std::fs;
use std::path::Path;

lazy_static! {
    static ref GRAMMARS: Box<[String]> = {
        ["tests/test_files/c_like.lex"]
            .iter()
            .map(|filename| {
                let path = Path::new(filename);
                fs::read_to_string(path).unwrap()
            })
            .collect()
    };
}

pub fn scanner_generation(c: &mut Criterion) {
    c.bench_function("generate c-like scanner", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            generate(
                black_box(GRAMMARS[0].as_bytes()),
                &mut out,
                &Config::default(),
            )
            .unwrap();
            out
        })
    });
}

pub fn wide_alternation(c: &mut Criterion) {
    // One rule per letter keeps the subset construction busy merging
    // closures without blowing the DFA cap.
    let rules = ('a'..='z')
        .map(|ch| format!("{ch}{ch}* tok_{ch}();\n"))
        .collect::<String>();
    let grammar = format!("%%\n{rules}%%\n");

    c.bench_function("generate 26-rule scanner", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            generate(black_box(grammar.as_bytes()), &mut out, &Config::default()).unwrap();
            out
        })
    });
}

criterion_group!(benches, scanner_generation, wide_alternation);
criterion_main!(benches);
