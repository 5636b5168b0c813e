use criterion::{Criterion, black_box, criterion_group, criterion_main};
use html_lexer::{Token, Tokenizer, tokenize};

const SMALL_BLOCKS: usize = 64;
const LARGE_BLOCKS: usize = 20_000;

fn make_blocks(blocks: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for _ in 0..blocks {
        out.extend_from_slice(b"<div class=box><span>hello</span><img src=x></div>");
    }
    out
}

fn make_script_adversarial(bytes: usize) -> Vec<u8> {
    // Dense near-miss close tags keep the end-tag-name state busy without
    // ever matching.
    let mut out = Vec::with_capacity(bytes + 32);
    out.extend_from_slice(b"<script>");
    while out.len() < bytes {
        out.extend_from_slice(b"</scri<pt");
    }
    out.extend_from_slice(b"</script>");
    out
}

fn drive_with_script_mode(src: &[u8]) -> usize {
    let mut tokenizer = Tokenizer::new();
    let mut count = 0usize;
    while let Some(token) = tokenizer.next(src) {
        if let Token::Tag(tag) = &token {
            if tag.kind.is_start()
                && !tag.kind.is_self_closing()
                && tag.name.of(src).eq_ignore_ascii_case(b"script")
            {
                tokenizer.enter_script_data();
            }
        }
        count += 1;
    }
    count
}

fn bench_tokenize_small(c: &mut Criterion) {
    let input = make_blocks(SMALL_BLOCKS);
    c.bench_function("bench_tokenize_small", |b| {
        b.iter(|| black_box(tokenize(black_box(&input)).len()));
    });
}

fn bench_tokenize_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_tokenize_large", |b| {
        b.iter(|| black_box(tokenize(black_box(&input)).len()));
    });
}

fn bench_tokenize_attr_mode_large(c: &mut Criterion) {
    let input = make_blocks(LARGE_BLOCKS);
    c.bench_function("bench_tokenize_attr_mode_large", |b| {
        b.iter(|| {
            let mut tokenizer = Tokenizer::with_attrs();
            let mut count = 0usize;
            while tokenizer.next(black_box(&input)).is_some() {
                count += 1;
            }
            black_box(count)
        });
    });
}

fn bench_script_adversarial(c: &mut Criterion) {
    let input = make_script_adversarial(512 * 1024);
    c.bench_function("bench_script_adversarial", |b| {
        b.iter(|| black_box(drive_with_script_mode(black_box(&input))));
    });
}

criterion_group!(
    benches,
    bench_tokenize_small,
    bench_tokenize_large,
    bench_tokenize_attr_mode_large,
    bench_script_adversarial
);
criterion_main!(benches);
