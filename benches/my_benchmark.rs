use criterion::{black_box, criterion_group, criterion_main, Criterion};

use huffcode::{
    build_tree, decode, reconstruct, Alphabet, BitReader, Bits, CodeBook, FrequencyTable, Symbol,
    TreeSerializer,
};

fn sample_text() -> Vec<u8> {
    let passage = b"It was the best of times, it was the worst of times, it was the age of \
wisdom, it was the age of foolishness, it was the epoch of belief, it was the epoch of \
incredulity, it was the season of Light, it was the season of Darkness.\n";
    passage.iter().copied().cycle().take(64 * 1024).collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let text = sample_text();
    let alphabet = Alphabet::default();
    let frequencies = FrequencyTable::from_bytes(alphabet, &text).unwrap();
    let tree = build_tree(&frequencies);

    let mut table: Vec<u8> = Vec::new();
    TreeSerializer::new(&tree)
        .write(&mut table, &mut Bits::new())
        .unwrap();

    let book = CodeBook::from_tree(&tree).unwrap();
    let mut message = Bits::new();
    book.encode(
        text.iter().map(|&b| Symbol::from(b)),
        alphabet.sentinel(),
        &mut message,
    )
    .unwrap();

    c.bench_function("count frequencies", |b| {
        b.iter(|| FrequencyTable::from_bytes(alphabet, black_box(&text)).unwrap())
    });
    c.bench_function("build tree", |b| b.iter(|| build_tree(black_box(&frequencies))));
    c.bench_function("serialize tree", |b| {
        b.iter(|| {
            let mut out: Vec<u8> = Vec::new();
            TreeSerializer::new(black_box(&tree))
                .write(&mut out, &mut Bits::new())
                .unwrap()
        })
    });
    c.bench_function("reconstruct tree", |b| {
        b.iter(|| reconstruct(black_box(&table[..])).unwrap())
    });
    c.bench_function("decode 64k", |b| {
        b.iter(|| {
            let mut source = BitReader::new(message.clone());
            decode(&tree, &mut source, alphabet.sentinel()).unwrap()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
