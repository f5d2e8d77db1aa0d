use divan::AllocProfiler;
use divan::{Bencher, black_box};
use posseq::corpus::CorpusFormat;
use posseq::{Corpus, find_matches, validate};

#[global_allocator]
static ALLOC: AllocProfiler = AllocProfiler::system();

fn main() {
    divan::main();
}

const PATTERN: [(&str, &str); 8] = [
    ("the", "DET"),
    ("old", "ADJ"),
    ("man", "NOUN"),
    ("slowly", "ADV"),
    ("walked", "VERB"),
    ("to", "ADP"),
    ("town", "NOUN"),
    (".", "PUNCT"),
];

/// A synthetic corpus of `n` repeats of one sentence
fn synthetic(n: usize) -> Corpus {
    Corpus::from_pairs("synthetic", PATTERN.iter().copied().cycle().take(n * PATTERN.len()))
}

#[divan::bench(args = [2, 3, 5])]
fn find_by_width(bencher: Bencher, width: usize) {
    let corpus = synthetic(100_000);
    let query = validate(&["DET", "ADJ", "NOUN", "ADV", "VERB"][..width].join(" ")).unwrap();
    bencher.bench_local(|| black_box(find_matches(&query, &corpus).len()));
}

#[divan::bench]
fn find_no_matches(bencher: Bencher) {
    let corpus = synthetic(100_000);
    let query = validate("VERB VERB").unwrap();
    bencher.bench_local(|| black_box(find_matches(&query, &corpus).len()));
}

#[divan::bench(sample_count = 10)]
fn parse_tagged(bencher: Bencher) {
    let text: String = PATTERN
        .iter()
        .cycle()
        .take(80_000)
        .map(|(word, tag)| format!("{word}/{tag} "))
        .collect();
    bencher.bench_local(|| {
        black_box(Corpus::parse("bench", black_box(text.as_bytes()), CorpusFormat::Tagged).unwrap())
    });
}
