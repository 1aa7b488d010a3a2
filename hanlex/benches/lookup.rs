//! 辞書の参照速度のベンチマーク
//!
//! 生成した辞書ファイルを[`HashLexicon`]と[`TrieLexicon`]に読み込み、
//! `contains`と共通接頭辞検索の速度を計測します。

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hanlex::{HashLexicon, LexType, Lexicon, LexiconConfig, TrieLexicon};

const NUM_WORDS: usize = 20_000;

/// CJK統合漢字の範囲から決定的に語を生成します。
fn generate_words() -> Vec<String> {
    let mut state = 0x2545_f491_u32;
    (0..NUM_WORDS)
        .map(|_| {
            let len = 2 + (state % 3) as usize;
            (0..len)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    char::from_u32(0x4e00 + state % 0x5000).unwrap_or('中')
                })
                .collect()
        })
        .collect()
}

fn lexicon_text(words: &[String]) -> String {
    let mut text = String::from("CJK_WORD\n");
    for word in words {
        text.push_str(word);
        text.push_str("/n/null/null\n");
    }
    text
}

fn bench_store<L>(c: &mut Criterion, name: &str, lexicon: &L, words: &[String])
where
    L: Lexicon,
{
    let mut group = c.benchmark_group(format!("Lookup ({name})"));
    group.throughput(Throughput::Elements(words.len() as u64));
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));

    group.bench_function(BenchmarkId::new("contains", "hit"), |b| {
        b.iter(|| {
            words
                .iter()
                .filter(|w| lexicon.contains(LexType::CjkWord, w))
                .count()
        });
    });
    group.bench_function(BenchmarkId::new("contains", "miss"), |b| {
        b.iter(|| {
            words
                .iter()
                .filter(|w| lexicon.contains(LexType::StopWord, w))
                .count()
        });
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let words = generate_words();
    let text = lexicon_text(&words);
    let config = LexiconConfig::new();

    let hash = HashLexicon::new();
    hanlex::loader::load_reader(&hash, &config, text.as_bytes()).unwrap();
    bench_store(c, "HashLexicon", &hash, &words);

    let trie = TrieLexicon::new();
    hanlex::loader::load_reader(&trie, &config, text.as_bytes()).unwrap();
    bench_store(c, "TrieLexicon", &trie, &words);

    let sentence: Vec<char> = words.iter().take(1000).flat_map(|w| w.chars()).collect();
    c.bench_function("TrieLexicon common_prefix_matches", |b| {
        b.iter(|| {
            (0..sentence.len())
                .map(|i| {
                    trie.common_prefix_matches(LexType::CjkWord, &sentence[i..])
                        .len()
                })
                .sum::<usize>()
        });
    });
}

fn bench_load(c: &mut Criterion) {
    let text = lexicon_text(&generate_words());
    let config = LexiconConfig::new();

    let mut group = c.benchmark_group("Load");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.sample_size(20);
    group.bench_function("HashLexicon", |b| {
        b.iter_with_setup(HashLexicon::new, |lexicon| {
            hanlex::loader::load_reader(&lexicon, &config, text.as_bytes()).unwrap()
        });
    });
    group.bench_function("TrieLexicon", |b| {
        b.iter_with_setup(TrieLexicon::new, |lexicon| {
            hanlex::loader::load_reader(&lexicon, &config, text.as_bytes()).unwrap()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_lookup, bench_load);
criterion_main!(benches);
