use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use crate::config::LexiconConfig;
use crate::lexicon::{HashLexicon, LexType, Lexicon, TrieLexicon, WordEntry};
use crate::loader;
use crate::tests::{fields, sizes};

const WORDS: &str = include_str!("./resources/lex-words.lex");
const WORDS_UPDATE: &str = include_str!("./resources/lex-words-update.lex");
const CHARS: &str = include_str!("./resources/lex-chars.lex");
const STOP_WORDS: &str = include_str!("./resources/lex-stopwords.lex");
const UNITS: &str = include_str!("./resources/lex-units.lex");

const KEYS: [&str; 7] = ["北京", "中国", "研究", "研究生", "字", "中", "米"];

fn load_all<L>(lexicon: &L, config: &LexiconConfig)
where
    L: Lexicon + ?Sized,
{
    for text in [WORDS, CHARS, STOP_WORDS, UNITS] {
        loader::load_reader(lexicon, config, text.as_bytes()).unwrap();
    }
}

fn snapshot<L>(lexicon: &L) -> Vec<Option<crate::tests::Fields>>
where
    L: Lexicon + ?Sized,
{
    LexType::ALL
        .iter()
        .flat_map(|&t| KEYS.into_iter().map(move |k| (t, k)))
        .map(|(t, k)| fields(lexicon, t, k))
        .collect()
}

#[test]
fn test_reload_is_idempotent() {
    let lexicon = HashLexicon::new();
    let config = LexiconConfig::new();

    load_all(&lexicon, &config);
    let sizes_once = sizes(&lexicon);
    let once = snapshot(&lexicon);

    load_all(&lexicon, &config);
    assert_eq!(sizes(&lexicon), sizes_once);
    assert_eq!(snapshot(&lexicon), once);
}

#[test]
fn test_update_merges_fields() {
    let lexicon = HashLexicon::new();
    let config = LexiconConfig::new();
    loader::load_reader(&lexicon, &config, WORDS.as_bytes()).unwrap();
    loader::load_reader(&lexicon, &config, WORDS_UPDATE.as_bytes()).unwrap();

    let beijing = lexicon.get(LexType::CjkWord, "北京").unwrap();
    assert_eq!(beijing.pinyin(), Some("bei jing"));
    assert_eq!(beijing.part_of_speech(), vec!["ns", "n"]);
    assert_eq!(beijing.synonyms(), vec!["首都"]);
    assert_eq!(beijing.entity().as_deref(), Some("loc.city"));

    let china = lexicon.get(LexType::CjkWord, "中国").unwrap();
    assert_eq!(china.synonyms(), vec!["中华", "华夏"]);
    assert_eq!(china.entity().as_deref(), Some("loc.country"));

    let research = lexicon.get(LexType::CjkWord, "研究").unwrap();
    assert_eq!(research.part_of_speech(), vec!["v", "vn", "n"]);
    assert_eq!(research.synonyms(), vec!["探究", "研讨", "研究一下"]);
    assert_eq!(research.entity(), None);

    assert_eq!(lexicon.len(LexType::CjkWord), 4);
}

#[test]
fn test_entity_grows_and_clears() {
    let lexicon = HashLexicon::new();
    let config = LexiconConfig::new();
    let load = |text: &str| loader::load_reader(&lexicon, &config, text.as_bytes()).unwrap();
    let entity = || lexicon.get(LexType::CjkWord, "上海").unwrap().entity();

    load("上海/ns/null/null/a");
    assert_eq!(entity().as_deref(), Some("a"));
    load("上海/ns/null/null/ab");
    assert_eq!(entity().as_deref(), Some("ab"));
    load("上海/ns/null/null/a");
    assert_eq!(entity().as_deref(), Some("ab"));
    load(":entity abc\n上海/ns/null/null");
    assert_eq!(entity().as_deref(), Some("abc"));
    load("上海/ns/null/null/null");
    assert_eq!(entity(), None);
}

#[test]
fn test_add_does_not_overwrite() {
    let lexicon = HashLexicon::new();
    let config = LexiconConfig::new();
    loader::load_reader(&lexicon, &config, "CJK_UNIT\n米/unit.length".as_bytes()).unwrap();
    loader::load_reader(&lexicon, &config, "CJK_UNIT\n米/unit".as_bytes()).unwrap();
    loader::load_reader(&lexicon, &config, "CJK_UNIT\n米/null".as_bytes()).unwrap();
    assert_eq!(
        lexicon.get(LexType::CjkUnit, "米").unwrap().entity().as_deref(),
        Some("unit.length")
    );
}

#[test]
fn test_disabled_fields() {
    let lexicon = HashLexicon::new();
    let config = LexiconConfig::new()
        .load_pinyin(false)
        .load_entity(false)
        .load_synonyms(false)
        .load_part_of_speech(false);
    loader::load_reader(&lexicon, &config, WORDS.as_bytes()).unwrap();

    assert_eq!(
        fields(&lexicon, LexType::CjkWord, "中国"),
        Some((0, None, vec![], vec![], None))
    );
    assert_eq!(lexicon.len(LexType::CjkWord), 4);
}

#[test]
fn test_stores_agree() {
    let config = LexiconConfig::new();
    let hash = HashLexicon::new();
    let trie = TrieLexicon::new();
    load_all(&hash, &config);
    load_all(&trie, &config);
    loader::load_reader(&hash, &config, WORDS_UPDATE.as_bytes()).unwrap();
    loader::load_reader(&trie, &config, WORDS_UPDATE.as_bytes()).unwrap();

    assert_eq!(sizes(&hash), sizes(&trie));
    assert_eq!(snapshot(&hash), snapshot(&trie));

    let input: Vec<char> = "研究生活".chars().collect();
    let ends: Vec<usize> = trie
        .common_prefix_matches(LexType::CjkWord, &input)
        .iter()
        .map(|m| m.end_char)
        .collect();
    assert_eq!(ends, vec![2, 3]);
}

type Published = (String, Option<String>, Vec<String>, Vec<String>, Option<String>);

/// 公開された時点のエントリの内容を記録する辞書。
#[derive(Default)]
struct PublishRecorder {
    inner: HashLexicon,
    published: Mutex<Vec<Published>>,
}

impl Lexicon for PublishRecorder {
    fn contains(&self, lex_type: LexType, key: &str) -> bool {
        self.inner.contains(lex_type, key)
    }

    fn get(&self, lex_type: LexType, key: &str) -> Option<Arc<WordEntry>> {
        self.inner.get(lex_type, key)
    }

    fn add_word(&self, lex_type: LexType, word: WordEntry) -> Arc<WordEntry> {
        let word = self.inner.add_word(lex_type, word);
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((
                word.key().to_string(),
                word.pinyin().map(str::to_string),
                word.part_of_speech(),
                word.synonyms(),
                word.entity(),
            ));
        word
    }

    fn remove(&self, lex_type: LexType, key: &str) {
        self.inner.remove(lex_type, key)
    }

    fn len(&self, lex_type: LexType) -> usize {
        self.inner.len(lex_type)
    }
}

#[test]
fn test_new_entry_is_complete_when_published() {
    let lexicon = PublishRecorder::default();
    let config = LexiconConfig::new();
    loader::load_reader(
        &lexicon,
        &config,
        "CJK_WORD\n中国/ns/zhong guo/中华/loc.country".as_bytes(),
    )
    .unwrap();

    let published = lexicon.published.into_inner().unwrap();
    assert_eq!(
        published,
        vec![(
            "中国".to_string(),
            Some("zhong guo".to_string()),
            vec!["ns".to_string()],
            vec!["中华".to_string()],
            Some("loc.country".to_string()),
        )]
    );
}

fn check_readers_see_complete_entries<L>(lexicon: Arc<L>)
where
    L: Lexicon + 'static,
{
    let config = LexiconConfig::new();
    let done = AtomicBool::new(false);
    let (lexicon, done) = (&*lexicon, &done);

    thread::scope(|s| {
        let readers: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(move || {
                    while !done.load(Ordering::Acquire) {
                        if let Some(word) = lexicon.get(LexType::CjkWord, "中国") {
                            assert_eq!(word.pinyin(), Some("zhong guo"));
                            assert!(word.part_of_speech().iter().any(|p| p == "ns"));
                        }
                        if let Some(word) = lexicon.get(LexType::CjkWord, "研究") {
                            assert_eq!(word.pinyin(), Some("yan jiu"));
                            assert_eq!(word.part_of_speech(), vec!["v", "vn"]);
                        }
                        if let Some(word) = lexicon.get(LexType::CjkWord, "北京") {
                            assert_eq!(word.entity().as_deref(), Some("loc"));
                        }
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            loader::load_reader(lexicon, &config, WORDS.as_bytes()).unwrap();
            lexicon.remove(LexType::CjkWord, "中国");
            lexicon.remove(LexType::CjkWord, "研究");
            lexicon.remove(LexType::CjkWord, "北京");
        }
        loader::load_reader(lexicon, &config, WORDS.as_bytes()).unwrap();
        done.store(true, Ordering::Release);

        for reader in readers {
            reader.join().unwrap();
        }
    });

    assert_eq!(lexicon.len(LexType::CjkWord), 4);
}

#[test]
fn test_concurrent_readers_hash() {
    check_readers_see_complete_entries(Arc::new(HashLexicon::new()));
}

#[test]
fn test_concurrent_readers_trie() {
    check_readers_see_complete_entries(Arc::new(TrieLexicon::new()));
}
