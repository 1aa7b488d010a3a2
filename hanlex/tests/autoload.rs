//! 自動読み込みの結合テスト
//!
//! 短いポーリング間隔で[`Autoloader`]を起動し、制御ファイルに列挙した
//! 辞書ファイルが稼働中の辞書に取り込まれることを確認します。

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use hanlex::autoload::AUTOLOAD_CONTROL_FILE;
use hanlex::utils::compute_metadata_hash;
use hanlex::{Autoloader, HashLexicon, LexType, Lexicon, LexiconConfig, TrieLexicon};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const DEADLINE: Duration = Duration::from_secs(10);

fn wait_until<F>(mut cond: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = Instant::now();
    while start.elapsed() < DEADLINE {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    cond()
}

/// 制御ファイルを一度に置き換え、置き換えた時点のフィンガープリントを返します。
fn write_control(dir: &Path, content: &str) -> String {
    let tmp = dir.join("autoload.tmp");
    fs::write(&tmp, content).unwrap();
    let written = compute_metadata_hash(&fs::metadata(&tmp).unwrap());
    fs::rename(&tmp, dir.join(AUTOLOAD_CONTROL_FILE)).unwrap();
    written
}

fn control_is_empty(dir: &Path) -> bool {
    fs::read_to_string(dir.join(AUTOLOAD_CONTROL_FILE)).is_ok_and(|s| s.is_empty())
}

#[test]
fn test_autoload_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("lex-base.lex"),
        "CJK_WORD\n研究/v/yan jiu/null\n",
    )
    .unwrap();

    let config = LexiconConfig::new()
        .lexicon_path(dir.path())
        .poll_interval(POLL_INTERVAL);
    let lexicon = Arc::new(HashLexicon::new());
    hanlex::loader::load_paths(&*lexicon, &config).unwrap();
    assert_eq!(lexicon.len(LexType::CjkWord), 1);

    let mut autoloader = Autoloader::new(Arc::clone(&lexicon), config);
    autoloader.start().unwrap();
    assert!(autoloader.is_running());

    fs::write(
        dir.path().join("lex-extra.lex"),
        "CJK_WORD\n研究生/n/yan jiu sheng/null\n研究/v/null/探究\n",
    )
    .unwrap();
    let written = write_control(dir.path(), "# new words\nlex-extra.lex\n");

    assert!(wait_until(|| {
        lexicon.contains(LexType::CjkWord, "研究生") && control_is_empty(dir.path())
    }));
    let consumed = compute_metadata_hash(
        &fs::metadata(dir.path().join(AUTOLOAD_CONTROL_FILE)).unwrap(),
    );
    assert_ne!(written, consumed);
    assert_eq!(
        lexicon.get(LexType::CjkWord, "研究").unwrap().synonyms(),
        vec!["探究"]
    );

    fs::write(dir.path().join("lex-more.lex"), "STOP_WORD\n的\n").unwrap();
    write_control(dir.path(), "lex-more.lex\n");
    assert!(wait_until(|| lexicon.contains(LexType::StopWord, "的")));

    autoloader.stop().unwrap();
    assert!(!autoloader.is_running());
}

#[test]
fn test_autoload_retries_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = LexiconConfig::new()
        .lexicon_path(dir.path())
        .poll_interval(POLL_INTERVAL);
    let lexicon = Arc::new(TrieLexicon::new());
    let mut autoloader = Autoloader::new(Arc::clone(&lexicon), config);
    autoloader.start().unwrap();

    write_control(dir.path(), "lex-late.lex\n");
    thread::sleep(POLL_INTERVAL * 4);
    assert_eq!(
        fs::read_to_string(dir.path().join(AUTOLOAD_CONTROL_FILE)).unwrap(),
        "lex-late.lex\n"
    );

    fs::write(dir.path().join("lex-late.lex"), "CN_LNAME_ADORN\n老\n").unwrap();
    assert!(wait_until(|| {
        lexicon.contains(LexType::CnSurnameAdorn, "老") && control_is_empty(dir.path())
    }));
}

#[test]
fn test_autoload_ignores_existing_control_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("lex-old.lex"), "CJK_WORD\n旧词/n/null/null\n").unwrap();
    write_control(dir.path(), "lex-old.lex\n");

    let config = LexiconConfig::new()
        .lexicon_path(dir.path())
        .poll_interval(POLL_INTERVAL);
    let lexicon = Arc::new(HashLexicon::new());
    let mut autoloader = Autoloader::new(Arc::clone(&lexicon), config);
    autoloader.start().unwrap();

    thread::sleep(POLL_INTERVAL * 4);
    assert!(!lexicon.contains(LexType::CjkWord, "旧词"));

    drop(autoloader);
    assert_eq!(
        fs::read_to_string(dir.path().join(AUTOLOAD_CONTROL_FILE)).unwrap(),
        "lex-old.lex\n"
    );
}
