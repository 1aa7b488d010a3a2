//! 辞書の読み込みと参照を行うユーティリティ
//!
//! このバイナリは、指定された辞書ディレクトリを読み込んで区分ごとの語数を出力し、
//! 指定された語の登録内容を表示します。`--watch`を指定すると、一定時間
//! 自動読み込みを動かしてから語数を再び出力します。

use std::error::Error;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hanlex::{Autoloader, HashLexicon, LexType, Lexicon, LexiconConfig, TrieLexicon};

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// コマンドライン引数
#[derive(Parser, Debug)]
#[clap(name = "lexload", about = "Loads lexicon directories and looks up words")]
struct Args {
    /// Configuration file in the properties format.
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// Lexicon directory. Can be given multiple times.
    #[clap(short = 'd', long = "dir")]
    dirs: Vec<PathBuf>,

    /// Word to look up. Can be given multiple times.
    #[clap(short = 'l', long = "lookup")]
    words: Vec<String>,

    /// Uses the trie-backed lexicon instead of the hash-backed one.
    #[clap(long)]
    trie: bool,

    /// Runs the autoloader for the given number of seconds.
    #[clap(long, value_name = "SECS")]
    watch: Option<u64>,

    /// Maximum length of multi-character words.
    #[clap(short = 'M', long)]
    max_word_length: Option<usize>,
}

/// 区分ごとの語数を出力します。
fn write_sizes<L, W>(lexicon: &L, out: &mut W) -> std::io::Result<()>
where
    L: Lexicon + ?Sized,
    W: Write,
{
    for lex_type in LexType::ALL {
        writeln!(out, "{}\t{}", lex_type.header_name(), lexicon.len(lex_type))?;
    }
    Ok(())
}

/// 語の登録内容をすべての区分について出力します。
///
/// 形式は`表層形\t区分\t頻度\tピンイン\t品詞\t同義語\tエンティティ`です。
fn write_lookup<L, W>(lexicon: &L, word: &str, out: &mut W) -> std::io::Result<()>
where
    L: Lexicon + ?Sized,
    W: Write,
{
    let mut found = false;
    for lex_type in LexType::ALL {
        let Some(entry) = lexicon.get(lex_type, word) else {
            continue;
        };
        found = true;
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            entry.key(),
            lex_type.header_name(),
            entry.frequency(),
            entry.pinyin().unwrap_or("*"),
            or_star(entry.part_of_speech().join(",")),
            or_star(entry.synonyms().join(",")),
            entry.entity().unwrap_or_else(|| "*".to_string()),
        )?;
    }
    if !found {
        writeln!(out, "{word}\tNOT_FOUND")?;
    }
    Ok(())
}

fn or_star(s: String) -> String {
    if s.is_empty() { "*".to_string() } else { s }
}

fn run<L>(lexicon: Arc<L>, config: LexiconConfig, args: &Args) -> Result<(), Box<dyn Error>>
where
    L: Lexicon + 'static,
{
    let report = hanlex::loader::load_paths(&*lexicon, &config)?;
    log::info!(
        "Loaded {} lines: {} applied, {} skipped, {} malformed",
        report.lines,
        report.applied,
        report.skipped,
        report.malformed
    );

    let out = std::io::stdout();
    let mut out = BufWriter::new(out.lock());
    write_sizes(&*lexicon, &mut out)?;
    for word in &args.words {
        write_lookup(&*lexicon, word, &mut out)?;
    }
    out.flush()?;

    if let Some(secs) = args.watch {
        let mut autoloader = Autoloader::new(Arc::clone(&lexicon), config);
        autoloader.start()?;
        eprintln!("Watching for {secs} seconds...");
        thread::sleep(Duration::from_secs(secs));
        autoloader.stop()?;

        write_sizes(&*lexicon, &mut out)?;
        for word in &args.words {
            write_lookup(&*lexicon, word, &mut out)?;
        }
        out.flush()?;
    } else if config.autoload {
        // 終了はシグナルに任せる
        let interval = config.poll_interval;
        let mut autoloader = Autoloader::new(Arc::clone(&lexicon), config);
        autoloader.start()?;
        eprintln!("Autoload enabled, polling every {} seconds", interval.as_secs());
        loop {
            thread::sleep(interval);
            write_sizes(&*lexicon, &mut out)?;
            out.flush()?;
        }
    }

    Ok(())
}

/// メイン関数
///
/// 設定と引数から辞書ディレクトリを集めて読み込み、結果を標準出力に出力します。
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => LexiconConfig::from_path(path)?,
        None => LexiconConfig::new(),
    };
    config.lexicon_paths.extend(args.dirs.iter().cloned());
    if let Some(len) = args.max_word_length {
        config = config.max_word_length(len);
    }
    if config.lexicon_paths.is_empty() {
        return Err("no lexicon directory given; use -d or a configuration file".into());
    }

    if args.trie {
        run(Arc::new(TrieLexicon::new()), config, &args)
    } else {
        run(Arc::new(HashLexicon::new()), config, &args)
    }
}
