//! 辞書ファイルの読み込み
//!
//! このモジュールは、辞書ファイルを[`Lexicon`]に読み込む関数群を提供します。
//! どの関数もストリームごとに新しい[`ParseState`](parser::ParseState)を作り、
//! 行を順に解釈して[`merge::apply`]で辞書に反映します。
//!
//! 書式の誤った行は[`Diagnostic`]として`log::warn!`で報告され、読み込みは継続します。
//! I/Oエラー（不正なUTF-8を含む）は呼び出し元に返されます。
//!
//! # 例
//!
//! ```
//! use hanlex::{HashLexicon, LexType, Lexicon, LexiconConfig};
//! use hanlex::loader;
//!
//! let lexicon = HashLexicon::new();
//! let config = LexiconConfig::new();
//! let text = "CJK_WORD\n中国/ns/zhong guo/中华/loc.country\n";
//!
//! let report = loader::load_reader(&lexicon, &config, text.as_bytes()).unwrap();
//! assert_eq!(report.applied, 1);
//!
//! let word = lexicon.get(LexType::CjkWord, "中国").unwrap();
//! assert_eq!(word.pinyin(), Some("zhong guo"));
//! assert_eq!(word.synonyms(), vec!["中华"]);
//! ```

pub mod merge;
pub mod parser;

use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use crate::config::LexiconConfig;
use crate::errors::{LexiconError, Result};
use crate::lexicon::Lexicon;
use crate::loader::parser::{LineOutcome, ParseState};

/// 辞書ファイル名の接頭辞。
pub const LEXICON_FILE_PREFIX: &str = "lex-";

/// 辞書ファイル名の拡張子。
pub const LEXICON_FILE_SUFFIX: &str = ".lex";

/// 読み込みの集計。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoadReport {
    /// 読み込んだ行数
    pub lines: usize,
    /// 辞書に適用した操作の数
    pub applied: usize,
    /// 空行、コメント行、条件を満たさず捨てた行の数
    pub skipped: usize,
    /// 書式の誤った行の数
    pub malformed: usize,
}

impl AddAssign for LoadReport {
    fn add_assign(&mut self, other: Self) {
        self.lines += other.lines;
        self.applied += other.applied;
        self.skipped += other.skipped;
        self.malformed += other.malformed;
    }
}

/// 書式の誤った行の報告。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    /// 行番号（1始まり）
    pub line_no: usize,
    /// 理由
    pub reason: &'static str,
    /// 行の内容
    pub line: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line_no, self.reason, self.line)
    }
}

/// リーダーから辞書を読み込みます。
///
/// # 引数
///
/// * `lexicon` - 読み込み先の辞書
/// * `config` - 読み込み設定
/// * `rdr` - UTF-8の辞書ストリーム
///
/// # エラー
///
/// 読み込みに失敗した場合、またはストリームが不正なUTF-8を含む場合にエラーを返します。
pub fn load_reader<L, R>(lexicon: &L, config: &LexiconConfig, rdr: R) -> Result<LoadReport>
where
    L: Lexicon + ?Sized,
    R: Read,
{
    load_stream(lexicon, config, rdr, "<reader>")
}

/// 辞書ファイルを読み込みます。
///
/// # エラー
///
/// パスがディレクトリの場合は[`LexiconError::PathIsDirectory`]を返します。
pub fn load_file<L, P>(lexicon: &L, config: &LexiconConfig, path: P) -> Result<LoadReport>
where
    L: Lexicon + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        return Err(LexiconError::PathIsDirectory(path.to_path_buf()));
    }
    let file = File::open(path)?;
    load_stream(lexicon, config, file, &path.display().to_string())
}

/// ディレクトリ内の`lex-*.lex`ファイルをファイル名順にすべて読み込みます。
///
/// サブディレクトリは辿りません。
///
/// # エラー
///
/// ディレクトリが存在しない場合は[`LexiconError::DirectoryNotFound`]を返します。
pub fn load_dir<L, P>(lexicon: &L, config: &LexiconConfig, dir: P) -> Result<LoadReport>
where
    L: Lexicon + ?Sized,
    P: AsRef<Path>,
{
    let mut report = LoadReport::default();
    for path in lexicon_files(dir.as_ref())? {
        report += load_file(lexicon, config, &path)?;
    }
    Ok(report)
}

/// ディレクトリ内の辞書ファイルの一覧をファイル名順で返します。
///
/// # エラー
///
/// ディレクトリが存在しない場合は[`LexiconError::DirectoryNotFound`]を返します。
pub fn lexicon_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(LexiconError::DirectoryNotFound(dir.to_path_buf()));
    }
    let mut files = vec![];
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file()
            && path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_lexicon_file_name)
        {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// ファイル名が辞書ファイルの命名規則に従っているかどうかを返します。
#[inline(always)]
pub fn is_lexicon_file_name(name: &str) -> bool {
    name.starts_with(LEXICON_FILE_PREFIX) && name.ends_with(LEXICON_FILE_SUFFIX)
}

/// 複数のストリームを順に読み込みます。
///
/// 辞書リソースの探索は呼び出し側の責務です。ストリームごとに
/// パーサーの状態は初期化されます。
pub fn load_readers<L, I, R>(lexicon: &L, config: &LexiconConfig, readers: I) -> Result<LoadReport>
where
    L: Lexicon + ?Sized,
    I: IntoIterator<Item = R>,
    R: Read,
{
    let mut report = LoadReport::default();
    for rdr in readers {
        report += load_reader(lexicon, config, rdr)?;
    }
    Ok(report)
}

/// tarアーカイブに格納された`lexicon/lex-*.lex`をアーカイブ内の順にすべて読み込みます。
///
/// # エラー
///
/// アーカイブが壊れている場合、または読み込みに失敗した場合にエラーを返します。
#[cfg(feature = "archive")]
#[cfg_attr(docsrs, doc(cfg(feature = "archive")))]
pub fn load_archive<L, R>(lexicon: &L, config: &LexiconConfig, rdr: R) -> Result<LoadReport>
where
    L: Lexicon + ?Sized,
    R: Read,
{
    let mut archive = tar::Archive::new(rdr);
    let mut report = LoadReport::default();
    for entry in archive.entries()? {
        let entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = entry.path()?.to_string_lossy().into_owned();
        let Some(file_name) = name
            .trim_start_matches("./")
            .strip_prefix("lexicon/")
        else {
            continue;
        };
        if !is_lexicon_file_name(file_name) {
            continue;
        }
        report += load_stream(lexicon, config, entry, &name)?;
    }
    Ok(report)
}

/// 設定されたすべての辞書ディレクトリを読み込みます。
pub fn load_paths<L>(lexicon: &L, config: &LexiconConfig) -> Result<LoadReport>
where
    L: Lexicon + ?Sized,
{
    let mut report = LoadReport::default();
    for dir in &config.lexicon_paths {
        report += load_dir(lexicon, config, dir)?;
    }
    Ok(report)
}

fn load_stream<L, R>(lexicon: &L, config: &LexiconConfig, rdr: R, source: &str) -> Result<LoadReport>
where
    L: Lexicon + ?Sized,
    R: Read,
{
    let reader = BufReader::new(rdr);
    let mut state = ParseState::new(config.max_word_length);
    let mut report = LoadReport::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = if i == 0 {
            line.trim_start_matches('\u{feff}')
        } else {
            &line
        };
        report.lines += 1;

        match state.parse_line(line) {
            LineOutcome::Header(_) | LineOutcome::Directive => {}
            LineOutcome::Apply(op) => {
                merge::apply(lexicon, config, op);
                report.applied += 1;
            }
            LineOutcome::Malformed(reason) => {
                let diagnostic = Diagnostic {
                    line_no: i + 1,
                    reason,
                    line: line.trim().to_string(),
                };
                log::warn!("[hanlex] {source}: {diagnostic}");
                report.malformed += 1;
            }
            LineOutcome::Skip => report.skipped += 1,
        }
    }

    log::debug!(
        "[hanlex] Loaded {source}: {} lines, {} applied, {} skipped, {} malformed",
        report.lines,
        report.applied,
        report.skipped,
        report.malformed
    );
    Ok(report)
}
