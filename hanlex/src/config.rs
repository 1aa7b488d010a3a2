//! 読み込み設定
//!
//! このモジュールは、辞書の読み込みと自動読み込みの挙動を決める
//! [`LexiconConfig`]を提供します。設定はビルダーメソッドで組み立てるか、
//! `key = value`形式のプロパティファイルから読み込みます。

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{LexiconError, Result};

/// 自動読み込みの既定のポーリング間隔（秒）
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// 複数文字語の既定の最大長（文字数）
pub const DEFAULT_MAX_WORD_LENGTH: usize = 5;

/// 辞書の読み込み設定。
///
/// # 例
///
/// ```
/// use std::time::Duration;
/// use hanlex::LexiconConfig;
///
/// let config = LexiconConfig::new()
///     .lexicon_path("/var/lib/lexicon")
///     .poll_interval(Duration::from_secs(30))
///     .max_word_length(6)
///     .load_pinyin(false);
///
/// assert_eq!(config.max_word_length, 6);
/// assert!(!config.load_pinyin);
/// assert!(config.load_synonyms);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconConfig {
    /// 辞書ディレクトリの一覧。自動読み込みはディレクトリごとに独立して行われます。
    pub lexicon_paths: Vec<PathBuf>,

    /// 自動読み込みを有効にするかどうか。
    pub autoload: bool,

    /// 自動読み込みのポーリング間隔。
    pub poll_interval: Duration,

    /// 漢字の複数文字語とその同義語の最大長（文字数）。
    pub max_word_length: usize,

    /// ピンインを読み込むかどうか。
    pub load_pinyin: bool,

    /// エンティティタグを読み込むかどうか。
    pub load_entity: bool,

    /// 同義語を読み込むかどうか。
    pub load_synonyms: bool,

    /// 品詞を読み込むかどうか。
    pub load_part_of_speech: bool,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            lexicon_paths: vec![],
            autoload: false,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_word_length: DEFAULT_MAX_WORD_LENGTH,
            load_pinyin: true,
            load_entity: true,
            load_synonyms: true,
            load_part_of_speech: true,
        }
    }
}

impl LexiconConfig {
    /// 既定値の設定を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 辞書ディレクトリを追加します。
    pub fn lexicon_path<P>(mut self, path: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.lexicon_paths.push(path.into());
        self
    }

    /// 自動読み込みを有効または無効にします。
    pub const fn autoload(mut self, yes: bool) -> Self {
        self.autoload = yes;
        self
    }

    /// ポーリング間隔を指定します。
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// 複数文字語の最大長を指定します。
    pub const fn max_word_length(mut self, len: usize) -> Self {
        self.max_word_length = len;
        self
    }

    /// ピンインを読み込むかどうかを指定します。
    pub const fn load_pinyin(mut self, yes: bool) -> Self {
        self.load_pinyin = yes;
        self
    }

    /// エンティティタグを読み込むかどうかを指定します。
    pub const fn load_entity(mut self, yes: bool) -> Self {
        self.load_entity = yes;
        self
    }

    /// 同義語を読み込むかどうかを指定します。
    pub const fn load_synonyms(mut self, yes: bool) -> Self {
        self.load_synonyms = yes;
        self
    }

    /// 品詞を読み込むかどうかを指定します。
    pub const fn load_part_of_speech(mut self, yes: bool) -> Self {
        self.load_part_of_speech = yes;
        self
    }

    /// 設定値が自動読み込みに使えるかどうかを検証します。
    ///
    /// # エラー
    ///
    /// ポーリング間隔が0の場合、[`LexiconError::InvalidArgument`]を返します。
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(LexiconError::invalid_argument(
                "poll_interval",
                "must be greater than zero.",
            ));
        }
        Ok(())
    }

    /// プロパティファイルから設定を読み込みます。
    ///
    /// 相対パスで書かれた`lexicon.path`は、プロパティファイルのあるディレクトリを
    /// 基準に解決されます。
    ///
    /// # エラー
    ///
    /// ファイルを開けない場合、または値が不正な場合にエラーを返します。
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let mut config = Self::from_reader(File::open(path)?)?;
        if let Some(base) = path.parent() {
            for p in &mut config.lexicon_paths {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        }
        Ok(config)
    }

    /// リーダーからプロパティ形式の設定を読み込みます。
    ///
    /// 書式は1行に1つの`key = value`（または`key: value`）です。空行と`#`・`!`で
    /// 始まる行は無視されます。指定されなかったキーは既定値のままになります。
    ///
    /// | キー | 値 |
    /// |------|----|
    /// | `lexicon.path` | `;`区切りのディレクトリ一覧 |
    /// | `lexicon.autoload` | 真偽値 |
    /// | `lexicon.poll_interval` | 秒数 |
    /// | `lexicon.max_word_length` | 文字数 |
    /// | `lexicon.load_pinyin` | 真偽値 |
    /// | `lexicon.load_entity` | 真偽値 |
    /// | `lexicon.load_synonyms` | 真偽値 |
    /// | `lexicon.load_part_of_speech` | 真偽値 |
    ///
    /// 真偽値には`true`/`false`、`1`/`0`、`yes`/`no`、`on`/`off`が使えます。
    ///
    /// # エラー
    ///
    /// 値を解釈できない場合、キー名を含む[`LexiconError::InvalidFormat`]を返します。
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let reader = BufReader::new(rdr);
        let mut config = Self::default();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once(['=', ':']) else {
                return Err(LexiconError::invalid_format(line, "missing '=' separator"));
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "lexicon.path" => {
                    config.lexicon_paths = value
                        .split(';')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(PathBuf::from)
                        .collect();
                }
                "lexicon.autoload" => config.autoload = parse_bool(key, value)?,
                "lexicon.poll_interval" => {
                    let secs = value.parse().map_err(|_| {
                        LexiconError::invalid_format(key, format!("not a number of seconds: {value}"))
                    })?;
                    config.poll_interval = Duration::from_secs(secs);
                }
                "lexicon.max_word_length" => {
                    config.max_word_length = value.parse().map_err(|_| {
                        LexiconError::invalid_format(key, format!("not a length: {value}"))
                    })?;
                }
                "lexicon.load_pinyin" => config.load_pinyin = parse_bool(key, value)?,
                "lexicon.load_entity" => config.load_entity = parse_bool(key, value)?,
                "lexicon.load_synonyms" => config.load_synonyms = parse_bool(key, value)?,
                "lexicon.load_part_of_speech" => {
                    config.load_part_of_speech = parse_bool(key, value)?;
                }
                _ => log::warn!("[hanlex] Ignored unknown configuration key: {key}"),
            }
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(LexiconError::invalid_format(
            key,
            format!("not a boolean: {value}"),
        )),
    }
}
