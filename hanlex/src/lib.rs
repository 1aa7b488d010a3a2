//! # hanlex
//!
//! hanlexは、中国語の分かち書きエンジンのための、稼働中に更新できる語彙辞書です。
//!
//! ## 概要
//!
//! 分かち書きアルゴリズムはトークンを切り出すたびに辞書を参照します。
//! このライブラリは、区分ごとに分割された語彙辞書と、その辞書ファイルの読み込み、
//! そして参照を止めずに新しい語を取り込むバックグラウンドの自動読み込みを提供します。
//!
//! ## 主な機能
//!
//! - **区分された辞書**: 複数文字語、単一文字、量詞、人名用文字、ストップワードなどを
//!   [`LexType`]ごとに独立して保持
//! - **2つの実装**: ハッシュマップによる[`HashLexicon`]と、共通接頭辞検索ができる
//!   [`TrieLexicon`]
//! - **冪等な読み込み**: 同じ辞書ファイルを何度読み込んでも結果が変わらないマージ
//! - **自動読み込み**: 制御ファイルを監視して新しい辞書ファイルを取り込む[`Autoloader`]
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use hanlex::{HashLexicon, LexType, Lexicon, LexiconConfig};
//!
//! let lexicon = HashLexicon::new();
//! let config = LexiconConfig::new();
//!
//! let words = "CJK_WORD
//! :entity loc
//! 北京/ns/bei jing/null
//! 中国/ns/zhong guo/中华/loc.country";
//! hanlex::loader::load_reader(&lexicon, &config, words.as_bytes())?;
//!
//! let stop_words = "STOP_WORD\n的\nthe";
//! hanlex::loader::load_reader(&lexicon, &config, stop_words.as_bytes())?;
//!
//! let beijing = lexicon.get(LexType::CjkWord, "北京").unwrap();
//! assert_eq!(beijing.pinyin(), Some("bei jing"));
//! assert_eq!(beijing.entity().as_deref(), Some("loc"));
//!
//! let china = lexicon.get(LexType::CjkWord, "中国").unwrap();
//! assert_eq!(china.synonyms(), vec!["中华"]);
//! assert_eq!(china.entity().as_deref(), Some("loc.country"));
//!
//! assert!(lexicon.contains(LexType::StopWord, "的"));
//! assert_eq!(lexicon.len(LexType::StopWord), 2);
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

/// 辞書の自動読み込み
pub mod autoload;

/// 読み込み設定
pub mod config;

/// エラー型の定義
pub mod errors;

/// 区分された語彙辞書
pub mod lexicon;

/// 辞書ファイルの読み込み
pub mod loader;

/// ユーティリティ関数
pub mod utils;


// Re-exports
pub use autoload::Autoloader;
pub use config::LexiconConfig;
pub use lexicon::{
    DEFAULT_FREQUENCY, HashLexicon, LexType, Lexicon, PrefixMatch, TrieLexicon, WordEntry,
    WordKind,
};
pub use loader::LoadReport;

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
