//! エラー型の定義
//!
//! このモジュールは、hanlexで使用されるすべてのエラー型を定義します。
//!
//! 行単位の書式エラーはここには含まれません。辞書ファイルの不正な行は
//! [`Diagnostic`](crate::loader::Diagnostic)として報告され、読み込みは継続されます。

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// hanlex専用のResult型
///
/// エラー型としてデフォルトで[`LexiconError`]を使用します。
pub type Result<T, E = LexiconError> = std::result::Result<T, E>;

/// hanlexのエラー型
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// 設定ファイルの値が解釈できない場合に発生します。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 未知の辞書区分エラー
    ///
    /// 数値IDから[`LexType`](crate::LexType)を解決できなかった場合に発生します。
    #[error("Unknown lexicon partition id: {0}")]
    InvalidPartition(u8),

    /// ディレクトリが存在しないエラー
    #[error("Lexicon directory '{0}' does not exist.")]
    DirectoryNotFound(PathBuf),

    /// ディレクトリが指定されたエラー
    ///
    /// ファイルが期待される場所にディレクトリが指定された場合に発生します。
    #[error("The path '{0}' is a directory, but a file was expected.")]
    PathIsDirectory(PathBuf),

    /// バックグラウンドスレッドパニックエラー
    ///
    /// 自動読み込みスレッドがパニックした場合に発生します。
    #[error("Background thread panicked: {0}")]
    ThreadPanic(String),

    /// I/Oエラー
    ///
    /// [`std::io::Error`]のエラーバリアント。不正なUTF-8を含むストリームもここに含まれます。
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LexiconError {
    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `key` - 問題のあった設定キー
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<K, S>(key: K, msg: S) -> Self
    where
        K: Into<String>,
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            key: key.into(),
            msg: msg.into(),
        })
    }

    /// I/O由来のエラーかどうかを返します。
    ///
    /// 自動読み込みはこの種類のエラーを一時的なものとして警告に留めます。
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::DirectoryNotFound(_) | Self::PathIsDirectory(_)
        )
    }
}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 設定値のフォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// 設定キー
    pub(crate) key: String,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.key, self.msg)
    }
}

impl Error for InvalidFormatError {}
