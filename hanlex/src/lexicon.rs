//! 区分された語彙辞書
//!
//! このモジュールは、分かち書きアルゴリズムが参照する語彙辞書のインターフェース
//! [`Lexicon`]と、その実装を提供します。
//!
//! 辞書は[`LexType`]ごとの区分に分かれており、同じ表層形が複数の区分に
//! 独立して存在できます。すべての操作は区分を第一引数に取ります。
//!
//! - [`HashLexicon`]: ハッシュマップによる実装
//! - [`TrieLexicon`]: 文字トライによる実装。共通接頭辞検索を提供します
//!
//! いずれの実装も`Send + Sync`であり、`Arc`で共有したまま
//! [`Autoloader`](crate::Autoloader)による再読み込みと並行して参照できます。

mod hash;
mod trie;
mod word;

use std::sync::Arc;

use crate::errors::{LexiconError, Result};

pub use crate::lexicon::hash::HashLexicon;
pub use crate::lexicon::trie::{PrefixMatch, TrieLexicon};
pub use crate::lexicon::word::{DEFAULT_FREQUENCY, WordEntry, WordKind};

/// 辞書の区分。
///
/// 語彙の種類ごとに辞書を分割するための識別子です。辞書ファイルの
/// ヘッダー行で指定される名前と、安定した数値IDを持ちます。
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
#[repr(u8)]
pub enum LexType {
    /// 漢字の複数文字語。
    ///
    /// ヘッダーを解決できなかった辞書ファイルもこの区分として読み込まれます。
    #[default]
    CjkWord = 0,
    /// 漢字の単一文字。
    ///
    /// 読み込み時には頻度の指定にのみ使われ、エントリ自体は
    /// [`LexType::CjkWord`]に格納されます。
    CjkChar = 1,
    /// 量詞・単位語。
    CjkUnit = 2,
    /// 姓。
    CnSurname = 3,
    /// 一文字の名。
    CnSingleName = 4,
    /// 二文字の名の一文字目。
    CnDoubleName1 = 5,
    /// 二文字の名の二文字目。
    CnDoubleName2 = 6,
    /// 姓の修飾語（「老」「小」など）。
    CnSurnameAdorn = 7,
    /// ストップワード。
    StopWord = 8,
    /// 英単語。
    EnWord = 9,
}

/// ヘッダー名と区分の対応表。
///
/// 最長一致を保証するため、ヘッダー名の長い順に並んでいます。
const HEADERS: [(&str, LexType); LexType::COUNT] = [
    ("CN_LNAME_ADORN", LexType::CnSurnameAdorn),
    ("CN_DNAME_1", LexType::CnDoubleName1),
    ("CN_DNAME_2", LexType::CnDoubleName2),
    ("STOP_WORD", LexType::StopWord),
    ("CJK_WORD", LexType::CjkWord),
    ("CJK_CHAR", LexType::CjkChar),
    ("CJK_UNIT", LexType::CjkUnit),
    ("CN_LNAME", LexType::CnSurname),
    ("CN_SNAME", LexType::CnSingleName),
    ("EN_WORD", LexType::EnWord),
];

impl LexType {
    /// 区分の総数。
    pub const COUNT: usize = 10;

    /// すべての区分（ID順）。
    pub const ALL: [LexType; Self::COUNT] = [
        LexType::CjkWord,
        LexType::CjkChar,
        LexType::CjkUnit,
        LexType::CnSurname,
        LexType::CnSingleName,
        LexType::CnDoubleName1,
        LexType::CnDoubleName2,
        LexType::CnSurnameAdorn,
        LexType::StopWord,
        LexType::EnWord,
    ];

    /// 数値IDを取得します。
    #[inline(always)]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// 区分ごとの配列を引くためのインデックスを取得します。
    #[inline(always)]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// 数値IDから区分を取得します。
    ///
    /// # エラー
    ///
    /// 未知のIDが指定された場合、[`LexiconError::InvalidPartition`]を返します。
    pub fn from_id(id: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(id))
            .copied()
            .ok_or(LexiconError::InvalidPartition(id))
    }

    /// 辞書ファイルのヘッダー名を取得します。
    pub fn header_name(self) -> &'static str {
        match self {
            LexType::CjkWord => "CJK_WORD",
            LexType::CjkChar => "CJK_CHAR",
            LexType::CjkUnit => "CJK_UNIT",
            LexType::CnSurname => "CN_LNAME",
            LexType::CnSingleName => "CN_SNAME",
            LexType::CnDoubleName1 => "CN_DNAME_1",
            LexType::CnDoubleName2 => "CN_DNAME_2",
            LexType::CnSurnameAdorn => "CN_LNAME_ADORN",
            LexType::StopWord => "STOP_WORD",
            LexType::EnWord => "EN_WORD",
        }
    }

    /// ヘッダー行から区分を解決します。
    ///
    /// 大文字小文字を区別せず、行頭がヘッダー名に一致する区分のうち
    /// 最も長い名前のものを返します。例えば`CN_LNAME_ADORN`は
    /// `CN_LNAME`ではなく[`LexType::CnSurnameAdorn`]に解決されます。
    ///
    /// # 戻り値
    ///
    /// 一致する区分がない場合は`None`
    pub fn from_header(line: &str) -> Option<Self> {
        let bytes = line.as_bytes();
        HEADERS.iter().find_map(|&(name, lex_type)| {
            bytes
                .get(..name.len())
                .filter(|prefix| prefix.eq_ignore_ascii_case(name.as_bytes()))
                .map(|_| lex_type)
        })
    }

    /// 人名用の一文字区分かどうかを返します。
    #[inline(always)]
    pub const fn is_name_char(self) -> bool {
        matches!(
            self,
            LexType::CnSurname
                | LexType::CnSingleName
                | LexType::CnDoubleName1
                | LexType::CnDoubleName2
        )
    }
}

/// 区分された語彙辞書のインターフェース。
///
/// 読み込み処理（[`crate::loader`]）はこのトレイトに対してのみ書かれているため、
/// どの実装でも同じ辞書ファイルを同じ意味で読み込めます。
///
/// `add`はエントリの存在を確立するだけで、既存エントリの頻度や種別を
/// 上書きしません。フィールド単位のマージは[`get`](Lexicon::get)で得た
/// ハンドルに対して読み込み側が行います。
pub trait Lexicon: Send + Sync {
    /// 指定された区分に表層形が登録されているかどうかを返します。
    fn contains(&self, lex_type: LexType, key: &str) -> bool;

    /// 指定された区分のエントリを取得します。
    ///
    /// 返されるハンドルは辞書と共有されており、フィールドの変更は
    /// 辞書の内容にそのまま反映されます。
    fn get(&self, lex_type: LexType, key: &str) -> Option<Arc<WordEntry>>;

    /// エントリを直接追加します。
    ///
    /// 同じ表層形が既に存在する場合は何もせず、既存のハンドルを返します。
    fn add_word(&self, lex_type: LexType, word: WordEntry) -> Arc<WordEntry>;

    /// 新しい語を追加します。
    ///
    /// # 引数
    ///
    /// * `lex_type` - 区分
    /// * `key` - 表層形
    /// * `frequency` - 頻度
    /// * `kind` - 語の種別
    /// * `entity` - エンティティタグ
    ///
    /// # 戻り値
    ///
    /// 追加された、または既に存在していたエントリのハンドル
    fn add(
        &self,
        lex_type: LexType,
        key: &str,
        frequency: u32,
        kind: WordKind,
        entity: Option<&str>,
    ) -> Arc<WordEntry> {
        if let Some(word) = self.get(lex_type, key) {
            return word;
        }
        self.add_word(
            lex_type,
            WordEntry::with_entity(key, frequency, kind, entity),
        )
    }

    /// エントリを削除します。存在しない場合は何もしません。
    fn remove(&self, lex_type: LexType, key: &str);

    /// 指定された区分のエントリ数を返します。
    fn len(&self, lex_type: LexType) -> usize;

    /// 指定された区分が空かどうかを返します。
    fn is_empty(&self, lex_type: LexType) -> bool {
        self.len(lex_type) == 0
    }
}

impl<L> Lexicon for Arc<L>
where
    L: Lexicon + ?Sized,
{
    #[inline(always)]
    fn contains(&self, lex_type: LexType, key: &str) -> bool {
        (**self).contains(lex_type, key)
    }

    #[inline(always)]
    fn get(&self, lex_type: LexType, key: &str) -> Option<Arc<WordEntry>> {
        (**self).get(lex_type, key)
    }

    fn add_word(&self, lex_type: LexType, word: WordEntry) -> Arc<WordEntry> {
        (**self).add_word(lex_type, word)
    }

    fn remove(&self, lex_type: LexType, key: &str) {
        (**self).remove(lex_type, key)
    }

    fn len(&self, lex_type: LexType) -> usize {
        (**self).len(lex_type)
    }
}
