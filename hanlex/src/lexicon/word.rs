//! 語彙エントリ
//!
//! このモジュールは、辞書に登録される一語分の情報を表す[`WordEntry`]と、
//! 分かち書き処理で使われる語の種別[`WordKind`]を提供します。
//!
//! エントリは`Arc<WordEntry>`として区分マップと読み取り側で共有されます。
//! 各フィールドは個別に同期されているため、再読み込み中の書き込みと
//! 並行して参照しても、個々のフィールドが中途半端な状態で見えることはありません。

use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

/// 頻度が指定されなかったエントリに与えられる頻度。
pub const DEFAULT_FREQUENCY: u32 = 0;

/// 語の種別。
///
/// 分かち書きアルゴリズムが語の扱いを切り替えるための補助的なタグです。
/// 辞書ファイルから読み込まれる語はすべて[`WordKind::CjkWord`]になります。
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default)]
#[repr(u8)]
pub enum WordKind {
    /// 漢字の語
    #[default]
    CjkWord = 1,
    /// ピンイン
    CjkPinyin = 2,
    /// 英字と漢字の混在語
    MixedWord = 3,
    /// 中国人名
    CnName = 4,
    /// 愛称
    CnNickname = 5,
    /// ASCII英字
    BasicLatin = 6,
    /// 英数字
    LetterNumber = 7,
    /// その他の数字
    OtherNumber = 8,
    /// 対になった漢字
    CjkPair = 9,
    /// 未認識語
    Unrecognized = 10,
    /// 句読点
    Punctuation = 11,
}

/// 辞書の一語分のエントリ。
///
/// `key`と`kind`、`frequency`は生成時に決まり、以降は変化しません。それ以外のフィールドは
/// 読み込みのたびにマージされます:
///
/// - `pinyin`: 最初に設定された値が保持され、以降の設定は無視されます。
/// - `part_of_speech`, `synonyms`: 和集合としてのみ追加されます。
/// - `entity`: より長い値でのみ置き換えられ、明示的な`null`指定でのみ消去されます。
pub struct WordEntry {
    key: String,
    kind: WordKind,
    frequency: u32,
    pinyin: OnceLock<String>,
    part_of_speech: RwLock<Vec<String>>,
    synonyms: RwLock<Vec<String>>,
    entity: RwLock<Option<String>>,
}

impl WordEntry {
    /// 新しいエントリを作成します。
    ///
    /// # 引数
    ///
    /// * `key` - 表層形
    /// * `frequency` - 統計的な頻度
    /// * `kind` - 語の種別
    pub fn new<S>(key: S, frequency: u32, kind: WordKind) -> Self
    where
        S: Into<String>,
    {
        Self {
            key: key.into(),
            kind,
            frequency,
            pinyin: OnceLock::new(),
            part_of_speech: RwLock::new(vec![]),
            synonyms: RwLock::new(vec![]),
            entity: RwLock::new(None),
        }
    }

    /// エンティティタグを指定してエントリを作成します。
    pub fn with_entity<S>(key: S, frequency: u32, kind: WordKind, entity: Option<&str>) -> Self
    where
        S: Into<String>,
    {
        let word = Self::new(key, frequency, kind);
        if let Some(entity) = entity {
            word.set_entity(Some(entity.to_string()));
        }
        word
    }

    /// 表層形を取得します。
    #[inline(always)]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// 語の種別を取得します。
    #[inline(always)]
    pub const fn kind(&self) -> WordKind {
        self.kind
    }

    /// 頻度を取得します。
    #[inline(always)]
    pub const fn frequency(&self) -> u32 {
        self.frequency
    }

    /// ピンインを取得します。
    #[inline(always)]
    pub fn pinyin(&self) -> Option<&str> {
        self.pinyin.get().map(String::as_str)
    }

    /// ピンインを設定します。
    ///
    /// 既に設定されている場合は何もせず`false`を返します。
    pub fn set_pinyin<S>(&self, pinyin: S) -> bool
    where
        S: Into<String>,
    {
        self.pinyin.set(pinyin.into()).is_ok()
    }

    /// 品詞の一覧を取得します。
    pub fn part_of_speech(&self) -> Vec<String> {
        self.part_of_speech
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 品詞を追加します。
    ///
    /// 既に同じ品詞が含まれている場合は何もせず`false`を返します。
    pub fn add_part_of_speech<S>(&self, pos: S) -> bool
    where
        S: AsRef<str>,
    {
        union_insert(&self.part_of_speech, pos.as_ref())
    }

    /// 同義語の一覧を取得します。
    pub fn synonyms(&self) -> Vec<String> {
        self.synonyms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 同義語を追加します。
    ///
    /// 既に同じ同義語が含まれている場合は何もせず`false`を返します。
    pub fn add_synonym<S>(&self, synonym: S) -> bool
    where
        S: AsRef<str>,
    {
        union_insert(&self.synonyms, synonym.as_ref())
    }

    /// エンティティタグを取得します。
    pub fn entity(&self) -> Option<String> {
        self.entity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// エンティティタグを設定または消去します。
    pub fn set_entity(&self, entity: Option<String>) {
        *self.entity.write().unwrap_or_else(PoisonError::into_inner) = entity;
    }

    /// 現在のエンティティタグから新しい値を決めて置き換えます。
    ///
    /// 判定と書き込みは同じロックの下で行われます。`f`が`None`を返した場合は
    /// 何も変更しません。
    pub fn update_entity<F>(&self, f: F)
    where
        F: FnOnce(Option<&str>) -> Option<Option<String>>,
    {
        let mut entity = self.entity.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(new) = f(entity.as_deref()) {
            *entity = new;
        }
    }
}

fn union_insert(set: &RwLock<Vec<String>>, value: &str) -> bool {
    let mut set = set.write().unwrap_or_else(PoisonError::into_inner);
    if set.iter().any(|v| v == value) {
        return false;
    }
    set.push(value.to_string());
    true
}

impl fmt::Debug for WordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordEntry")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("frequency", &self.frequency())
            .field("pinyin", &self.pinyin())
            .field("part_of_speech", &self.part_of_speech())
            .field("synonyms", &self.synonyms())
            .field("entity", &self.entity())
            .finish()
    }
}
