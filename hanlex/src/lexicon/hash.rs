//! ハッシュマップによる語彙辞書
//!
//! 区分ごとに`RwLock`で保護されたハッシュマップを持つ、最も単純な実装です。

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hashbrown::HashMap;

use crate::lexicon::{LexType, Lexicon, WordEntry};

type Partition = HashMap<String, Arc<WordEntry>>;

/// ハッシュマップによる語彙辞書。
///
/// 参照はマップの探索の間だけ読み取りロックを取り、書き込みはハンドルの
/// 挿入・削除の間だけ書き込みロックを取ります。エントリのフィールドの
/// マージはロックの外で行われます。
///
/// # 例
///
/// ```
/// use hanlex::{HashLexicon, LexType, Lexicon, WordKind};
///
/// let lexicon = HashLexicon::new();
/// lexicon.add(LexType::CjkWord, "研究", 0, WordKind::CjkWord, None);
///
/// assert!(lexicon.contains(LexType::CjkWord, "研究"));
/// assert!(!lexicon.contains(LexType::StopWord, "研究"));
/// assert_eq!(lexicon.len(LexType::CjkWord), 1);
/// ```
#[derive(Default)]
pub struct HashLexicon {
    partitions: [RwLock<Partition>; LexType::COUNT],
}

impl HashLexicon {
    /// 空の辞書を作成します。
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    fn read(&self, lex_type: LexType) -> RwLockReadGuard<'_, Partition> {
        self.partitions[lex_type.index()]
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[inline(always)]
    fn write(&self, lex_type: LexType) -> RwLockWriteGuard<'_, Partition> {
        self.partitions[lex_type.index()]
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Lexicon for HashLexicon {
    #[inline(always)]
    fn contains(&self, lex_type: LexType, key: &str) -> bool {
        self.read(lex_type).contains_key(key)
    }

    #[inline(always)]
    fn get(&self, lex_type: LexType, key: &str) -> Option<Arc<WordEntry>> {
        self.read(lex_type).get(key).cloned()
    }

    fn add_word(&self, lex_type: LexType, word: WordEntry) -> Arc<WordEntry> {
        let mut partition = self.write(lex_type);
        if let Some(existing) = partition.get(word.key()) {
            return Arc::clone(existing);
        }
        let word = Arc::new(word);
        partition.insert(word.key().to_string(), Arc::clone(&word));
        word
    }

    fn remove(&self, lex_type: LexType, key: &str) {
        self.write(lex_type).remove(key);
    }

    fn len(&self, lex_type: LexType) -> usize {
        self.read(lex_type).len()
    }
}
