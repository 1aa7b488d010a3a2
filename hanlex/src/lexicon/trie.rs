//! 文字トライによる語彙辞書
//!
//! 点検索に加えて、入力文字列の共通接頭辞に一致する語の列挙を提供します。
//! 最長一致法などの分かち書きアルゴリズムが候補語を集めるのに使います。

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hashbrown::HashMap;

use crate::lexicon::{LexType, Lexicon, WordEntry};

#[derive(Default)]
struct TrieNode {
    children: HashMap<char, TrieNode>,
    word: Option<Arc<WordEntry>>,
}

impl TrieNode {
    fn find(&self, key: &str) -> Option<&TrieNode> {
        key.chars()
            .try_fold(self, |node, c| node.children.get(&c))
    }

    /// `key`の終端を外し、子も語も持たなくなったノードを刈り取ります。
    ///
    /// 戻り値は語が実際に削除されたかどうか。
    fn remove(&mut self, mut key: std::str::Chars<'_>) -> bool {
        match key.next() {
            None => self.word.take().is_some(),
            Some(c) => {
                let Some(child) = self.children.get_mut(&c) else {
                    return false;
                };
                let removed = child.remove(key);
                if removed && child.word.is_none() && child.children.is_empty() {
                    self.children.remove(&c);
                }
                removed
            }
        }
    }
}

#[derive(Default)]
struct Partition {
    root: TrieNode,
    len: usize,
}

/// 共通接頭辞検索の結果
#[derive(Debug, Clone)]
pub struct PrefixMatch {
    /// 一致したエントリ
    pub word: Arc<WordEntry>,
    /// 一致した語の終端位置（文字単位、排他的）
    pub end_char: usize,
}

/// 文字トライによる語彙辞書。
///
/// # 例
///
/// ```
/// use hanlex::{LexType, Lexicon, TrieLexicon, WordKind};
///
/// let lexicon = TrieLexicon::new();
/// lexicon.add(LexType::CjkWord, "研究", 0, WordKind::CjkWord, None);
/// lexicon.add(LexType::CjkWord, "研究生", 0, WordKind::CjkWord, None);
///
/// let input: Vec<char> = "研究生命".chars().collect();
/// let ends: Vec<usize> = lexicon
///     .common_prefix_matches(LexType::CjkWord, &input)
///     .iter()
///     .map(|m| m.end_char)
///     .collect();
/// assert_eq!(ends, vec![2, 3]);
/// ```
#[derive(Default)]
pub struct TrieLexicon {
    partitions: [RwLock<Partition>; LexType::COUNT],
}

impl TrieLexicon {
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

    /// 入力文字列の共通接頭辞に一致する語を、短い順にすべて返します。
    ///
    /// # 引数
    ///
    /// * `lex_type` - 検索する区分
    /// * `input` - 入力文字列
    pub fn common_prefix_matches(&self, lex_type: LexType, input: &[char]) -> Vec<PrefixMatch> {
        let partition = self.read(lex_type);
        let mut node = &partition.root;
        let mut matches = vec![];
        for (i, c) in input.iter().enumerate() {
            let Some(child) = node.children.get(c) else {
                break;
            };
            node = child;
            if let Some(word) = &node.word {
                matches.push(PrefixMatch {
                    word: Arc::clone(word),
                    end_char: i + 1,
                });
            }
        }
        matches
    }
}

impl Lexicon for TrieLexicon {
    fn contains(&self, lex_type: LexType, key: &str) -> bool {
        self.read(lex_type)
            .root
            .find(key)
            .is_some_and(|node| node.word.is_some())
    }

    fn get(&self, lex_type: LexType, key: &str) -> Option<Arc<WordEntry>> {
        self.read(lex_type)
            .root
            .find(key)
            .and_then(|node| node.word.clone())
    }

    fn add_word(&self, lex_type: LexType, word: WordEntry) -> Arc<WordEntry> {
        let mut partition = self.write(lex_type);
        let mut node = &mut partition.root;
        for c in word.key().chars() {
            node = node.children.entry(c).or_default();
        }
        if let Some(existing) = &node.word {
            return Arc::clone(existing);
        }
        let word = Arc::new(word);
        node.word = Some(Arc::clone(&word));
        partition.len += 1;
        word
    }

    fn remove(&self, lex_type: LexType, key: &str) {
        let mut partition = self.write(lex_type);
        if partition.root.remove(key.chars()) {
            partition.len -= 1;
        }
    }

    fn len(&self, lex_type: LexType) -> usize {
        self.read(lex_type).len
    }
}
