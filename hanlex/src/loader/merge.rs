//! 解析結果の辞書への反映
//!
//! マージは冪等です。同じストリームを何度読み込んでも辞書の内容は変わりません。

use crate::config::LexiconConfig;
use crate::lexicon::{DEFAULT_FREQUENCY, Lexicon, WordEntry, WordKind};
use crate::loader::parser::{EntityField, MergeOp, WordRecord};
use crate::utils::char_len;

/// 操作を辞書に適用します。
///
/// # 引数
///
/// * `lexicon` - 対象の辞書
/// * `config` - 読み込み設定。各フィールドのマージは設定で個別に無効化できます
/// * `op` - 適用する操作
pub fn apply<L>(lexicon: &L, config: &LexiconConfig, op: MergeOp)
where
    L: Lexicon + ?Sized,
{
    match op {
        MergeOp::Add {
            lex_type,
            key,
            entity,
        } => {
            lexicon.add(
                lex_type,
                &key,
                DEFAULT_FREQUENCY,
                WordKind::CjkWord,
                entity.as_deref(),
            );
        }
        MergeOp::Merge(record) => merge_record(lexicon, config, record),
    }
}

/// レコードを辞書にマージします。
///
/// 未登録の語は、すべてのフィールドをマージし終えてから辞書に公開します。
/// 並行する参照側からフィールドが欠けたエントリが見えることはありません。
fn merge_record<L>(lexicon: &L, config: &LexiconConfig, record: WordRecord)
where
    L: Lexicon + ?Sized,
{
    if let Some(word) = lexicon.get(record.lex_type, &record.key) {
        merge_fields(&word, config, &record);
        return;
    }

    let word = WordEntry::new(
        record.key.as_str(),
        record.frequency.unwrap_or(DEFAULT_FREQUENCY),
        WordKind::CjkWord,
    );
    merge_fields(&word, config, &record);
    let word = lexicon.add_word(record.lex_type, word);
    // 別スレッドが先に登録していた場合はそのエントリが返るため、再度マージする
    merge_fields(&word, config, &record);
}

fn merge_fields(word: &WordEntry, config: &LexiconConfig, record: &WordRecord) {
    if config.load_pinyin
        && let Some(pinyin) = &record.pinyin
    {
        word.set_pinyin(pinyin.as_str());
    }
    if config.load_entity {
        merge_entity(word, &record.entity, record.default_entity.as_deref());
    }
    if config.load_synonyms {
        for synonym in &record.synonyms {
            word.add_synonym(synonym);
        }
    }
    if config.load_part_of_speech {
        for pos in &record.part_of_speech {
            word.add_part_of_speech(pos);
        }
    }
}

/// エンティティタグをマージします。
///
/// | 現在の値 | フィールド | 結果 |
/// |----------|------------|------|
/// | なし | 値 | 値 |
/// | なし | `null` | なし |
/// | なし | なし | 既定エンティティ |
/// | あり | `null` | 消去 |
/// | あり | 値 | 値の方が長ければ置き換え |
/// | あり | なし | 既定エンティティの方が長ければ置き換え |
///
/// 長さは文字数で比較します。
pub fn merge_entity(word: &WordEntry, field: &EntityField, default_entity: Option<&str>) {
    word.update_entity(|current| match (current, field) {
        (None, EntityField::Value(value)) => Some(Some(value.clone())),
        (None, EntityField::Null) => None,
        (None, EntityField::Absent) => default_entity.map(|d| Some(d.to_string())),
        (Some(_), EntityField::Null) => Some(None),
        (Some(current), EntityField::Value(value)) => {
            (char_len(value) > char_len(current)).then(|| Some(value.clone()))
        }
        (Some(current), EntityField::Absent) => default_entity
            .filter(|d| char_len(d) > char_len(current))
            .map(|d| Some(d.to_string())),
    });
}
