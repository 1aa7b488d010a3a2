//! 辞書ファイルの行パーサー
//!
//! ストリームごとに[`ParseState`]を一つ作り、各行を[`ParseState::parse_line`]に
//! 渡します。パーサーは辞書に触れず、行の解釈結果を[`LineOutcome`]として返すだけです。
//! 辞書への反映は[`merge`](super::merge)が行います。

use crate::lexicon::LexType;
use crate::utils::{canonical_entity, char_len, is_digits};

const NULL: &str = "null";

/// 語のエンティティフィールドの指定。
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub enum EntityField {
    /// フィールドがない。ストリームの既定エンティティが使われます。
    #[default]
    Absent,
    /// `null`が明示されている。
    Null,
    /// 正規化済みのエンティティタグ。
    Value(String),
}

/// `/`区切りの語行を解析した結果。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WordRecord {
    /// マージ先の区分。
    pub lex_type: LexType,
    /// 表層形。
    pub key: String,
    /// 頻度。単一文字の行でのみ指定されます。
    pub frequency: Option<u32>,
    /// 品詞。
    pub part_of_speech: Vec<String>,
    /// ピンイン。
    pub pinyin: Option<String>,
    /// 同義語。最大長を超えるものは取り除かれています。
    pub synonyms: Vec<String>,
    /// エンティティフィールド。
    pub entity: EntityField,
    /// ストリームの既定エンティティ。
    pub default_entity: Option<String>,
}

/// 辞書に対する操作。
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MergeOp {
    /// 語の存在を確立します。既存のエントリには触れません。
    Add {
        /// 区分
        lex_type: LexType,
        /// 表層形
        key: String,
        /// 新規作成時のエンティティタグ
        entity: Option<String>,
    },
    /// 語を作成または取得し、フィールドをマージします。
    Merge(WordRecord),
}

/// 一行の解釈結果。
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LineOutcome {
    /// ヘッダー行。以降の行はこの区分として解釈されます。
    Header(LexType),
    /// ディレクティブ行。
    Directive,
    /// 辞書に適用する操作。
    Apply(MergeOp),
    /// 書式の誤った行。
    Malformed(&'static str),
    /// 空行、コメント行、または条件を満たさず捨てられた行。
    Skip,
}

/// ストリームごとのパーサー状態。
#[derive(Clone, Debug)]
pub struct ParseState {
    lex_type: LexType,
    header_seen: bool,
    default_entity: Option<String>,
    max_word_length: usize,
}

impl ParseState {
    /// 新しいストリームのための状態を作成します。
    ///
    /// # 引数
    ///
    /// * `max_word_length` - 漢字の複数文字語とその同義語の最大長（文字数）
    pub fn new(max_word_length: usize) -> Self {
        Self {
            lex_type: LexType::default(),
            header_seen: false,
            default_entity: None,
            max_word_length,
        }
    }

    /// 現在の区分を取得します。
    #[inline(always)]
    pub const fn lex_type(&self) -> LexType {
        self.lex_type
    }

    /// `:entity`ディレクティブで設定された既定エンティティを取得します。
    #[inline(always)]
    pub fn default_entity(&self) -> Option<&str> {
        self.default_entity.as_deref()
    }

    /// 一行を解釈します。
    pub fn parse_line(&mut self, line: &str) -> LineOutcome {
        let line = line.trim();
        if line.is_empty() || (line.starts_with('#') && line.len() > 1) {
            return LineOutcome::Skip;
        }

        if !self.header_seen {
            self.header_seen = true;
            if let Some(lex_type) = LexType::from_header(line) {
                self.lex_type = lex_type;
                return LineOutcome::Header(lex_type);
            }
            log::debug!("[hanlex] No lexicon header, reading as CJK_WORD: {line}");
        }

        if let Some(directive) = line.strip_prefix(':')
            && !directive.is_empty()
        {
            self.apply_directive(directive);
            return LineOutcome::Directive;
        }

        match self.lex_type {
            lex_type if lex_type.is_name_char() => {
                if char_len(line) == 1 {
                    self.add(line, None)
                } else {
                    LineOutcome::Skip
                }
            }
            LexType::CjkUnit => self.parse_unit(line),
            LexType::CnSurnameAdorn => self.add(line, None),
            LexType::StopWord => {
                let ascii_head = line.chars().next().is_some_and(|c| c.is_ascii());
                if ascii_head || char_len(line) <= self.max_word_length {
                    self.add(line, None)
                } else {
                    LineOutcome::Skip
                }
            }
            _ => self.parse_word(line),
        }
    }

    fn apply_directive(&mut self, directive: &str) {
        let directive = directive.to_lowercase();
        let mut args = directive.split_whitespace();
        match args.next() {
            Some("entity") => {
                if let Some(value) = args.next() {
                    self.default_entity = (value != NULL).then(|| canonical_entity(value));
                }
            }
            _ => log::debug!("[hanlex] Ignored unknown directive: :{directive}"),
        }
    }

    fn add(&self, key: &str, entity: Option<String>) -> LineOutcome {
        LineOutcome::Apply(MergeOp::Add {
            lex_type: self.lex_type,
            key: key.to_string(),
            entity,
        })
    }

    fn parse_unit(&self, line: &str) -> LineOutcome {
        let (key, entity) = match line.split_once('/') {
            None => (line, self.default_entity.clone()),
            Some((key, field)) => {
                let field = field.split('/').next().unwrap_or_default().trim();
                let entity = match field {
                    "" => self.default_entity.clone(),
                    NULL => None,
                    value => Some(canonical_entity(value)),
                };
                (key.trim(), entity)
            }
        };
        if key.is_empty() {
            return LineOutcome::Malformed("empty surface");
        }
        self.add(key, entity)
    }

    fn parse_word(&self, line: &str) -> LineOutcome {
        let mut fields: Vec<&str> = line.split('/').collect();
        while fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        if fields.len() < 4 {
            return LineOutcome::Malformed("expected at least 4 '/'-separated fields");
        }

        let key = fields[0].trim();
        if key.is_empty() {
            return LineOutcome::Malformed("empty surface");
        }

        let is_char = self.lex_type == LexType::CjkChar;
        let frequency = if is_char {
            let Some(Ok(frequency)) = fields
                .get(4)
                .map(|f| f.trim())
                .filter(|f| is_digits(f))
                .map(str::parse::<u32>)
            else {
                return LineOutcome::Malformed("single character frequency must be an integer");
            };
            Some(frequency)
        } else {
            None
        };

        let is_cjk_word = self.lex_type == LexType::CjkWord;
        if is_cjk_word && char_len(key) > self.max_word_length {
            return LineOutcome::Skip;
        }

        let entity = match fields.get(4).map(|f| f.trim()) {
            _ if is_char => EntityField::Absent,
            None | Some("") => EntityField::Absent,
            Some(NULL) => EntityField::Null,
            Some(value) => EntityField::Value(canonical_entity(value)),
        };

        let synonyms = split_list(fields[3])
            .filter(|s| !is_cjk_word || char_len(s) <= self.max_word_length)
            .collect();

        LineOutcome::Apply(MergeOp::Merge(WordRecord {
            lex_type: if is_char { LexType::CjkWord } else { self.lex_type },
            key: key.to_string(),
            frequency,
            part_of_speech: split_list(fields[1]).collect(),
            pinyin: Some(fields[2].trim())
                .filter(|p| !p.is_empty() && *p != NULL)
                .map(str::to_string),
            synonyms,
            entity,
            default_entity: if is_char {
                None
            } else {
                self.default_entity.clone()
            },
        }))
    }
}

/// `,`区切りのリストを分割します。`null`だけのフィールドは空のリストになります。
fn split_list(field: &str) -> impl Iterator<Item = String> + '_ {
    let field = if field.trim() == NULL { "" } else { field };
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
