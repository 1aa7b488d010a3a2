//! 内部ユーティリティ関数
//!
//! 文字数の計算、エンティティ文字列の正規化、数字列の検証、
//! ファイルメタデータのハッシュ計算を提供します。

use std::fs::Metadata;

use sha2::{Digest, Sha256};

/// 文字列の長さを文字単位で返します。
#[inline(always)]
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// 文字列がASCII数字のみで構成されているかどうかを返します。空文字列は`false`です。
#[inline(always)]
pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// エンティティタグを正規化します。
///
/// 前後の空白を取り除き、小文字に揃えます。
///
/// # 例
///
/// ```
/// # use hanlex::utils::canonical_entity;
/// assert_eq!(canonical_entity(" Unit.Length "), "unit.length");
/// ```
pub fn canonical_entity(entity: &str) -> String {
    entity.trim().to_lowercase()
}

/// ファイルメタデータからハッシュを計算します。
///
/// 自動読み込みの制御ファイルが変更されたかどうかの判定に使います。
/// 更新時刻だけでなくサイズやiノードも含めるため、更新時刻の分解能が
/// 粗いファイルシステムでも書き込みを取りこぼしにくくなります。
///
/// # 戻り値
///
/// メタデータのSHA256ハッシュの16進数表現文字列。
///
/// # プラットフォーム固有の動作
///
/// - Unix: デバイスID、iノード、サイズ、変更時刻を使用
/// - Windows: ファイルサイズ、最終書き込み時刻、作成時刻、ファイル属性を使用
/// - その他: サイズ、変更時刻を使用
pub fn compute_metadata_hash(meta: &Metadata) -> String {
    let mut hasher = Sha256::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        hasher.update(meta.dev().to_le_bytes());
        hasher.update(meta.ino().to_le_bytes());
        hasher.update(meta.size().to_le_bytes());
        hasher.update(meta.mtime().to_le_bytes());
        hasher.update(meta.mtime_nsec().to_le_bytes());
    }

    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        hasher.update(meta.file_size().to_le_bytes());
        hasher.update(meta.last_write_time().to_le_bytes());
        hasher.update(meta.creation_time().to_le_bytes());
        hasher.update(meta.file_attributes().to_le_bytes());
    }

    #[cfg(not(any(unix, windows)))]
    {
        use std::time::SystemTime;

        hasher.update(meta.len().to_le_bytes());
        match meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok())
        {
            Some(duration) => {
                hasher.update(duration.as_secs().to_le_bytes());
                hasher.update(duration.subsec_nanos().to_le_bytes());
            }
            None => hasher.update([0u8; 12]),
        }
    }

    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    #[test]
    fn test_char_len() {
        assert_eq!(char_len("中国人"), 3);
        assert_eq!(char_len("abc"), 3);
        assert_eq!(char_len(""), 0);
    }

    #[test]
    fn test_is_digits() {
        assert!(is_digits("0"));
        assert!(is_digits("12345"));
        assert!(!is_digits(""));
        assert!(!is_digits("-1"));
        assert!(!is_digits("1a"));
        assert!(!is_digits("１２"));
    }

    #[test]
    fn test_metadata_hash_changes_with_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let before = compute_metadata_hash(&file.as_file().metadata().unwrap());
        assert_eq!(before.len(), 64);
        assert_eq!(
            before,
            compute_metadata_hash(&file.as_file().metadata().unwrap())
        );

        file.write_all("lex-extra.lex\n".as_bytes()).unwrap();
        file.flush().unwrap();
        let after = compute_metadata_hash(&file.as_file().metadata().unwrap());
        assert_ne!(before, after);
    }
}
