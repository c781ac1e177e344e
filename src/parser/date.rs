//! 日付抽出モジュール

use regex::Regex;
use std::sync::LazyLock;

/// ラベル（दिनांक / Date / Dated）に続く DD?DD?DDDD 形式の日付
///
/// ラベルは大文字小文字を区別する。区切り文字は `.` `/` `-` のいずれかで、
/// 2か所が一致している必要はない。
static LABELED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:दिनांक|Date|Dated)[^\d]*(\d{2}[./-]\d{2}[./-]\d{4})")
        .expect("labeled date pattern is valid")
});

/// テキスト中で最初に現れるラベル付き日付を、書かれたままの形で返す
pub fn locate_date(text: &str) -> Option<String> {
    LABELED_DATE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
