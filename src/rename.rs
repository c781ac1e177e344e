//! リネーム処理 - 抽出した日付をファイル名に埋め込む

use crate::error::RenameError;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// ファイル名の分解結果
///
/// `A.B.pdf` → prefix `A`, suffix `B`, extension `.pdf`
///
/// UTF-8 でないファイル名もバイト列のまま保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub prefix: OsString,
    pub suffix: OsString,
    /// 先頭のドットを含む拡張子（なければ空）
    pub extension: OsString,
}

impl NameParts {
    /// ファイル名を prefix / suffix / 拡張子に分解
    ///
    /// 拡張子を除いた部分を最初のドットで分割する。ドットがなければ全体が prefix。
    pub fn split(file_name: impl AsRef<OsStr>) -> Self {
        let path = Path::new(file_name.as_ref());
        let stem = path.file_stem().unwrap_or_default();

        let mut extension = OsString::new();
        if let Some(ext) = path.extension() {
            extension.push(".");
            extension.push(ext);
        }

        let (prefix, suffix) = split_at_first_dot(stem);

        Self {
            prefix: prefix.to_os_string(),
            suffix: suffix.to_os_string(),
            extension,
        }
    }

    /// `{prefix}.{date}-{suffix}{extension}` を生成（suffix が空でもハイフンは残す）
    pub fn with_date(&self, date: &str) -> OsString {
        let mut name = self.prefix.clone();
        name.push(".");
        name.push(date);
        name.push("-");
        name.push(&self.suffix);
        name.push(&self.extension);
        name
    }
}

/// 最初の `.` で分割（`.` がなければ suffix は空）
fn split_at_first_dot(stem: &OsStr) -> (&OsStr, &OsStr) {
    let bytes = stem.as_encoded_bytes();
    let Some(dot) = bytes.iter().position(|&b| b == b'.') else {
        return (stem, OsStr::new(""));
    };
    // SAFETY: ASCII の `.` の前後で分割したバイト列は、元の OsStr の有効な部分列
    unsafe {
        (
            OsStr::from_encoded_bytes_unchecked(&bytes[..dot]),
            OsStr::from_encoded_bytes_unchecked(&bytes[dot + 1..]),
        )
    }
}

/// リネーム後のパスを計算（同じディレクトリ）
pub fn renamed_path(original: &Path, date: &str) -> PathBuf {
    let new_name = NameParts::split(original.file_name().unwrap_or_default()).with_date(date);
    match original.parent() {
        Some(dir) => dir.join(new_name),
        None => PathBuf::from(new_name),
    }
}

/// 日付を埋め込んだ名前にリネームし、新しいパスを返す
///
/// 日付がなければ何もせず `Ok(None)`。
pub fn rename_pdf(original: &Path, date: Option<&str>) -> Result<Option<PathBuf>, RenameError> {
    match date.filter(|d| !d.is_empty()) {
        Some(date) => rename_with_date(original, date).map(Some),
        None => Ok(None),
    }
}

/// 日付を埋め込んだ名前にリネーム
///
/// 移動先が既に存在する場合は上書きせずにエラー。
pub fn rename_with_date(original: &Path, date: &str) -> Result<PathBuf, RenameError> {
    let new_path = renamed_path(original, date);
    if new_path.exists() {
        return Err(RenameError::TargetExists(new_path));
    }

    std::fs::rename(original, &new_path).map_err(|source| RenameError::Io {
        from: original.to_path_buf(),
        to: new_path.clone(),
        source,
    })?;

    Ok(new_path)
}
