//! フォルダ単位の一括処理

use crate::error::{BatchError, RenameError};
use crate::pipeline::DateExtractor;
use crate::rename::rename_with_date;
use std::fmt;
use std::path::{Path, PathBuf};

/// 対象とするファイル名の末尾（大文字小文字を区別）
const PDF_SUFFIX: &str = ".pdf";

/// 1ドキュメントの処理結果
#[derive(Debug)]
pub enum DocumentOutcome {
    Renamed(PathBuf),
    NoDate,
    Failed(RenameError),
}

/// 処理結果の一覧（処理順）
#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<(String, DocumentOutcome)>,
}

impl BatchReport {
    pub fn renamed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Renamed(_)))
    }

    pub fn no_date(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::NoDate))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&DocumentOutcome) -> bool) -> usize {
        self.documents.iter().filter(|(_, o)| pred(o)).count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Done: {} renamed, {} without date, {} failed",
            self.renamed(),
            self.no_date(),
            self.failed()
        )
    }
}

/// フォルダ直下のPDFを1件ずつ処理し、結果をコンソールに表示する
///
/// 処理順はファイル名順。リネームに失敗しても残りのファイルの処理は続ける。
pub async fn process_folder(folder: &Path, extractor: &DateExtractor) -> Result<BatchReport, BatchError> {
    if !folder.is_dir() {
        return Err(BatchError::FolderNotFound(folder.to_path_buf()));
    }

    let mut report = BatchReport::default();
    for (file_name, pdf_path) in list_pdfs(folder)? {
        println!("Processing: {file_name}");
        let outcome = process_document(&pdf_path, extractor).await;

        match &outcome {
            DocumentOutcome::Renamed(new_path) => println!("Renamed to: {}", new_path.display()),
            DocumentOutcome::NoDate => println!("No date found in: {file_name}"),
            DocumentOutcome::Failed(e) => println!("Failed to rename {file_name}: {e}"),
        }
        report.documents.push((file_name, outcome));
    }

    Ok(report)
}

/// 1ドキュメントの日付抽出とリネーム
async fn process_document(pdf_path: &Path, extractor: &DateExtractor) -> DocumentOutcome {
    let Some(date) = extractor.extract_date(pdf_path).await else {
        return DocumentOutcome::NoDate;
    };

    match rename_with_date(pdf_path, &date) {
        Ok(new_path) => DocumentOutcome::Renamed(new_path),
        Err(e) => DocumentOutcome::Failed(e),
    }
}

/// フォルダ直下の `.pdf` ファイルをファイル名順に列挙
fn list_pdfs(folder: &Path) -> Result<Vec<(String, PathBuf)>, BatchError> {
    let read_dir_error = |source| BatchError::ReadDir {
        folder: folder.to_path_buf(),
        source,
    };

    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !file_name.ends_with(PDF_SUFFIX) {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            pdfs.push((file_name, path));
        }
    }
    pdfs.sort();

    Ok(pdfs)
}
