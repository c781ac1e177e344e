//! PDF処理モジュール - テキストレイヤー抽出と、PDFから画像への変換

mod text;

pub use text::extract_text_layer;

use crate::error::AcquisitionError;
use crate::tool::run_tool;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// ページ画像の出力ファイル名の接頭辞（page-1.png, page-01.png ...）
const PAGE_PREFIX: &str = "page";

/// ページ画像群（drop 時に一時ディレクトリごと削除）
#[derive(Debug)]
pub struct PageImages {
    _dir: TempDir,
    pages: Vec<PathBuf>,
}

impl PageImages {
    /// ページ順の画像パス
    pub fn pages(&self) -> &[PathBuf] {
        &self.pages
    }
}

/// pdftoppm による全ページのラスタライズ
#[derive(Debug, Clone)]
pub struct Rasterizer {
    pdftoppm: PathBuf,
    dpi: u32,
}

impl Rasterizer {
    pub fn new(pdftoppm: impl Into<PathBuf>, dpi: u32) -> Self {
        Self {
            pdftoppm: pdftoppm.into(),
            dpi,
        }
    }

    /// PDFの全ページをPNGに変換
    pub async fn rasterize(&self, pdf_path: impl AsRef<Path>) -> Result<PageImages, AcquisitionError> {
        let pdf_path = pdf_path.as_ref();
        let dir = tempfile::Builder::new().prefix("pdf_date_renamer_").tempdir()?;
        let output_base = dir.path().join(PAGE_PREFIX);
        let dpi = self.dpi.to_string();

        run_tool(
            &self.pdftoppm,
            [
                OsStr::new("-png"),
                OsStr::new("-r"),
                OsStr::new(&dpi),
                pdf_path.as_os_str(),
                output_base.as_os_str(),
            ],
        )
        .await?;

        let pages = collect_pages(dir.path())?;
        if pages.is_empty() {
            return Err(AcquisitionError::NoPages);
        }
        debug!(path = %pdf_path.display(), pages = pages.len(), "rasterized");

        Ok(PageImages { _dir: dir, pages })
    }
}

/// 生成された画像をページ番号順に並べる
///
/// pdftoppm はページ数に応じてゼロ埋めするため、文字列ではなく番号で比較する。
fn collect_pages(dir: &Path) -> Result<Vec<PathBuf>, AcquisitionError> {
    let mut numbered = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if let Some(number) = page_number(&path) {
            numbered.push((number, path));
        }
    }
    numbered.sort_by_key(|(number, _)| *number);
    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}

fn page_number(path: &Path) -> Option<u32> {
    if path.extension()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix(PAGE_PREFIX)?
        .strip_prefix('-')?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_ordered_numerically() {
        let dir = TempDir::new().unwrap();
        for name in ["page-10.png", "page-02.png", "page-01.png", "notes.txt", "page-x.png"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let pages = collect_pages(dir.path()).unwrap();
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, ["page-01.png", "page-02.png", "page-10.png"]);
    }

    #[tokio::test]
    async fn missing_rasterizer_is_an_error() {
        let rasterizer = Rasterizer::new("/nonexistent/bin/pdftoppm", 200);
        let err = rasterizer.rasterize("scan.pdf").await.unwrap_err();
        assert!(matches!(err, AcquisitionError::Spawn { .. }));
    }
}
