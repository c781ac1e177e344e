//! Tesseract CLI によるOCR

use super::OcrEngine;
use crate::error::AcquisitionError;
use crate::tool::run_tool;
use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// `tesseract <image> stdout -l hin+eng` を実行するエンジン
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    program: PathBuf,
    languages: String,
}

impl TesseractEngine {
    pub fn new(program: impl Into<PathBuf>, languages: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            languages: languages.into(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn recognize(&self, image_path: &Path) -> Result<String, AcquisitionError> {
        let output = run_tool(
            &self.program,
            [
                image_path.as_os_str(),
                OsStr::new("stdout"),
                OsStr::new("-l"),
                OsStr::new(&self.languages),
            ],
        )
        .await?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
