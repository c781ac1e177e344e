//! テキスト取得 - テキストレイヤー抽出とOCRの2段構成
//!
//! 各段は同じ `(path) → Result<String, AcquisitionError>` の契約を持つ。
//! 空文字列は「テキストなし」を表す。次の段に進むかどうかは呼び出し側が決める。

use crate::config::Config;
use crate::error::AcquisitionError;
use crate::ocr::{OcrEngine, engine_from_config};
use crate::pdf::{Rasterizer, extract_text_layer};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// ドキュメントからテキストを取得する方法
#[async_trait]
pub trait TextSource: Send + Sync {
    /// ログ用の名前
    fn name(&self) -> &'static str;

    async fn acquire(&self, pdf_path: &Path) -> Result<String, AcquisitionError>;
}

/// 第1段: PDFのテキストレイヤー
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredText;

#[async_trait]
impl TextSource for StructuredText {
    fn name(&self) -> &'static str {
        "text layer"
    }

    async fn acquire(&self, pdf_path: &Path) -> Result<String, AcquisitionError> {
        extract_text_layer(pdf_path)
    }
}

/// 第2段: 全ページをラスタライズしてOCR
pub struct OcrText {
    rasterizer: Rasterizer,
    engine: Arc<dyn OcrEngine>,
    timeout: Duration,
}

impl OcrText {
    pub fn new(rasterizer: Rasterizer, engine: Arc<dyn OcrEngine>, timeout: Duration) -> Self {
        Self {
            rasterizer,
            engine,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, AcquisitionError> {
        Ok(Self::new(
            Rasterizer::new(config.pdftoppm_cmd.clone(), config.raster_dpi),
            engine_from_config(config)?,
            config.ocr_timeout,
        ))
    }

    async fn recognize_all(&self, pdf_path: &Path) -> Result<String, AcquisitionError> {
        let images = self.rasterizer.rasterize(pdf_path).await?;

        let mut text = String::new();
        for (index, page) in images.pages().iter().enumerate() {
            let page_text = self.engine.recognize(page).await?;
            debug!(
                path = %pdf_path.display(),
                page = index + 1,
                engine = self.engine.name(),
                chars = page_text.len(),
                "OCR page"
            );
            text.push_str(&page_text);
        }

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl TextSource for OcrText {
    fn name(&self) -> &'static str {
        "OCR"
    }

    /// タイムアウトすると実行中の外部プロセスも終了する
    async fn acquire(&self, pdf_path: &Path) -> Result<String, AcquisitionError> {
        tokio::time::timeout(self.timeout, self.recognize_all(pdf_path))
            .await
            .map_err(|_| AcquisitionError::Timeout(self.timeout))?
    }
}
