//! OCRエンジン - ページ画像からテキストを認識

mod tesseract;

pub use tesseract::TesseractEngine;

use crate::config::{Config, OcrBackend};
use crate::error::AcquisitionError;
use crate::vision::VisionClient;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// 画像1枚を受け取りテキストを返すOCRエンジン
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// ログ用の名前
    fn name(&self) -> &'static str;

    /// 画像からテキストを認識
    async fn recognize(&self, image_path: &Path) -> Result<String, AcquisitionError>;
}

/// 設定に応じたOCRエンジンを作成
pub fn engine_from_config(config: &Config) -> Result<Arc<dyn OcrEngine>, AcquisitionError> {
    match config.ocr_backend {
        OcrBackend::Tesseract => Ok(Arc::new(TesseractEngine::new(
            config.tesseract_cmd.clone(),
            config.language_spec(),
        ))),
        OcrBackend::Vision => {
            let client = VisionClient::from_config(config).map_err(AcquisitionError::Service)?;
            Ok(Arc::new(client))
        }
    }
}
