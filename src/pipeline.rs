//! 日付抽出パイプライン - テキスト取得の各段を順に試し、最初に見つかった日付を返す

use crate::acquire::{OcrText, StructuredText, TextSource};
use crate::config::Config;
use crate::error::AcquisitionError;
use crate::parser::locate_date;
use std::path::Path;
use tracing::{info, warn};

/// テキスト取得の段を順に試して日付を探す
///
/// 段が失敗した場合、テキストが空の場合、テキストに日付がない場合のいずれでも次の段へ進む。
pub struct DateExtractor {
    sources: Vec<Box<dyn TextSource>>,
}

impl DateExtractor {
    pub fn new(sources: Vec<Box<dyn TextSource>>) -> Self {
        Self { sources }
    }

    /// テキストレイヤー → OCR の標準構成
    pub fn from_config(config: &Config) -> Result<Self, AcquisitionError> {
        Ok(Self::new(vec![
            Box::new(StructuredText),
            Box::new(OcrText::from_config(config)?),
        ]))
    }

    pub async fn extract_date(&self, pdf_path: &Path) -> Option<String> {
        for (index, source) in self.sources.iter().enumerate() {
            if index > 0 {
                info!(path = %pdf_path.display(), source = source.name(), "Falling back");
            }

            match source.acquire(pdf_path).await {
                Ok(text) if text.is_empty() => {
                    info!(path = %pdf_path.display(), source = source.name(), "no text");
                }
                Ok(text) => match locate_date(&text) {
                    Some(date) => {
                        info!(path = %pdf_path.display(), source = source.name(), %date, "date found");
                        return Some(date);
                    }
                    None => {
                        info!(path = %pdf_path.display(), source = source.name(), "no date in text");
                    }
                },
                Err(e) => {
                    warn!(path = %pdf_path.display(), source = source.name(), error = %e, "text acquisition failed");
                }
            }
        }

        None
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 固定の結果を返し、呼び出し回数を数える段
    pub(crate) struct FakeSource {
        pub result: fn() -> Result<String, AcquisitionError>,
        pub calls: Arc<AtomicUsize>,
    }

    impl FakeSource {
        pub(crate) fn boxed(result: fn() -> Result<String, AcquisitionError>) -> (Box<dyn TextSource>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = Self {
                result,
                calls: calls.clone(),
            };
            (Box::new(source), calls)
        }
    }

    #[async_trait]
    impl TextSource for FakeSource {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn acquire(&self, _pdf_path: &Path) -> Result<String, AcquisitionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    #[tokio::test]
    async fn text_layer_date_skips_ocr() {
        let (first, first_calls) = FakeSource::boxed(|| Ok("Date: 15-03-2024".into()));
        let (second, second_calls) = FakeSource::boxed(|| Ok("Date: 01-01-1999".into()));
        let extractor = DateExtractor::new(vec![first, second]);

        let date = extractor.extract_date(Path::new("a.pdf")).await;

        assert_eq!(date.as_deref(), Some("15-03-2024"));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn date_less_text_falls_back_to_ocr() {
        let (first, _) = FakeSource::boxed(|| Ok("Government of India\nOffice Memorandum".into()));
        let (second, second_calls) = FakeSource::boxed(|| Ok("दिनांक 02/11-2021".into()));
        let extractor = DateExtractor::new(vec![first, second]);

        let date = extractor.extract_date(Path::new("a.pdf")).await;

        assert_eq!(date.as_deref(), Some("02/11-2021"));
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_or_failed_text_layer_falls_back() {
        let (first, _) = FakeSource::boxed(|| Ok(String::new()));
        let (second, _) = FakeSource::boxed(|| Ok("Dated 09.09.2019".into()));
        let extractor = DateExtractor::new(vec![first, second]);
        assert_eq!(
            extractor.extract_date(Path::new("a.pdf")).await.as_deref(),
            Some("09.09.2019")
        );

        let (first, _) = FakeSource::boxed(|| Err(AcquisitionError::NoPages));
        let (second, _) = FakeSource::boxed(|| Ok("Dated 09.09.2019".into()));
        let extractor = DateExtractor::new(vec![first, second]);
        assert_eq!(
            extractor.extract_date(Path::new("a.pdf")).await.as_deref(),
            Some("09.09.2019")
        );
    }

    #[tokio::test]
    async fn nothing_anywhere_means_no_date() {
        let (first, first_calls) = FakeSource::boxed(|| Ok("no label here 15-03-2024".into()));
        let (second, second_calls) = FakeSource::boxed(|| Err(AcquisitionError::NoPages));
        let extractor = DateExtractor::new(vec![first, second]);

        assert_eq!(extractor.extract_date(Path::new("a.pdf")).await, None);
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }
}
