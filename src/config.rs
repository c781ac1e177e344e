//! 実行時設定 - 環境変数（.env 含む）から読み込む

use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// OCRバックエンドの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OcrBackend {
    #[default]
    Tesseract,
    Vision,
}

impl FromStr for OcrBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tesseract" => Ok(Self::Tesseract),
            "vision" => Ok(Self::Vision),
            other => Err(format!("unknown backend `{other}`, expected tesseract or vision")),
        }
    }
}

/// テキスト取得に渡す設定
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub ocr_backend: OcrBackend,
    /// Tesseract 実行ファイル
    pub tesseract_cmd: PathBuf,
    /// pdftoppm 実行ファイル
    pub pdftoppm_cmd: PathBuf,
    /// OCR言語（Tesseract表記、例: hin, eng）
    pub ocr_languages: Vec<String>,
    pub raster_dpi: u32,
    /// 1ドキュメントあたりのOCR段のタイムアウト
    pub ocr_timeout: Duration,
    /// Vision API サービスアカウントJSON
    pub vision_credentials: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ocr_backend: OcrBackend::Tesseract,
            tesseract_cmd: PathBuf::from("tesseract"),
            pdftoppm_cmd: PathBuf::from("pdftoppm"),
            ocr_languages: vec!["hin".to_string(), "eng".to_string()],
            raster_dpi: 200,
            ocr_timeout: Duration::from_secs(300),
            vision_credentials: None,
        }
    }
}

impl Config {
    /// プロセス環境変数から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のルックアップ関数から読み込む（未設定・空文字はデフォルト値）
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("OCR_BACKEND") {
            config.ocr_backend = parse_var("OCR_BACKEND", value)?;
        }
        if let Some(value) = get("TESSERACT_CMD") {
            config.tesseract_cmd = PathBuf::from(value);
        }
        if let Some(value) = get("PDFTOPPM_CMD") {
            config.pdftoppm_cmd = PathBuf::from(value);
        }
        if let Some(value) = get("OCR_LANGUAGES") {
            let languages: Vec<String> = value
                .split('+')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
            if languages.is_empty() {
                return Err(invalid("OCR_LANGUAGES", value, "no languages given"));
            }
            config.ocr_languages = languages;
        }
        if let Some(value) = get("RASTER_DPI") {
            let dpi: u32 = parse_var("RASTER_DPI", value.clone())?;
            if dpi == 0 {
                return Err(invalid("RASTER_DPI", value, "must be greater than zero"));
            }
            config.raster_dpi = dpi;
        }
        if let Some(value) = get("OCR_TIMEOUT_SECS") {
            let secs: u64 = parse_var("OCR_TIMEOUT_SECS", value.clone())?;
            if secs == 0 {
                return Err(invalid("OCR_TIMEOUT_SECS", value, "must be greater than zero"));
            }
            config.ocr_timeout = Duration::from_secs(secs);
        }
        config.vision_credentials = get("GOOGLE_APPLICATION_CREDENTIALS").map(PathBuf::from);

        if config.ocr_backend == OcrBackend::Vision && config.vision_credentials.is_none() {
            return Err(ConfigError::MissingCredentials);
        }

        Ok(config)
    }

    /// Tesseract の `-l` 引数形式（hin+eng）
    pub fn language_spec(&self) -> String {
        self.ocr_languages.join("+")
    }
}

fn parse_var<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(var, value.clone(), e.to_string()))
}

fn invalid(var: &'static str, value: String, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        value,
        reason: reason.into(),
    }
}
