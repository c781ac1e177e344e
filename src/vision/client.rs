//! Vision API クライアント

use super::auth::{AccessToken, ServiceAccountCredentials, get_access_token, load_credentials};
use crate::config::Config;
use crate::error::AcquisitionError;
use crate::ocr::OcrEngine;
use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::RwLock;

const VISION_API_URL: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Vision APIクライアント
pub struct VisionClient {
    credentials: ServiceAccountCredentials,
    language_hints: Vec<String>,
    access_token: RwLock<Option<AccessToken>>,
    http_client: reqwest::Client,
}

impl VisionClient {
    /// 設定の認証情報ファイルからクライアントを作成
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = config
            .vision_credentials
            .as_deref()
            .context("GOOGLE_APPLICATION_CREDENTIALS is not set")?;
        let credentials = load_credentials(path)?;
        Ok(Self::new(credentials, &config.ocr_languages))
    }

    pub fn new(credentials: ServiceAccountCredentials, languages: &[String]) -> Self {
        Self {
            credentials,
            language_hints: languages.iter().map(|l| language_hint(l)).collect(),
            access_token: RwLock::new(None),
            http_client: reqwest::Client::new(),
        }
    }

    /// アクセストークンを取得（期限内ならキャッシュを使用）
    async fn get_token(&self) -> Result<String> {
        {
            let token = self.access_token.read().await;
            if let Some(t) = token.as_ref().filter(|t| !t.is_expired(Utc::now())) {
                return Ok(t.value.clone());
            }
        }

        let new_token = get_access_token(&self.http_client, &self.credentials).await?;
        let value = new_token.value.clone();
        *self.access_token.write().await = Some(new_token);

        Ok(value)
    }

    /// 画像からテキストを抽出
    pub async fn extract_text(&self, image_path: &Path) -> Result<String> {
        let image_data = tokio::fs::read(image_path)
            .await
            .with_context(|| format!("failed to read image {}", image_path.display()))?;

        let request = VisionRequest {
            requests: vec![AnnotateImageRequest {
                image: Image {
                    content: STANDARD.encode(&image_data),
                },
                features: vec![Feature {
                    feature_type: "DOCUMENT_TEXT_DETECTION".to_string(),
                    max_results: 1,
                }],
                image_context: Some(ImageContext {
                    language_hints: self.language_hints.clone(),
                }),
            }],
        };

        let token = self.get_token().await?;

        let response = self
            .http_client
            .post(VISION_API_URL)
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await
            .context("Vision API request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Vision API error ({status}): {error_text}");
        }

        let vision_response: VisionResponse = response
            .json()
            .await
            .context("failed to parse Vision API response")?;

        vision_response.into_text()
    }
}

#[async_trait]
impl OcrEngine for VisionClient {
    fn name(&self) -> &'static str {
        "google-vision"
    }

    async fn recognize(&self, image_path: &Path) -> Result<String, AcquisitionError> {
        self.extract_text(image_path)
            .await
            .map_err(AcquisitionError::Service)
    }
}

/// Tesseract の言語コードを Vision の言語ヒントに変換
fn language_hint(language: &str) -> String {
    match language {
        "hin" => "hi".to_string(),
        "eng" => "en".to_string(),
        other => other.to_string(),
    }
}

// Vision API リクエスト/レスポンス構造体

#[derive(Serialize)]
struct VisionRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageRequest {
    image: Image,
    features: Vec<Feature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_context: Option<ImageContext>,
}

#[derive(Serialize)]
struct Image {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    feature_type: String,
    #[serde(rename = "maxResults")]
    max_results: i32,
}

#[derive(Serialize)]
struct ImageContext {
    #[serde(rename = "languageHints")]
    language_hints: Vec<String>,
}

#[derive(Deserialize)]
struct VisionResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

impl VisionResponse {
    /// 本文テキストを取り出す（テキストなしは空文字列、エラー応答はエラー）
    fn into_text(self) -> Result<String> {
        let Some(first) = self.responses.into_iter().next() else {
            return Ok(String::new());
        };
        if let Some(status) = first.error {
            anyhow::bail!("Vision API error: {}", status.message);
        }
        Ok(first
            .full_text_annotation
            .map(|a| a.text)
            .unwrap_or_default())
    }
}

#[derive(Deserialize)]
struct AnnotateImageResponse {
    #[serde(rename = "fullTextAnnotation")]
    full_text_annotation: Option<TextAnnotation>,
    error: Option<Status>,
}

#[derive(Deserialize)]
struct TextAnnotation {
    text: String,
}

#[derive(Deserialize)]
struct Status {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_language_hints() {
        assert_eq!(language_hint("hin"), "hi");
        assert_eq!(language_hint("eng"), "en");
        assert_eq!(language_hint("mr"), "mr");
    }

    #[test]
    fn request_uses_api_field_names() {
        let request = VisionRequest {
            requests: vec![AnnotateImageRequest {
                image: Image {
                    content: "aGk=".into(),
                },
                features: vec![Feature {
                    feature_type: "DOCUMENT_TEXT_DETECTION".into(),
                    max_results: 1,
                }],
                image_context: Some(ImageContext {
                    language_hints: vec!["hi".into(), "en".into()],
                }),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        let first = &json["requests"][0];
        assert_eq!(first["features"][0]["type"], "DOCUMENT_TEXT_DETECTION");
        assert_eq!(first["features"][0]["maxResults"], 1);
        assert_eq!(first["imageContext"]["languageHints"][0], "hi");
    }

    #[test]
    fn response_text_is_extracted() {
        let response: VisionResponse = serde_json::from_str(
            r#"{"responses":[{"fullTextAnnotation":{"text":"दिनांक 01.02.2023\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "दिनांक 01.02.2023\n");
    }

    #[test]
    fn empty_and_error_responses() {
        let response: VisionResponse = serde_json::from_str(r#"{"responses":[{}]}"#).unwrap();
        assert_eq!(response.into_text().unwrap(), "");

        let response: VisionResponse = serde_json::from_str(
            r#"{"responses":[{"error":{"code":3,"message":"Bad image data."}}]}"#,
        )
        .unwrap();
        assert!(response.into_text().is_err());
    }
}
