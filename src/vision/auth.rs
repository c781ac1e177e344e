//! Google Cloud 認証処理

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use std::path::Path;

const VISION_SCOPE: &str = "https://www.googleapis.com/auth/cloud-vision";

/// トークン有効期限の手前で更新する余裕
const EXPIRY_MARGIN_SECS: i64 = 60;

/// サービスアカウントの認証情報
#[derive(Debug, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

/// JWTクレーム
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    exp: i64,
    iat: i64,
}

/// アクセストークンレスポンス
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// 有効期限付きアクセストークン
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// 期限切れ（または間もなく切れる）か
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.expires_at
    }
}

/// サービスアカウントJSONファイルを読み込む
pub fn load_credentials(path: &Path) -> Result<ServiceAccountCredentials> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read credentials file {}", path.display()))?;
    parse_credentials(&json)
}

pub fn parse_credentials(json: &str) -> Result<ServiceAccountCredentials> {
    serde_json::from_str(json).context("failed to parse service account credentials")
}

/// アクセストークンを取得
pub async fn get_access_token(
    http_client: &reqwest::Client,
    credentials: &ServiceAccountCredentials,
) -> Result<AccessToken> {
    let now = Utc::now();

    let claims = Claims {
        iss: credentials.client_email.clone(),
        scope: VISION_SCOPE.to_string(),
        aud: credentials.token_uri.clone(),
        exp: (now + Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
    };

    // RSA秘密鍵でJWTを署名
    let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
        .context("failed to parse RSA private key")?;

    let header = Header::new(Algorithm::RS256);
    let jwt = encode(&header, &claims, &key).context("failed to sign JWT")?;

    // トークンエンドポイントにリクエスト
    let response = http_client
        .post(&credentials.token_uri)
        .form(&[
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", jwt.as_str()),
        ])
        .send()
        .await
        .context("token request failed")?
        .error_for_status()
        .context("token endpoint rejected the request")?;

    let token_response: TokenResponse = response
        .json()
        .await
        .context("failed to parse token response")?;

    Ok(AccessToken {
        value: token_response.access_token,
        expires_at: now + Duration::seconds(token_response.expires_in),
    })
}
