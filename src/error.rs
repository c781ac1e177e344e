//! エラー型定義

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// テキスト取得（テキストレイヤー / OCR）の失敗
///
/// どのバリアントも致命的ではなく、呼び出し側で「テキストなし」として扱う。
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("failed to read text layer: {0}")]
    TextLayer(#[from] lopdf::Error),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("rasterizer produced no page images")]
    NoPages,

    #[error("OCR service error: {0:#}")]
    Service(anyhow::Error),

    #[error("OCR timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// リネームの失敗（そのドキュメントに対して致命的）
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("target already exists: {}", .0.display())]
    TargetExists(PathBuf),

    #[error("failed to rename {} -> {}: {source}", .from.display(), .to.display())]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// バッチ処理全体の失敗
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("failed to list {}: {source}", .folder.display())]
    ReadDir {
        folder: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 設定値の読み込み失敗
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("OCR_BACKEND=vision requires GOOGLE_APPLICATION_CREDENTIALS")]
    MissingCredentials,
}
