//! PDF日付リネーマー - メインエントリポイント

use anyhow::{Context, Result};
use pdf_date_renamer::error::BatchError;
use pdf_date_renamer::{Config, DateExtractor, process_folder};
use std::io::Write;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // ロギング初期化（標準出力は処理結果用）
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    // 環境変数の読み込み
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("invalid configuration")?;
    let extractor = DateExtractor::from_config(&config).context("failed to set up OCR")?;

    let folder = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => prompt_folder()?,
    };

    match process_folder(&folder, &extractor).await {
        Ok(report) => println!("{report}"),
        Err(BatchError::FolderNotFound(path)) => println!("Folder not found: {}", path.display()),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

/// フォルダパスを対話入力で受け取る
fn prompt_folder() -> Result<PathBuf> {
    print!("Enter the folder path containing PDFs: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read folder path")?;

    Ok(PathBuf::from(line.trim()))
}
