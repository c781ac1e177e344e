//! PDF日付リネーマー - 書類に印字された日付でPDFファイルをリネームするツール
//!
//! # 機能
//! - PDFのテキストレイヤーからテキスト抽出（lopdf）
//! - テキストレイヤーで日付が見つからない場合は全ページをOCR（Tesseract / Google Vision）
//! - 「दिनांक」「Date」「Dated」に続く日付の抽出
//! - `{prefix}.{日付}-{suffix}.pdf` 形式への自動リネーム

pub mod acquire;
pub mod batch;
pub mod config;
pub mod error;
pub mod ocr;
pub mod parser;
pub mod pdf;
pub mod pipeline;
pub mod rename;
mod tool;
pub mod vision;

pub use batch::{BatchReport, DocumentOutcome, process_folder};
pub use config::Config;
pub use parser::locate_date;
pub use pipeline::DateExtractor;
pub use rename::rename_pdf;
