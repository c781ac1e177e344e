//! テキスト解析モジュール - 書類の日付の抽出

mod date;

pub use date::locate_date;
