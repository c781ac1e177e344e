//! PDFテキストレイヤーの抽出

use crate::error::AcquisitionError;
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// 全ページのテキストをページ順に連結し、前後の空白を除いて返す
///
/// テキストレイヤーのないスキャンPDFでは空文字列になる。
pub fn extract_text_layer(pdf_path: impl AsRef<Path>) -> Result<String, AcquisitionError> {
    let pdf_path = pdf_path.as_ref();
    let document = Document::load(pdf_path)?;

    let mut text = String::new();
    // get_pages はページ番号順の BTreeMap
    for page_number in document.get_pages().into_keys() {
        let page_text = document.extract_text(&[page_number])?;
        debug!(path = %pdf_path.display(), page = page_number, chars = page_text.len(), "text layer page");
        text.push_str(&page_text);
    }

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::locate_date;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};
    use tempfile::TempDir;

    /// ページごとに1行のテキストを持つPDFを作成
    fn write_text_pdf(path: &Path, page_texts: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in page_texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_texts.len() as i64,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn pages_are_joined_in_order_and_trimmed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("A.B.pdf");
        write_text_pdf(&path, &["Office Memorandum", "Date 15-03-2024"]);

        let text = extract_text_layer(&path).unwrap();

        assert_eq!(text, text.trim());
        let first = text.find("Office Memorandum").unwrap();
        let second = text.find("Date 15-03-2024").unwrap();
        assert!(first < second);
        assert_eq!(locate_date(&text).as_deref(), Some("15-03-2024"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = extract_text_layer(dir.path().join("absent.pdf")).unwrap_err();
        assert!(matches!(err, AcquisitionError::TextLayer(_)));
    }

    #[test]
    fn garbage_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();
        assert!(extract_text_layer(&path).is_err());
    }
}
