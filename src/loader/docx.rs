//! Word documents (.docx)
//!
//! Reads WordprocessingML parts straight out of the zip container: headers
//! (`word/header*.xml`), then the body (`word/document.xml`), then footers
//! (`word/footer*.xml`). Paragraphs, including empty `<w:p/>`, become
//! blank-line separated blocks; `w:tab` and `w:br` map to a tab and a newline.

use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::DocBotError;
use crate::errors::Result;
use crate::models::Document;
use crate::models::SOURCE_KEY;

const DOCUMENT_PART: &str = "word/document.xml";
const HEADER_PREFIX: &str = "word/header";
const FOOTER_PREFIX: &str = "word/footer";

/// Extract the text of a .docx file into a single document
pub fn load(path: &Path) -> Result<Document> {
    let file = File::open(path).map_err(|e| DocBotError::document_parse(path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| DocBotError::document_parse(path, e))?;

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let headers = parts_with_prefix(&names, HEADER_PREFIX);
    let footers = parts_with_prefix(&names, FOOTER_PREFIX);

    let parts = headers
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(DOCUMENT_PART))
        .chain(footers.iter().map(String::as_str));

    let mut sections = Vec::new();
    for part in parts {
        let xml = read_part(&mut archive, part, path)?;
        let text = extract_text(&xml)
            .map_err(|e| DocBotError::document_parse(path, format!("{part}: {e}")))?;
        if !text.is_empty() {
            sections.push(text);
        }
    }

    let text = super::strip_nul(sections.join("\n\n"));
    Ok(Document::new(text).with_metadata(SOURCE_KEY, path.display().to_string()))
}

/// `word/header1.xml`, `word/header2.xml`, ... in name order
fn parts_with_prefix(names: &[String], prefix: &str) -> Vec<String> {
    let mut parts: Vec<String> = names
        .iter()
        .filter(|name| name.starts_with(prefix) && name.ends_with(".xml"))
        .cloned()
        .collect();
    parts.sort();
    parts
}

fn read_part<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    part: &str,
    path: &Path,
) -> Result<String> {
    let mut xml = String::new();
    archive
        .by_name(part)
        .map_err(|e| DocBotError::document_parse(path, format!("{part}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| DocBotError::document_parse(path, format!("{part}: {e}")))?;
    Ok(xml)
}

/// Pull visible text out of WordprocessingML
pub fn extract_text(xml: &str) -> std::result::Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => text.push_str("\n\n"),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => text.push_str("\n\n"),
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_text => text.push_str(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>First</w:t></w:r><w:r><w:t xml:space="preserve"> paragraph</w:t></w:r></w:p>
    <w:p><w:r><w:t>Tom &amp; Jerry</w:t><w:tab/><w:t>tabbed</w:t><w:br/><w:t>broken</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_extract_text_paragraphs() {
        let text = extract_text(BODY).unwrap();
        assert_eq!(text, "First paragraph\n\nTom & Jerry\ttabbed\nbroken");
    }

    #[test]
    fn test_extract_text_empty_paragraph_breaks() {
        let xml = r#"<w:document xmlns:w="urn:w"><w:body><w:p><w:r><w:t>Title</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>Body</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(extract_text(xml).unwrap(), "Title\n\n\n\nBody");
    }

    #[test]
    fn test_load_reads_headers_and_footers() {
        use std::io::Write;

        fn part(text: &str) -> String {
            format!(r#"<w:hdr xmlns:w="urn:w"><w:p><w:r><w:t>{text}</w:t></w:r></w:p></w:hdr>"#)
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.docx");
        let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
        for (name, xml) in [
            ("word/footer1.xml", part("Page footer")),
            ("word/document.xml", part("Main body")),
            ("word/header1.xml", part("Company header")),
        ] {
            zip.start_file(name, zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
        }
        zip.finish().unwrap();

        let doc = load(&path).unwrap();
        assert_eq!(doc.page_content, "Company header\n\nMain body\n\nPage footer");
    }

    #[test]
    fn test_extract_text_empty_body() {
        let xml = r#"<w:document xmlns:w="urn:w"><w:body/></w:document>"#;
        assert_eq!(extract_text(xml).unwrap(), "");
    }

    #[test]
    fn test_load_non_zip_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, "plain text pretending to be docx").unwrap();

        assert!(matches!(load(&path), Err(DocBotError::DocumentParse { .. })));
    }
}
