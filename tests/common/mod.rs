//! Shared test fixtures

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTAINER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const NAV: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head><title>Contents</title></head>
<body><nav epub:type="toc"><ol><li><a href="chapter0.xhtml">Start</a></li></ol></nav></body>
</html>"#;

/// Body markup of a chapter, wrapped into a full XHTML document
pub fn chapter_document(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>Chapter</title></head>
<body>{}</body>
</html>"#,
        body
    )
}

/// Write a minimal EPUB 3 whose spine holds one document per chapter body
pub fn write_epub(dir: &Path, name: &str, bodies: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    zip.start_file("mimetype", stored).unwrap();
    zip.write_all(b"application/epub+zip").unwrap();

    zip.start_file("META-INF/container.xml", stored).unwrap();
    zip.write_all(CONTAINER.as_bytes()).unwrap();

    let mut manifest = String::from(
        r#"<item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>"#,
    );
    let mut spine = String::new();
    for (index, body) in bodies.iter().enumerate() {
        manifest.push_str(&format!(
            r#"<item id="chapter{i}" href="chapter{i}.xhtml" media-type="application/xhtml+xml"/>"#,
            i = index
        ));
        spine.push_str(&format!(r#"<itemref idref="chapter{}"/>"#, index));

        zip.start_file(format!("OEBPS/chapter{}.xhtml", index), stored)
            .unwrap();
        zip.write_all(chapter_document(body).as_bytes()).unwrap();
    }

    let opf = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:uuid:00000000-0000-4000-8000-000000000001</dc:identifier>
    <dc:title>The Autobiography of Benjamin Franklin</dc:title>
    <dc:language>en</dc:language>
    <meta property="dcterms:modified">2024-01-01T00:00:00Z</meta>
  </metadata>
  <manifest>{}</manifest>
  <spine>{}</spine>
</package>"#,
        manifest, spine
    );
    zip.start_file("OEBPS/content.opf", stored).unwrap();
    zip.write_all(opf.as_bytes()).unwrap();

    zip.start_file("OEBPS/nav.xhtml", stored).unwrap();
    zip.write_all(NAV.as_bytes()).unwrap();

    zip.finish().unwrap();
    path
}
