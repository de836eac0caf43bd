use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::UTF_8;
use tracing::debug;

use crate::error::LocaleError;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Decodes locale file bytes as strict UTF-8, dropping a leading BOM.
pub fn decode_utf8(path: &Path, bytes: &[u8]) -> Result<String, LocaleError> {
    if bytes.starts_with(&UTF8_BOM) {
        debug!(path = %path.display(), "stripping utf-8 bom");
    }

    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(LocaleError::Encoding {
            path: path.to_path_buf(),
            detected: guess(bytes),
        });
    }

    Ok(text.into_owned())
}

/// Best guess at the encoding of `bytes`, lowercased (e.g. `windows-1252`).
pub fn guess(bytes: &[u8]) -> String {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true).name().to_lowercase()
}
