use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub source: String,
    pub key_path: String,
    pub extracted: String,
    pub extracted_sha256: String,

    /// target file path -> replacement text
    pub targets: BTreeMap<String, String>,
}
