use tracing::info;

use crate::config::Config;
use crate::error::LocaleError;
use crate::model::report::RunReport;
use crate::services::{hash, locale, targets};

pub fn run(cfg: &Config) -> Result<RunReport, LocaleError> {
    cfg.validate()?;

    let key_path = cfg.key_path()?;
    let source = cfg.source_path();

    // Extraction must succeed before any target is considered.
    let extracted = locale::extract_from_file(&source, &key_path)?;
    let targets = targets::build(cfg);

    info!(
        source = %source.display(),
        %key_path,
        targets = targets.len(),
        "built target mapping"
    );

    Ok(RunReport {
        source: source.to_string_lossy().to_string(),
        key_path: key_path.to_string(),
        extracted_sha256: hash::sha256_hex(&extracted),
        extracted,
        targets,
    })
}
