use std::collections::BTreeMap;

use crate::config::Config;

/// Maps every target locale file to the replacement text.
///
/// The result only depends on the configuration, never on what was
/// extracted from the source file.
pub fn build(cfg: &Config) -> BTreeMap<String, String> {
    cfg.target_locales()
        .into_iter()
        .map(|locale| (cfg.locale_file(locale), cfg.replacement.clone()))
        .collect()
}
