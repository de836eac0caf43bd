use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::LocaleError;
use crate::model::key_path::KeyPath;

pub const CONFIG_FILE: &str = "locale-patch.json";
pub const ENV_CONFIG: &str = "LOCALE_PATCH_CONFIG";
pub const ENV_ROOT: &str = "LOCALE_PATCH_ROOT";

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_locale_path() -> String {
    "public/locales".to_string()
}

fn default_source_locale() -> String {
    "pt".to_string()
}

fn default_locales() -> Vec<String> {
    ["pt", "en", "zh", "hi", "ru"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_namespace() -> String {
    "common".to_string()
}

fn default_key_path() -> String {
    "seo.faq.what_is_answer".to_string()
}

fn default_replacement() -> String {
    "cortar carrossel".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default = "default_locale_path", alias = "localePath")]
    pub locale_path: String,

    #[serde(default = "default_source_locale", alias = "defaultLocale")]
    pub source_locale: String,

    #[serde(default = "default_locales")]
    pub locales: Vec<String>,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_key_path")]
    pub key_path: String,

    #[serde(default = "default_replacement")]
    pub replacement: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            locale_path: default_locale_path(),
            source_locale: default_source_locale(),
            locales: default_locales(),
            namespace: default_namespace(),
            key_path: default_key_path(),
            replacement: default_replacement(),
        }
    }
}

fn locale_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z]{2,3}(-[A-Za-z0-9]{2,8})*$").unwrap_or_else(|e| panic!("locale regex: {e}"))
    })
}

impl Config {
    /// Defaults, then `$LOCALE_PATCH_CONFIG` or `<cwd>/locale-patch.json`, then `$LOCALE_PATCH_ROOT`.
    ///
    /// `env` looks up a variable; a relative config path resolves against `cwd`.
    pub fn load_from<F>(env: F, cwd: &Path) -> Result<Self, LocaleError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let file = env(ENV_CONFIG)
            .map(|p| cwd.join(p))
            .or_else(|| {
                let p = cwd.join(CONFIG_FILE);
                p.exists().then_some(p)
            });

        let mut cfg = match file {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(root) = env(ENV_ROOT) {
            cfg.root = PathBuf::from(root);
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, LocaleError> {
        let data = fs::read_to_string(path).map_err(|source| LocaleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config file");

        serde_json::from_str(&data).map_err(|e| {
            LocaleError::config(format!("invalid {}: {e}", path.display()))
        })
    }

    pub fn validate(&self) -> Result<(), LocaleError> {
        KeyPath::parse(&self.key_path)?;

        if self.namespace.trim().is_empty() {
            return Err(LocaleError::config("namespace must not be empty"));
        }

        let re = locale_code_re();
        for locale in &self.locales {
            if !re.is_match(locale) {
                return Err(LocaleError::config(format!("invalid locale code {locale:?}")));
            }
        }

        if !self.locales.iter().any(|l| l == &self.source_locale) {
            return Err(LocaleError::config(format!(
                "source locale {:?} is not in locales",
                self.source_locale
            )));
        }

        if self.replacement.trim().is_empty() {
            warn!("replacement text is empty");
        }

        Ok(())
    }

    pub fn key_path(&self) -> Result<KeyPath, LocaleError> {
        KeyPath::parse(&self.key_path)
    }

    /// Path of `locale`'s file relative to `root`, with forward slashes.
    pub fn locale_file(&self, locale: &str) -> String {
        format!(
            "{}/{}/{}.json",
            self.locale_path.trim_end_matches('/'),
            locale,
            self.namespace
        )
    }

    pub fn source_path(&self) -> PathBuf {
        self.root.join(self.locale_file(&self.source_locale))
    }

    /// Configured locales other than the source, in order, without duplicates.
    pub fn target_locales(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.locales.len());
        for locale in &self.locales {
            if locale != &self.source_locale && !out.contains(&locale.as_str()) {
                out.push(locale);
            }
        }
        out
    }
}
