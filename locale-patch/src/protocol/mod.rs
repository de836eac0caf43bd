use std::panic::UnwindSafe;
use std::path::{Component, Path, PathBuf};

use serde_json::{json, Value};
use tracing::debug;

use crate::config::Config;
use crate::model::key_path::KeyPath;
use crate::services::{locale, run, targets};

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn get_str<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(|v| v.as_str()).filter(|s| !s.is_empty())
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn invalid_json() -> String {
    json!({
        "status": "error",
        "message": "invalid json"
    })
    .to_string()
}

/// Request paths must stay under the configured root.
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Applies the optional overrides a request may carry on top of `base`.
fn config_with_overrides(base: &Config, payload: &Value) -> Result<Config, String> {
    let mut cfg = base.clone();

    if let Some(root) = get_str(payload, "root") {
        cfg.root = PathBuf::from(root);
    }
    if let Some(key_path) = get_str(payload, "key_path") {
        cfg.key_path = key_path.to_string();
    }
    if let Some(replacement) = payload.get("replacement").and_then(|v| v.as_str()) {
        cfg.replacement = replacement.to_string();
    }
    if let Some(locales) = payload.get("locales") {
        cfg.locales = serde_json::from_value(locales.clone())
            .map_err(|e| format!("payload.locales must be an array of strings: {e}"))?;
    }

    cfg.validate().map_err(|e| e.to_string())?;
    Ok(cfg)
}

pub fn handle(input: &str, base: &Config) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => return invalid_json(),
    };

    let id = get_id(&req);
    let cmd_str = get_cmd(&req);
    let payload = get_payload(&req);

    debug!(cmd = cmd_str, "request");

    match Command::from(cmd_str) {
        Command::Ping => ok(id, json!({ "message": "locale-patch alive" })),

        Command::Extract => {
            let Some(path) = get_str(payload, "path") else {
                return err(id, "payload.path is required");
            };
            let key_path = get_str(payload, "key_path").unwrap_or(&base.key_path);

            let key_path = match KeyPath::parse(key_path) {
                Ok(k) => k,
                Err(e) => return err(id, e.to_string()),
            };

            let path = Path::new(path);
            if !is_contained(path) {
                return err(id, "payload.path must be relative to the root");
            }

            match locale::extract_from_file(&base.root.join(path), &key_path) {
                Ok(value) => ok(id, json!({ "value": value })),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::Targets => match config_with_overrides(base, payload) {
            Ok(cfg) => ok(id, json!({ "targets": targets::build(&cfg) })),
            Err(e) => err(id, e),
        },

        Command::Run => {
            let cfg = match config_with_overrides(base, payload) {
                Ok(c) => c,
                Err(e) => return err(id, e),
            };
            match run::run(&cfg) {
                Ok(report) => ok(id, json!({ "report": report })),
                Err(e) => err(id, e.to_string()),
            }
        }

        Command::Unknown => err(id, "unknown command"),
    }
}

/// Runs `f`, turning a panic into an error response.
pub fn guarded<F>(f: F) -> String
where
    F: FnOnce() -> String + UnwindSafe,
{
    std::panic::catch_unwind(f).unwrap_or_else(|_| {
        json!({
            "status": "error",
            "message": "internal core error"
        })
        .to_string()
    })
}

/// Answers one raw line read from the client.
///
/// Returns `None` for blank lines; every other line gets exactly one response,
/// including lines that are not valid UTF-8.
pub fn serve_line(line: &[u8], base: &Config) -> Option<String> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    match std::str::from_utf8(line) {
        Ok(text) if text.trim().is_empty() => None,
        Ok(text) => Some(guarded(|| handle(text, base))),
        Err(_) => Some(invalid_json()),
    }
}
