use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod model;
mod protocol;
mod services;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "locale-patch", version, about = "Read a locale key and plan its replacement across locales")]
struct Cli {
    /// Directory containing `public/locales` (overrides LOCALE_PATCH_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Answer JSON requests line by line on stdin
    Serve,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn serve<R: BufRead, W: Write>(mut input: R, mut output: W, cfg: &Config) {
    let mut line = Vec::new();

    loop {
        line.clear();
        match input.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }

        let Some(response) = protocol::serve_line(&line, cfg) else {
            continue;
        };

        if writeln!(output, "{response}").is_err() {
            break;
        }

        let _ = output.flush();
    }
}

/// Config from the environment, with `--root` applied last.
fn resolve_config<F>(cli_root: Option<PathBuf>, env: F, cwd: &Path) -> Result<Config, error::LocaleError>
where
    F: Fn(&str) -> Option<OsString>,
{
    let mut cfg = Config::load_from(env, cwd)?;
    if let Some(root) = cli_root {
        cfg.root = root;
    }
    Ok(cfg)
}

fn run_once(cfg: &Config) -> Result<(), error::LocaleError> {
    let report = services::run::run(cfg)?;
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| error::LocaleError::config(format!("failed to serialize report: {e}")))?;
    println!("{json}");
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let cfg = match resolve_config(cli.root, |key| std::env::var_os(key), Path::new(".")) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("locale-patch: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Some(Cmd::Serve) => {
            serve(io::stdin().lock(), io::stdout().lock(), &cfg);
            ExitCode::SUCCESS
        }
        None => match run_once(&cfg) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("locale-patch: {e}");
                ExitCode::FAILURE
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    use serde_json::Value;

    fn env_root(root: &str) -> impl Fn(&str) -> Option<OsString> + '_ {
        move |key| (key == config::ENV_ROOT).then(|| OsString::from(root))
    }

    #[test]
    fn cli_root_wins_over_env_root() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = resolve_config(Some(PathBuf::from("/from/cli")), env_root("/from/env"), dir.path())
            .unwrap();
        assert_eq!(cfg.root, Path::new("/from/cli"));

        let cfg = resolve_config(None, env_root("/from/env"), dir.path()).unwrap();
        assert_eq!(cfg.root, Path::new("/from/env"));
    }

    #[test]
    fn parses_serve_and_global_root() {
        let cli = Cli::try_parse_from(["locale-patch", "serve", "--root", "site"]).unwrap();
        assert!(matches!(cli.command, Some(Cmd::Serve)));
        assert_eq!(cli.root, Some(PathBuf::from("site")));

        let cli = Cli::try_parse_from(["locale-patch"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.root.is_none());
    }

    #[test]
    fn serve_answers_every_request_line() {
        let dir = tempfile::tempdir().unwrap();
        let pt = dir.path().join("public/locales/pt");
        fs::create_dir_all(&pt).unwrap();
        fs::write(pt.join("common.json"), r#"{"seo":{"faq":{"what_is_answer":"X"}}}"#).unwrap();
        let cfg = Config {
            root: dir.path().to_path_buf(),
            ..Config::default()
        };

        let input = b"\xff\xfe\n\n{\"id\":1,\"cmd\":\"ping\"}\n{\"id\":2,\"cmd\":\"run\"}".to_vec();
        let mut output = Vec::new();
        serve(Cursor::new(input), &mut output, &cfg);

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["message"], "invalid json");
        assert_eq!(lines[1]["id"], 1);
        assert_eq!(lines[2]["id"], 2);
        assert_eq!(lines[2]["payload"]["report"]["extracted"], "X");
    }
}
