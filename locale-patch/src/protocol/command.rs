#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Extract,
    Targets,
    Run,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "locale.extract" | "extract" => Command::Extract,
            "locale.targets" | "targets" => Command::Targets,
            "run" => Command::Run,
            _ => Command::Unknown,
        }
    }
}
