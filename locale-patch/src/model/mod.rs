pub mod key_path;
pub mod report;
