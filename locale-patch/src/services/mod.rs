pub mod encoding;
pub mod hash;
pub mod locale;
pub mod run;
pub mod targets;
