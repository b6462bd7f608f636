// nosrs/src/lib.rs

pub mod cli;
pub mod config;
pub mod console;
pub mod constants;
pub mod reconfigure;

// Re-export commonly used types
pub use config::{NetworkSettings, PropertyFile, SiteConfig};
pub use console::{Console, ConsoleError, Credentials, Job, LocalConsole};
pub use reconfigure::{Reconfiguration, RunReport};
