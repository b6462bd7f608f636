// nosrs/src/cli/mod.rs

pub mod reconfigure;

pub use reconfigure::reconfigure_project;
