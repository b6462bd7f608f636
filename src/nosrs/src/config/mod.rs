// nosrs/src/config/mod.rs

pub mod network;
pub mod props;
pub mod site;

pub use network::{CrsAction, CrsInfo, NetworkSettings};
pub use props::PropertyFile;
pub use site::SiteConfig;
