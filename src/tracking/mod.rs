pub mod analytics;
pub mod daily;
pub mod timeline;
pub mod usage;
