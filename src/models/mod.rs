pub mod activity;
pub mod sample;
pub mod session;
