pub mod compute;
pub mod config;
pub mod economy;
pub mod entities;
pub mod render;
pub mod session;
pub mod starfield;
pub mod timer;
