pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod net;
pub mod render;
pub mod ribbon;
