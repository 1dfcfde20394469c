pub mod call;
pub mod config;
pub mod debug;
pub mod list;
pub mod read;
pub mod verify;
