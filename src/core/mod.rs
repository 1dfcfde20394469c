pub mod command;
pub mod diagnose;
pub mod dispatcher;
pub mod exec;
pub mod registry;
pub mod text;
