pub mod config;
pub mod layout;
pub mod shell;
pub mod widgets;
