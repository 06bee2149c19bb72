pub mod assets;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod level_manager;
pub mod levels;
pub mod menus;
pub mod progression;
pub mod session;
