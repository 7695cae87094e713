mod captions;
pub mod cli;
pub mod commands;
pub mod config;
mod ffmpeg;
mod language;
pub mod layout;
mod manifest;
mod pipeline;
mod srt;
mod workspace;
mod zoom;

pub use cli::BookCommands;
pub use commands::handle_book_command;
