// Training verification log: page geometry, table content and DOCX rendering.
// Rendering is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod config;
pub mod docx;
pub mod table;

pub use config::{default_log_layout, LogLayout};
pub use docx::{log_file_name, render_training_log};
