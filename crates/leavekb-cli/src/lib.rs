//! Terminal interface for LeaveKB

mod demo;
mod ui;


pub use demo::DEMO_QUERIES;
pub use ui::{
    display_banner, format_report, format_snippets, format_stats, print_help, read_query,
};

// Re-export core types
pub use leavekb_core::{Error, Result};
