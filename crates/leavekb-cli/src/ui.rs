//! UI utilities for the CLI

use colored::*;
use crossterm::terminal::size;
use std::io::{self, IsTerminal, Write};

use leavekb_core::{IngestionReport, KnowledgeStats, Result, Snippet};

const PROMPT: &str = "leavekb>";
const PREVIEW_CHARS: usize = 80;

/// Display startup banner
pub fn display_banner() {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = std::cmp::min(60, terminal_width.saturating_sub(4)).max(20);
    let border = "─".repeat(banner_width - 2);

    println!();
    println!("{}", format!("┌{}┐", border).blue());
    println!("  {}", "LeaveKB - Leave Policy Knowledge Base".blue().bold());
    println!();
    println!("  Ask about leave rules in your own words,");
    println!("  e.g. {}", "病假需要證明嗎".green());
    println!("{}", format!("└{}┘", border).blue());
    println!();
    println!(
        "{}",
        "💡 Tip: type 'help' for commands, 'exit' to quit".dimmed()
    );
    println!();
}

pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - Search the knowledge base", "<question>".green());
    println!("  {} - Show knowledge base statistics", "stats".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit", "exit/quit".green());
}

/// Read one query line, recording non-empty input in `history`.
///
/// Returns `None` at end of input.
pub fn read_query(history: &mut Vec<String>) -> Result<Option<String>> {
    if io::stdin().is_terminal() {
        print!("{} ", PROMPT.green().bold());
        io::stdout().flush()?;
    }

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }

    let input = input.trim().to_string();
    if !input.is_empty() {
        history.push(input.clone());
    }
    Ok(Some(input))
}

fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Render search results as numbered lines
pub fn format_snippets(snippets: &[Snippet]) -> String {
    if snippets.is_empty() {
        return "No relevant knowledge found.".to_string();
    }

    snippets
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "{}. [{}] {} (distance {:.3})",
                i + 1,
                s.category,
                preview(&s.content),
                s.distance
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_stats(stats: &KnowledgeStats) -> String {
    format!(
        "Collection '{}': {} documents",
        stats.collection_name, stats.document_count
    )
}

pub fn format_report(report: &IngestionReport) -> String {
    if report.replaced_previous {
        format!(
            "Replaced existing knowledge with {} documents",
            report.documents_indexed
        )
    } else {
        format!("Loaded {} documents", report.documents_indexed)
    }
}
