use crate::consts::ENV_COLUMNS;
use comfy_table::presets::NOTHING;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;
use std::io::IsTerminal;

pub fn get_terminal_width() -> usize {
    static TERMINAL_WIDTH: std::sync::LazyLock<usize> = std::sync::LazyLock::new(|| {
        // 1. Check MODAI_COLUMNS
        if let Ok(w) = std::env::var(ENV_COLUMNS).map(|s| s.parse().unwrap_or(0))
            && w > 0
        {
            return w;
        }

        // 2. Check COLUMNS
        if let Ok(w) = std::env::var("COLUMNS").map(|s| s.parse().unwrap_or(0))
            && w > 0
        {
            return w;
        }

        // 3. System TTY
        if is_stdout_terminal()
            && let Ok((w, _)) = crossterm::terminal::size()
        {
            return w as usize;
        }

        80
    });

    *TERMINAL_WIDTH
}

pub fn is_stdout_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Borderless table sized to the terminal with a bold header row.
pub fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_width(table_width(get_terminal_width()))
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

/// Widths beyond what comfy-table can address are clamped, not wrapped.
pub fn table_width(columns: usize) -> u16 {
    u16::try_from(columns).unwrap_or(u16::MAX)
}

pub fn print_heading(title: &str) {
    if is_stdout_terminal() {
        println!("{}", title.bold());
    } else {
        println!("{}", title);
    }
}
