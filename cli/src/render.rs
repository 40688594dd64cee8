//! Terminal rendering of views. Every function reads its look from the
//! sheet currently in scope on the `StyleRegistry`.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use zoo_core::style::Accent;
use zoo_core::types::{cell_text, columns};
use zoo_core::{
    Level, League, ListView, LoadStatus, Notice, PaginationWindow, Record, StyleRegistry,
    StyleSheet,
};

const FALLBACK: StyleSheet = StyleSheet {
    view: "plain",
    accent: Accent::Blue,
    compact: false,
};

fn accent_color(accent: Accent) -> Color {
    match accent {
        Accent::Green => Color::Green,
        Accent::Blue => Color::Blue,
        Accent::Yellow => Color::Yellow,
        Accent::Magenta => Color::Magenta,
    }
}

fn header_cell(label: &str, sheet: StyleSheet) -> Cell {
    Cell::new(label)
        .fg(accent_color(sheet.accent))
        .add_attribute(Attribute::Bold)
}

fn styled_table(sheet: StyleSheet) -> Table {
    let mut table = Table::new();
    if sheet.compact {
        table.load_preset(UTF8_FULL_CONDENSED);
    } else {
        table.load_preset(UTF8_FULL);
    }
    table
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn active(styles: &StyleRegistry) -> StyleSheet {
    styles.active().unwrap_or(FALLBACK)
}

pub fn records_table(rows: &[Record], styles: &StyleRegistry) -> Table {
    let sheet = active(styles);
    let mut table = styled_table(sheet);
    let columns = columns(rows);
    table.set_header(columns.iter().map(|c| header_cell(c, sheet)).collect::<Vec<_>>());
    for row in rows {
        table.add_row(columns.iter().map(|c| Cell::new(cell_text(row, c))).collect::<Vec<_>>());
    }
    table
}

pub fn leagues_table(leagues: &[League], styles: &StyleRegistry) -> Table {
    let sheet = active(styles);
    let mut table = styled_table(sheet);
    table.set_header(
        ["League", "Sport", "Country", "Formed", "Website"]
            .into_iter()
            .map(|label| header_cell(label, sheet))
            .collect::<Vec<_>>(),
    );
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    for league in leagues {
        table.add_row(vec![
            Cell::new(text(&league.name)),
            Cell::new(text(&league.sport)),
            Cell::new(text(&league.country)),
            Cell::new(text(&league.formed_year)),
            Cell::new(text(&league.website)),
        ]);
    }
    table
}

/// `‹ 1 2 [3] 4 5 ›`, arrows only where a neighbour page exists.
pub fn pagination_line(window: &PaginationWindow) -> String {
    let mut parts = Vec::with_capacity(window.buttons.len() + 2);
    if window.show_previous {
        parts.push("‹".to_string());
    }
    for button in &window.buttons {
        if button.is_current {
            parts.push(format!("[{}]", button.label));
        } else {
            parts.push(button.label.to_string());
        }
    }
    if window.show_next {
        parts.push("›".to_string());
    }
    parts.join(" ")
}

pub fn notice_line(notice: &Notice) -> String {
    let tag = match notice.level {
        Level::Info => "info",
        Level::Success => "ok",
        Level::Warning => "warning",
        Level::Error => "error",
    };
    format!("{tag}: {notice}")
}

pub fn print_notice(notice: &Notice) {
    match notice.level {
        Level::Error | Level::Warning => eprintln!("{}", notice_line(notice)),
        Level::Info | Level::Success => println!("{}", notice_line(notice)),
    }
}

pub fn print_list(view: &ListView, styles: &StyleRegistry) {
    let state = view.state();
    let mut heading = format!("{} (page size {})", view.page().title(), state.page_size);
    if let Some(filter) = &state.filter {
        heading.push_str(&format!(", {} = \"{}\"", filter.field, filter.value));
    }
    println!("{heading}");

    match view.status() {
        LoadStatus::Idle => {}
        LoadStatus::Loading => println!("Loading..."),
        LoadStatus::Failed => {}
        LoadStatus::Loaded(_) => {
            if !view.rows().is_empty() {
                println!("{}", records_table(view.rows(), styles));
            }
            if let Some(window) = view.window() {
                println!("{}", pagination_line(&window));
            }
        }
    }
    if let Some(notice) = view.notice() {
        print_notice(notice);
    }
}
