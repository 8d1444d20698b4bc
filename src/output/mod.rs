//! Terminal output styling for the planscope CLI
//!
//! All user-facing output of the binary goes through these helpers so the
//! palette stays consistent. Diagnostics go through `tracing` instead.

use owo_colors::OwoColorize;

/// Print a success message with a green checkmark
pub fn success(message: &str) {
    // Pastel mint green: RGB(152, 225, 152)
    println!(
        "{} {}",
        "✓".truecolor(152, 225, 152).bold(),
        message.bright_white()
    );
}

/// Print a warning message with a yellow warning symbol
pub fn warning(message: &str) {
    // Pastel cream/yellow: RGB(255, 230, 160)
    println!(
        "{} {}",
        "⚠".truecolor(255, 230, 160).bold(),
        message.bright_white()
    );
}

/// Print an info message with a blue info symbol
pub fn info(message: &str) {
    // Pastel sky blue: RGB(160, 200, 255)
    println!(
        "{} {}",
        "ℹ".truecolor(160, 200, 255).bold(),
        message.bright_white()
    );
}

/// Print a section header with a separator line
pub fn section(title: &str) {
    // Pastel lavender: RGB(181, 174, 254)
    println!("\n{}", title.truecolor(181, 174, 254).bold());
    println!("{}", "─".repeat(50).truecolor(160, 160, 160));
}

/// Print a small section header without separator
pub fn subsection(title: &str) {
    // Softer pastel teal: RGB(120, 180, 195)
    println!("\n{}", title.truecolor(120, 180, 195));
    println!("{}", "·".repeat(30).truecolor(160, 160, 160));
}

/// Print a key-value pair with styled key and value
pub fn key_value(key: &str, value: &str) {
    println!(
        "  {} {}",
        format!("{}:", key).truecolor(160, 160, 160),
        value.bright_white()
    );
}

/// Print a yes/no flag, highlighting the "yes" case
pub fn flag(key: &str, value: bool) {
    let styled_value = if value {
        "yes".truecolor(255, 230, 160).bold().to_string()
    } else {
        "no".truecolor(160, 160, 160).to_string()
    };
    println!("  {} {}", format!("{}:", key).truecolor(160, 160, 160), styled_value);
}

/// Print a count line in the given RGB color, skipping zero counts
pub fn count(label: &str, value: usize, color: (u8, u8, u8)) {
    if value == 0 {
        return;
    }
    let (r, g, b) = color;
    println!(
        "  {} {}",
        value.to_string().truecolor(r, g, b).bold(),
        label.truecolor(160, 160, 160)
    );
}

/// Print a change line prefixed with a colored symbol
pub fn change_line(indent: usize, symbol: &str, text: &str, color: (u8, u8, u8)) {
    let (r, g, b) = color;
    println!(
        "{}{} {}",
        "  ".repeat(indent),
        symbol.truecolor(r, g, b).bold(),
        text
    );
}

/// Print a bulleted list item
pub fn list_item(indent: usize, text: &str) {
    println!(
        "{}{} {}",
        "  ".repeat(indent + 1),
        "•".truecolor(160, 160, 160),
        text.bright_white()
    );
}

/// Print dimmed text
pub fn dimmed(message: &str) {
    println!("{}", message.truecolor(160, 160, 160));
}

/// Print a table header
pub fn table_header(columns: &[&str]) {
    let header = columns
        .iter()
        .map(|c| c.truecolor(120, 180, 195).bold().to_string())
        .collect::<Vec<_>>()
        .join(" │ ");
    println!("  {}", header);
    println!("  {}", "─".repeat(70).truecolor(160, 160, 160));
}

/// Print a table row
pub fn table_row(values: &[&str]) {
    let row = values
        .iter()
        .map(|v| v.bright_white().to_string())
        .collect::<Vec<_>>()
        .join(" │ ");
    println!("  {}", row);
}

/// Print a blank line for spacing
pub fn blank() {
    println!();
}
