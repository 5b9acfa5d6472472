//! Terminal output styling for the tfplan binary
//!
//! Colors follow the pastel palette used for update types.

use owo_colors::OwoColorize;

use tfplan::{PlanSummary, ResourceChange, UpdateType};

/// Brighter grey used for secondary text: RGB(160, 160, 160)
const GREY: (u8, u8, u8) = (160, 160, 160);

/// Print an error message with a red X
pub fn error(message: &str) {
    // Pastel coral/salmon: RGB(255, 160, 160)
    eprintln!(
        "{} {}",
        "✗".truecolor(255, 160, 160).bold(),
        message.bright_white()
    );
}

/// Print a success message with a green checkmark
pub fn success(message: &str) {
    // Pastel mint green: RGB(152, 225, 152)
    println!(
        "{} {}",
        "✓".truecolor(152, 225, 152).bold(),
        message.bright_white()
    );
}

/// Print a section header with a separator line
pub fn section(title: &str) {
    // Pastel lavender: RGB(181, 174, 254)
    println!("\n{}", title.truecolor(181, 174, 254).bold());
    println!("{}", "─".repeat(50).truecolor(GREY.0, GREY.1, GREY.2));
}

/// Print one resource with its update type symbol and label
pub fn resource_line(resource: &ResourceChange) {
    let (r, g, b) = resource.update_type.color();
    let tainted = if resource.tainted { " (tainted)" } else { "" };

    println!(
        "  {} {} {}",
        resource.update_type.symbol().truecolor(r, g, b).bold(),
        resource.address.bright_white(),
        format!("{}{}", resource.update_type.label(), tainted).truecolor(GREY.0, GREY.1, GREY.2)
    );

    let forced = resource.forces_replacement();
    if !forced.is_empty() {
        println!(
            "      {} {}",
            "forced by:".truecolor(GREY.0, GREY.1, GREY.2),
            forced.join(", ").truecolor(181, 174, 254)
        );
    }
}

/// Count phrases of a summary, e.g. `+1 to add`; empty without changes
pub fn summary_parts(summary: &PlanSummary) -> Vec<(UpdateType, String)> {
    let counts = [
        (UpdateType::New, summary.to_add, "to add"),
        (UpdateType::UpdateInPlace, summary.to_change, "to change"),
        (UpdateType::ForceReplace, summary.to_replace, "to replace"),
        (UpdateType::Destroy, summary.to_destroy, "to destroy"),
        (UpdateType::Read, summary.to_read, "to read"),
    ];

    counts
        .into_iter()
        .filter(|(_, count, _)| *count > 0)
        .map(|(update_type, count, text)| {
            (update_type, format!("{}{} {}", update_type.symbol(), count, text))
        })
        .collect()
}

/// Print the plan summary line
pub fn summary(summary: &PlanSummary) {
    let parts = summary_parts(summary);
    if parts.is_empty() {
        success("No changes.");
        return;
    }

    let styled = parts
        .iter()
        .map(|(update_type, text)| {
            let (r, g, b) = update_type.color();
            text.truecolor(r, g, b).bold().to_string()
        })
        .collect::<Vec<_>>()
        .join(&", ".truecolor(GREY.0, GREY.1, GREY.2).to_string());
    println!("  {}", styled);
}
