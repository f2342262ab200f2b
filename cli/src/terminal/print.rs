use adminsweep_common::outcome::Classification;
use adminsweep_core::SweepReport;
use colored::*;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;

/// Writes a decoration line to stderr without tearing the progress bar.
///
/// Stdout is reserved for confirmed hosts.
pub fn print(msg: &str) {
    tracing_indicatif::suspend_tracing_indicatif(|| eprintln!("{msg}"));
}

pub fn banner(no_banner: bool, q_level: u8) {
    if no_banner || q_level > 0 {
        return;
    }

    let text_content: String = format!("⟦ ADMINSWEEP v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let text_width: usize = UnicodeWidthStr::width(text_content.as_str());
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═"
        .repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2)
        .bright_black();

    print(&format!("{sep}{text}{sep}"));
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR);
    print(&format!("{}", sep));
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}{}", space, msg, space));
}

pub fn summary_line(report: &SweepReport) -> String {
    let confirmed = format!("{} confirmed", report.count(Classification::Confirmed))
        .color(colors::PRIMARY)
        .bold();
    let denied = format!("{} denied", report.count(Classification::Denied)).color(colors::DENIED);
    let anomalous = format!("{} anomalous", report.count(Classification::Anomalous))
        .color(colors::ANOMALOUS);
    let elapsed = format!("{:.2}s", report.elapsed.as_secs_f64()).bold().yellow();

    let mut line = format!("Sweep complete: {confirmed}, {denied}, {anomalous}");
    if report.skipped > 0 {
        line.push_str(&format!(", {} skipped", report.skipped.to_string().color(colors::ACCENT)));
    }
    line.push_str(&format!(" in {elapsed}"));
    line
}

pub fn summary(report: &SweepReport, q_level: u8) {
    if q_level > 0 {
        return;
    }

    if report.confirmed().next().is_none() {
        header("no admin access found", q_level);
    }

    fat_separator();
    centerln(&summary_line(report).color(colors::TEXT_DEFAULT).to_string());
}

pub fn no_targets(q_level: u8) {
    header("zero targets resolved", q_level);
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
