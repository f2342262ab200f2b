use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn sweep_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg} [{bar:24.green/bright_black}] {pos}/{len} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICK_STRINGS)
        .progress_chars("━╸ ")
}

/// Turns `span` into a `probed/total` progress bar for the sweep.
pub fn init_sweep_progress(span: &Span, total: usize) {
    span.pb_set_style(&sweep_style());
    span.pb_set_length(total as u64);
    span.pb_set_message("Probing hosts");
}

pub fn report_probe_progress(span: &Span) {
    span.pb_inc(1);
}
