use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::filter::IndicatifFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{FormatEvent, FormattedFields};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use crate::terminal::colors;

/// Glyph-prefixed event lines. With `show_scope`, the enclosing spans are
/// printed first, e.g. `[*] sweep:probe{host=ws01}: ...`.
pub struct SweepFormatter {
    show_scope: bool,
}

impl SweepFormatter {
    pub fn new(show_scope: bool) -> Self {
        Self { show_scope }
    }
}

impl<S, N> FormatEvent<S, N> for SweepFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match *meta.level() {
            Level::TRACE => ("[ ]", |s| s.dimmed()),
            Level::DEBUG => ("[?]", |s| s.color(colors::DENIED)),
            Level::INFO => ("[+]", |s| s.color(colors::PRIMARY).bold()),
            Level::WARN => ("[*]", |s| s.color(colors::ANOMALOUS).bold()),
            Level::ERROR => ("[-]", |s| s.red().bold()),
        };

        write!(writer, "{} ", color_func(symbol.into()))?;

        let scope = if self.show_scope { ctx.event_scope() } else { None };
        if let Some(scope) = scope {
            for span in scope.from_root() {
                write!(writer, "{}", span.name().color(colors::SEPARATOR))?;
                let extensions = span.extensions();
                let fields: Vec<&str> = extensions
                    .get::<FormattedFields<N>>()
                    .map(|fields| {
                        fields
                            .split(' ')
                            .filter(|field| !field.is_empty() && !field.starts_with("indicatif."))
                            .collect()
                    })
                    .unwrap_or_default();
                if !fields.is_empty() {
                    write!(writer, "{}", format!("{{{}}}", fields.join(" ")).as_str().color(colors::SEPARATOR))?;
                }
                write!(writer, "{}", ":".color(colors::SEPARATOR))?;
            }
            write!(writer, " ")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(verbose: u8, quiet: u8) -> &'static str {
    match (quiet, verbose) {
        (1.., _) => "warn",
        (0, 0) => "info",
        (0, 1) => "debug",
        (0, 2..) => "trace",
    }
}

/// Installs the global subscriber: formatted events on stderr, drawn above
/// the progress bar of any span carrying `indicatif.pb_show`.
pub fn init_logging(verbose: u8, quiet: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let indicatif_layer = IndicatifLayer::new();
    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(SweepFormatter::new(verbose > 0 && quiet == 0))
        .with_writer(indicatif_layer.get_stderr_writer());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(indicatif_layer.with_filter(IndicatifFilter::new(false)))
        .init();
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn render(show_scope: bool) -> String {
        colored::control::set_override(false);
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .event_format(SweepFormatter::new(show_scope))
            .with_writer(move || writer.clone())
            .with_max_level(Level::TRACE)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let sweep = tracing::info_span!("sweep", indicatif.pb_show = true);
            let _sweep = sweep.enter();
            let probe = tracing::debug_span!("probe", host = %"ws01");
            let _probe = probe.enter();
            tracing::warn!("Probe against ws01 failed: The RPC server is unavailable.");
        });

        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn events_carry_a_level_glyph() {
        assert_eq!(
            render(false),
            "[*] Probe against ws01 failed: The RPC server is unavailable.\n"
        );
    }

    #[test]
    fn scope_names_the_probed_host_without_progress_fields() {
        assert_eq!(
            render(true),
            "[*] sweep:probe{host=ws01}: Probe against ws01 failed: The RPC server is unavailable.\n"
        );
    }

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(default_directive(0, 0), "info");
        assert_eq!(default_directive(1, 0), "debug");
        assert_eq!(default_directive(5, 0), "trace");
        assert_eq!(default_directive(2, 1), "warn");
    }
}
