//! Spinner for the run and a log writer that keeps it intact.

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use alchemy_core::AssetOutcome;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::fmt::MakeWriter;

fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

pub(crate) fn should_use_spinner(
    stderr_is_terminal: bool,
    quiet: bool,
    dumb_terminal: bool,
) -> bool {
    stderr_is_terminal && !quiet && !dumb_terminal
}

/// Builds the run spinner, hidden when [`should_use_spinner`] says so.
///
/// The spinner does not tick until [`start`] is called.
pub(crate) fn run_spinner(quiet: bool) -> ProgressBar {
    if !should_use_spinner(io::stderr().is_terminal(), quiet, is_dumb_terminal()) {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{pos}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar
}

pub(crate) fn start(bar: &ProgressBar) {
    bar.set_message("fetching element page");
    bar.enable_steady_tick(Duration::from_millis(100));
}

/// Advances the spinner after one element's icon was processed.
pub(crate) fn record_icon(bar: &ProgressBar, id: &str, outcome: &AssetOutcome) {
    bar.inc(1);
    let verb = match outcome {
        AssetOutcome::Downloaded { .. } => "downloaded",
        AssetOutcome::Skipped(_) => "skipped",
        AssetOutcome::Failed { .. } => "failed",
    };
    bar.set_message(format!("icons: {verb} {id}"));
}

/// `MakeWriter` that clears the spinner around every log line.
pub(crate) struct ProgressAwareWriter<M> {
    bar: ProgressBar,
    inner: M,
}

impl<M> ProgressAwareWriter<M> {
    pub(crate) fn new(bar: ProgressBar, inner: M) -> Self {
        Self { bar, inner }
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for ProgressAwareWriter<M> {
    type Writer = SuspendingWrite<'a, M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendingWrite {
            bar: &self.bar,
            inner: self.inner.make_writer(),
        }
    }
}

pub(crate) struct SuspendingWrite<'a, W> {
    bar: &'a ProgressBar,
    inner: W,
}

impl<W: Write> Write for SuspendingWrite<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Self { bar, inner } = self;
        bar.suspend(|| inner.write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let Self { bar, inner } = self;
        bar.suspend(|| inner.write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use alchemy_core::icons::SkipReason;

    #[test]
    fn test_quiet_spinner_is_hidden() {
        assert!(run_spinner(true).is_hidden());
    }

    #[test]
    fn test_spinner_only_on_interactive_stderr() {
        assert!(should_use_spinner(true, false, false));
        assert!(!should_use_spinner(false, false, false));
        assert!(!should_use_spinner(true, true, false));
        assert!(!should_use_spinner(true, false, true));
    }

    #[test]
    fn test_log_lines_pass_through_to_inner_writer() {
        let writer = ProgressAwareWriter::new(ProgressBar::hidden(), Mutex::new(Vec::new()));

        writer
            .make_writer()
            .write_all(b"WARN icon download failed\n")
            .unwrap();
        writer.make_writer().write_all(b"INFO done\n").unwrap();

        let written = writer.inner.lock().unwrap();
        assert_eq!(
            String::from_utf8_lossy(&written),
            "WARN icon download failed\nINFO done\n"
        );
    }

    #[test]
    fn test_record_icon_advances_and_labels() {
        let bar = ProgressBar::hidden();
        record_icon(&bar, "air", &AssetOutcome::Downloaded { bytes: 3 });
        record_icon(&bar, "fire", &AssetOutcome::Skipped(SkipReason::Cached));

        assert_eq!(bar.position(), 2);
        assert_eq!(bar.message(), "icons: skipped fire");
    }
}
