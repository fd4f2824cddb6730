//! Tracing output for the browser
//!
//! Formats events with `tracing-subscriber` and hands each finished line
//! to `console.log`. The browser has no system clock, so timestamps are
//! left off.

use std::io;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Install the global subscriber. Later calls are no-ops.
pub fn init() {
    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_ansi(false)
        .with_target(true)
        .with_writer(ConsoleMakeWriter)
        .with_filter(LevelFilter::INFO);

    let _ = tracing_subscriber::registry().with(layer).try_init();
}

/// Hands out one [`ConsoleWriter`] per formatted event
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::default()
    }
}

/// Collects one event and logs it when dropped
#[derive(Debug, Default)]
pub struct ConsoleWriter {
    line: Vec<u8>,
}

impl ConsoleWriter {
    fn take_line(&mut self) -> Option<String> {
        if self.line.is_empty() {
            return None;
        }
        let bytes = std::mem::take(&mut self.line);
        let text = String::from_utf8_lossy(&bytes);
        Some(text.trim_end_matches('\n').to_owned())
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.line.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(line) = self.take_line() {
            emit(&line);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(line: &str) {
    web_sys::console::log_1(&line.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(line: &str) {
    eprintln!("{}", line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_writer_collects_one_line() {
        let mut w = ConsoleWriter::default();
        w.write_all(b"INFO holiday_tree: scene ready").unwrap();
        w.write_all(b" items=5\n").unwrap();
        assert_eq!(w.take_line().as_deref(), Some("INFO holiday_tree: scene ready items=5"));
        assert_eq!(w.take_line(), None);
    }

    #[test]
    fn test_init_twice() {
        init();
        init();
        tracing::info!("logging initialized twice");
    }
}
