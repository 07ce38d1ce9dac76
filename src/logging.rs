//! `tracing` subscriber setup.
//!
//! In the browser, formatted events go to the developer console, one console call
//! per event, using the console method matching the event level.

use tracing::Level;

fn max_level() -> Level {
    if cfg!(debug_assertions) { Level::DEBUG } else { Level::INFO }
}

/// Install the global subscriber. Returns false if one was already installed.
pub fn init() -> bool {
    let builder = tracing_subscriber::fmt()
        .with_max_level(max_level())
        .with_target(false);

    #[cfg(target_arch = "wasm32")]
    let installed = builder
        .with_ansi(false)
        .without_time()
        .with_writer(console::ConsoleMakeWriter)
        .try_init()
        .is_ok();

    #[cfg(not(target_arch = "wasm32"))]
    let installed = builder.with_writer(std::io::stderr).try_init().is_ok();

    installed
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;
    use wasm_bindgen::JsValue;

    pub(super) struct ConsoleMakeWriter;

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter::new(Level::INFO)
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            ConsoleWriter::new(*meta.level())
        }
    }

    /// Buffers one formatted event and flushes it to the console on drop.
    pub(super) struct ConsoleWriter {
        level: Level,
        buffer: Vec<u8>,
    }

    impl ConsoleWriter {
        fn new(level: Level) -> Self {
            Self { level, buffer: Vec::new() }
        }
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            if self.buffer.is_empty() {
                return;
            }
            let text = String::from_utf8_lossy(&self.buffer);
            let line = JsValue::from_str(text.trim_end());
            if self.level == Level::ERROR {
                web_sys::console::error_1(&line);
            } else if self.level == Level::WARN {
                web_sys::console::warn_1(&line);
            } else if self.level == Level::INFO {
                web_sys::console::info_1(&line);
            } else {
                web_sys::console::debug_1(&line);
            }
        }
    }
}
