//! Counter-style progress on stderr
//!
//! Renders `\r<done>/<total>` (or `\r<done>` when the total is unknown) each
//! time a candidate is handled.

use parking_lot::Mutex;
use std::io::{self, Write};

use crate::fetch_engine::ProgressReporter;

struct Counter {
    done: u64,
    total: Option<u64>,
    sink: Box<dyn Write + Send>,
}

impl Counter {
    fn render(&mut self, line: &str) {
        // Progress is best effort; a closed stderr must not fail the run.
        let _ = self.sink.write_all(line.as_bytes());
        let _ = self.sink.flush();
    }
}

/// Progress counter writing to a shared sink
///
/// Counting and rendering happen under one lock, so lines never go backwards.
pub struct CounterProgress {
    visible: bool,
    counter: Mutex<Counter>,
}

impl CounterProgress {
    /// Counter rendering to stderr when `visible`.
    #[must_use]
    pub fn stderr(visible: bool) -> Self {
        Self::with_sink(visible, Box::new(io::stderr()))
    }

    #[must_use]
    pub fn with_sink(visible: bool, sink: Box<dyn Write + Send>) -> Self {
        Self {
            visible,
            counter: Mutex::new(Counter {
                done: 0,
                total: None,
                sink,
            }),
        }
    }

    #[must_use]
    pub fn done(&self) -> u64 {
        self.counter.lock().done
    }
}

impl ProgressReporter for CounterProgress {
    fn report_started(&self, total: Option<u64>) {
        self.counter.lock().total = total.filter(|t| *t > 0);
    }

    fn report_advanced(&self) {
        let mut counter = self.counter.lock();
        counter.done += 1;
        if !self.visible {
            return;
        }
        let line = match counter.total {
            Some(total) => format!("\r{}/{total}", counter.done),
            None => format!("\r{}", counter.done),
        };
        counter.render(&line);
    }

    fn report_finished(&self) {
        if self.visible {
            self.counter.lock().render("\n");
        }
    }
}
