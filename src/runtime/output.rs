//! Destinations for user-facing progress output.

/// Receives progress lines for the user. Errors never go through a sink.
pub trait OutputSink {
    fn line(&mut self, text: &str);
}

/// Prints each line to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn line(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Discards everything (`--quiet`).
#[derive(Debug, Default)]
pub struct QuietSink;

impl OutputSink for QuietSink {
    fn line(&mut self, _text: &str) {}
}

/// Collects lines in memory.
impl OutputSink for Vec<String> {
    fn line(&mut self, text: &str) {
        self.push(text.to_string());
    }
}

/// Pick the sink for the `--quiet` flag.
pub fn sink_for(quiet: bool) -> Box<dyn OutputSink> {
    if quiet {
        Box::new(QuietSink)
    } else {
        Box::new(StdoutSink)
    }
}
