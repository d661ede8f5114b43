//! Transcript views
//!
//! The dispatcher renders into a [`TranscriptView`]. Views are only ever
//! touched from the viewer's single task.

use std::collections::VecDeque;
use std::io::Write;

/// Default scrollback kept by [`MemoryView`]
pub const DEFAULT_SCROLLBACK: usize = 500;

/// Destination for rendered transcript lines
pub trait TranscriptView: Send {
    /// Append one rendered line to the end of the transcript
    fn append(&mut self, fragment: &str);

    /// Make the most recent line visible
    fn scroll_to_bottom(&mut self);
}

/// Writes each line to a terminal or other byte sink
///
/// Scrolling to the bottom flushes the writer.
pub struct TerminalView<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalView<std::io::Stdout> {
    /// View over the process's standard output
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TranscriptView for TerminalView<W> {
    fn append(&mut self, fragment: &str) {
        if let Err(e) = writeln!(self.out, "{}", fragment) {
            tracing::warn!(error = %e, "Failed to write transcript line");
        }
    }

    fn scroll_to_bottom(&mut self) {
        if let Err(e) = self.out.flush() {
            tracing::warn!(error = %e, "Failed to flush transcript");
        }
    }
}

/// In-memory transcript with bounded scrollback
#[derive(Debug, Clone)]
pub struct MemoryView {
    lines: VecDeque<String>,
    scrollback: usize,
    scrolls: usize,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::with_scrollback(DEFAULT_SCROLLBACK)
    }

    /// Keep at most `scrollback` lines, dropping the oldest first
    pub fn with_scrollback(scrollback: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            scrollback: scrollback.max(1),
            scrolls: 0,
        }
    }

    /// Lines currently held, oldest first
    pub fn lines(&self) -> Vec<&str> {
        self.lines.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of times the view was scrolled to the bottom
    pub fn scroll_count(&self) -> usize {
        self.scrolls
    }
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptView for MemoryView {
    fn append(&mut self, fragment: &str) {
        self.lines.push_back(fragment.to_string());
        while self.lines.len() > self.scrollback {
            self.lines.pop_front();
        }
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_view_appends_in_order() {
        let mut view = MemoryView::new();
        view.append("one");
        view.append("two");

        assert_eq!(view.lines(), vec!["one", "two"]);
        assert_eq!(view.scroll_count(), 0);
    }

    #[test]
    fn test_memory_view_scrollback() {
        let mut view = MemoryView::with_scrollback(2);
        view.append("a");
        view.append("b");
        view.append("c");

        assert_eq!(view.lines(), vec!["b", "c"]);
    }

    #[test]
    fn test_terminal_view_writes_lines() {
        let mut view = TerminalView::new(Vec::new());
        view.append("[09:05] alice: hi");
        view.append("[09:06] bob joined");
        view.scroll_to_bottom();

        let out = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(out, "[09:05] alice: hi\n[09:06] bob joined\n");
    }
}
