use std::io::{IsTerminal, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::args::ReportFormat;
use crate::progress::{ErrorEntry, ProgressCounts, ProgressState};

use super::OutputSink;
use super::format::{progress_line, render_json_report, render_text_report};

/// Stderr plus whether an in-place progress line is currently on it.
struct StatusLine {
    out: Box<dyn Write + Send>,
    live: bool,
    drawn: bool,
}

impl StatusLine {
    /// Ends an in-place progress line so the next output starts clean.
    fn finish(&mut self) -> std::io::Result<()> {
        if self.drawn {
            self.drawn = false;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn redraw(&mut self, line: &str, no_color: bool) -> std::io::Result<()> {
        queue!(self.out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        if no_color {
            queue!(self.out, Print(line))?;
        } else {
            queue!(self.out, SetForegroundColor(Color::Cyan), Print(line), ResetColor)?;
        }
        self.out.flush()?;
        self.drawn = true;
        Ok(())
    }

    fn print_line(&mut self, line: &str) -> std::io::Result<()> {
        self.finish()?;
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }
}

/// Bodies and the final report on stdout, progress and streamed errors on
/// stderr.
///
/// Each stream sits behind its own lock. When both are needed, stdout is
/// taken first.
pub struct ConsoleSink {
    format: ReportFormat,
    no_color: bool,
    stdout: Mutex<()>,
    stderr: Mutex<StatusLine>,
}

impl ConsoleSink {
    #[must_use]
    pub fn new(format: ReportFormat, no_color: bool) -> Self {
        let live = std::io::stderr().is_terminal();
        Self::with_stderr(format, no_color, live, Box::new(std::io::stderr()))
    }

    pub(crate) fn with_stderr(
        format: ReportFormat,
        no_color: bool,
        live: bool,
        stderr: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            format,
            no_color,
            stdout: Mutex::new(()),
            stderr: Mutex::new(StatusLine {
                out: stderr,
                live,
                drawn: false,
            }),
        }
    }

    fn stdout(&self) -> MutexGuard<'_, ()> {
        self.stdout.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stderr(&self) -> MutexGuard<'_, StatusLine> {
        self.stderr.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputSink for ConsoleSink {
    fn response_body(&self, body: &str) {
        let _stdout = self.stdout();
        if let Err(err) = self.stderr().finish() {
            tracing::debug!("Failed to end progress line: {}", err);
        }
        println!("{}", body);
    }

    fn failure(&self, worker: usize, entry: &ErrorEntry) {
        let line = format!("[worker {}] {}", worker, entry.message);
        if let Err(err) = self.stderr().print_line(&line) {
            tracing::debug!("Failed to print failure: {}", err);
        }
    }

    fn progress(&self, counts: &ProgressCounts) {
        let line = progress_line(counts);
        let mut stderr = self.stderr();
        let written = if stderr.live {
            stderr.redraw(&line, self.no_color)
        } else {
            stderr.print_line(&line)
        };
        if let Err(err) = written {
            tracing::debug!("Failed to draw progress line: {}", err);
        }
    }

    fn final_report(&self, state: &ProgressState) -> std::io::Result<()> {
        let report = match self.format {
            ReportFormat::Text => render_text_report(state),
            ReportFormat::Json => render_json_report(state)?,
        };
        let _stdout = self.stdout();
        self.stderr().finish()?;
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", report)?;
        out.flush()
    }
}
