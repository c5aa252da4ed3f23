//! Output targets the console paints on: the real terminal, or an in-memory
//! recorder used by tests and non-interactive callers.

use console::{measure_text_width, Term};
use std::io;

/// Something the checklist can be drawn on and erased from.
pub trait Surface {
    /// Erases the last `rows` terminal rows and leaves the cursor at the start
    /// of the first erased row.
    fn clear_last_rows(&mut self, rows: usize) -> io::Result<()>;

    /// Writes each line followed by a line break and returns how many rows the
    /// lines occupy once wrapped.
    fn write_lines(&mut self, lines: &[String]) -> io::Result<usize>;

    /// Whether styling escape codes are understood by this surface.
    fn supports_color(&self) -> bool {
        false
    }
}

/// Draws on the process' standard output through [`console::Term`].
#[derive(Debug, Clone)]
pub struct TermSurface {
    term: Term,
}

impl TermSurface {
    pub fn stdout() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    fn columns(&self) -> Option<usize> {
        self.term
            .size_checked()
            .map(|(_, cols)| cols as usize)
            .filter(|cols| *cols > 0)
    }
}

impl Surface for TermSurface {
    fn clear_last_rows(&mut self, rows: usize) -> io::Result<()> {
        if rows == 0 || !self.term.is_term() {
            return Ok(());
        }
        self.term.clear_last_lines(rows)
    }

    fn write_lines(&mut self, lines: &[String]) -> io::Result<usize> {
        let columns = self.columns();
        let mut rows = 0;
        for line in lines {
            self.term.write_line(line)?;
            rows += wrapped_rows(line, columns);
        }
        self.term.flush()?;
        Ok(rows)
    }

    fn supports_color(&self) -> bool {
        self.term.features().colors_supported()
    }
}

/// Number of terminal rows `line` occupies at the given width.
pub fn wrapped_rows(line: &str, columns: Option<usize>) -> usize {
    let width = measure_text_width(line);
    match columns {
        Some(columns) if width > columns => width.div_ceil(columns),
        _ => 1,
    }
}

/// A single operation recorded by [`MemorySurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    Clear(usize),
    Write(Vec<String>),
}

/// Keeps every operation in memory and mirrors what a terminal would show.
#[derive(Debug, Default, Clone)]
pub struct MemorySurface {
    ops: Vec<SurfaceOp>,
    screen: Vec<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Lines currently visible, after all erasures.
    pub fn screen(&self) -> &[String] {
        &self.screen
    }

    /// The most recent block of lines written.
    pub fn last_frame(&self) -> Option<&[String]> {
        self.ops.iter().rev().find_map(|op| match op {
            SurfaceOp::Write(lines) => Some(lines.as_slice()),
            SurfaceOp::Clear(_) => None,
        })
    }
}

impl Surface for MemorySurface {
    fn clear_last_rows(&mut self, rows: usize) -> io::Result<()> {
        if rows > self.screen.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "cannot erase {rows} rows, only {} on screen",
                    self.screen.len()
                ),
            ));
        }
        self.screen.truncate(self.screen.len() - rows);
        self.ops.push(SurfaceOp::Clear(rows));
        Ok(())
    }

    fn write_lines(&mut self, lines: &[String]) -> io::Result<usize> {
        self.screen.extend(lines.iter().cloned());
        self.ops.push(SurfaceOp::Write(lines.to_vec()));
        Ok(lines.len())
    }
}
