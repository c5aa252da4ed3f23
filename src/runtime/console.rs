use crate::runtime::job::{Job, JobStatus};
use crate::runtime::surface::Surface;
use console::Style;
use std::io;

const OUTPUT_INDENT: &str = "      ";

/// Styles applied to the different kinds of checklist lines.
#[derive(Debug, Clone)]
pub struct Palette {
    header: Style,
    waiting: Style,
    in_progress: Style,
    ok: Style,
    error: Style,
    output: Style,
}

impl Palette {
    pub fn new(colors: bool) -> Self {
        let base = Style::new().force_styling(colors);
        Self {
            header: base.clone().bold().white(),
            waiting: base.clone(),
            in_progress: base.clone().cyan(),
            ok: base.clone().green(),
            error: base.clone().red(),
            output: base.bold(),
        }
    }

    pub fn header(&self, text: &str) -> String {
        self.header.apply_to(text).to_string()
    }

    pub fn marker(&self, status: JobStatus) -> String {
        let style = match status {
            JobStatus::Waiting => &self.waiting,
            JobStatus::InProgress => &self.in_progress,
            JobStatus::Ok => &self.ok,
            JobStatus::Error => &self.error,
        };
        style.apply_to(status.marker()).to_string()
    }

    pub fn output_line(&self, text: &str) -> String {
        self.output
            .apply_to(format!("{OUTPUT_INDENT}{text}"))
            .to_string()
    }

    /// Red `ERROR:` prefix followed by the message.
    pub fn error_message(&self, message: &str) -> String {
        format!("{} {message}", self.error.apply_to("ERROR:"))
    }
}

/// Terminal checklist: a header, one line per job plus its output, and an
/// optional footer. Every change repaints the whole block in place.
pub struct Console<C, S: Surface> {
    header: String,
    jobs: Vec<Job<C>>,
    footer: Vec<String>,
    lines: Vec<String>,
    drawn_rows: usize,
    palette: Palette,
    surface: S,
}

impl<C, S: Surface> Console<C, S> {
    pub fn new(header: impl Into<String>, jobs: Vec<Job<C>>, surface: S) -> Self {
        let palette = Palette::new(surface.supports_color());
        Self::with_palette(header, jobs, surface, palette)
    }

    pub fn with_palette(
        header: impl Into<String>,
        jobs: Vec<Job<C>>,
        surface: S,
        palette: Palette,
    ) -> Self {
        Self {
            header: header.into(),
            jobs,
            footer: Vec::new(),
            lines: Vec::new(),
            drawn_rows: 0,
            palette,
            surface,
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn jobs(&self) -> &[Job<C>] {
        &self.jobs
    }

    pub(crate) fn job_mut(&mut self, index: usize) -> Option<&mut Job<C>> {
        self.jobs.get_mut(index)
    }

    /// Lines computed by the last [`Console::refresh`].
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Rows occupied on the surface by the last [`Console::render`].
    pub fn drawn_rows(&self) -> usize {
        self.drawn_rows
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Recomputes the display lines from the current job state.
    pub fn refresh(&mut self) {
        let mut lines = Vec::with_capacity(self.jobs.len() + 1 + self.footer.len());
        lines.push(self.palette.header(&self.header));

        for job in &self.jobs {
            lines.push(format!(
                " {} {}",
                self.palette.marker(job.status()),
                job.name()
            ));
            if !job.output().is_empty() {
                lines.extend(
                    job.output()
                        .split('\n')
                        .map(|segment| self.palette.output_line(segment)),
                );
            }
        }

        lines.extend(self.footer.iter().cloned());
        self.lines = lines;
    }

    /// Erases exactly what the previous render drew.
    pub fn clear(&mut self) -> io::Result<()> {
        self.surface.clear_last_rows(self.drawn_rows)?;
        self.drawn_rows = 0;
        Ok(())
    }

    /// Writes the current lines to the surface.
    pub fn render(&mut self) -> io::Result<()> {
        self.drawn_rows = self.surface.write_lines(&self.lines)?;
        Ok(())
    }

    /// Erase, recompute, repaint.
    pub fn redraw(&mut self) -> io::Result<()> {
        self.clear()?;
        self.refresh();
        self.render()
    }

    /// Sets the lines shown below the job list and repaints.
    pub fn set_footer(&mut self, footer: Vec<String>) -> io::Result<()> {
        self.footer = footer;
        self.redraw()
    }

    pub(crate) fn write_job_output(&mut self, index: usize, text: &str) -> io::Result<()> {
        self.clear()?;
        if let Some(job) = self.jobs.get_mut(index) {
            job.append_output(text);
        }
        self.refresh();
        self.render()
    }

    pub(crate) fn clear_job_output(&mut self, index: usize) -> io::Result<()> {
        self.clear()?;
        if let Some(job) = self.jobs.get_mut(index) {
            job.clear_output();
        }
        self.refresh();
        self.render()
    }

    /// Records `status` and repaints. The status sticks even if drawing fails.
    pub(crate) fn set_job_status(&mut self, index: usize, status: JobStatus) -> io::Result<()> {
        if let Some(job) = self.jobs.get_mut(index) {
            job.set_status(status);
        }
        self.clear()?;
        self.refresh();
        self.render()
    }
}
