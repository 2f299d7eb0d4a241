use std::cell::Cell;
use std::fmt;
use std::time::{Duration, Instant};

use crate::Summary;
use crate::format::{compose_note, indent, round_to_millis, suffix};
use crate::output::Output;

/// State of the line a task's banner lives on.
///
/// Moves forward only: `Pending`/`Open` become `Closed` on the first flush
/// and stay there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line {
    /// Quiet task whose banner has not been printed.
    Pending,
    /// Banner printed, line still open for a same-line completion.
    Open,
    /// Banner terminated. Completion must repeat the description.
    Closed,
}

/// A timed unit of work, handed to the function a spec runs.
///
/// The handle lives only for the duration of that call. Use it to attach
/// notes, print interstitial lines, or start subtasks by passing it as the
/// parent of another [`Spec`](crate::Spec).
pub struct Task<'a> {
    parent: Option<&'a Task<'a>>,
    description: String,
    depth: usize,
    quiet: bool,
    output: Output,

    line: Cell<Line>,
    start: Instant,
    end: Option<Instant>,
    notes: Vec<String>,
}

impl fmt::Debug for Task<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("description", &self.description)
            .field("depth", &self.depth)
            .field("quiet", &self.quiet)
            .field("line", &self.line.get())
            .field("notes", &self.notes)
            .finish_non_exhaustive()
    }
}

impl<'a> Task<'a> {
    /// Builds an unstarted task. The output target falls back to the
    /// parent's, then to stdout.
    pub(crate) fn new(
        description: String, parent: Option<&'a Task<'a>>, quiet: bool, output: Option<Output>,
    ) -> Self {
        let output = output
            .or_else(|| parent.map(|p| p.output.clone()))
            .unwrap_or_else(Output::stdout);
        Self {
            parent,
            description,
            depth: parent.map_or(0, |p| p.depth + 1),
            quiet,
            output,
            line: Cell::new(if quiet { Line::Pending } else { Line::Open }),
            start: Instant::now(),
            end: None,
            notes: Vec::new(),
        }
    }

    pub(crate) fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
        self.line.set(if quiet { Line::Pending } else { Line::Open });
    }

    pub(crate) fn set_output(&mut self, output: Output) {
        self.output = output;
    }

    /// Runs `f` between start and end, returning its value and a summary.
    ///
    /// Every run surface goes through here.
    pub(crate) fn execute<T, E>(
        mut self, f: impl FnOnce(&mut Task<'a>) -> (T, Result<(), E>),
    ) -> (T, Summary<E>) {
        self.start();
        let (value, result) = f(&mut self);
        let end = self.end(result.is_err());
        let summary = Summary {
            start: self.start,
            end,
            result,
        };
        (value, summary)
    }

    fn start(&mut self) {
        if !self.quiet {
            if let Some(parent) = self.parent {
                parent.flush();
            }
            self.write(self.depth, format_args!("{}...", self.description));
        }
        self.start = Instant::now();
        crate::diag!(
            debug,
            description = %self.description,
            depth = self.depth,
            quiet = self.quiet,
            "task started"
        );
    }

    fn end(&mut self, failed: bool) -> Instant {
        let end = Instant::now();
        self.end = Some(end);

        let duration = round_to_millis(end - self.start);
        let status = if failed { "failed" } else { "done" };
        let suffix = suffix(duration, &self.notes);

        match (self.line.get(), failed) {
            (Line::Closed, _) => {
                self.write(
                    self.depth,
                    format_args!("{}... {status}. {suffix}\n", self.description),
                );
            }
            (Line::Pending, true) => {
                if let Some(parent) = self.parent {
                    parent.flush();
                }
                self.write(
                    self.depth,
                    format_args!("{}... {status}. {suffix}\n", self.description),
                );
            }
            (Line::Pending, false) => {}
            (Line::Open, _) => self.write(0, format_args!(" {status}. {suffix}\n")),
        }

        crate::diag!(
            debug,
            description = %self.description,
            depth = self.depth,
            duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            failed,
            "task ended"
        );
        end
    }

    /// Terminates this task's banner line so another write can follow on a
    /// line of its own. Ancestors are flushed first. No-op once flushed.
    pub(crate) fn flush(&self) {
        let line = self.line.get();
        if line == Line::Closed {
            return;
        }
        if let Some(parent) = self.parent {
            parent.flush();
        }
        match line {
            Line::Pending => self.write(self.depth, format_args!("{}...\n", self.description)),
            Line::Open => self.write(0, format_args!("\n")),
            Line::Closed => {}
        }
        self.line.set(Line::Closed);
        crate::diag!(debug, description = %self.description, depth = self.depth, "task flushed");
    }

    fn write(&self, depth: usize, args: fmt::Arguments<'_>) {
        if depth > 0 {
            self.output.write(format_args!("{}{}", indent(depth), args));
        } else {
            self.output.write(args);
        }
    }

    /// Prints a line beneath the task, one level deeper than its banner.
    ///
    /// The banner is flushed first so the message never shares its line.
    ///
    /// ```rust
    /// # use std::cell::RefCell;
    /// # use std::rc::Rc;
    /// # use timed_task::{Output, Spec};
    /// # let buf = Rc::new(RefCell::new(Vec::new()));
    /// let retries = 3;
    /// Spec::new("Downloading")
    /// #   .output(Output::shared(buf.clone()))
    ///     .run(|task| {
    ///         task.log(format_args!("Download took {} retries.", retries));
    ///         Ok::<_, std::io::Error>(())
    ///     })?;
    /// # let out = String::from_utf8_lossy(&buf.borrow()).into_owned();
    /// # assert!(out.starts_with("Downloading...\n  Download took 3 retries.\nDownloading... done. ("));
    /// # Ok::<_, std::io::Error>(())
    /// ```
    pub fn log(&self, message: impl fmt::Display) {
        let mut message = message.to_string();
        if !message.ends_with('\n') {
            message.push('\n');
        }
        self.flush();
        self.write(self.depth + 1, format_args!("{message}"));
    }

    /// Appends a note to the completion line. Empty notes are discarded.
    ///
    /// A recorded note flushes the banner, so the completion line repeats
    /// the description.
    pub fn add_note(&mut self, note: impl AsRef<str>) {
        self.push_note(None, note.as_ref());
    }

    /// Appends a note rendered as `label: note`. Empty notes are discarded
    /// whatever the label.
    pub fn add_note_with_label(&mut self, label: impl AsRef<str>, note: impl AsRef<str>) {
        self.push_note(Some(label.as_ref()), note.as_ref());
    }

    fn push_note(&mut self, label: Option<&str>, note: &str) {
        if self.end.is_some() {
            crate::diag!(trace, description = %self.description, "note added after task ended");
            return;
        }
        match compose_note(label, note) {
            Some(note) => {
                self.flush();
                self.notes.push(note);
            }
            None => crate::diag!(trace, description = %self.description, "empty note dropped"),
        }
    }

    /// Time spent so far, or the total once the task has ended.
    pub fn duration(&self) -> Duration {
        match self.end {
            Some(end) => end - self.start,
            None => self.start.elapsed(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Nesting depth, 0 for root tasks.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Notes recorded so far, in insertion order.
    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    #[cfg(test)]
    pub(crate) fn line(&self) -> Line {
        self.line.get()
    }
}
