use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

/// Write target shared by a task and every subtask that inherits it.
///
/// Cloning is cheap and yields a handle to the same underlying writer. Each
/// write is flushed immediately so an in-progress banner is visible before
/// the task's work begins.
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use timed_task::{Output, Spec};
///
/// let buf = Rc::new(RefCell::new(Vec::new()));
/// Spec::new("Compiling")
///     .output(Output::shared(buf.clone()))
///     .run_simple(|| Ok::<_, std::io::Error>(()))
///     .unwrap();
/// assert!(String::from_utf8_lossy(&buf.borrow()).starts_with("Compiling... done. ("));
/// ```
#[derive(Clone)]
pub struct Output {
    target: Rc<RefCell<dyn Write>>,
}

impl Output {
    /// Takes ownership of `writer`.
    pub fn new<W: Write + 'static>(writer: W) -> Self {
        Self {
            target: Rc::new(RefCell::new(writer)),
        }
    }

    /// Writes into a writer the caller keeps a handle to.
    pub fn shared<W: Write + 'static>(writer: Rc<RefCell<W>>) -> Self {
        Self { target: writer }
    }

    /// The process's standard output, used when nothing else is configured.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    pub(crate) fn write(&self, args: fmt::Arguments<'_>) {
        let mut target = self.target.borrow_mut();
        if let Err(error) = target.write_fmt(args).and_then(|_| target.flush()) {
            crate::diag!(warn, %error, "failed to write task output");
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}
