use std::fmt;
use std::marker::PhantomData;

use crate::options::{Background, Checkable};
use crate::output::Output;
use crate::task::Task;

/// Specification for a timed task.
///
/// A spec is plain configuration; every `run` builds a fresh [`Task`] from
/// it, prints its banner, calls the function and prints how it went.
///
/// ```rust
/// use timed_task::Spec;
///
/// Spec::new("Downloading files").run(|download| {
///     download.add_note("2 files");
///     for i in 1..=2 {
///         Spec::new(format!("Downloading file {i}"))
///             .parent(download)
///             .run_simple(|| Ok::<_, std::io::Error>(()))?;
///     }
///     Ok::<_, std::io::Error>(())
/// })?;
/// # Ok::<_, std::io::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Spec<'a> {
    parent: Option<&'a Task<'a>>,
    description: String,
    quiet: bool,
    output: Option<Output>,
}

impl<'a> Spec<'a> {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            parent: None,
            description: description.into(),
            quiet: false,
            output: None,
        }
    }

    /// Runs the task nested under `parent`, inheriting its output.
    pub fn parent(mut self, parent: &'a Task<'a>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Quiet tasks are not printed unless they fail or something interrupts them.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn output(mut self, output: Output) -> Self {
        self.output = Some(output);
        self
    }

    /// Carries a result of type `T` alongside the error.
    pub fn returning<T>(self) -> SpecFor<'a, T> {
        SpecFor {
            spec: self,
            _result: PhantomData,
        }
    }

    pub fn run<E, F>(&self, f: F) -> Result<(), E>
    where
        F: FnOnce(&mut Task<'_>) -> Result<(), E>,
    {
        self.run_ctx(&Background, f)
    }

    /// Like [`run`](Self::run), but returns the signal's error without
    /// starting the task if `ctx` is already canceled.
    pub fn run_ctx<E, C, F>(&self, ctx: &C, f: F) -> Result<(), E>
    where
        C: Checkable<E> + ?Sized,
        F: FnOnce(&mut Task<'_>) -> Result<(), E>,
    {
        ctx.err()?;
        let ((), summary) = self.task().execute(|task| ((), f(task)));
        summary.result
    }

    /// Runs a function that does not start subtasks.
    pub fn run_simple<E, F>(&self, f: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<(), E>,
    {
        self.run_ctx(&Background, |_| f())
    }

    pub fn run_simple_ctx<E, C, F>(&self, ctx: &C, f: F) -> Result<(), E>
    where
        C: Checkable<E> + ?Sized,
        F: FnOnce() -> Result<(), E>,
    {
        self.run_ctx(ctx, |_| f())
    }

    fn task(&self) -> Task<'a> {
        Task::new(self.description.clone(), self.parent, self.quiet, self.output.clone())
    }
}

/// Specification for a timed task that produces a `T`.
///
/// The value is returned alongside the error, so a failing task can still
/// hand back what it computed.
///
/// ```rust
/// use timed_task::SpecFor;
///
/// let (value, result) = SpecFor::<u32>::new("Solving").run_simple(|| (42, Err("no luck")));
/// assert_eq!(value, 42);
/// assert_eq!(result, Err("no luck"));
/// ```
pub struct SpecFor<'a, T> {
    spec: Spec<'a>,
    _result: PhantomData<fn() -> T>,
}

impl<T> Clone for SpecFor<'_, T> {
    fn clone(&self) -> Self {
        self.spec.clone().returning()
    }
}

impl<T> fmt::Debug for SpecFor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecFor").field("spec", &self.spec).finish()
    }
}

impl<T> Default for SpecFor<'_, T> {
    fn default() -> Self {
        Spec::default().returning()
    }
}

impl<'a, T> From<Spec<'a>> for SpecFor<'a, T> {
    fn from(spec: Spec<'a>) -> Self {
        spec.returning()
    }
}

impl<'a, T> SpecFor<'a, T> {
    pub fn new(description: impl Into<String>) -> Self {
        Spec::new(description).returning()
    }

    pub fn parent(mut self, parent: &'a Task<'a>) -> Self {
        self.spec = self.spec.parent(parent);
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.spec = self.spec.quiet(quiet);
        self
    }

    pub fn output(mut self, output: Output) -> Self {
        self.spec = self.spec.output(output);
        self
    }

    pub fn run<E, F>(&self, f: F) -> (T, Result<(), E>)
    where
        F: FnOnce(&mut Task<'_>) -> (T, Result<(), E>),
    {
        let (value, summary) = self.spec.task().execute(f);
        (value, summary.result)
    }

    /// Like [`run`](Self::run), but returns `T::default()` and the signal's
    /// error without starting the task if `ctx` is already canceled.
    pub fn run_ctx<E, C, F>(&self, ctx: &C, f: F) -> (T, Result<(), E>)
    where
        T: Default,
        C: Checkable<E> + ?Sized,
        F: FnOnce(&mut Task<'_>) -> (T, Result<(), E>),
    {
        if let Err(err) = ctx.err() {
            return (T::default(), Err(err));
        }
        self.run(f)
    }

    pub fn run_simple<E, F>(&self, f: F) -> (T, Result<(), E>)
    where
        F: FnOnce() -> (T, Result<(), E>),
    {
        self.run(|_| f())
    }

    pub fn run_simple_ctx<E, C, F>(&self, ctx: &C, f: F) -> (T, Result<(), E>)
    where
        T: Default,
        C: Checkable<E> + ?Sized,
        F: FnOnce() -> (T, Result<(), E>),
    {
        self.run_ctx(ctx, |_| f())
    }
}
