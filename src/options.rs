use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::Summary;
use crate::output::Output;
use crate::task::Task;

/// Something that can be consulted for an error before a task starts.
///
/// Closures returning `Result<(), E>` are checkable, as are the
/// cancellation signals [`CancelToken`] and [`Background`].
pub trait Checkable<E> {
    fn err(&self) -> Result<(), E>;
}

impl<E, F> Checkable<E> for F
where
    F: Fn() -> Result<(), E>,
{
    fn err(&self) -> Result<(), E> {
        self()
    }
}

/// Returned when a task is asked to run after its cancellation signal fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("task canceled before start")]
pub struct Canceled;

/// Cooperative cancellation signal.
///
/// Checked once when a task is about to start; a task already running is
/// never interrupted. Clones share the same signal, and it may be fired from
/// any thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    canceled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }
}

impl<E: From<Canceled>> Checkable<E> for CancelToken {
    fn err(&self) -> Result<(), E> {
        match self.is_canceled() {
            true => Err(Canceled.into()),
            false => Ok(()),
        }
    }
}

/// A signal that is never canceled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Background;

impl<E> Checkable<E> for Background {
    fn err(&self) -> Result<(), E> {
        Ok(())
    }
}

/// A body step for a task built from options.
pub type Step<'f, E> = Box<dyn FnOnce(&mut Task<'_>) -> Result<(), E> + 'f>;

/// Configures a task built by [`run`] or [`Task::run`].
pub enum TaskOption<'f, E> {
    /// Suppress the banner unless something forces it out.
    Quiet(bool),
    /// Consulted before any step runs; the first error ends the task.
    Check(Box<dyn Checkable<E> + 'f>),
    /// Runs in order after the checks; the first error skips the rest.
    Step(Step<'f, E>),
    /// Write to this target instead of inheriting one.
    Output(Output),
}

impl<E> fmt::Debug for TaskOption<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet(quiet) => f.debug_tuple("Quiet").field(quiet).finish(),
            Self::Check(_) => f.write_str("Check(..)"),
            Self::Step(_) => f.write_str("Step(..)"),
            Self::Output(output) => f.debug_tuple("Output").field(output).finish(),
        }
    }
}

pub fn quiet<'f, E>() -> TaskOption<'f, E> {
    TaskOption::Quiet(true)
}

pub fn check<'f, E>(checkable: impl Checkable<E> + 'f) -> TaskOption<'f, E> {
    TaskOption::Check(Box::new(checkable))
}

pub fn step<'f, E>(f: impl FnOnce(&mut Task<'_>) -> Result<(), E> + 'f) -> TaskOption<'f, E> {
    TaskOption::Step(Box::new(f))
}

pub fn output<'f, E>(output: Output) -> TaskOption<'f, E> {
    TaskOption::Output(output)
}

/// Runs a root task configured by `options` and summarizes it.
///
/// Unlike [`Spec::run`](crate::Spec::run), the error is not propagated; it
/// is carried in the returned [`Summary`].
///
/// ```rust
/// use timed_task::{check, quiet, run, step};
///
/// let summary = run::<&str>("Checking disk", [
///     quiet(),
///     check(|| Err::<(), _>("disk full")),
///     step(|_| unreachable!()),
/// ]);
/// assert_eq!(summary.err(), Some(&"disk full"));
/// ```
pub fn run<'f, E>(
    description: impl Into<String>, options: impl IntoIterator<Item = TaskOption<'f, E>>,
) -> Summary<E> {
    apply(Task::new(description.into(), None, false, None), options)
}

impl<'a> Task<'a> {
    /// Runs a subtask configured by `options` and summarizes it.
    pub fn run<'f, E>(
        &self, description: impl Into<String>, options: impl IntoIterator<Item = TaskOption<'f, E>>,
    ) -> Summary<E> {
        apply(Task::new(description.into(), Some(self), false, None), options)
    }
}

fn apply<'a, 'f, E>(
    mut task: Task<'a>, options: impl IntoIterator<Item = TaskOption<'f, E>>,
) -> Summary<E> {
    let mut checks = Vec::new();
    let mut steps = Vec::new();
    for option in options {
        match option {
            TaskOption::Quiet(quiet) => task.set_quiet(quiet),
            TaskOption::Check(checkable) => checks.push(checkable),
            TaskOption::Step(step) => steps.push(step),
            TaskOption::Output(output) => task.set_output(output),
        }
    }

    let ((), summary) = task.execute(move |task| {
        let result = checks
            .iter()
            .try_for_each(|checkable| checkable.err())
            .and_then(|()| steps.into_iter().try_for_each(|step| step(&mut *task)));
        ((), result)
    });
    summary
}
