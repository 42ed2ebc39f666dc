use std::fmt;
use std::future::Future;
use std::panic;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

type Observer<T> = Box<dyn FnOnce(&T) + Send>;

/// Future combinator that taps the outcome of `inner` without consuming it.
///
/// The observer sees a shared reference to the output exactly once, on the
/// poll where `inner` settles, and the very same output is then returned to
/// whoever drives the `Observe`.
pub struct Observe<F: Future> {
    inner: Pin<Box<F>>,
    observer: Option<Observer<F::Output>>,
}

impl<F: Future> Observe<F> {
    pub fn new<O>(inner: F, observer: O) -> Self
    where
        O: FnOnce(&F::Output) + Send + 'static,
    {
        Self {
            inner: Box::pin(inner),
            observer: Some(Box::new(observer)),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.observer.is_none()
    }
}

impl<F: Future> Future for Observe<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match this.inner.as_mut().poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(output) => {
                if let Some(observer) = this.observer.take() {
                    observer(&output);
                }
                Poll::Ready(output)
            }
        }
    }
}

impl<F: Future> fmt::Debug for Observe<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observe")
            .field("settled", &self.is_settled())
            .finish()
    }
}

/// Caller-side handle on an operation running on its own tokio task.
///
/// The task drives the operation and its log observer, so settlement is
/// recorded when it happens, whether or not this handle is ever awaited.
/// Awaiting yields the operation's own `Result`. A panic inside the operation
/// is resumed on the awaiting task.
pub struct Tracked<T, E> {
    handle: JoinHandle<Result<T, E>>,
}

impl<T, E> Tracked<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Spawns `inner` on the current tokio runtime.
    pub fn spawn<F>(inner: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(inner),
        }
    }
}

impl<T, E> Tracked<T, E> {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl<T, E> Future for Tracked<T, E> {
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(output)) => Poll::Ready(output),
            Poll::Ready(Err(err)) => match err.try_into_panic() {
                Ok(payload) => panic::resume_unwind(payload),
                // Only reachable when the runtime shuts down under the task.
                Err(err) => panic!("tracked operation did not complete: {err}"),
            },
        }
    }
}

impl<T, E> fmt::Debug for Tracked<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked")
            .field("finished", &self.is_finished())
            .finish()
    }
}
