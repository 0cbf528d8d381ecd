//! Sequential middleware runner.

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::error::HandlerError;
use crate::plan::handler::{Handler, HandlerChain};
use crate::routing::Request;

type Done = Box<dyn FnOnce(Option<HandlerError>) + Send>;

/// Runs a handler chain strictly in order.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    chain: HandlerChain,
}

impl ExecutionPlan {
    pub fn new(chain: HandlerChain) -> Self {
        Self { chain }
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Run the chain. `done` is invoked once: with `None` when the chain
    /// completes, with the error when a handler aborts it, or never when a
    /// continuation is abandoned.
    pub fn start<F>(&self, request: Request, data: Value, done: F)
    where
        F: FnOnce(Option<HandlerError>) + Send + 'static,
    {
        if self.chain.is_empty() {
            done(None);
            return;
        }

        let cursor = Arc::new(Cursor {
            chain: Arc::clone(&self.chain),
            request,
            data,
            done: Mutex::new(Some(Box::new(done))),
            drive: Mutex::new(Drive::Idle),
        });
        advance(cursor, 0, None);
    }
}

/// State shared by every continuation of one `start` call.
struct Cursor {
    chain: HandlerChain,
    request: Request,
    data: Value,
    done: Mutex<Option<Done>>,
    drive: Mutex<Drive>,
}

/// Whether a loop is currently stepping through the chain.
enum Drive {
    Idle,
    Running,
    /// A continuation resolved while the loop was inside a handler.
    Queued(usize, Option<HandlerError>),
}

impl Cursor {
    fn finish(&self, err: Option<HandlerError>) {
        let done = self
            .done
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(done) = done {
            done(err);
        }
    }
}

/// Step the chain from `index`.
///
/// A continuation resolved synchronously inside a handler is queued and run
/// by the loop already on the stack, so long chains of synchronous handlers
/// run in constant stack depth.
fn advance(cursor: Arc<Cursor>, index: usize, err: Option<HandlerError>) {
    {
        let mut drive = cursor.drive.lock().unwrap_or_else(PoisonError::into_inner);
        if let Drive::Idle = *drive {
            *drive = Drive::Running;
        } else {
            *drive = Drive::Queued(index, err);
            return;
        }
    }

    let mut step = Some((index, err));
    while let Some((index, err)) = step.take() {
        run_step(&cursor, index, err);

        let mut drive = cursor.drive.lock().unwrap_or_else(PoisonError::into_inner);
        if let Drive::Queued(index, err) = std::mem::replace(&mut *drive, Drive::Idle) {
            *drive = Drive::Running;
            step = Some((index, err));
        }
    }
}

fn run_step(cursor: &Arc<Cursor>, index: usize, err: Option<HandlerError>) {
    if let Some(err) = err {
        tracing::debug!(position = index, error = %err, "handler chain aborted");
        cursor.finish(Some(err));
        return;
    }

    let Some(handler) = cursor.chain.get(index) else {
        cursor.finish(None);
        return;
    };

    match handler {
        Handler::Continuable(f) => {
            let next = Next {
                cursor: Some(Arc::clone(cursor)),
                index: index + 1,
            };
            f(&cursor.request, &cursor.data, next);
        }
        Handler::Terminal(f) => {
            let result = f(&cursor.request, &cursor.data);
            cursor.finish(result.err());
        }
    }
}

/// Continuation handed to a continuable handler.
///
/// Consumed on use, so each handler can advance the chain at most once.
/// Dropping it unresolved stalls the chain for good.
pub struct Next {
    cursor: Option<Arc<Cursor>>,
    index: usize,
}

impl Next {
    /// Run the next handler (or complete the chain).
    pub fn proceed(self) {
        self.resolve(Ok(()));
    }

    /// Abort the chain, skipping every remaining handler.
    pub fn fail(self, err: impl Into<HandlerError>) {
        self.resolve(Err(err.into()));
    }

    pub fn resolve(mut self, result: Result<(), HandlerError>) {
        if let Some(cursor) = self.cursor.take() {
            advance(cursor, self.index, result.err());
        }
    }
}

impl Drop for Next {
    fn drop(&mut self) {
        if let Some(cursor) = &self.cursor {
            tracing::warn!(
                position = self.index,
                chain_len = cursor.chain.len(),
                "continuation dropped unresolved; handler chain stalled"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Log = Arc<Mutex<Vec<String>>>;

    fn log_entry(log: &Log, entry: &str) {
        log.lock().unwrap().push(entry.to_string());
    }

    fn continuable(log: &Log, name: &'static str) -> Handler {
        let log = Arc::clone(log);
        Handler::continuable(move |_, _, next| {
            log_entry(&log, name);
            next.proceed();
        })
    }

    fn terminal(log: &Log, name: &'static str) -> Handler {
        let log = Arc::clone(log);
        Handler::terminal(move |_, _| {
            log_entry(&log, name);
            Ok(())
        })
    }

    type Outcome = Arc<Mutex<Option<Option<HandlerError>>>>;

    fn run(chain: Vec<Handler>) -> (Arc<AtomicUsize>, Outcome) {
        let calls = Arc::new(AtomicUsize::new(0));
        let outcome = Arc::new(Mutex::new(None));
        let (c, o) = (Arc::clone(&calls), Arc::clone(&outcome));
        ExecutionPlan::new(Arc::from(chain)).start(Request::default(), Value::Null, move |err| {
            c.fetch_add(1, Ordering::SeqCst);
            *o.lock().unwrap() = Some(err);
        });
        (calls, outcome)
    }

    #[test]
    fn test_empty_chain_completes_synchronously() {
        let (calls, outcome) = run(vec![]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*outcome.lock().unwrap(), Some(None));
    }

    #[test]
    fn test_continuables_run_in_order() {
        let log: Log = Arc::default();
        let (calls, outcome) = run(vec![
            continuable(&log, "a"),
            continuable(&log, "b"),
            continuable(&log, "c"),
        ]);
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*outcome.lock().unwrap(), Some(None));
    }

    #[test]
    fn test_long_synchronous_chain_runs_flat() {
        let step = Handler::continuable(|_, _, next| next.proceed());
        let (calls, outcome) = run(vec![step; 200_000]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*outcome.lock().unwrap(), Some(None));
    }

    #[test]
    fn test_continuation_resolved_from_another_thread() {
        let log: Log = Arc::default();
        let (calls, _) = run(vec![
            Handler::continuable(|_, _, next| {
                std::thread::spawn(move || next.proceed()).join().unwrap();
            }),
            continuable(&log, "b"),
            terminal(&log, "t"),
        ]);
        assert_eq!(*log.lock().unwrap(), vec!["b", "t"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_terminal_short_circuits() {
        let log: Log = Arc::default();
        let (calls, _) = run(vec![
            continuable(&log, "c1"),
            terminal(&log, "t1"),
            terminal(&log, "t2"),
        ]);
        assert_eq!(*log.lock().unwrap(), vec!["c1", "t1"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_error_aborts_remaining() {
        let log: Log = Arc::default();
        let failing = Handler::continuable(|_, _, next| next.fail("denied"));
        let (calls, outcome) = run(vec![continuable(&log, "a"), failing, continuable(&log, "b")]);
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*outcome.lock().unwrap(), Some(Some(HandlerError::new("denied"))));
    }

    #[test]
    fn test_terminal_error_is_reported() {
        let (_, outcome) = run(vec![Handler::terminal(|_, _| Err("boom".into()))]);
        assert_eq!(*outcome.lock().unwrap(), Some(Some(HandlerError::new("boom"))));
    }

    #[test]
    fn test_dropped_continuation_stalls() {
        let log: Log = Arc::default();
        let (calls, outcome) = run(vec![
            Handler::continuable(|_, _, next| drop(next)),
            continuable(&log, "never"),
        ]);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(outcome.lock().unwrap().is_none());
    }

    #[test]
    fn test_deferred_continuation_resumes_chain() {
        let parked: Arc<Mutex<Option<Next>>> = Arc::default();
        let log: Log = Arc::default();
        let slot = Arc::clone(&parked);
        let (calls, _) = run(vec![
            Handler::continuable(move |_, _, next| {
                *slot.lock().unwrap() = Some(next);
            }),
            terminal(&log, "after"),
        ]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let next = parked.lock().unwrap().take().unwrap();
        next.proceed();
        assert_eq!(*log.lock().unwrap(), vec!["after"]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handlers_see_request_and_data() {
        let seen = Arc::new(Mutex::new(None));
        let s = Arc::clone(&seen);
        let chain: HandlerChain = Arc::from(vec![Handler::terminal(move |req, data| {
            *s.lock().unwrap() = Some((req.anchor().to_string(), data.clone()));
            Ok(())
        })]);
        ExecutionPlan::new(chain).start(
            Request::from_location("/#top"),
            serde_json::json!({"n": 1}),
            |_| {},
        );
        assert_eq!(
            *seen.lock().unwrap(),
            Some(("top".to_string(), serde_json::json!({"n": 1})))
        );
    }
}
