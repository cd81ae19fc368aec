use std::panic;
use std::sync::mpsc;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::mpsc::Sender;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;
use std::time::Instant;

use tracing::error;
use tracing::trace;

/// Runs a callback on its own thread at a fixed rate until cancelled.
///
/// The callback stops being called as soon as it returns an error; that error is handed back by
/// [`Ticker::cancel`].
pub struct Ticker<E: Send + 'static> {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<Result<(), E>>>,
}

impl<E: Send + 'static> Ticker<E> {
    pub fn schedule<F>(interval: Duration, mut callback: F) -> Self
    where
        F: FnMut() -> Result<(), E> + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();

        let handle = thread::spawn(move || -> Result<(), E> {
            let mut deadline = Instant::now() + interval;

            loop {
                let timeout = deadline.saturating_duration_since(Instant::now());

                match stopped.recv_timeout(timeout) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return Ok(()),
                }

                trace!("tick");
                callback()?;

                // if a tick ran long, don't try to catch up
                deadline = (deadline + interval).max(Instant::now());
            }
        });

        Self {
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    /// Whether the loop has ended, either cancelled or on an error.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the loop. Once this returns, the callback won't be called again.
    ///
    /// Cancelling twice is harmless: the second call returns `Ok(())`. From inside the callback
    /// this only asks the loop to stop after the current tick.
    pub fn cancel(&mut self) -> Result<(), E> {
        // dropping the sender wakes the loop up
        self.stop.take();

        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        if handle.thread().id() == thread::current().id() {
            return Ok(());
        }

        match handle.join() {
            Ok(res) => res,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

impl<E: Send + 'static> Drop for Ticker<E> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.stop.take();
            return;
        }

        if self.cancel().is_err() {
            error!("Ticker stopped on an error that was never collected");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::thread;
    use std::time::Duration;
    use std::time::Instant;

    use super::Ticker;

    const INTERVAL: Duration = Duration::from_millis(5);

    #[test]
    fn ticks_until_cancelled() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let mut ticker = Ticker::<()>::schedule(INTERVAL, move || {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let deadline = Instant::now() + Duration::from_secs(5);
        while count.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
            thread::sleep(INTERVAL);
        }
        ticker.cancel().unwrap();

        let n = count.load(Ordering::SeqCst);
        assert!(n >= 3);
        assert!(ticker.is_finished());

        // nothing runs after cancel returns
        thread::sleep(INTERVAL * 10);
        assert_eq!(count.load(Ordering::SeqCst), n);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut ticker = Ticker::<()>::schedule(INTERVAL, || Ok(()));

        assert_eq!(ticker.cancel(), Ok(()));
        assert_eq!(ticker.cancel(), Ok(()));
    }

    #[test]
    fn stops_on_error() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let mut ticker = Ticker::schedule(INTERVAL, move || {
            match c.fetch_add(1, Ordering::SeqCst) {
                2 => Err("boom"),
                _ => Ok(()),
            }
        });

        while !ticker.is_finished() {
            thread::sleep(INTERVAL);
        }

        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(ticker.cancel(), Err("boom"));
        assert_eq!(ticker.cancel(), Ok(()));
    }

    #[test]
    fn cancel_before_first_tick() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let mut ticker = Ticker::<()>::schedule(Duration::from_secs(60), move || {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        ticker.cancel().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
