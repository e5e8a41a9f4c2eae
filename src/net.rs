//! Network access and background jobs.
//!
//! Everything that may block (HTTP requests, image decoding) runs on a worker thread
//! and reports back through a [`Job`], which the owner polls from its update hook.

use std::io::Read;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};

use crate::error::{Result, TableauError};

/// Source of raw bytes by URL.
pub trait Fetch: Send + Sync {
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`Fetch`] over HTTP(S). Any non-2xx status is an error.
pub struct HttpFetch {
    agent: ureq::Agent,
}

impl HttpFetch {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(15))
                .build(),
        }
    }
}

impl Default for HttpFetch {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetch {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        match self.agent.get(url).call() {
            Ok(response) => {
                let mut body = Vec::new();
                response.into_reader().read_to_end(&mut body)?;
                Ok(body)
            }
            Err(ureq::Error::Status(code, _)) => Err(TableauError::Status(code)),
            Err(err) => Err(TableauError::transport(err.to_string())),
        }
    }
}

/// Outcome of polling a [`Job`].
#[derive(Debug)]
pub enum Poll<T> {
    /// Still running.
    Pending,
    /// Finished; the value can only be taken once.
    Ready(T),
    /// The worker went away without reporting (it panicked).
    Abandoned,
}

/// Handle to work running on a worker thread.
///
/// Dropping the handle detaches the worker; its result is discarded.
#[derive(Debug)]
pub struct Job<T> {
    rx: Receiver<T>,
}

impl<T: Send + 'static> Job<T> {
    pub fn spawn(work: impl FnOnce() -> T + Send + 'static) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(1);
        std::thread::spawn(move || {
            // The receiver is gone if the owner was disposed; nothing to do then.
            let _ = tx.send(work());
        });
        Self { rx }
    }
}

impl<T> Job<T> {
    pub fn poll(&self) -> Poll<T> {
        match self.rx.try_recv() {
            Ok(value) => Poll::Ready(value),
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => Poll::Abandoned,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::*;

    /// In-memory [`Fetch`] keyed by URL. Unknown URLs answer 404.
    #[derive(Default)]
    pub struct StubFetch {
        responses: HashMap<String, std::result::Result<Vec<u8>, u16>>,
    }

    impl StubFetch {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn body(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.responses.insert(url.to_string(), Ok(body.into()));
            self
        }

        pub fn status(mut self, url: &str, status: u16) -> Self {
            self.responses.insert(url.to_string(), Err(status));
            self
        }
    }

    impl Fetch for StubFetch {
        fn get(&self, url: &str) -> Result<Vec<u8>> {
            match self.responses.get(url) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(TableauError::Status(*status)),
                None => Err(TableauError::Status(404)),
            }
        }
    }
}
