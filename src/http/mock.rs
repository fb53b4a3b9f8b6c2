//! In-memory transport for unit tests.

use std::sync::{Arc, Mutex};

use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};

type Handler = Box<dyn FnMut(&HttpRequest) -> Result<HttpResponse, TransportError> + Send>;

/// Answers every request with a swappable handler and keeps a request log.
pub struct MockTransport {
    handler: Mutex<Handler>,
    log: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: FnMut(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + 'static,
    {
        Arc::new(Self {
            handler: Mutex::new(Box::new(handler)),
            log: Mutex::new(Vec::new()),
        })
    }

    pub fn set_handler<F>(&self, handler: F)
    where
        F: FnMut(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + 'static,
    {
        *self.handler.lock().unwrap() = Box::new(handler);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.log.lock().unwrap().clone()
    }

    /// Requests whose URL contains `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.as_str().contains(needle))
            .count()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.log.lock().unwrap().push(request.clone());
        let mut handler = self.handler.lock().unwrap();
        (*handler)(request)
    }
}
