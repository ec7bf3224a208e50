//! Provides a scripted source of documents, used in testing
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{Error, Source};
use crate::error::Result;

/// Hands out the given responses in order, `None` being a failed fetch. Once
/// the script runs out the last response is repeated.
pub struct MockSource {
    responses: Mutex<VecDeque<Option<String>>>,
    last: Mutex<Option<String>>,
    fetches: AtomicUsize,
}

impl MockSource {
    pub fn new(responses: Vec<Option<String>>) -> MockSource {
        MockSource {
            responses: Mutex::new(responses.into_iter().collect()),
            last: Mutex::new(None),
            fetches: AtomicUsize::new(0),
        }
    }

    /// How many times the source has been fetched.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Source for MockSource {
    fn fetch(&self) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let mut last = self.last.lock().unwrap();

        if let Some(next) = self.responses.lock().unwrap().pop_front() {
            *last = next;
        }

        match *last {
            Some(ref text) => Ok(text.clone()),
            None => Err(Error::Io(io::Error::new(
                io::ErrorKind::NotConnected,
                "mock source is unreachable",
            ))),
        }
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::MockSource;
    use crate::Source;

    #[test]
    fn test_mock_source() {
        let m = MockSource::new(vec![Some("a".to_string()), None, Some("b".to_string())]);

        assert_eq!(m.fetch().unwrap(), "a");
        assert!(m.fetch().is_err());
        assert_eq!(m.fetch().unwrap(), "b");
        assert_eq!(m.fetch().unwrap(), "b");
        assert_eq!(m.fetches(), 4);
    }
}
