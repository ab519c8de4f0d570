//! Mock identity source for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::identity::{IdentityError, IdentityQuery, IdentitySource};

/// Identity source with canned answers.
///
/// Answers registered with [`with_answer`](Self::with_answer) are matched
/// on the escaped query title; anything else gets the default answer.
#[derive(Debug)]
pub struct MockIdentitySource {
    name: &'static str,
    default: Option<String>,
    answers: HashMap<String, String>,
    fail: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<IdentityQuery>>,
}

impl MockIdentitySource {
    /// Source answering `id` (or "no match") to every query.
    pub fn returning(name: &'static str, id: Option<&str>) -> Self {
        Self {
            name,
            default: id.map(str::to_string),
            answers: HashMap::new(),
            fail: false,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Source whose every request fails.
    pub fn failing(name: &'static str) -> Self {
        Self {
            fail: true,
            ..Self::returning(name, None)
        }
    }

    /// Answer `id` when the escaped query title is `title`.
    pub fn with_answer(mut self, title: &str, id: &str) -> Self {
        self.answers.insert(title.to_string(), id.to_string());
        self
    }

    /// Number of lookups so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<IdentityQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentitySource for MockIdentitySource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn find_id(&self, query: &IdentityQuery) -> Result<Option<String>, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());

        if self.fail {
            return Err(IdentityError::Api { status: 503 });
        }
        Ok(self
            .answers
            .get(&query.title)
            .cloned()
            .or_else(|| self.default.clone()))
    }
}
