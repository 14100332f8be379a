//! Scripted in-memory DNS backend shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use podseed::{DnsError, DnsSrvResolverBuilder, SrvAnswer, SrvRecord};

#[derive(Clone)]
enum Reply {
    Records(Vec<SrvRecord>, Option<Instant>),
    Fail,
}

/// Answers every query with the current reply and counts calls.
pub struct FakeDns {
    reply: Mutex<Reply>,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
    timeouts: Mutex<Vec<Duration>>,
}

impl FakeDns {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Reply::Records(Vec::new(), None)),
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            timeouts: Mutex::new(Vec::new()),
        })
    }

    /// Answer with these records and no TTL.
    pub fn answer(&self, records: &[(&str, u16)]) {
        *self.reply.lock().unwrap() = Reply::Records(records_of(records), None);
    }

    /// Answer with these records, valid for `ttl` from now.
    pub fn answer_for(&self, records: &[(&str, u16)], ttl: Duration) {
        *self.reply.lock().unwrap() = Reply::Records(records_of(records), Some(Instant::now() + ttl));
    }

    /// Answer with these records, already expired.
    pub fn answer_expired(&self, records: &[(&str, u16)]) {
        *self.reply.lock().unwrap() = Reply::Records(records_of(records), Some(Instant::now()));
    }

    pub fn fail(&self) {
        *self.reply.lock().unwrap() = Reply::Fail;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().unwrap().clone()
    }

    fn lookup(&self, query: &str, timeout: Duration) -> Result<SrvAnswer, DnsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_owned());
        self.timeouts.lock().unwrap().push(timeout);
        match self.reply.lock().unwrap().clone() {
            Reply::Records(records, valid_until) => Ok(SrvAnswer::new(records, valid_until)),
            Reply::Fail => Err(DnsError::Timeout {
                query: query.to_owned(),
                timeout,
            }),
        }
    }
}

/// Resolver builder wired to `fake`.
pub fn builder(fake: &Arc<FakeDns>) -> DnsSrvResolverBuilder {
    let fake = Arc::clone(fake);
    podseed::DnsSrvResolver::builder()
        .backend(move |query: &str, timeout: Duration| fake.lookup(query, timeout))
}

pub fn records_of(records: &[(&str, u16)]) -> Vec<SrvRecord> {
    records
        .iter()
        .map(|&(target, port)| SrvRecord::new(target, port))
        .collect()
}

/// Sorted copy for order-independent comparison.
pub fn sorted<T: Ord + Clone>(items: &[T]) -> Vec<T> {
    let mut out = items.to_vec();
    out.sort();
    out
}
