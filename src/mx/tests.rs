use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{Error, MxRecord, resolve_mx, resolver};
use crate::dns::{DnsError, DnsLookup};

type MxResult = Result<Vec<MxRecord>, DnsError>;
type Ipv4Result = Result<Vec<Ipv4Addr>, DnsError>;
type MxFn = dyn Fn(&str) -> MxResult + Send + Sync;
type Ipv6Result = Result<Vec<Ipv6Addr>, DnsError>;
type Ipv4Fn = dyn Fn(&str) -> Ipv4Result + Send + Sync;
type Ipv6Fn = dyn Fn(&str) -> Ipv6Result + Send + Sync;

/// Scripted resolver shared by the MX, reputation and verifier tests.
pub(crate) struct StubResolver {
    on_mx: Box<MxFn>,
    on_ipv4: Box<Ipv4Fn>,
    on_ipv6: Box<Ipv6Fn>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubResolver {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> MxResult + Send + Sync + 'static,
    {
        Self {
            on_mx: Box::new(f),
            on_ipv4: Box::new(|name| Err(DnsError::not_found(name))),
            on_ipv6: Box::new(|name| Err(DnsError::not_found(name))),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_ipv4<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Ipv4Result + Send + Sync + 'static,
    {
        self.on_ipv4 = Box::new(f);
        self
    }

    pub(crate) fn with_ipv6<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Ipv6Result + Send + Sync + 'static,
    {
        self.on_ipv6 = Box::new(f);
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of queries (MX, IPv4 and IPv6) answered so far.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn before_answer(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl DnsLookup for StubResolver {
    async fn lookup_mx(&self, domain: &str) -> MxResult {
        self.before_answer().await;
        (self.on_mx)(domain)
    }

    async fn lookup_ipv4(&self, name: &str) -> Ipv4Result {
        self.before_answer().await;
        (self.on_ipv4)(name)
    }

    async fn lookup_ipv6(&self, name: &str) -> Ipv6Result {
        self.before_answer().await;
        (self.on_ipv6)(name)
    }
}

const TIMEOUT: Duration = Duration::from_secs(2);

#[test]
fn normalize_domain_rejects_empty() {
    let err = resolver::normalize_domain("  ").expect_err("empty domain should fail");
    assert!(matches!(err, Error::EmptyDomain));
}

#[tokio::test]
async fn resolve_sorts_and_dedups_records() {
    let stub = StubResolver::new(|domain| {
        assert_eq!(domain, "example.com");
        Ok(vec![
            MxRecord::new(20, "mx2.example.com"),
            MxRecord::new(10, "mx1.example.com"),
            MxRecord::new(10, "mx1.example.com"),
            MxRecord::new(30, "mx3.example.com"),
        ])
    });

    let records = resolve_mx(&stub, "example.com", TIMEOUT)
        .await
        .expect("lookup succeeds");
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].preference, 10);
    assert_eq!(records[0].exchange, "mx1.example.com");
    assert_eq!(records[2].preference, 30);
}

#[tokio::test]
async fn empty_answer_is_no_mx_records() {
    let stub = StubResolver::new(|_| Ok(Vec::new()));
    let err = resolve_mx(&stub, "example.com", TIMEOUT)
        .await
        .expect_err("no records");
    assert!(matches!(err, Error::NoMxRecords { ref domain } if domain == "example.com"));
    assert!(err.is_no_mail_domain());
}

#[tokio::test]
async fn null_mx_is_no_mx_records() {
    let stub = StubResolver::new(|_| Ok(vec![MxRecord::new(0, "")]));
    let err = resolve_mx(&stub, "example.com", TIMEOUT)
        .await
        .expect_err("null MX");
    assert!(matches!(err, Error::NoMxRecords { .. }));
}

#[tokio::test]
async fn nxdomain_is_domain_not_found() {
    let stub = StubResolver::new(|domain| Err(DnsError::not_found(domain)));
    let err = resolve_mx(&stub, "missing.example", TIMEOUT)
        .await
        .expect_err("nxdomain");
    assert!(matches!(err, Error::DomainNotFound { ref domain } if domain == "missing.example"));
    assert!(!err.is_no_mail_domain());
}

#[tokio::test]
async fn slow_resolver_times_out() {
    let stub =
        StubResolver::new(|_| Ok(vec![MxRecord::new(10, "mx.example.com")])).with_delay(
            Duration::from_millis(500),
        );
    let err = resolve_mx(&stub, "example.com", Duration::from_millis(50))
        .await
        .expect_err("timeout");
    assert!(matches!(err, Error::Timeout { .. }));
}

#[tokio::test]
async fn idn_domain_is_queried_in_ascii() {
    let stub = StubResolver::new(|domain| {
        assert!(domain.starts_with("xn--"), "{domain}");
        Ok(vec![MxRecord::new(5, "mx.example.com")])
    });
    let records = resolve_mx(&stub, "exämple.com", TIMEOUT)
        .await
        .expect("lookup succeeds");
    assert_eq!(records.len(), 1);
    assert_eq!(stub.calls(), 1);
}
