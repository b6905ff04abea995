//! DNS access shared by the MX resolver and the reputation checker.
//!
//! Everything above this module talks to [`DnsLookup`], which keeps the
//! pipeline testable with stub resolvers and leaves the concrete
//! `trust-dns` resolver as one implementation among others.

mod error;
mod resolver;

pub use error::DnsError;
pub use resolver::{DnsLookup, NameServers, build_resolver};
pub use trust_dns_resolver::TokioAsyncResolver;

pub(crate) use resolver::normalize_exchange;
