//! MX resolution (the "domain resolver" stage of the pipeline).
//!
//! The public entry points are [`check_mx`], which uses the system resolver,
//! and [`resolve_mx`], which accepts any [`DnsLookup`](crate::dns::DnsLookup).

mod error;
mod resolver;
mod types;

pub use error::MxError as Error;
pub use resolver::{DEFAULT_DNS_TIMEOUT, check_mx, resolve_mx};
pub use types::MxRecord;

pub(crate) use error::MxError;

#[cfg(test)]
pub(crate) mod tests;
