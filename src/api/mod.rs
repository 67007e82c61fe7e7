#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! JSON/HTTP surface over the ledger facade.

pub mod http;
