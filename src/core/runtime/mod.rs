#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Command/query facade.

pub mod executor;
