#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Proposals, votes and governance parameters.

pub mod params;
pub mod proposals;
