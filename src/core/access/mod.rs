#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Admin roles and permissions.

pub mod roles;
