//! Guarded URL fetching: syntactic URL validation, concurrent
//! multi-nameserver resolution, address-policy enforcement, and bounded
//! streaming retrieval, composed as one fail-fast pipeline.

pub mod config;
pub mod logging;

pub mod error;
pub mod fetch;
pub mod guard;
pub mod pipeline;
pub mod policy;
pub mod resolve;
pub mod validate;
