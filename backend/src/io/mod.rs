//! # IO Module
//!
//! Adapter layer between HTTP callers and the domain services. Requests are
//! decoded into shared DTOs, mapped to domain commands, and the results are
//! mapped back; domain errors become HTTP status codes here and nowhere else.

pub mod rest;
