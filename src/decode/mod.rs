//! Response decoder module
//!
//! # Overview
//!
//! Selects the record list out of a parsed API response. The SpaceX query
//! endpoints return `{ "docs": [...], "hasNextPage": bool, ... }`, so the
//! default selector is `docs[*]`. A response without the record list is an
//! empty page, not an error.

mod decoders;
mod types;

pub use decoders::JsonDecoder;
pub use types::{RecordDecoder, DEFAULT_RECORD_PATH};
