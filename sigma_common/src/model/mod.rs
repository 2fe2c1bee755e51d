//! Data model types returned by providers and produced by derivations.
//!
//! - `info`: key/value info snapshot and its field names.
//! - `statement`: annual statement tables and their line items.
//! - `series`: year-indexed metric series.
//! - `price`: daily closes and dividend payments.
pub mod info;
pub mod price;
pub mod series;
pub mod statement;
