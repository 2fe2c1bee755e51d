//! Data model types exchanged with the data provider.
//!
//! - `responses`: raw Alpha Vantage payloads and their conversion into
//!   `sigma_common` model types.
pub mod responses;
