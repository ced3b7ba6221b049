//! Row decoders for the two supported exports
//!
//! - [`madrid`] - turns a row of 24 hourly value/flag pairs into valid readings
//!   and invalid markers for a selected hour window
//! - [`eea`] - keeps EEA records whose validity column marks them usable and
//!   parses their timestamps
//!
//! Decoders work on one typed record at a time and report failures with the
//! record's source row, leaving skip-or-abort decisions to the caller.

pub mod eea;
pub mod madrid;

#[cfg(test)]
pub mod tests;

pub use eea::{EeaRowDecoder, parse_timestamp};
pub use madrid::MadridRowDecoder;
