//! # SWIFT MT Message Types
//!
//! One module per message type. MT103 is the only type the processor
//! handles today; a new type adds a module here and a variant in
//! [`ParsedSwiftMessage`](crate::parsed_message::ParsedSwiftMessage)
//! without touching existing decoders.

pub mod mt103;

pub use mt103::{ChargeDetails, MT103};
