//! # SWIFT MT103 Processor
//!
//! Queue-driven processing service for SWIFT MT103 (Single Customer Credit
//! Transfer) messages: type-safe parsing, syntactic and compliance
//! validation, idempotent persistence, dead-letter routing, and a
//! file-based control plane.
//!
//! ## Features
//! - **Type-safe parsing** with dedicated field structures
//! - **Two validation passes**: SWIFT syntax rules and business compliance
//!   with a pluggable sanctions hook
//! - **Pluggable queues**: in-memory for development, HTTPS broker for
//!   production, with at-least-once delivery tolerated end to end
//! - **Operational plane**: atomic status publication, lifecycle commands,
//!   synthetic test traffic
//!
//! ## Quick Start
//! ```rust
//! use swift_processor::parser::SwiftParser;
//!
//! # fn main() -> swift_processor::Result<()> {
//! let raw = "{1:F01BANKDEFFAXXX0123456789}{2:I103BANKBEBBAXXXN}{4:\n:20:REF1\n:23B:CRED\n:32A:241215EUR1000,00\n:50K:ALICE\n:59:/87654321\nBOB\n2 OAK AVE\n-}";
//! let parsed = SwiftParser::parse_auto(raw)?;
//! assert_eq!(parsed.message_type(), "103");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod fields;
pub mod generator;
pub mod headers;
pub mod ipc;
pub mod messages;
pub mod parsed_message;
pub mod parser;
pub mod pipeline;
pub mod queue;
pub mod repository;
pub mod runtime;
pub mod state;
pub mod swift_message;
pub mod tokenizer;
pub mod traits;
pub mod validation;

// Re-export message types
pub use messages::*;

// Re-export core types
pub use errors::{
    ConfigError, DecodingError, FramingError, IpcError, ParseError, QueueError,
    RepositoryError, Result,
};
pub use headers::{ApplicationHeader, BasicHeader};
pub use parsed_message::ParsedSwiftMessage;
pub use parser::SwiftParser;
pub use runtime::Runtime;
pub use swift_message::SwiftMessage;
pub use traits::{SwiftField, SwiftMessageBody};
