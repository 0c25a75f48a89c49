//! # SWIFT Field Types
//!
//! Typed field structures for MT103, one module per field family. All
//! fields implement [`SwiftField`](crate::traits::SwiftField) for parsing
//! and serialization; enum fields (50, 53, 54, 56, 57, 59) dispatch on the
//! option letter.
//!
//! Decoding is structural: it fixes variants and slices components.
//! Semantic rules (BIC shape, ISO 4217 membership, length budgets, amount
//! limits) live in the validation layer so they surface as validation
//! failures rather than parse failures.

pub mod field20;
pub mod field23;
pub mod field32;
pub mod field33;
pub mod field50;
pub mod field52;
pub mod field53;
pub mod field54;
pub mod field56;
pub mod field57;
pub mod field59;
pub mod field70;
pub mod field71;
pub mod field72;
pub mod party;
pub mod swift_utils;

pub use field20::Field20;
pub use field23::{Field23B, BANK_OPERATION_CODES};
pub use field32::Field32A;
pub use field33::Field33B;
pub use field50::{Field50, Field50A, Field50K};
pub use field52::Field52A;
pub use field53::{Field53, Field53A, Field53B};
pub use field54::Field54;
pub use field56::{Field56, Field56A, Field56C, Field56D};
pub use field57::Field57;
pub use field59::{Field59, Field59A, Field59NoOption};
pub use field70::Field70;
pub use field71::{Field71A, Field71F, Field71G, CHARGE_BEARER_CODES};
pub use field72::Field72;
pub use party::Party;
