//! # SwiftMessage
//!
//! Complete SWIFT message: header blocks 1/2 plus a typed text block.
//! Headers are diagnostics-only; a message with unparseable headers still
//! processes as long as block 4 decodes.

use serde::{Deserialize, Serialize};

use crate::headers::{ApplicationHeader, BasicHeader};
use crate::traits::SwiftMessageBody;

/// Complete SWIFT message (headers + typed body)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwiftMessage<T: SwiftMessageBody> {
    /// Basic Header (Block 1), when present and well-formed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_header: Option<BasicHeader>,

    /// Application Header (Block 2), when present and well-formed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_header: Option<ApplicationHeader>,

    /// Message type identifier, e.g. "103"
    pub message_type: String,

    /// Parsed message body with typed fields
    pub fields: T,
}

impl<T: SwiftMessageBody> SwiftMessage<T> {
    /// Render the full wire form: `{1:..}{2:..}{4:\n..\n-}`
    ///
    /// Blocks 1/2 are emitted only when headers are present.
    pub fn to_mt_message(&self) -> String {
        let mut out = String::with_capacity(512);
        if let Some(ref basic) = self.basic_header {
            out.push_str(&format!("{{1:{}}}", basic));
        }
        if let Some(ref application) = self.application_header {
            out.push_str(&format!("{{2:{}}}", application));
        }
        out.push_str(&format!("{{4:\n{}\n-}}", self.fields.to_mt_string()));
        out
    }
}
