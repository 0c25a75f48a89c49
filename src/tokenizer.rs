//! Block and field tokenizer for SWIFT MT messages
//!
//! Splits a raw payload into its `{n:...}` blocks and extracts the ordered
//! `:TAG:value` entries from Block 4 (Text Block). Unknown tags are kept in
//! order; deciding which tags apply to a message type is the decoder's job.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{FramingError, ParseError, Result};

/// SWIFT message blocks structure
///
/// Blocks 1/2 are retained verbatim for diagnostics and message-type
/// detection; block 4 is the text block the decoders consume.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwiftMessageBlocks {
    pub block_1: Option<String>,
    pub block_2: Option<String>,
    pub block_3: Option<String>,
    pub block_4: Option<String>,
    pub block_5: Option<String>,
}

/// One framed field from Block 4
///
/// `tag` is the numeric part ("20", "32", "50"), `option` the optional
/// uppercase letter ("A", "K"). Multi-line values keep internal newlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub tag: String,
    pub option: Option<String>,
    pub value: String,
    /// 1-based line within block 4, for error reporting
    pub line: usize,
}

impl FieldEntry {
    pub fn new(tag: &str, option: Option<&str>, value: &str) -> Self {
        Self {
            tag: tag.to_string(),
            option: option.map(|o| o.to_string()),
            value: value.to_string(),
            line: 0,
        }
    }

    /// Full tag with option letter, e.g. "32A"
    pub fn full_tag(&self) -> String {
        match &self.option {
            Some(option) => format!("{}{}", self.tag, option),
            None => self.tag.clone(),
        }
    }

    /// Render back to `:TAG:value` form
    pub fn to_swift_string(&self) -> String {
        format!(":{}:{}", self.full_tag(), self.value)
    }
}

static TAG_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:(\d{2})([A-Z]?):").expect("invalid tag regex"));

/// Extract blocks from a SWIFT message using brace matching
///
/// Block 4 is special-cased: its content runs to the `-}` trailer, and a
/// missing trailer is reported as `UnterminatedBlock4` rather than an
/// unmatched brace. CRLF line endings are normalized to LF up front.
pub fn extract_blocks(message: &str) -> Result<SwiftMessageBlocks> {
    let normalized = message.replace("\r\n", "\n");
    let mut blocks = SwiftMessageBlocks::default();
    let bytes = normalized.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'{' && i + 2 < bytes.len() && bytes[i + 2] == b':' {
            let block_number = bytes[i + 1] as char;
            if !block_number.is_ascii_digit() {
                i += 1;
                continue;
            }
            let content_start = i + 3;

            if block_number == '4' {
                // Text block: terminated by the '-}' trailer, not a bare brace
                let rest = &normalized[content_start..];
                let end = rest
                    .find("-}")
                    .ok_or(FramingError::UnterminatedBlock4)?;
                let content = rest[..end].trim_matches('\n').to_string();
                blocks.block_4 = Some(content);
                i = content_start + end + 2;
                continue;
            }

            // Headers and trailers: brace counting handles nested {tag:value}
            let mut depth = 1usize;
            let mut j = content_start;
            while j < bytes.len() && depth > 0 {
                match bytes[j] {
                    b'{' => depth += 1,
                    b'}' => depth -= 1,
                    _ => {}
                }
                j += 1;
            }
            if depth != 0 {
                return Err(FramingError::UnmatchedBrace {
                    block_number: block_number.to_string(),
                }
                .into());
            }
            let content = normalized[content_start..j - 1].to_string();
            match block_number {
                '1' => blocks.block_1 = Some(content),
                '2' => blocks.block_2 = Some(content),
                '3' => blocks.block_3 = Some(content),
                '5' => blocks.block_5 = Some(content),
                _ => {
                    return Err(FramingError::UnknownBlockNumber {
                        block_number: block_number.to_string(),
                    }
                    .into());
                }
            }
            i = j;
        } else {
            i += 1;
        }
    }

    if blocks.block_1.is_none()
        && blocks.block_2.is_none()
        && blocks.block_4.is_none()
    {
        return Err(FramingError::NoBlocksFound.into());
    }
    if blocks.block_4.is_none() {
        return Err(FramingError::MissingBlock4.into());
    }

    Ok(blocks)
}

/// Parse Block 4 content into ordered field entries
///
/// Each field begins with `:TAG:` at line start; its value spans up to the
/// next tag line or the end of the block. Non-empty text before the first
/// tag is a malformed line.
pub fn parse_block4_fields(block4_content: &str) -> Result<Vec<FieldEntry>> {
    let mut entries: Vec<FieldEntry> = Vec::new();

    for (idx, line) in block4_content.lines().enumerate() {
        if let Some(caps) = TAG_LINE_REGEX.captures(line) {
            let tag = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let option = caps
                .get(2)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty());
            let rest = &line[caps.get(0).map(|m| m.end()).unwrap_or(0)..];
            entries.push(FieldEntry {
                tag: tag.to_string(),
                option: option.map(|o| o.to_string()),
                value: rest.to_string(),
                line: idx + 1,
            });
        } else if let Some(entry) = entries.last_mut() {
            // Continuation line of a multi-line value
            entry.value.push('\n');
            entry.value.push_str(line);
        } else if !line.trim().is_empty() {
            return Err(FramingError::MalformedTagLine {
                line: idx + 1,
                content: line.to_string(),
            }
            .into());
        }
    }

    Ok(entries)
}

/// Frame a raw payload and return its block-4 entries plus the raw blocks
pub fn frame(message: &str) -> Result<(SwiftMessageBlocks, Vec<FieldEntry>)> {
    let blocks = extract_blocks(message)?;
    let block4 = blocks
        .block_4
        .as_deref()
        .ok_or::<ParseError>(FramingError::MissingBlock4.into())?;
    let entries = parse_block4_fields(block4)?;
    Ok((blocks, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "{1:F01BANKDEFFAXXX0123456789}{2:I103BANKDEFFAXXXU3003}{4:\n:20:FT21234567890\n:23B:CRED\n:32A:210315EUR1234567,89\n-}";

    #[test]
    fn test_extract_blocks() {
        let blocks = extract_blocks(SAMPLE).unwrap();
        assert_eq!(
            blocks.block_1.as_deref(),
            Some("F01BANKDEFFAXXX0123456789")
        );
        assert_eq!(blocks.block_2.as_deref(), Some("I103BANKDEFFAXXXU3003"));
        assert!(blocks.block_4.unwrap().contains(":20:FT21234567890"));
    }

    #[test]
    fn test_extract_blocks_with_nested_braces() {
        let message = "{1:F01BANKDEFFAXXX0123456789}{2:I103BANKDEFFAXXXU3003}{3:{113:SEPA}{108:MT103}}{4:\n:20:REF\n-}{5:{CHK:ABCDEF}}";
        let blocks = extract_blocks(message).unwrap();
        assert_eq!(blocks.block_3.as_deref(), Some("{113:SEPA}{108:MT103}"));
        assert_eq!(blocks.block_5.as_deref(), Some("{CHK:ABCDEF}"));
    }

    #[test]
    fn test_missing_block4() {
        let message = "{1:F01BANKDEFFAXXX0123456789}{2:I103BANKDEFFAXXXU3003}";
        let err = extract_blocks(message).unwrap_err();
        assert_eq!(err, FramingError::MissingBlock4.into());
    }

    #[test]
    fn test_unterminated_block4() {
        let message = "{1:F01BANKDEFFAXXX0123456789}{4:\n:20:REF\n:23B:CRED\n";
        let err = extract_blocks(message).unwrap_err();
        assert_eq!(err, FramingError::UnterminatedBlock4.into());
    }

    #[test]
    fn test_empty_payload() {
        let err = extract_blocks("").unwrap_err();
        assert_eq!(err, FramingError::NoBlocksFound.into());
    }

    #[test]
    fn test_crlf_normalized() {
        let message = "{4:\r\n:20:REF\r\n:23B:CRED\r\n-}";
        let blocks = extract_blocks(message).unwrap();
        let entries = parse_block4_fields(blocks.block_4.as_deref().unwrap()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, "REF");
    }

    #[test]
    fn test_parse_block4_fields() {
        let block4 = ":20:FT21234567890\n:23B:CRED\n:32A:210315EUR1234567,89\n:50K:JOHN DOE\nACME CORP\n123 MAIN ST\n:59:JANE SMITH\nXYZ COMPANY";
        let entries = parse_block4_fields(block4).unwrap();

        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].tag, "20");
        assert_eq!(entries[0].option, None);
        assert_eq!(entries[0].value, "FT21234567890");
        assert_eq!(entries[2].full_tag(), "32A");
        assert_eq!(entries[3].tag, "50");
        assert_eq!(entries[3].option.as_deref(), Some("K"));
        assert_eq!(entries[3].value, "JOHN DOE\nACME CORP\n123 MAIN ST");
    }

    #[test]
    fn test_unknown_tags_preserved_in_order() {
        let block4 = ":20:REF\n:26T:K90\n:23B:CRED";
        let entries = parse_block4_fields(block4).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].full_tag(), "26T");
    }

    #[test]
    fn test_malformed_tag_line() {
        let block4 = "garbage before any tag\n:20:REF";
        let err = parse_block4_fields(block4).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Framing(FramingError::MalformedTagLine { line: 1, .. })
        ));
    }

    #[test]
    fn test_field_entry_round_trip() {
        let entry = FieldEntry::new("32", Some("A"), "210315EUR1234567,89");
        assert_eq!(entry.to_swift_string(), ":32A:210315EUR1234567,89");
    }
}
