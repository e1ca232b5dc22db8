//! ZON: an indentation-scoped key/value text format for scoring output.
//!
//! ```text
//! overall_score 20.0
//! word_count 15
//! criteria
//!   -
//!     name Content
//!     keywords_found [ coding, music, sports, projects ]
//! evidence
//!   Content
//!     description "Relevance and substance of the response."
//! ```
//!
//! - Mappings are one `key value` line per entry; a bare `key` opens a nested block
//!   indented by two spaces. Empty mappings are written `key {}`.
//! - Scalar-only sequences are inline: `[ a, b ]` (`[ ]` when empty). Sequences with
//!   nested values put each element on a `-` item line.
//! - `#` starts a comment outside double quotes.
//!
//! # Scalar encoding
//!
//! Strings that read as numbers or as `true`/`false`/`null` (any case) are written bare
//! and decode as those literals, so they do not survive a round trip as strings. Inline
//! lists split on commas without tracking brackets, so `[[1, 2]]` written by hand does not
//! decode as a nested list (the encoder never produces that form).

mod decode;
mod encode;

#[cfg(test)]
mod tests;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use decode::parse_literal;
pub use encode::safe_scalar;

/// Media type used for ZON bodies.
pub const ZON_CONTENT_TYPE: &str = "application/zon";

#[derive(Debug, Error)]
pub enum ZonError {
    #[error("line {line}: unterminated quoted key")]
    UnterminatedKey { line: usize },

    #[error("line {line}: sequence item inside a mapping block")]
    UnexpectedItem { line: usize },

    #[error("line {line}: mapping entry inside a sequence block")]
    UnexpectedEntry { line: usize },

    #[error("ZON value does not match the target type: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct ZonEncoder;

impl ZonEncoder {
    pub fn encode(value: &Value) -> String {
        encode::encode_document(value)
    }

    /// Serializes `value` through its JSON representation.
    pub fn encode_serializable<T: Serialize>(value: &T) -> Result<String, ZonError> {
        Ok(Self::encode(&serde_json::to_value(value)?))
    }
}

pub struct ZonDecoder;

impl ZonDecoder {
    pub fn decode(input: &str) -> Result<Value, ZonError> {
        decode::decode_document(input)
    }

    pub fn decode_into<T: DeserializeOwned>(input: &str) -> Result<T, ZonError> {
        Ok(serde_json::from_value(Self::decode(input)?)?)
    }
}
