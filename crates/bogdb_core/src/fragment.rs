//! Fragments and their on-disk record format.
//!
//! A record is a timestamp header line followed by the raw contents:
//!
//! ```text
//! 2024-03-01T17:04:12Z\n<contents, verbatim, newlines and all>
//! ```

use crate::error::ParseError;
use chrono::{DateTime, SecondsFormat, Utc};

/// A timestamped run of bytes, stored with no link to any other fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// When the bytes were first buried. Re-burial keeps this value.
    pub interred_at: DateTime<Utc>,
    /// The bytes themselves.
    pub contents: Vec<u8>,
}

impl Fragment {
    /// Creates a fragment.
    ///
    /// The header carries whole seconds only, so an `interred_at` with a
    /// sub-second part does not survive a trip through the store unchanged.
    #[must_use]
    pub fn new(interred_at: DateTime<Utc>, contents: Vec<u8>) -> Self {
        Self {
            interred_at,
            contents,
        }
    }

    /// Encodes this fragment as a store record.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        encode_record(self.interred_at, &self.contents)
    }

    /// Parses a store record.
    ///
    /// The header ends at the first newline; everything after it is
    /// contents. Timestamps with any RFC3339 offset are accepted and
    /// normalised to UTC.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no header line, or it is not UTF-8, or
    /// it is not an RFC3339 timestamp.
    pub fn parse(record: &[u8]) -> Result<Self, ParseError> {
        let newline = record
            .iter()
            .position(|&b| b == b'\n')
            .ok_or(ParseError::MissingHeader)?;
        let header = std::str::from_utf8(&record[..newline]).map_err(ParseError::HeaderNotUtf8)?;
        let interred_at = DateTime::parse_from_rfc3339(header)
            .map_err(|source| ParseError::InvalidTimestamp {
                header: header.to_string(),
                source,
            })?
            .with_timezone(&Utc);

        Ok(Self {
            interred_at,
            contents: record[newline + 1..].to_vec(),
        })
    }
}

/// Formats a timestamp the way record headers carry it.
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Encodes a record without building a [`Fragment`] first.
#[must_use]
pub fn encode_record(interred_at: DateTime<Utc>, contents: &[u8]) -> Vec<u8> {
    let header = format_timestamp(interred_at);
    let mut record = Vec::with_capacity(header.len() + 1 + contents.len());
    record.extend_from_slice(header.as_bytes());
    record.push(b'\n');
    record.extend_from_slice(contents);
    record
}
