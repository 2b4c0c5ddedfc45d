//! Frame validation and decode orchestration.

use tracing::{debug, trace};

use crate::checksum;
use crate::error::{Error, Result};
use crate::frame::Header;
use crate::layout;
use crate::schema::{Message, Registry};

/// A discontinuity in the per-link frame counter, indicating likely loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceGap {
    /// Counter value that would have continued the sequence.
    pub expected: u8,
    /// Counter value actually received.
    pub actual: u8,
}

/// A [Message] decoded from one frame, along with decode observations.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    pub message: Message,
    /// Present when this frame did not continue the previous frame's
    /// sequence number. Loss detection is observational; the message itself
    /// is still valid.
    pub gap: Option<SequenceGap>,
}

/// Decodes marker-aligned frame buffers into [Message]s.
///
/// One `Parser` per physical link: the only mutable state is the last seen
/// sequence number, and gap detection is meaningless if frames from
/// different links interleave through the same instance.
///
/// # Example
/// ```no_run
/// use mavframe::{Parser, Registry};
///
/// let registry = Registry::with_file("dialect.json").unwrap();
/// let mut parser = Parser::new(&registry);
/// let frame: Vec<u8> = vec![];
/// match parser.decode(&frame) {
///     Ok(decoded) => println!("{}", decoded.message.name),
///     Err(err) => eprintln!("bad frame: {err}"),
/// }
/// ```
pub struct Parser<'a> {
    registry: &'a Registry,
    last_sequence: Option<u8>,
    strict_sequence: bool,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(registry: &'a Registry) -> Self {
        Parser {
            registry,
            last_sequence: None,
            strict_sequence: false,
        }
    }

    /// Treat a sequence gap as fatal for the frame instead of advisory.
    /// Tracking still updates, so the following in-sequence frame decodes.
    #[must_use]
    pub fn with_strict_sequence(mut self, strict: bool) -> Self {
        self.strict_sequence = strict;
        self
    }

    /// Decode one frame.
    ///
    /// `buffer` must hold one complete, marker-aligned frame, as produced by
    /// [crate::Framer]. Any failure aborts the whole frame; no partial
    /// message is returned.
    ///
    /// # Errors
    /// - [`Error::BufferTooShort`] if `buffer` cannot hold the frame its
    ///   header declares; checked before any checksum or field work.
    /// - [`Error::UnknownMessage`] if the registry has no schema for the
    ///   message id.
    /// - [`Error::ChecksumMismatch`] if the frame checksum does not verify.
    /// - [`Error::SequenceGap`] only in strict mode; by default a gap is
    ///   reported through [`DecodedMessage::gap`].
    pub fn decode(&mut self, buffer: &[u8]) -> Result<DecodedMessage> {
        let header = Header::decode(buffer).ok_or(Error::BufferTooShort {
            actual: buffer.len(),
            minimum: Header::OVERHEAD,
        })?;
        if buffer.len() < header.frame_len() {
            return Err(Error::BufferTooShort {
                actual: buffer.len(),
                minimum: header.frame_len(),
            });
        }

        // The checksum seed is per-schema, so resolve the schema first
        let schema = self
            .registry
            .get(header.message_id)
            .ok_or(Error::UnknownMessage {
                id: header.message_id,
            })?;

        // Everything after the start marker up to the checksum field
        let payload_end = Header::LEN + header.payload_len as usize;
        let expected = checksum::compute(&buffer[1..payload_end], schema.crc_seed);
        let actual = u16::from_le_bytes([buffer[payload_end], buffer[payload_end + 1]]);
        if expected != actual {
            return Err(Error::ChecksumMismatch { expected, actual });
        }

        // Update unconditionally so continuity tracking self-heals after a gap
        let gap = match self.last_sequence.replace(header.sequence) {
            Some(last) => {
                let next = last.wrapping_add(1);
                (header.sequence != next).then_some(SequenceGap {
                    expected: next,
                    actual: header.sequence,
                })
            }
            None => None,
        };
        if let Some(gap) = gap {
            debug!(
                system_id = header.system_id,
                expected = gap.expected,
                actual = gap.actual,
                "sequence gap"
            );
            if self.strict_sequence {
                return Err(Error::SequenceGap {
                    expected: gap.expected,
                    actual: gap.actual,
                });
            }
        }

        let mut message = schema.instantiate(header.system_id, header.component_id);
        layout::populate(&mut message, &schema.fields, &buffer[Header::LEN..payload_end])?;
        trace!(message = %message.name, sequence = header.sequence, "decoded frame");

        Ok(DecodedMessage { message, gap })
    }
}
