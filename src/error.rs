use crate::schema::MsgId;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Buffer does not contain enough bytes for the frame it claims to hold.
    #[error("buffer too short: have {actual} bytes, need {minimum}")]
    BufferTooShort { actual: usize, minimum: usize },

    /// No schema registered for the message id.
    #[error("no schema for message id {id}")]
    UnknownMessage { id: MsgId },

    /// Computed checksum does not match the transmitted one.
    ///
    /// `expected` is the value computed over the received bytes, `actual` the
    /// value carried by the frame.
    #[error("checksum mismatch: computed {expected:#06x}, frame has {actual:#06x}")]
    ChecksumMismatch { expected: u16, actual: u16 },

    /// Frame sequence number is not the successor of the previous one seen on
    /// this link, indicating likely frame loss.
    #[error("sequence gap: expected {expected}, got {actual}")]
    SequenceGap { expected: u8, actual: u8 },
}

pub type Result<T> = std::result::Result<T, Error>;
