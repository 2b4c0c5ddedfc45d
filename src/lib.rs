#![doc = include_str!("../README.md")]

pub mod checksum;

mod error;
mod fields;
mod frame;
mod framer;
mod layout;
mod parser;
mod schema;

pub use error::{Error, Result};
pub use frame::Header;
pub use framer::Framer;
pub use parser::{DecodedMessage, Parser, SequenceGap};
pub use schema::{FieldDescriptor, Message, MessageSchema, MsgId, Registry, ScalarType, Value};
