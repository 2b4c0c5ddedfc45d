//! Byte-stream framing.
//!
//! Scans a byte stream for the start-of-frame marker and accumulates one
//! complete frame (header, declared payload, checksum) at a time. The framer
//! only locates and sizes frames; all validation belongs to
//! [crate::Parser].

use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::frame::Header;

/// Locates marker-aligned frames in a byte stream.
///
/// Iterates over complete frame buffers. Bytes between frames that are not
/// part of a frame (line noise, partial frames after a dropout) are skipped
/// until the next marker. The stream ends at EOF; a frame cut off by EOF is
/// discarded.
///
/// # Example
/// ```no_run
/// use mavframe::{Framer, Parser, Registry};
///
/// let registry = Registry::with_file("dialect.json").unwrap();
/// let mut parser = Parser::new(&registry);
/// let port = std::fs::File::open("/dev/ttyUSB0").unwrap();
/// for frame in Framer::new(port) {
///     match parser.decode(&frame.unwrap()) {
///         Ok(decoded) => println!("{}", decoded.message.name),
///         Err(err) => eprintln!("bad frame: {err}"),
///     }
/// }
/// ```
pub struct Framer<R>
where
    R: Read,
{
    reader: R,
}

impl<R> Framer<R>
where
    R: Read,
{
    pub fn new(reader: R) -> Self {
        Framer { reader }
    }

    /// Read exactly `buf.len()` bytes. `Ok(false)` on EOF.
    fn fill(&mut self, buf: &mut [u8]) -> std::io::Result<bool> {
        match self.reader.read_exact(buf) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Scan forward to the next start marker. `Ok(false)` on EOF.
    fn seek_marker(&mut self) -> std::io::Result<bool> {
        let mut skipped: usize = 0;
        let mut byte = [0u8; 1];
        loop {
            if !self.fill(&mut byte)? {
                return Ok(false);
            }
            if byte[0] == Header::MARKER {
                if skipped > 0 {
                    trace!(skipped, "skipped bytes before marker");
                }
                return Ok(true);
            }
            skipped += 1;
        }
    }

    fn read_frame(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        if !self.seek_marker()? {
            return Ok(None);
        }

        let mut buf = vec![0u8; Header::LEN];
        buf[0] = Header::MARKER;
        if !self.fill(&mut buf[1..])? {
            return Ok(None);
        }

        let rest = buf[1] as usize + Header::CHECKSUM_LEN;
        let header_len = buf.len();
        buf.resize(header_len + rest, 0);
        if !self.fill(&mut buf[header_len..])? {
            return Ok(None);
        }

        Ok(Some(buf))
    }
}

impl<R> Iterator for Framer<R>
where
    R: Read,
{
    type Item = std::io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_frame().transpose()
    }
}
