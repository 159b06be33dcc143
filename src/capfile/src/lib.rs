//! # capfile
//! `capfile` reads classic pcap capture containers: it validates the
//! global header, determines the file's byte order from the magic
//! number, and hands out one captured frame at a time together with
//! its record metadata.
//!
//! The reader is a lazy, finite, non-restartable source. End of input
//! ends the sequence without error; a truncated frame body is reported
//! on the diagnostic stream and ends the file (the bytes past it can
//! no longer be framed).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use log::warn;
use thiserror::Error;

/// magic number as stored by a writer of the same byte order
pub const MAGIC_NATIVE: u32 = 0xa1b2c3d4;
/// magic number as seen when the writer had the opposite byte order
pub const MAGIC_SWAPPED: u32 = 0xd4c3b2a1;

// LINK-LAYER TYPES
pub const LINKTYPE_IEEE802_11: u32 = 105;
pub const LINKTYPE_PRISM_HEADER: u32 = 119;
pub const LINKTYPE_RADIOTAP_HDR: u32 = 127;
pub const LINKTYPE_PPI_HDR: u32 = 192;

const GLOBAL_HEADER_LEN: usize = 24;
const RECORD_HEADER_LEN: usize = 16;
/// hard upper bound on a single frame body, whatever snaplen claims
pub const MAX_FRAME_LEN: u32 = 65535;

/// conditions that abort reading of one capture file
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("invalid pcap magic number {0:#010x} (not a pcap file)")]
    BadMagic(u32),
    #[error("no 802.11 wireless traffic data (network {0})")]
    UnsupportedLinkType(u32),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    fn u16(self, buf: &[u8]) -> u16 {
        match self {
            Endian::Little => LittleEndian::read_u16(buf),
            Endian::Big => BigEndian::read_u16(buf),
        }
    }

    fn u32(self, buf: &[u8]) -> u32 {
        match self {
            Endian::Little => LittleEndian::read_u32(buf),
            Endian::Big => BigEndian::read_u32(buf),
        }
    }
}

/// decoded pcap global header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalHeader {
    pub version_major: u16,
    pub version_minor: u16,
    pub thiszone: i32,
    pub sigfigs: u32,
    pub snaplen: u32,
    pub link_type: u32,
}

/// per-frame record metadata, byte-order-normalized
///
/// `rel_sec`/`rel_usec` are relative to the first frame of the file,
/// for human-readable diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMeta {
    pub ts_sec: u32,
    pub ts_usec: u32,
    pub incl_len: u32,
    pub orig_len: u32,
    pub rel_sec: u32,
    pub rel_usec: u32,
}

/// one captured frame: metadata plus the raw link-layer bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub meta: FrameMeta,
    pub data: Vec<u8>,
}

/// Lazy pcap frame source
/// ## Description
/// Validates the global header on construction and then yields frames
/// one at a time via [`Reader::next_frame`] (or the `Iterator` impl).
/// ## Example
/// **Basic usage:**
/// ```no_run
///     let mut reader = capfile::Reader::open("capture.pcap").unwrap();
///     while let Some(frame) = reader.next_frame() {
///         println!("{} bytes", frame.data.len());
///     }
/// ```
pub struct Reader<R> {
    input: R,
    source: String,
    endian: Endian,
    header: GlobalHeader,
    start: Option<(u32, u32)>,
    done: bool,
}

impl Reader<BufReader<File>> {
    /// Open a capture file from disk, naming it by its base name in
    /// diagnostics.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = File::open(path)?;
        Reader::new(BufReader::new(file), &source)
    }
}

impl<R: Read> Reader<R> {
    /// Wrap any byte source carrying a pcap stream. `source` is the
    /// name used in diagnostics and output trailers.
    pub fn new(mut input: R, source: &str) -> Result<Self, CaptureError> {
        let mut buf = [0u8; GLOBAL_HEADER_LEN];
        input.read_exact(&mut buf)?;

        // the magic is self-describing: read it one way, and the value
        // tells us which way the writer meant
        let endian = match LittleEndian::read_u32(&buf[0..4]) {
            MAGIC_NATIVE => Endian::Little,
            MAGIC_SWAPPED => Endian::Big,
            other => return Err(CaptureError::BadMagic(other)),
        };

        let header = GlobalHeader {
            version_major: endian.u16(&buf[4..6]),
            version_minor: endian.u16(&buf[6..8]),
            thiszone: endian.u32(&buf[8..12]) as i32,
            sigfigs: endian.u32(&buf[12..16]),
            snaplen: endian.u32(&buf[16..20]),
            link_type: endian.u32(&buf[20..24]),
        };

        match header.link_type {
            LINKTYPE_IEEE802_11 | LINKTYPE_PRISM_HEADER | LINKTYPE_RADIOTAP_HDR
            | LINKTYPE_PPI_HDR => {}
            other => return Err(CaptureError::UnsupportedLinkType(other)),
        }

        Ok(Reader {
            input,
            source: source.to_owned(),
            endian,
            header,
            start: None,
            done: false,
        })
    }

    pub fn header(&self) -> &GlobalHeader {
        &self.header
    }

    pub fn link_type(&self) -> u32 {
        self.header.link_type
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Pull the next frame, or `None` at end of input.
    ///
    /// A frame body shorter than its record header declares is a
    /// truncation: it is warned about and the sequence ends, since the
    /// following record boundary is unknowable. The same applies to a
    /// record claiming more captured bytes than the snapshot length.
    pub fn next_frame(&mut self) -> Option<Frame> {
        if self.done {
            return None;
        }

        let mut hdr = [0u8; RECORD_HEADER_LEN];
        if self.input.read_exact(&mut hdr).is_err() {
            // end of input at a record boundary, or a final partial
            // header; either way the sequence is over
            self.done = true;
            return None;
        }

        let ts_sec = self.endian.u32(&hdr[0..4]);
        let ts_usec = self.endian.u32(&hdr[4..8]);
        let incl_len = self.endian.u32(&hdr[8..12]);
        let orig_len = self.endian.u32(&hdr[12..16]);

        let (start_sec, start_usec) = *self.start.get_or_insert((ts_sec, ts_usec));
        let (rel_sec, rel_usec) = if start_usec > ts_usec {
            (
                ts_sec.wrapping_sub(start_sec).wrapping_sub(1),
                1_000_000 - (start_usec - ts_usec),
            )
        } else {
            (ts_sec.wrapping_sub(start_sec), ts_usec - start_usec)
        };

        if incl_len > self.header.snaplen.min(MAX_FRAME_LEN) {
            warn!(
                "{}: frame claims {} captured bytes but snaplen is {}",
                self.source, incl_len, self.header.snaplen
            );
            self.done = true;
            return None;
        }

        let mut data = Vec::with_capacity(incl_len as usize);
        match self.input.by_ref().take(incl_len as u64).read_to_end(&mut data) {
            Ok(n) if n == incl_len as usize => {}
            Ok(n) => {
                warn!(
                    "{}: truncated last frame (expected {} bytes, got {})",
                    self.source, incl_len, n
                );
                self.done = true;
                return None;
            }
            Err(err) => {
                warn!("{}: read error mid-frame: {}", self.source, err);
                self.done = true;
                return None;
            }
        }

        Some(Frame {
            meta: FrameMeta {
                ts_sec,
                ts_usec,
                incl_len,
                orig_len,
                rel_sec,
                rel_usec,
            },
            data,
        })
    }
}

impl<R: Read> Iterator for Reader<R> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        self.next_frame()
    }
}
