//! Trace stream with header validation and checked reads.

use crate::encoding::Wire;
use extplay_core::{PlaybackError, PlaybackResult, PlayerConfig, ProtocolVersion};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info};

/// Byte source a trace can be played from
pub trait TraceSource: Read + Seek {}

impl<T: Read + Seek> TraceSource for T {}

/// Fixed header at the start of every trace
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraceHeader {
    /// Protocol version the recorder wrote
    pub version: ProtocolVersion,
    /// Command line of the recorded server, up to its first NUL
    pub cmdline: String,
}

impl TraceHeader {
    /// Create a header for the supported version
    #[must_use]
    pub fn new(cmdline: impl Into<String>) -> Self {
        Self {
            version: ProtocolVersion::SUPPORTED,
            cmdline: cmdline.into(),
        }
    }

    /// Override the version
    #[must_use]
    pub fn with_version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    /// Append the header in trace layout: minor, major, length, bytes
    pub fn encode(&self, out: &mut Vec<u8>) {
        self.version.minor.encode(out);
        self.version.major.encode(out);
        self.cmdline.encode(out);
    }

    fn decode(stream: &mut TraceStream, max_cmdline_len: usize) -> PlaybackResult<Self> {
        let minor = u16::decode(stream)?;
        let major = u16::decode(stream)?;
        let version = ProtocolVersion::new(major, minor);
        version.ensure_playable_by(ProtocolVersion::SUPPORTED)?;

        let len = u32::decode(stream)?;
        if len as usize > max_cmdline_len {
            return Err(PlaybackError::CmdlineTooLong {
                len,
                limit: max_cmdline_len,
            });
        }
        let mut raw = vec![0u8; len as usize];
        stream.read_exact(&mut raw)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        let cmdline = String::from_utf8_lossy(&raw[..end]).into_owned();

        Ok(Self { version, cmdline })
    }
}

/// Sequential reader over a validated trace
pub struct TraceStream {
    source: Box<dyn TraceSource>,
    size: u64,
    offset: u64,
    header: TraceHeader,
}

impl TraceStream {
    /// Open a trace file and validate its header
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or the header is invalid
    pub fn open(path: impl AsRef<Path>, config: &PlayerConfig) -> PlaybackResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening trace");
        let file = File::open(path)?;
        Self::from_source(BufReader::new(file), config)
    }

    /// Play a trace held in memory
    ///
    /// # Errors
    ///
    /// Returns error if the header is invalid
    pub fn from_bytes(bytes: Vec<u8>, config: &PlayerConfig) -> PlaybackResult<Self> {
        Self::from_source(Cursor::new(bytes), config)
    }

    /// Play a trace from any seekable source
    ///
    /// # Errors
    ///
    /// Returns error if the source cannot be read or the header is invalid
    pub fn from_source<S: TraceSource + 'static>(
        mut source: S,
        config: &PlayerConfig,
    ) -> PlaybackResult<Self> {
        let size = source.seek(SeekFrom::End(0))?;
        source.seek(SeekFrom::Start(0))?;

        let mut stream = Self {
            source: Box::new(source),
            size,
            offset: 0,
            header: TraceHeader::default(),
        };
        stream.header = TraceHeader::decode(&mut stream, config.max_cmdline_len)?;

        info!(
            version = %stream.header.version,
            cmdline = %stream.header.cmdline,
            size,
            "loaded trace"
        );
        Ok(stream)
    }

    /// Validated header
    #[must_use]
    pub fn header(&self) -> &TraceHeader {
        &self.header
    }

    /// Total trace size in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Current read offset
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Bytes left to read
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.size.saturating_sub(self.offset)
    }

    /// Whether every byte has been consumed
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Fail unless `len` more bytes can be read
    ///
    /// # Errors
    ///
    /// Returns `Truncated` if the trace ends first
    pub fn ensure_available(&self, len: u64) -> PlaybackResult<()> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(PlaybackError::Truncated {
                offset: self.offset,
                needed: len - remaining,
            });
        }
        Ok(())
    }

    /// Fill `buf` completely
    ///
    /// # Errors
    ///
    /// Returns error on short read or I/O failure
    pub fn read_exact(&mut self, buf: &mut [u8]) -> PlaybackResult<()> {
        let len = buf.len() as u64;
        self.ensure_available(len)?;
        self.source.read_exact(buf).map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => PlaybackError::Truncated {
                offset: self.offset,
                needed: len,
            },
            _ => PlaybackError::from(err),
        })?;
        self.offset += len;
        Ok(())
    }

    /// Read a `u32` length-prefixed byte blob
    ///
    /// # Errors
    ///
    /// Returns error if the declared length exceeds the remaining trace
    pub fn read_blob(&mut self) -> PlaybackResult<Vec<u8>> {
        let len = u32::decode(self)?;
        self.ensure_available(u64::from(len))?;
        let mut buf = vec![0u8; len as usize];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Read one decodable value
    ///
    /// # Errors
    ///
    /// Returns error if the stream ends inside the value
    pub fn read<T: Wire>(&mut self) -> PlaybackResult<T> {
        T::decode(self)
    }
}

impl fmt::Debug for TraceStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceStream")
            .field("header", &self.header)
            .field("size", &self.size)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}
