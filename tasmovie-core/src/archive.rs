//! Forward-only access to the named entries of an archive container.
//!
//! Movie formats built on archives only care about entry names and bytes,
//! so this module hides which container (zip, tar, gzip-compressed tar) and
//! which compression method is underneath.
//!
//! Iteration is single-pass. Each entry must be opened and read to the end,
//! or discarded, before the reader advances:
//!
//! ```text
//! Ready ──next_entry──▶ Pending ──open_stream──▶ Open{drained: false}
//!   ▲                     │                         │ read to EOF
//!   │                     │ discard / next_entry    ▼
//!   └─────────────────────┴──────────────────── Open{drained: true}
//!
//! next_entry at end of archive ──▶ Exhausted
//! ```
//!
//! Advancing past a `Pending` entry discards it automatically. Advancing
//! past an `Open` stream that was not read to the end is a decoder bug and
//! fails with [`DecodeError::InternalUsage`].

use std::io::{self, Cursor, ErrorKind, Read, SeekFrom};

use flate2::read::GzDecoder;
use zip::ZipArchive;

use crate::util::decode_text;
use crate::{DecodeError, ParseOptions, ReadSeek};

const TAR_BLOCK: u64 = 512;
const USTAR_MAGIC_OFFSET: usize = 257;
const SNIFF_LEN: u64 = 512;

/// GNU long names longer than this are treated as corruption.
const MAX_LONG_NAME: u64 = 4096;

/// Container layouts the accessor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    Tar,
    GzipTar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Ready,
    Pending,
    Open { drained: bool },
    Exhausted,
}

#[derive(Debug, Clone)]
struct EntryMeta {
    name: String,
    is_directory: bool,
    size: u64,
}

/// Forward-only reader over the entries of an archive.
pub struct ArchiveReader<'a> {
    kind: ArchiveKind,
    backend: Backend<'a>,
    state: ReaderState,
    current: Option<String>,
    max_entry_bytes: u64,
}

impl<'a> ArchiveReader<'a> {
    /// Open an archive, detecting the container from its leading bytes.
    ///
    /// Fails with [`DecodeError::CorruptArchive`] when the stream is not a
    /// recognizable archive.
    pub fn open(reader: &'a mut dyn ReadSeek, options: &ParseOptions) -> Result<Self, DecodeError> {
        let kind = sniff(reader)?;
        let backend = match kind {
            ArchiveKind::Zip => {
                let archive = ZipArchive::new(reader).map_err(|e| {
                    DecodeError::corrupt_archive(format!("cannot read zip directory: {e}"))
                })?;
                Backend::Zip(ZipBackend {
                    archive,
                    next_index: 0,
                    current_index: 0,
                    buffer: Cursor::new(Vec::new()),
                })
            }
            ArchiveKind::GzipTar => Backend::Tar(TarBackend::new(Box::new(GzDecoder::new(reader)))),
            ArchiveKind::Tar => Backend::Tar(TarBackend::new(Box::new(reader))),
        };
        log::debug!("opened {:?} archive", kind);

        Ok(Self {
            kind,
            backend,
            state: ReaderState::Ready,
            current: None,
            max_entry_bytes: options.max_entry_bytes,
        })
    }

    /// The container layout that was detected.
    pub fn kind(&self) -> ArchiveKind {
        self.kind
    }

    /// Advance to the next entry. Returns `Ok(None)` at the end of the archive.
    pub fn next_entry(&mut self) -> Result<Option<ArchiveEntry<'_, 'a>>, DecodeError> {
        match self.state {
            ReaderState::Exhausted => return Ok(None),
            ReaderState::Open { drained: false } => {
                return Err(DecodeError::internal_usage(format!(
                    "entry '{}' was opened but not read to the end before advancing",
                    self.current.as_deref().unwrap_or_default()
                )));
            }
            ReaderState::Pending => {
                log::trace!(
                    "discarding unopened entry '{}'",
                    self.current.as_deref().unwrap_or_default()
                );
                self.backend.skip_current()?;
            }
            ReaderState::Ready | ReaderState::Open { drained: true } => {}
        }

        match self.backend.advance()? {
            Some(meta) => {
                self.state = ReaderState::Pending;
                self.current = Some(meta.name.clone());
                Ok(Some(ArchiveEntry { reader: self, meta }))
            }
            None => {
                self.state = ReaderState::Exhausted;
                self.current = None;
                Ok(None)
            }
        }
    }
}

/// One named member of an archive, valid until the reader advances.
pub struct ArchiveEntry<'r, 'a> {
    reader: &'r mut ArchiveReader<'a>,
    meta: EntryMeta,
}

impl<'r, 'a> ArchiveEntry<'r, 'a> {
    /// Entry name with any leading `./` removed.
    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn is_directory(&self) -> bool {
        self.meta.is_directory
    }

    /// Uncompressed size declared by the container.
    pub fn size(&self) -> u64 {
        self.meta.size
    }

    /// Open the entry's byte stream. Directories have no stream.
    pub fn open_stream(self) -> Result<EntryStream<'r, 'a>, DecodeError> {
        if self.meta.is_directory {
            return Err(DecodeError::internal_usage(format!(
                "directory entry '{}' has no stream",
                self.meta.name
            )));
        }
        let limit = self.reader.max_entry_bytes;
        if self.meta.size > limit {
            return Err(DecodeError::TooLarge {
                limit,
                actual: self.meta.size,
            });
        }

        self.reader.backend.open_current(&self.meta, limit)?;
        self.reader.state = ReaderState::Open { drained: false };
        Ok(EntryStream {
            reader: self.reader,
        })
    }

    /// Open the entry and read it all as text.
    pub fn read_text(self) -> Result<String, DecodeError> {
        self.open_stream()?.read_text()
    }

    /// Skip the entry without inspecting it.
    pub fn discard(self) -> Result<(), DecodeError> {
        self.reader.backend.skip_current()?;
        self.reader.state = ReaderState::Ready;
        Ok(())
    }
}

/// The byte stream of an opened entry.
pub struct EntryStream<'r, 'a> {
    reader: &'r mut ArchiveReader<'a>,
}

impl EntryStream<'_, '_> {
    /// Read the rest of the entry as text (UTF-8, falling back to Latin-1).
    pub fn read_text(mut self) -> Result<String, DecodeError> {
        let mut bytes = Vec::new();
        self.read_to_end(&mut bytes)?;
        Ok(decode_text(&bytes))
    }

    /// Drop the unread remainder of the entry.
    pub fn discard(self) -> Result<(), DecodeError> {
        self.reader.backend.skip_current()?;
        self.reader.state = ReaderState::Ready;
        Ok(())
    }
}

impl Read for EntryStream<'_, '_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.backend.read_current(buf)?;
        if n == 0 && !buf.is_empty() {
            self.reader.state = ReaderState::Open { drained: true };
        }
        Ok(n)
    }
}

// ---------------------------------------------------------------------------
// Container detection
// ---------------------------------------------------------------------------

fn sniff(reader: &mut dyn ReadSeek) -> Result<ArchiveKind, DecodeError> {
    reader.seek(SeekFrom::Start(0))?;
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    (&mut *reader).take(SNIFF_LEN).read_to_end(&mut head)?;
    reader.seek(SeekFrom::Start(0))?;

    if head.starts_with(b"PK\x03\x04") || head.starts_with(b"PK\x05\x06") {
        Ok(ArchiveKind::Zip)
    } else if head.starts_with(&[0x1F, 0x8B]) {
        Ok(ArchiveKind::GzipTar)
    } else if head.get(USTAR_MAGIC_OFFSET..USTAR_MAGIC_OFFSET + 5) == Some(&b"ustar"[..]) {
        Ok(ArchiveKind::Tar)
    } else if head.is_empty() {
        Err(DecodeError::corrupt_archive("input is empty"))
    } else {
        Err(DecodeError::corrupt_archive("unrecognized archive signature"))
    }
}

fn normalize_name(name: &str) -> String {
    name.trim_start_matches("./").to_string()
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

enum Backend<'a> {
    Zip(ZipBackend<'a>),
    Tar(TarBackend<'a>),
}

impl Backend<'_> {
    fn advance(&mut self) -> Result<Option<EntryMeta>, DecodeError> {
        match self {
            Self::Zip(zip) => zip.advance(),
            Self::Tar(tar) => tar.advance(),
        }
    }

    fn open_current(&mut self, meta: &EntryMeta, limit: u64) -> Result<(), DecodeError> {
        match self {
            Self::Zip(zip) => zip.open_current(meta, limit),
            // Tar entries stream straight from the container.
            Self::Tar(_) => Ok(()),
        }
    }

    fn read_current(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Zip(zip) => zip.buffer.read(buf),
            Self::Tar(tar) => tar.read_current(buf),
        }
    }

    fn skip_current(&mut self) -> Result<(), DecodeError> {
        match self {
            Self::Zip(zip) => {
                zip.buffer = Cursor::new(Vec::new());
                Ok(())
            }
            Self::Tar(tar) => tar.skip_current(),
        }
    }
}

/// Zip archives are random access; entries are walked in central-directory
/// order and decompressed into memory only when opened.
struct ZipBackend<'a> {
    archive: ZipArchive<&'a mut dyn ReadSeek>,
    next_index: usize,
    current_index: usize,
    buffer: Cursor<Vec<u8>>,
}

impl ZipBackend<'_> {
    fn advance(&mut self) -> Result<Option<EntryMeta>, DecodeError> {
        if self.next_index >= self.archive.len() {
            return Ok(None);
        }
        let index = self.next_index;
        self.next_index += 1;

        let file = self.archive.by_index_raw(index).map_err(|e| {
            DecodeError::corrupt_archive(format!("cannot read zip entry #{index}: {e}"))
        })?;
        let meta = EntryMeta {
            name: normalize_name(file.name()),
            is_directory: file.is_dir(),
            size: file.size(),
        };
        drop(file);

        self.current_index = index;
        self.buffer = Cursor::new(Vec::new());
        Ok(Some(meta))
    }

    fn open_current(&mut self, meta: &EntryMeta, limit: u64) -> Result<(), DecodeError> {
        let mut file = self.archive.by_index(self.current_index).map_err(|e| {
            DecodeError::corrupt_archive(format!("cannot open zip entry '{}': {e}", meta.name))
        })?;

        // The declared size was already checked; the take() guards against
        // entries that decompress to more than they declare.
        let mut data = Vec::with_capacity(meta.size as usize);
        file.by_ref()
            .take(limit.saturating_add(1))
            .read_to_end(&mut data)
            .map_err(|e| {
                DecodeError::corrupt_archive(format!("cannot decompress '{}': {e}", meta.name))
            })?;
        drop(file);

        if data.len() as u64 > limit {
            return Err(DecodeError::TooLarge {
                limit,
                actual: data.len() as u64,
            });
        }
        self.buffer = Cursor::new(data);
        Ok(())
    }
}

/// Tar archives (optionally gzip-compressed) are read strictly in order
/// from the underlying stream.
struct TarBackend<'a> {
    stream: Box<dyn Read + 'a>,
    remaining: u64,
    padding: u64,
}

impl<'a> TarBackend<'a> {
    fn new(stream: Box<dyn Read + 'a>) -> Self {
        Self {
            stream,
            remaining: 0,
            padding: 0,
        }
    }

    fn advance(&mut self) -> Result<Option<EntryMeta>, DecodeError> {
        let mut long_name: Option<String> = None;

        loop {
            let mut block = [0u8; TAR_BLOCK as usize];
            if !read_block(self.stream.as_mut(), &mut block)? {
                return Ok(None);
            }
            // A zero block marks the end of the archive.
            if block.iter().all(|&b| b == 0) {
                return Ok(None);
            }

            let header = tar::Header::from_byte_slice(&block);
            verify_checksum(&block, header)?;
            let size = header
                .entry_size()
                .map_err(|e| DecodeError::corrupt_archive(format!("bad tar entry size: {e}")))?;
            let padding = (TAR_BLOCK - size % TAR_BLOCK) % TAR_BLOCK;
            let entry_type = header.entry_type();

            if entry_type.is_gnu_longname() {
                if size > MAX_LONG_NAME {
                    return Err(DecodeError::corrupt_archive(format!(
                        "tar long name of {size} bytes"
                    )));
                }
                let mut raw = Vec::with_capacity(size as usize);
                self.stream.as_mut().take(size).read_to_end(&mut raw)?;
                if raw.len() as u64 != size {
                    return Err(DecodeError::corrupt_archive("truncated tar long name"));
                }
                skip_exact(self.stream.as_mut(), padding)?;
                let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
                long_name = Some(decode_text(&raw[..end]));
                continue;
            }

            if entry_type.is_pax_local_extensions() || entry_type.is_pax_global_extensions() {
                log::trace!("skipping pax extension header ({size} bytes)");
                skip_exact(self.stream.as_mut(), size + padding)?;
                continue;
            }

            let name = match long_name.take() {
                Some(name) => name,
                None => decode_text(&header.path_bytes()),
            };
            let name = normalize_name(&name);
            let is_directory = entry_type.is_dir() || name.ends_with('/');

            self.remaining = size;
            self.padding = padding;
            return Ok(Some(EntryMeta {
                name,
                is_directory,
                size,
            }));
        }
    }

    fn read_current(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.remaining == 0 {
            self.consume_padding()?;
            return Ok(0);
        }

        let max = buf.len().min(usize::try_from(self.remaining).unwrap_or(usize::MAX));
        let n = self.stream.read(&mut buf[..max])?;
        if n == 0 {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                "tar entry ends before its declared size",
            ));
        }
        self.remaining -= n as u64;
        Ok(n)
    }

    fn consume_padding(&mut self) -> io::Result<()> {
        if self.padding > 0 {
            let copied = io::copy(&mut self.stream.as_mut().take(self.padding), &mut io::sink())?;
            if copied != self.padding {
                return Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "tar entry padding is truncated",
                ));
            }
            self.padding = 0;
        }
        Ok(())
    }

    fn skip_current(&mut self) -> Result<(), DecodeError> {
        skip_exact(self.stream.as_mut(), self.remaining + self.padding)?;
        self.remaining = 0;
        self.padding = 0;
        Ok(())
    }
}

/// Fill one tar block. Returns `false` on a clean end of stream.
fn read_block(stream: &mut dyn Read, block: &mut [u8]) -> Result<bool, DecodeError> {
    let mut filled = 0;
    while filled < block.len() {
        match stream.read(&mut block[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(DecodeError::corrupt_archive(format!(
                    "cannot read tar header: {e}"
                )));
            }
        }
    }
    match filled {
        0 => Ok(false),
        n if n == block.len() => Ok(true),
        n => Err(DecodeError::corrupt_archive(format!(
            "truncated tar header ({n} of {} bytes)",
            block.len()
        ))),
    }
}

fn verify_checksum(block: &[u8], header: &tar::Header) -> Result<(), DecodeError> {
    let stored = header
        .cksum()
        .map_err(|e| DecodeError::corrupt_archive(format!("bad tar header checksum: {e}")))?;
    // The checksum field itself is summed as if it held spaces.
    let computed: u32 = block
        .iter()
        .enumerate()
        .map(|(i, &b)| if (148..156).contains(&i) { u32::from(b' ') } else { u32::from(b) })
        .sum();
    if stored != computed {
        return Err(DecodeError::corrupt_archive(format!(
            "tar header checksum mismatch (stored {stored}, computed {computed})"
        )));
    }
    Ok(())
}

fn skip_exact(stream: &mut dyn Read, len: u64) -> Result<(), DecodeError> {
    let copied = io::copy(&mut stream.take(len), &mut io::sink())?;
    if copied != len {
        return Err(DecodeError::corrupt_archive(format!(
            "archive ends {} bytes early",
            len - copied
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/archive_tests.rs"]
mod tests;
