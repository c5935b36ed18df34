//! Bounded reads of the beginning, middle and end of some content.
//!
//! Two regimes produce the same [`Features`]:
//!
//! - small content is read whole and cut into windows in memory;
//! - large content is never materialized. Each edge is scanned at most two
//!   blocks deep (the edge block plus one top-up block) and only those
//!   blocks plus the middle window (a single seek + read) are touched.
//!
//! Both regimes strip whitespace only inside that two-block edge region, so
//! whitespace past it counts as content.

use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Range;

use crate::constants::WHITESPACE_BYTES;
use crate::features::encoder::{FeatureEncoder, Features};

#[inline]
pub fn is_whitespace(b: u8) -> bool {
    WHITESPACE_BYTES.contains(&b)
}

/// Location of the content that remains after both edges are trimmed,
/// together with the edge regions the trimming was allowed to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimmedSpan {
    pub start: u64,
    pub len: u64,
    /// End of the leading region `beg` is taken from.
    pub head_end: u64,
    /// Start of the trailing region `end` is taken from.
    pub tail_start: u64,
}

impl TrimmedSpan {
    /// Trim at most `limit` bytes of whitespace from each edge of `content`.
    pub fn of(
        content: &[u8],
        limit: usize,
    ) -> Self {
        let total = content.len();
        let head_end = total.min(limit);
        let tail_start = total.saturating_sub(limit);
        let start = content[..head_end]
            .iter()
            .position(|&b| !is_whitespace(b))
            .unwrap_or(head_end);
        let floor = start.max(tail_start);
        let end = content[floor..]
            .iter()
            .rposition(|&b| !is_whitespace(b))
            .map_or(floor, |p| floor + p + 1);
        Self {
            start: start as u64,
            len: (end - start) as u64,
            head_end: head_end as u64,
            tail_start: tail_start as u64,
        }
    }

    pub fn end(&self) -> u64 {
        self.start + self.len
    }

    /// Trimmed bytes inside the leading region.
    pub fn head(&self) -> Range<u64> {
        self.start..self.end().min(self.head_end)
    }

    /// Trimmed bytes inside the trailing region.
    pub fn tail(&self) -> Range<u64> {
        self.start.max(self.tail_start)..self.end()
    }

    pub fn beg_range(
        &self,
        beg_size: usize,
    ) -> Range<u64> {
        let head = self.head();
        head.start..head.end.min(head.start + beg_size as u64)
    }

    pub fn end_range(
        &self,
        end_size: usize,
    ) -> Range<u64> {
        let tail = self.tail();
        tail.end.saturating_sub(end_size as u64).max(tail.start)..tail.end
    }

    /// `mid_size` bytes whose left edge is `len/2 - mid_size/2` into the
    /// span, or the whole span when it is shorter than the window.
    pub fn mid_range(
        &self,
        mid_size: usize,
    ) -> Range<u64> {
        let size = mid_size as u64;
        if self.len >= size {
            let start = self.start + self.len / 2 - size / 2;
            start..start + size
        } else {
            self.start..self.end()
        }
    }
}

/// Contiguous bytes read while scanning an edge, kept so window reads that
/// fall inside them do not touch the reader again.
#[derive(Debug, Default)]
struct EdgeBlock {
    offset: u64,
    bytes: Vec<u8>,
}

impl EdgeBlock {
    fn end(&self) -> u64 {
        self.offset + self.bytes.len() as u64
    }

    fn slice(
        &self,
        range: &Range<u64>,
    ) -> Option<&[u8]> {
        if range.start >= self.offset && range.end <= self.end() {
            let from = (range.start - self.offset) as usize;
            let to = (range.end - self.offset) as usize;
            Some(&self.bytes[from..to])
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor {
    encoder: FeatureEncoder,
    block_size: usize,
}

impl FeatureExtractor {
    pub fn new(
        encoder: FeatureEncoder,
        block_size: usize,
    ) -> Self {
        assert!(block_size > 0, "block size must be positive");
        Self {
            encoder,
            block_size,
        }
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// How deep whitespace is looked for at each edge: one block plus one
    /// top-up block.
    pub fn edge_limit(&self) -> usize {
        2 * self.block_size
    }

    /// Content shorter than two blocks plus a middle window is read whole.
    pub fn is_small(
        &self,
        total: u64,
    ) -> bool {
        total < (2 * self.block_size + self.encoder.sizes().mid) as u64
    }

    /// Extract from an in-memory buffer, picking the regime by size.
    pub fn extract_from_bytes(
        &self,
        content: &[u8],
    ) -> Features {
        if self.is_small(content.len() as u64) {
            self.extract_small(content)
        } else {
            // reads from a slice cursor cannot fail
            let mut cursor = io::Cursor::new(content);
            self.extract_streaming(&mut cursor, content.len() as u64)
                .unwrap_or_else(|_| self.extract_small(content))
        }
    }

    /// Extract from a reader holding exactly `total` bytes.
    pub fn extract_from_reader<R: Read + Seek>(
        &self,
        reader: &mut R,
        total: u64,
    ) -> io::Result<Features> {
        if self.is_small(total) {
            reader.seek(SeekFrom::Start(0))?;
            let mut content = Vec::with_capacity(total as usize);
            reader.take(total).read_to_end(&mut content)?;
            if (content.len() as u64) < total {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
            }
            Ok(self.extract_small(&content))
        } else {
            self.extract_streaming(reader, total)
        }
    }

    /// Whole-buffer path: trim once, let the encoder cut every window.
    pub fn extract_small(
        &self,
        content: &[u8],
    ) -> Features {
        let span = TrimmedSpan::of(content, self.edge_limit());
        let slice = |r: Range<u64>| &content[r.start as usize..r.end as usize];
        self.encoder.encode(
            slice(span.head()),
            slice(span.start..span.end()),
            slice(span.tail()),
        )
    }

    /// Streaming path: only the edge blocks and the middle window are read.
    pub fn extract_streaming<R: Read + Seek>(
        &self,
        reader: &mut R,
        total: u64,
    ) -> io::Result<Features> {
        let (span, head, tail) = self.scan_edges(reader, total)?;
        let sizes = self.encoder.sizes();

        let beg = read_range(reader, span.beg_range(sizes.beg), &head)?;
        let end = read_range(reader, span.end_range(sizes.end), &tail)?;
        let mid = read_exact_at(reader, span.mid_range(sizes.mid))?;
        Ok(self.encoder.encode(&beg, &mid, &end))
    }

    /// Locate the trimmed span, reading at most two blocks from each edge.
    pub fn trimmed_span<R: Read + Seek>(
        &self,
        reader: &mut R,
        total: u64,
    ) -> io::Result<TrimmedSpan> {
        self.scan_edges(reader, total).map(|(span, _, _)| span)
    }

    /// Reads the first block and, when it holds fewer than `beg` trimmed
    /// bytes, one more. Same for the last block and `end`.
    fn scan_edges<R: Read + Seek>(
        &self,
        reader: &mut R,
        total: u64,
    ) -> io::Result<(TrimmedSpan, EdgeBlock, EdgeBlock)> {
        let block = self.block_size as u64;
        let limit = self.edge_limit() as u64;
        let sizes = self.encoder.sizes();
        let head_end = total.min(limit);
        let tail_start = total.saturating_sub(limit);

        let mut head = EdgeBlock::default();
        let mut start = None;
        while head.end() < head_end {
            let from = head.end();
            let to = head_end.min(from + block);
            let bytes = read_exact_at(reader, from..to)?;
            if start.is_none() {
                start = bytes
                    .iter()
                    .position(|&b| !is_whitespace(b))
                    .map(|p| from + p as u64);
            }
            head.bytes.extend_from_slice(&bytes);
            if start.is_some_and(|s| head.end() - s >= sizes.beg as u64) {
                break;
            }
        }
        let start = start.unwrap_or(head_end);

        let floor = start.max(tail_start);
        let mut tail = EdgeBlock {
            offset: total,
            bytes: Vec::new(),
        };
        let mut end = None;
        while tail.offset > floor {
            let to = tail.offset;
            let from = floor.max(to.saturating_sub(block));
            let mut bytes = read_exact_at(reader, from..to)?;
            if end.is_none() {
                end = bytes
                    .iter()
                    .rposition(|&b| !is_whitespace(b))
                    .map(|p| from + p as u64 + 1);
            }
            bytes.extend_from_slice(&tail.bytes);
            tail = EdgeBlock {
                offset: from,
                bytes,
            };
            if end.is_some_and(|e| e - tail.offset >= sizes.end as u64) {
                break;
            }
        }
        let end = end.unwrap_or(floor);

        let span = TrimmedSpan {
            start,
            len: end - start,
            head_end,
            tail_start,
        };
        Ok((span, head, tail))
    }
}

fn read_range<R: Read + Seek>(
    reader: &mut R,
    range: Range<u64>,
    cached: &EdgeBlock,
) -> io::Result<Vec<u8>> {
    match cached.slice(&range) {
        Some(bytes) => Ok(bytes.to_vec()),
        None => read_exact_at(reader, range),
    }
}

fn read_exact_at<R: Read + Seek>(
    reader: &mut R,
    range: Range<u64>,
) -> io::Result<Vec<u8>> {
    let mut buf = vec![0u8; (range.end - range.start) as usize];
    if buf.is_empty() {
        return Ok(buf);
    }
    reader.seek(SeekFrom::Start(range.start))?;
    reader.read_exact(&mut buf)?;
    Ok(buf)
}
