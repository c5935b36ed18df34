use crate::constants::MAX_WINDOW_SIZE;

/// Lengths of the three feature windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSizes {
    pub beg: usize,
    pub mid: usize,
    pub end: usize,
}

impl WindowSizes {
    pub fn new(
        beg: usize,
        mid: usize,
        end: usize,
    ) -> Self {
        Self { beg, mid, end }
    }

    /// Width of one tensor row: `beg + mid + end`.
    pub fn input_column_size(&self) -> usize {
        self.beg + self.mid + self.end
    }

    pub fn max(&self) -> usize {
        self.beg.max(self.mid).max(self.end)
    }
}

/// Fixed-length integer encoding of the beginning, middle and end of some
/// content. Values are bytes (`0..=255`) or the padding token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Features {
    beg: Vec<i32>,
    mid: Vec<i32>,
    end: Vec<i32>,
}

impl Features {
    pub fn beg(&self) -> &[i32] {
        &self.beg
    }

    pub fn mid(&self) -> &[i32] {
        &self.mid
    }

    pub fn end(&self) -> &[i32] {
        &self.end
    }

    pub fn sizes(&self) -> WindowSizes {
        WindowSizes::new(self.beg.len(), self.mid.len(), self.end.len())
    }

    /// All values in row order, `beg` then `mid` then `end`.
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.beg
            .iter()
            .chain(self.mid.iter())
            .chain(self.end.iter())
            .copied()
    }

    /// The real bytes at the start of `beg`, up to the first padding slot.
    pub fn leading_bytes(
        &self,
        padding_token: i32,
    ) -> Vec<u8> {
        self.beg
            .iter()
            .take_while(|&&v| v != padding_token)
            .map(|&v| v as u8)
            .collect()
    }
}

/// Turns already-trimmed byte slices into [`Features`].
#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder {
    sizes: WindowSizes,
    padding_token: i32,
}

impl FeatureEncoder {
    /// Panics if any window exceeds [`MAX_WINDOW_SIZE`]; configs are
    /// validated before they get here.
    pub fn new(
        sizes: WindowSizes,
        padding_token: i32,
    ) -> Self {
        assert!(
            sizes.max() <= MAX_WINDOW_SIZE,
            "window sizes {sizes:?} exceed {MAX_WINDOW_SIZE}"
        );
        Self {
            sizes,
            padding_token,
        }
    }

    pub fn sizes(&self) -> WindowSizes {
        self.sizes
    }

    pub fn padding_token(&self) -> i32 {
        self.padding_token
    }

    pub fn encode(
        &self,
        beg: &[u8],
        mid: &[u8],
        end: &[u8],
    ) -> Features {
        let features = Features {
            beg: encode_beg(beg, self.sizes.beg, self.padding_token),
            mid: encode_mid(mid, self.sizes.mid, self.padding_token),
            end: encode_end(end, self.sizes.end, self.padding_token),
        };
        debug_assert_eq!(features.sizes(), self.sizes);
        features
    }
}

/// First `size` bytes, right-padded.
pub fn encode_beg(
    bytes: &[u8],
    size: usize,
    padding_token: i32,
) -> Vec<i32> {
    let take = bytes.len().min(size);
    let mut out = Vec::with_capacity(size);
    out.extend(bytes[..take].iter().map(|&b| i32::from(b)));
    out.resize(size, padding_token);
    out
}

/// Last `size` bytes, left-padded.
pub fn encode_end(
    bytes: &[u8],
    size: usize,
    padding_token: i32,
) -> Vec<i32> {
    let take = bytes.len().min(size);
    let mut out = vec![padding_token; size - take];
    out.extend(bytes[bytes.len() - take..].iter().map(|&b| i32::from(b)));
    out
}

/// `size` bytes centered on the slice midpoint. Short slices are padded on
/// both sides, `floor(d/2)` on the left and `ceil(d/2)` on the right.
pub fn encode_mid(
    bytes: &[u8],
    size: usize,
    padding_token: i32,
) -> Vec<i32> {
    let len = bytes.len();
    if len >= size {
        let start = len / 2 - size / 2;
        return bytes[start..start + size]
            .iter()
            .map(|&b| i32::from(b))
            .collect();
    }
    let deficit = size - len;
    let left = deficit / 2;
    let mut out = Vec::with_capacity(size);
    out.resize(left, padding_token);
    out.extend(bytes.iter().map(|&b| i32::from(b)));
    out.resize(size, padding_token);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAD: i32 = 256;

    #[test]
    fn beg_pads_on_the_right() {
        assert_eq!(encode_beg(b"ab", 4, PAD), vec![97, 98, PAD, PAD]);
        assert_eq!(encode_beg(b"abcdef", 3, PAD), vec![97, 98, 99]);
    }

    #[test]
    fn end_pads_on_the_left() {
        assert_eq!(encode_end(b"ab", 4, PAD), vec![PAD, PAD, 97, 98]);
        assert_eq!(encode_end(b"abcdef", 3, PAD), vec![100, 101, 102]);
    }

    #[test]
    fn mid_centers_on_midpoint() {
        // len 7, size 3: start = 3 - 1 = 2
        assert_eq!(encode_mid(b"0123456", 3, PAD), vec![50, 51, 52]);
        // len 6, size 2: start = 3 - 1 = 2
        assert_eq!(encode_mid(b"012345", 2, PAD), vec![50, 51]);
    }

    #[test]
    fn mid_pads_both_sides_with_extra_on_the_right() {
        assert_eq!(encode_mid(b"x", 4, PAD), vec![PAD, 120, PAD, PAD]);
        assert_eq!(encode_mid(b"", 3, PAD), vec![PAD, PAD, PAD]);
    }

    #[test]
    fn zero_sized_windows_are_empty() {
        let enc = FeatureEncoder::new(WindowSizes::new(0, 0, 0), PAD);
        let f = enc.encode(b"abc", b"abc", b"abc");
        assert_eq!(f.iter().count(), 0);
    }

    #[test]
    #[should_panic(expected = "exceed")]
    fn oversized_window_is_a_defect() {
        FeatureEncoder::new(WindowSizes::new(513, 0, 0), PAD);
    }

    #[test]
    fn leading_bytes_stop_at_padding() {
        let enc = FeatureEncoder::new(WindowSizes::new(8, 0, 0), PAD);
        let f = enc.encode(b"hey", b"", b"");
        assert_eq!(f.leading_bytes(PAD), b"hey".to_vec());
    }
}
