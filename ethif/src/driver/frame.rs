/// Caller-owned view of one outgoing Ethernet frame.
///
/// A frame is a possibly-chained sequence of byte ranges (header in one
/// buffer, payload in another). The driver either fully consumes it
/// during `output` or leaves it untouched on failure; it never keeps a
/// reference past the call.
use alloc::vec::Vec;

#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    segments: &'a [&'a [u8]],
}

impl<'a> Frame<'a> {
    /// Build a frame from its segments in wire order.
    pub fn new(segments: &'a [&'a [u8]]) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &'a [&'a [u8]] {
        self.segments
    }

    /// Total byte length across all segments.
    pub fn total_len(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Copy the frame contiguously into `dst`, truncating if `dst` is
    /// short. Returns the number of bytes copied.
    pub fn copy_into(&self, dst: &mut [u8]) -> usize {
        let mut offset = 0;
        for seg in self.segments {
            if offset == dst.len() {
                break;
            }
            let copy_len = seg.len().min(dst.len() - offset);
            dst[offset..offset + copy_len].copy_from_slice(&seg[..copy_len]);
            offset += copy_len;
        }
        offset
    }

    /// Flatten into one owned buffer.
    pub fn concat(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.total_len());
        for seg in self.segments {
            buf.extend_from_slice(seg);
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn chained_segments() {
        let header = [0xAAu8; 14];
        let payload = [0x55u8; 20];
        let segments: [&[u8]; 2] = [&header, &payload];
        let frame = Frame::new(&segments);

        assert_eq!(frame.total_len(), 34);
        assert!(!frame.is_empty());

        let flat = frame.concat();
        assert_eq!(flat.len(), 34);
        assert_eq!(&flat[..14], &header);
        assert_eq!(&flat[14..], &payload);
    }

    #[test]
    fn copy_into_truncates() {
        let frame = Frame::new(&[&[1, 2, 3], &[4, 5, 6]]);

        let mut exact = [0u8; 6];
        assert_eq!(frame.copy_into(&mut exact), 6);
        assert_eq!(exact, [1, 2, 3, 4, 5, 6]);

        let mut short = [0u8; 4];
        assert_eq!(frame.copy_into(&mut short), 4);
        assert_eq!(short, [1, 2, 3, 4]);
    }

    #[test]
    fn empty_frame() {
        let frame = Frame::new(&[]);
        assert!(frame.is_empty());
        assert_eq!(frame.total_len(), 0);
        assert_eq!(frame.concat(), vec![]);
    }
}
