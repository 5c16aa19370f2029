//! Sliding-window text chunking.

/// Splits text into overlapping chunks of at most `size` characters.
///
/// The window advances by `size - overlap` (clamped to at least 1) each
/// step, so consecutive chunks share an `overlap`-character tail. The
/// last chunk may be shorter. Empty input yields no chunks. Identical
/// input and configuration always produce an identical sequence.
pub fn split(text: &str, size: usize, overlap: usize) -> Vec<String> {
    if size == 0 {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    if total == 0 {
        return Vec::new();
    }

    let step = size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::with_capacity(total / step + 1);
    let mut start = 0;

    loop {
        let end = (start + size).min(total);
        chunks.push(chars[start..end].iter().collect());
        if end == total {
            break;
        }
        start += step;
    }

    chunks
}
