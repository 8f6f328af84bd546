/*!
 * Fixed-size text chunking.
 *
 * Remote translation services cap the size of a single request. Long span
 * texts are sliced into consecutive pieces of at most `max_len` characters.
 * Slicing ignores word boundaries; chunks are translated independently and
 * joined back with a single space (`CHUNK_SEPARATOR`).
 */

/// Default maximum chunk length, in characters
pub const DEFAULT_MAX_CHUNK_LEN: usize = 5000;

/// Separator placed between independently translated chunks.
///
/// This can alter whitespace at chunk seams of very long spans.
pub const CHUNK_SEPARATOR: &str = " ";

/// Split `text` into slices of at most `max_len` characters.
///
/// Lengths are counted in `char`s so no slice ever cuts a code point.
/// An empty text yields no chunks. A `max_len` of zero disables slicing.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    if max_len == 0 {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == max_len {
            chunks.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&text[start..]);

    chunks
}

/// Join translated chunks back into one text
pub fn join_chunks<S: AsRef<str>>(chunks: &[S]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.as_ref())
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}
