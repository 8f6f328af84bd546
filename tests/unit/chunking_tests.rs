/*!
 * Tests for fixed-size chunking
 */

use rand::Rng;

use relingo::translation::chunking::{chunk_text, join_chunks, CHUNK_SEPARATOR};

/// Test that every chunk but the last has exactly the maximum length
#[test]
fn test_chunkText_longText_shouldSliceAtFixedLength() {
    let text = "a".repeat(12_000);
    let chunks = chunk_text(&text, 5000);

    let lengths: Vec<usize> = chunks.iter().map(|c| c.chars().count()).collect();
    assert_eq!(lengths, vec![5000, 5000, 2000]);
}

/// Test that chunking ignores word boundaries
#[test]
fn test_chunkText_shouldNotRespectWords() {
    assert_eq!(chunk_text("hello world", 4), vec!["hell", "o wo", "rld"]);
}

/// Test that multibyte text is sliced on character boundaries
#[test]
fn test_chunkText_multibyte_shouldCountCharacters() {
    let chunks = chunk_text("日本語のテキスト", 3);
    assert_eq!(chunks, vec!["日本語", "のテキ", "スト"]);
}

/// Test that chunks always concatenate back to the input
#[test]
fn test_chunkText_randomInputs_shouldPreserveContent() {
    let alphabet: Vec<char> = "abc déf ĝhï 中文 ".chars().collect();
    let mut rng = rand::rng();

    for _ in 0..200 {
        let len = rng.random_range(0..300);
        let text: String = (0..len)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect();
        let max_len = rng.random_range(1..50);

        let chunks = chunk_text(&text, max_len);

        assert_eq!(chunks.concat(), text);
        assert!(chunks.iter().all(|c| !c.is_empty() && c.chars().count() <= max_len));
        if !text.is_empty() {
            let expected = text.chars().count().div_ceil(max_len);
            assert_eq!(chunks.len(), expected);
        }
    }
}

/// Test that translated pieces are joined with the separator
#[test]
fn test_joinChunks_shouldInsertSeparator() {
    assert_eq!(CHUNK_SEPARATOR, " ");
    assert_eq!(join_chunks(&["Bonjour", "le monde"]), "Bonjour le monde");
    assert_eq!(join_chunks(&["seul"]), "seul");
    assert_eq!(join_chunks::<&str>(&[]), "");
}
