//! Sentence segmentation
//!
//! Splits a story into an ordered sequence of sentences on `.`, `!`, `?`
//! and newline boundaries, keeping quoted speech intact and folding runs of
//! terminal punctuation ("Wait...!") into one boundary.

/// Split a story into trimmed, non-empty sentences in original order
pub fn split_sentences(story: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    let chars: Vec<char> = story.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        current.push(c);

        if c == '"' {
            in_quote = !in_quote;
        }

        let is_boundary = !in_quote && matches!(c, '.' | '!' | '?' | '\n');
        if is_boundary {
            // Fold consecutive terminal punctuation into this sentence
            while i + 1 < chars.len() && matches!(chars[i + 1], '.' | '!' | '?') {
                i += 1;
                current.push(chars[i]);
            }
            let sentence = current.trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            current.clear();
        }

        i += 1;
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}
