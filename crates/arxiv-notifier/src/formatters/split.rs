//! Splitting long texts into chat-sized messages.

/// Split `text` at whitespace into chunks of at most `limit` characters.
///
/// Words are never broken; a single word longer than `limit` becomes a
/// chunk of its own. Whitespace between words of the same chunk is kept,
/// whitespace at chunk boundaries is dropped.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    let mut rest = text;

    loop {
        let word_start = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
        let (gap, after) = rest.split_at(word_start);
        if after.is_empty() {
            break;
        }
        let word_end = after.find(char::is_whitespace).unwrap_or(after.len());
        let (word, tail) = after.split_at(word_end);

        let gap_len = gap.chars().count();
        let word_len = word.chars().count();

        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + gap_len + word_len <= limit {
            current.push_str(gap);
            current.push_str(word);
            current_len += gap_len + word_len;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }

        rest = tail;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
