//! Splitting replies for chat transports with a message size limit

/// Stays under the 2000 character limit common to chat platforms.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 1900;

/// Split `text` into chunks of at most `max_len` characters without breaking
/// a line.
///
/// Lines are packed greedily. Each chunk is trimmed and chunks that trim to
/// nothing are dropped. A single line longer than `max_len` becomes a chunk
/// of its own. Always returns at least one chunk, which is the empty string
/// for blank input.
pub fn split_by_lines(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        // The newline only counts between two lines of the same chunk.
        if !current.is_empty() && current_len + 1 + line_len > max_len {
            push_trimmed(&mut chunks, &current);
            current.clear();
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }
    push_trimmed(&mut chunks, &current);

    if chunks.is_empty() {
        chunks.push(String::new());
    }
    chunks
}

fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_one_empty_chunk() {
        assert_eq!(split_by_lines("", 10), vec![String::new()]);
        assert_eq!(split_by_lines("  \n\n ", 10), vec![String::new()]);
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(split_by_lines("  hello\nworld \n", 100), vec!["hello\nworld"]);
    }

    #[test]
    fn test_lines_are_packed_greedily() {
        let text = "aaaa\nbbbb\ncccc\ndddd";
        let chunks = split_by_lines(text, 10);
        assert_eq!(chunks, vec!["aaaa\nbbbb", "cccc\ndddd"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    }

    #[test]
    fn test_chunk_may_fill_the_limit_exactly() {
        let chunks = split_by_lines("aaaa\nbbbb\ncc", 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb", "cc"]);
        assert_eq!(chunks[0].chars().count(), 9);
    }

    #[test]
    fn test_oversized_line_is_its_own_chunk() {
        let long = "x".repeat(25);
        let text = format!("short\n{}\ntail", long);
        let chunks = split_by_lines(&text, 10);
        assert_eq!(chunks, vec!["short".to_string(), long, "tail".to_string()]);
    }

    #[test]
    fn test_rejoined_chunks_keep_content() {
        let text = "# Status\n\n- node-1: ready\n- node-2: ready\n- node-3: NotReady\n\nAll pods healthy.";
        for max_len in [5, 16, 30, 1900] {
            let chunks = split_by_lines(text, max_len);
            let joined = chunks.join("\n");
            let rejoined: Vec<&str> = joined
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            let original: Vec<&str> = text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            assert_eq!(rejoined, original, "max_len = {}", max_len);
        }
    }

    #[test]
    fn test_length_counts_characters() {
        let text = "ééééé\nééééé";
        assert_eq!(split_by_lines(text, 11), vec!["ééééé\nééééé"]);
        assert_eq!(split_by_lines(text, 6).len(), 2);
    }
}
