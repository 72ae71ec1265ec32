// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Counting partitions: fixed words per line, lines per page, words per chunk.
// Nothing here measures rendered width.

/// Join every `words_per_line` words into one line. The last line may be
/// shorter. `words_per_line` must be positive.
pub fn format_fixed(words: &[&str], words_per_line: usize) -> Vec<String> {
    words
        .chunks(words_per_line)
        .map(|line| line.join(" "))
        .collect()
}

/// Group lines into pages of `lines_per_page`. The last page may be shorter.
pub fn paginate_fixed(lines: Vec<String>, lines_per_page: usize) -> Vec<Vec<String>> {
    let mut pages = Vec::with_capacity(lines.len().div_ceil(lines_per_page));
    let mut lines = lines.into_iter().peekable();
    while lines.peek().is_some() {
        pages.push(lines.by_ref().take(lines_per_page).collect());
    }
    pages
}

/// Re-flow words into chunks of at most `words_per_chunk` words.
pub fn chunk_words<'a>(words: &[&'a str], words_per_chunk: usize) -> Vec<Vec<&'a str>> {
    words
        .chunks(words_per_chunk)
        .map(|chunk| chunk.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::split_words;

    #[test]
    fn three_words_per_line() {
        let words = split_words("the quick brown fox jumps over the lazy dog");
        assert_eq!(
            format_fixed(&words, 3),
            vec!["the quick brown", "fox jumps over", "the lazy dog"]
        );
    }

    #[test]
    fn line_count_is_ceiling_of_words_over_n() {
        let text: Vec<String> = (0..23).map(|i| format!("w{i}")).collect();
        let words: Vec<&str> = text.iter().map(String::as_str).collect();

        for n in 1..=25 {
            let lines = format_fixed(&words, n);
            assert_eq!(lines.len(), words.len().div_ceil(n), "n = {n}");

            let (last, full) = lines.split_last().unwrap();
            for line in full {
                assert_eq!(line.split(' ').count(), n);
            }
            assert!(last.split(' ').count() <= n);
        }
    }

    #[test]
    fn lines_round_trip_to_words() {
        let words = split_words("a b c d e f g h i j k");
        let rejoined = format_fixed(&words, 4).join(" ");
        assert_eq!(split_words(&rejoined), words);
    }

    #[test]
    fn no_words_no_lines() {
        assert!(format_fixed(&[], 7).is_empty());
        assert!(paginate_fixed(Vec::new(), 20).is_empty());
        assert!(chunk_words(&[], 200).is_empty());
    }

    #[test]
    fn pages_hold_m_lines_with_short_tail() {
        let lines: Vec<String> = (1..=45).map(|i| format!("line {i}")).collect();
        let pages = paginate_fixed(lines, 20);
        let sizes: Vec<usize> = pages.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![20, 20, 5]);
        assert_eq!(pages[2][0], "line 41");
    }

    #[test]
    fn chunks_keep_word_order() {
        let words = split_words("1 2 3 4 5 6 7");
        let chunks = chunk_words(&words, 3);
        assert_eq!(chunks, vec![vec!["1", "2", "3"], vec!["4", "5", "6"], vec!["7"]]);
    }
}
