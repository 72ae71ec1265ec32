// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Greedy width-fit line breaking.

use super::TextMeasure;

/// Pack words into lines no wider than `max_width`.
///
/// Each word is appended to the current line while the measured width of
/// the result stays within `max_width`; otherwise the line is committed and
/// the word starts the next one. A word wider than `max_width` on its own is
/// still placed, alone, on its own line. Empty lines are never produced.
pub fn wrap_greedy(words: &[&str], measure: &dyn TextMeasure, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in words {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let trial = format!("{current} {word}");
        if measure.text_width(&trial) <= max_width {
            current = trial;
        } else {
            lines.push(std::mem::replace(&mut current, (*word).to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
