//! The pure splice algorithm.
//!
//! Given `current` (live field contents), `original` (what was sent for
//! correction) and `corrected` (what came back), compute the full new field
//! value.  Resolution order:
//!
//! 1. Empty field → the corrected text.
//! 2. `current` ends with `original` (case-insensitive) → replace that tail.
//! 3. Longest common suffix run of whitespace words between `current` and
//!    `corrected` → splice at the run boundary; unmatched leading words of
//!    `corrected` were already present and are discarded.
//! 4. No run at all → replace the last *N* words of `current`, N = word
//!    count of `original`; when `original` has no words, or more words than
//!    the field holds, append instead.
//!
//! The suffix matching is the single greedy scan from the end — ties between
//! equal-length runs at different offsets are not searched for.  The result
//! always carries one trailing space so the cursor stays positioned for
//! continued typing.

// ---------------------------------------------------------------------------
// splice
// ---------------------------------------------------------------------------

/// Compute the new full field value for buffer-splice mode.
pub fn splice(current: &str, original: &str, corrected: &str) -> String {
    let current = current.trim();
    let original = original.trim();
    let corrected = corrected.trim();

    // 1. Nothing in the field — the correction is the whole value.
    if current.is_empty() {
        return finish(corrected);
    }

    // 2. The sent text is still the tail of the field.
    if !original.is_empty() {
        if let Some(prefix) = strip_suffix_ci(current, original) {
            let prefix = prefix.trim_end();
            if prefix.is_empty() {
                return finish(corrected);
            }
            return finish(&format!("{prefix} {corrected}"));
        }
    }

    // 3. Fuzzy suffix: longest word-run shared by the field tail and the
    //    corrected text.
    let cur_words: Vec<&str> = current.split_whitespace().collect();
    let cor_words: Vec<&str> = corrected.split_whitespace().collect();
    let run = common_suffix_run(&cur_words, &cor_words);
    if run > 0 {
        let mut out = cur_words[..cur_words.len() - run].to_vec();
        out.extend_from_slice(&cor_words[cor_words.len() - run..]);
        return finish(&out.join(" "));
    }

    // 4. No anchor at all — fall back to the original's word count.
    let original_words = original.split_whitespace().count();
    if original_words == 0 || original_words > cur_words.len() {
        return finish(&format!("{current} {corrected}"));
    }
    let mut out = cur_words[..cur_words.len() - original_words]
        .to_vec()
        .join(" ");
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(corrected);
    finish(&out)
}

/// Trim and append the single trailing space.
fn finish(s: &str) -> String {
    format!("{} ", s.trim())
}

// ---------------------------------------------------------------------------
// Case-insensitive helpers
// ---------------------------------------------------------------------------

fn chars_eq_ci(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn words_eq_ci(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count() && a.chars().zip(b.chars()).all(|(x, y)| chars_eq_ci(x, y))
}

/// If `haystack` ends with `needle` (case-insensitive), return the prefix
/// before the match.
fn strip_suffix_ci<'a>(haystack: &'a str, needle: &str) -> Option<&'a str> {
    if needle.is_empty() {
        return Some(haystack);
    }
    let h: Vec<(usize, char)> = haystack.char_indices().collect();
    let n: Vec<char> = needle.chars().collect();
    if n.len() > h.len() {
        return None;
    }
    let start = h.len() - n.len();
    for (i, nc) in n.iter().enumerate() {
        if !chars_eq_ci(h[start + i].1, *nc) {
            return None;
        }
    }
    Some(&haystack[..h[start].0])
}

/// Longest common word-suffix run, compared word-by-word from the end,
/// stopping at the first mismatch.
fn common_suffix_run(a: &[&str], b: &[&str]) -> usize {
    let mut run = 0;
    while run < a.len() && run < b.len() {
        let x = a[a.len() - 1 - run];
        let y = b[b.len() - 1 - run];
        if !words_eq_ci(x, y) {
            break;
        }
        run += 1;
    }
    run
}

/// One-shot case-insensitive search-and-replace of the first occurrence of
/// `needle` in `haystack`.  Returns `None` when `needle` is empty or absent.
pub fn replace_first_ci(haystack: &str, needle: &str, replacement: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    let h: Vec<(usize, char)> = haystack.char_indices().collect();
    let n: Vec<char> = needle.chars().collect();
    if n.len() > h.len() {
        return None;
    }
    for start in 0..=(h.len() - n.len()) {
        if (0..n.len()).all(|i| chars_eq_ci(h[start + i].1, n[i])) {
            let begin = h[start].0;
            let end = if start + n.len() < h.len() {
                h[start + n.len()].0
            } else {
                haystack.len()
            };
            let mut out = String::with_capacity(haystack.len() + replacement.len());
            out.push_str(&haystack[..begin]);
            out.push_str(replacement);
            out.push_str(&haystack[end..]);
            return Some(out);
        }
    }
    None
}

/// Replace a character range of `value` with `replacement`; `None` when the
/// range no longer fits the value.
pub fn replace_range(
    value: &str,
    range: &crate::selection::FieldRange,
    replacement: &str,
) -> Option<String> {
    let chars: Vec<char> = value.chars().collect();
    if range.location > chars.len() || range.location + range.length > chars.len() {
        return None;
    }
    let mut out: String = chars[..range.location].iter().collect();
    out.push_str(replacement);
    out.extend(&chars[range.location + range.length..]);
    Some(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
