// Key-value line scanner: proposes (field, value) candidates from "label: value" text.
use crate::models::{Candidate, CanonicalField, Strategy};
use crate::processing::labels::LabelResolver;
use crate::processing::normalizer::clean_text;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // A colon directly after a word character, plus any whitespace after it
    static ref PAIR_BOUNDARY: Regex = Regex::new(r"\w:\s*").unwrap();
}

// Longest trailing label considered when a segment holds "value NextLabel"
const MAX_LABEL_WORDS: usize = 4;

pub struct LineScanner<'a> {
    resolver: &'a LabelResolver,
}

impl<'a> LineScanner<'a> {
    pub fn new(resolver: &'a LabelResolver) -> Self {
        LineScanner { resolver }
    }

    /// Every resolvable candidate in `lines`, in scan order.
    pub fn scan(&self, lines: &[String]) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            let cleaned = clean_text(line);
            if cleaned.is_empty() || !cleaned.contains(':') {
                continue;
            }
            for (label, value) in self.key_value_pairs(&cleaned) {
                match self.resolver.resolve(&label) {
                    Some(field) => candidates.push(Candidate {
                        field,
                        value,
                        line: index,
                        strategy: Strategy::LabelScan,
                    }),
                    None => log::trace!("line {}: unrecognized label '{}'", index, label),
                }
            }
        }
        candidates
    }

    /// Candidates for labels printed without a usable "label: value" pair:
    /// "Address 12 Elm St", or a bare "Patient Name" with the value on the
    /// next non-empty line. A line is matched by the longest label it starts
    /// with; lines whose remainder holds another colon belong to [`scan`].
    ///
    /// [`scan`]: LineScanner::scan
    pub fn scan_leading_labels(&self, lines: &[String]) -> Vec<Candidate> {
        let cleaned: Vec<String> = lines.iter().map(|line| clean_text(line)).collect();
        let mut candidates = Vec::new();
        for (index, line) in cleaned.iter().enumerate() {
            let Some((field, rest)) = self.leading_label(line) else {
                continue;
            };
            let rest = rest.trim_start();
            let rest = rest.strip_prefix(':').unwrap_or(rest).trim();
            if rest.contains(':') {
                continue;
            }
            let found = if rest.is_empty() {
                self.value_below(&cleaned, index)
            } else {
                Some((rest.to_string(), index))
            };
            if let Some((value, line)) = found {
                candidates.push(Candidate {
                    field,
                    value,
                    line,
                    strategy: Strategy::ContextLine,
                });
            }
        }
        candidates
    }

    // Longest known label that starts `line` and ends on a word boundary
    fn leading_label<'l>(&self, line: &'l str) -> Option<(CanonicalField, &'l str)> {
        let lower = line.to_lowercase();
        // lowercasing can shift byte offsets outside ASCII
        if lower.len() != line.len() {
            return None;
        }
        self.resolver
            .labels()
            .filter(|(key, _)| {
                lower.starts_with(key)
                    && !lower[key.len()..]
                        .chars()
                        .next()
                        .map_or(false, char::is_alphanumeric)
            })
            .max_by_key(|(key, _)| key.len())
            .map(|(key, field)| (field, &line[key.len()..]))
    }

    // First non-empty line after `index`, unless it is itself a label line
    fn value_below(&self, cleaned: &[String], index: usize) -> Option<(String, usize)> {
        let (below, next) = cleaned
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, line)| !line.is_empty())?;
        if next.contains(':') || self.resolver.resolve_exact(next).is_some() {
            return None;
        }
        Some((next.clone(), below))
    }

    /// Split a cleaned line into successive (label, value) pairs.
    pub fn key_value_pairs(&self, line: &str) -> Vec<(String, String)> {
        let segments = split_segments(line);
        let mut pairs = Vec::new();
        if segments.len() < 2 {
            return pairs;
        }

        let mut label = clean_text(segments[0]);
        for (i, segment) in segments.iter().enumerate().skip(1) {
            let (value, next_label) = if i == segments.len() - 1 {
                (segment.to_string(), String::new())
            } else {
                self.split_trailing_label(segment)
            };
            pairs.push((label, clean_text(&value)));
            label = clean_text(&next_label);
        }
        pairs
    }

    // "John Doe Guarantor Name" -> ("John Doe", "Guarantor Name"). When no
    // trailing words resolve exactly, the whole segment is both the previous
    // value and the next label.
    fn split_trailing_label(&self, segment: &str) -> (String, String) {
        let words: Vec<&str> = segment.split_whitespace().collect();
        let longest = MAX_LABEL_WORDS.min(words.len().saturating_sub(1));
        for n in (1..=longest).rev() {
            let tail = words[words.len() - n..].join(" ");
            if self.resolver.resolve_exact(&tail).is_some() {
                let head = words[..words.len() - n].join(" ");
                return (head, tail);
            }
        }
        (segment.to_string(), segment.to_string())
    }
}

fn split_segments(line: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for m in PAIR_BOUNDARY.find_iter(line) {
        // the word character stays with the text before the colon
        let word_len = line[m.start()..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(0);
        segments.push(&line[start..m.start() + word_len]);
        start = m.end();
    }
    segments.push(&line[start..]);
    segments
}
