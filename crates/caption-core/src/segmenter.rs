//! Word-to-segment grouping for subtitle rendering.
//!
//! Converts the provider's flat sequence of timestamped words into caption
//! segments with a single left-to-right greedy scan. A segment closes at
//! sentence-final punctuation (approximates sentence boundaries for
//! readability) or once it spans five seconds (bounds on-screen length for
//! punctuation-free transcripts), and always at the end of the input.

use crate::types::{CaptionSegment, Word};

/// Elapsed seconds after which a segment is closed even without punctuation.
pub const MAX_SEGMENT_SECS: f64 = 5.0;

/// Characters that close a segment when a word ends with one of them.
const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Millisecond timestamp to seconds.
#[allow(clippy::cast_precision_loss)] // timestamps are far below 2^52 ms
fn to_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// Group an ordered word sequence into ordered caption segments.
///
/// After appending each word, the current segment closes if the word ends
/// with `.`, `!` or `?`, if the elapsed duration from the segment start to
/// the word's end reaches [`MAX_SEGMENT_SECS`], or if the word is the last
/// in the sequence. Either close condition alone is sufficient; both lead
/// to the same close within the same iteration.
///
/// Emitted segments carry 1-based sequence ids, second-granularity times
/// (`ms / 1000.0`, no rounding), and the space-joined word texts. An empty
/// input produces an empty output.
///
/// Precondition: word time ranges are sane (`start <= end`, non-decreasing
/// starts). Malformed input is not validated.
#[must_use]
pub fn segment_words(words: &[Word]) -> Vec<CaptionSegment> {
    let mut segments = Vec::new();
    let mut acc: Vec<&str> = Vec::new();
    let mut start_secs = 0.0;
    let mut next_id: u32 = 1;

    for (idx, word) in words.iter().enumerate() {
        if acc.is_empty() {
            start_secs = to_secs(word.start);
        }
        acc.push(&word.text);

        let end_secs = to_secs(word.end);
        let sentence_end = word.text.ends_with(SENTENCE_TERMINATORS);
        let over_budget = end_secs - start_secs >= MAX_SEGMENT_SECS;
        let last_word = idx + 1 == words.len();

        if sentence_end || over_budget || last_word {
            segments.push(CaptionSegment {
                id: next_id,
                start_time: start_secs,
                end_time: end_secs,
                text: acc.join(" "),
            });
            next_id += 1;
            acc.clear();
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: u64, end: u64) -> Word {
        Word::new(text, start, end)
    }

    #[test]
    fn empty_input_produces_no_segments() {
        assert!(segment_words(&[]).is_empty());
    }

    #[test]
    fn punctuation_closes_segment() {
        let words = vec![word("Hello", 0, 500), word("world.", 500, 1000)];
        let segments = segment_words(&words);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].id, 1);
        assert_eq!(segments[0].start_time, 0.0);
        assert_eq!(segments[0].end_time, 1.0);
        assert_eq!(segments[0].text, "Hello world.");
    }

    #[test]
    fn question_and_exclamation_close_segments() {
        let words = vec![
            word("Ready?", 0, 400),
            word("Go!", 400, 700),
            word("done.", 700, 1000),
        ];
        let segments = segment_words(&words);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].text, "Ready?");
        assert_eq!(segments[1].text, "Go!");
        assert_eq!(segments[2].text, "done.");
    }

    #[test]
    fn duration_forces_close_without_punctuation() {
        // Six words over 6000 ms, no terminal punctuation: the 5-second
        // ceiling must split the run into at least two segments.
        let words: Vec<Word> = (0..6)
            .map(|i| word("word", i * 1000, (i + 1) * 1000))
            .collect();
        let segments = segment_words(&words);
        assert!(segments.len() >= 2);
        assert!(segments[0].end_time - segments[0].start_time >= 5.0);
    }

    #[test]
    fn trailing_partial_segment_not_dropped() {
        let words = vec![
            word("One.", 0, 500),
            word("and", 500, 800),
            word("then", 800, 1100),
        ];
        let segments = segment_words(&words);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].text, "and then");
        assert_eq!(segments[1].start_time, 0.5);
        assert_eq!(segments[1].end_time, 1.1);
    }

    #[test]
    fn joined_text_reproduces_input_words() {
        let words = vec![
            word("The", 0, 200),
            word("quick", 200, 400),
            word("fox.", 400, 600),
            word("It", 600, 800),
            word("jumped", 800, 7200),
            word("high", 7200, 7400),
        ];
        let segments = segment_words(&words);
        let rejoined: Vec<&str> = segments
            .iter()
            .flat_map(|s| s.text.split(' '))
            .collect();
        let original: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn times_monotonic_and_well_formed() {
        let words: Vec<Word> = (0..20)
            .map(|i| {
                let text = if i % 7 == 6 { "stop." } else { "go" };
                word(text, i * 700, i * 700 + 650)
            })
            .collect();
        let segments = segment_words(&words);
        assert!(!segments.is_empty());
        for pair in segments.windows(2) {
            assert!(pair[1].end_time >= pair[0].end_time);
            assert!(pair[1].start_time >= pair[0].start_time);
        }
        for seg in &segments {
            assert!(seg.end_time >= seg.start_time);
        }
    }

    #[test]
    fn single_overlong_word_is_one_segment() {
        // One word longer than the ceiling: the duration check only runs
        // after appending, so it still forms exactly one segment.
        let words = vec![word("aaaaaand", 0, 8000)];
        let segments = segment_words(&words);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end_time, 8.0);
    }

    #[test]
    fn exact_five_second_span_closes() {
        let words = vec![word("one", 0, 2500), word("two", 2500, 5000), word("three", 5000, 5400)];
        let segments = segment_words(&words);
        // 5000 ms - 0 ms == 5.0 s, the >= comparison closes the segment.
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "one two");
        assert_eq!(segments[1].text, "three");
    }

    #[test]
    fn ids_are_one_based_and_sequential() {
        let words = vec![
            word("A.", 0, 100),
            word("B.", 100, 200),
            word("C.", 200, 300),
        ];
        let ids: Vec<u32> = segment_words(&words).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn millisecond_division_is_exact() {
        let words = vec![word("word.", 500, 1500)];
        let segments = segment_words(&words);
        assert_eq!(segments[0].start_time, 0.5);
        assert_eq!(segments[0].end_time, 1.5);
    }

    #[test]
    fn segment_restarts_timing_after_close() {
        let words = vec![word("First.", 1000, 2000), word("second", 3000, 4000)];
        let segments = segment_words(&words);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].start_time, 3.0);
        assert_eq!(segments[1].end_time, 4.0);
    }
}
