//! Plate normalization and format validation
//!
//! Normalization canonicalizes the raw recognizer output; validation
//! rejects OCR noise (partial reads, garbage strings) before it is ever
//! compared against the authorization list, so malformed input cannot
//! produce a false match.

use crate::domain::types::CanonicalPlate;
use crate::infra::config::Config;

/// Canonicalize a raw recognized string: strip space and underscore
/// separators, fold to uppercase. Pure and idempotent; an empty result is
/// left to validation to reject.
pub fn normalize(raw: &str) -> CanonicalPlate {
    let code: String =
        raw.chars().filter(|c| *c != ' ' && *c != '_').flat_map(char::to_uppercase).collect();
    CanonicalPlate(code)
}

// Glyphs the OCR stage commonly confuses across character classes.
// A digit in this set may stand where a letter belongs, and vice versa:
// O/0, I/1, Z/2, S/5, G/6, B/8.
const DIGITS_READ_AS_LETTERS: &[char] = &['0', '1', '2', '5', '6', '8'];
const LETTERS_READ_AS_DIGITS: &[char] = &['O', 'I', 'Z', 'S', 'G', 'B'];

fn letter_like(c: char) -> bool {
    c.is_ascii_uppercase() || DIGITS_READ_AS_LETTERS.contains(&c)
}

fn digit_like(c: char) -> bool {
    c.is_ascii_digit() || LETTERS_READ_AS_DIGITS.contains(&c)
}

/// Expected plate shape: letter-block, digit-block, letter-block.
///
/// Block bounds are configuration policy (they encode a regional plate
/// scheme, not a universal law). Character classes are checked with OCR
/// confusables folded: a single misread glyph (`B1234C0` for `B1234CD`)
/// must still reach the matcher, which is where the misread is resolved
/// against the allowed list. Strings that fit no block split under any
/// confusable reading are rejected as noise.
#[derive(Debug, Clone)]
pub struct PlateGrammar {
    min_prefix_letters: usize,
    max_prefix_letters: usize,
    min_digits: usize,
    max_digits: usize,
    min_suffix_letters: usize,
    max_suffix_letters: usize,
}

impl PlateGrammar {
    pub fn new(config: &Config) -> Self {
        Self {
            min_prefix_letters: config.min_prefix_letters(),
            max_prefix_letters: config.max_prefix_letters(),
            min_digits: config.min_digits(),
            max_digits: config.max_digits(),
            min_suffix_letters: config.min_suffix_letters(),
            max_suffix_letters: config.max_suffix_letters(),
        }
    }

    /// Check a canonical code against the grammar.
    /// Tries every block split within the configured bounds; a character
    /// counts toward a block if its class matches with confusables folded.
    pub fn is_valid(&self, plate: &CanonicalPlate) -> bool {
        let chars: Vec<char> = plate.as_str().chars().collect();
        let len = chars.len();

        for prefix in self.min_prefix_letters..=self.max_prefix_letters {
            for digits in self.min_digits..=self.max_digits {
                let Some(suffix) = len.checked_sub(prefix + digits) else {
                    continue;
                };
                if suffix < self.min_suffix_letters || suffix > self.max_suffix_letters {
                    continue;
                }

                let (p, rest) = chars.split_at(prefix);
                let (d, s) = rest.split_at(digits);
                if p.iter().copied().all(letter_like)
                    && d.iter().copied().all(digit_like)
                    && s.iter().copied().all(letter_like)
                {
                    return true;
                }
            }
        }
        false
    }
}
