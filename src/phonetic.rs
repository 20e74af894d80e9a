// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Phonetic codes for similarity classes.
//!
//! Tokens that sound alike share a code: `meier`, `mayer` and `meyer` all
//! land in the same similarity class, so a query for one finds records
//! indexed under the others. The encoding is Soundex-shaped: first letter
//! plus up to three consonant-class digits, zero-padded.
//!
//! The encoder works on the normalized token form (lowercase, diacritics
//! stripped), so "müller" and "muller" encode identically when the
//! unicode-normalization feature is on.

/// Soundex consonant classes. Vowels and unclassified characters return
/// `None` and act as separators between runs of equal codes.
#[inline]
fn consonant_class(c: char) -> Option<u8> {
    match c {
        'b' | 'f' | 'p' | 'v' => Some(1),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some(2),
        'd' | 't' => Some(3),
        'l' => Some(4),
        'm' | 'n' => Some(5),
        'r' => Some(6),
        _ => None,
    }
}

/// Compute the phonetic code of a token.
///
/// Returns `None` for tokens without a single ASCII letter (numbers,
/// punctuation runs) - those never join a similarity class.
///
/// Classic Soundex rules: the first letter is kept verbatim, consecutive
/// letters of the same class collapse to one digit, `h` and `w` are
/// transparent (they do not break a run), vowels break runs but emit
/// nothing. The result is padded with zeros to four characters.
pub fn phonetic_code(token: &str) -> Option<String> {
    let mut letters = token
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase());

    let first = letters.next()?;
    let mut code = String::with_capacity(4);
    code.push(first);

    let mut last_class = consonant_class(first);
    for c in letters {
        if matches!(c, 'h' | 'w') {
            continue;
        }
        let class = consonant_class(c);
        if let Some(digit) = class {
            if class != last_class {
                code.push(char::from(b'0' + digit));
                if code.len() == 4 {
                    break;
                }
            }
        }
        last_class = class;
    }

    while code.len() < 4 {
        code.push('0');
    }
    Some(code)
}
