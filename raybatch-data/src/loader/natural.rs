//! Natural ordering of file names.
//!
//! Digit runs compare by numeric value and everything else compares
//! case-insensitively, so `r_2.png` sorts before `r_10.png`.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

enum Chunk {
    Digits(String),
    Text(String),
}

fn next_chunk(chars: &mut Peekable<Chars<'_>>) -> Option<Chunk> {
    let first = *chars.peek()?;
    let digits = first.is_ascii_digit();
    let mut chunk = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() != digits {
            break;
        }
        if digits {
            chunk.push(c);
        } else {
            chunk.extend(c.to_lowercase());
        }
        chars.next();
    }
    Some(if digits {
        Chunk::Digits(chunk)
    } else {
        Chunk::Text(chunk)
    })
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        // "007" after "7"
        .then_with(|| a.len().cmp(&b.len()))
}

/// Compare two names in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        let ordering = match (next_chunk(&mut left), next_chunk(&mut right)) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Chunk::Digits(x)), Some(Chunk::Digits(y))) => cmp_digits(&x, &y),
            (Some(Chunk::Text(x)), Some(Chunk::Text(y))) => x.cmp(&y),
            // numbers sort before text
            (Some(Chunk::Digits(_)), Some(Chunk::Text(_))) => Ordering::Less,
            (Some(Chunk::Text(_)), Some(Chunk::Digits(_))) => Ordering::Greater,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}
