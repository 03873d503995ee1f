// SPDX-License-Identifier: MIT
//
// Natural ordering for document names.
//
// Like a plain string comparison, except that runs of ASCII digits compare
// by numeric value: "draft2.txt" sorts before "draft10.txt". Leading
// zeros do not change the value, so "ch07" and "ch7" tie on the number and
// the comparison moves on to whatever follows.

use std::cmp::Ordering;

/// Compare two names in natural order.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a.as_bytes(), b.as_bytes());

    loop {
        match (a.first(), b.first()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (na, rest_a) = split_digits(a);
                let (nb, rest_b) = split_digits(b);
                match compare_numbers(na, nb) {
                    Ordering::Equal => (a, b) = (rest_a, rest_b),
                    unequal => return unequal,
                }
            }
            (Some(x), Some(y)) => match x.cmp(y) {
                Ordering::Equal => (a, b) = (&a[1..], &b[1..]),
                unequal => return unequal,
            },
        }
    }
}

/// Sort names in place, naturally.
pub fn sort(names: &mut [String]) {
    names.sort_by(|a, b| compare(a, b));
}

/// Split a leading digit run off `s`.
fn split_digits(s: &[u8]) -> (&[u8], &[u8]) {
    let end = s.iter().position(|b| !b.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Compare two digit runs by value, without parsing (runs can be longer
/// than any integer type).
fn compare_numbers(a: &[u8], b: &[u8]) -> Ordering {
    let trim = |s: &[u8]| -> usize { s.iter().take_while(|&&d| d == b'0').count() };
    let (a, b) = (&a[trim(a)..], &b[trim(b)..]);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
