//! Roman numeral validation.
//!
//! Rules enforced while folding left to right:
//! - only `I V X L C D M` are accepted (case-insensitive);
//! - a symbol repeats at most three times, `V`, `L` and `D` never repeat;
//! - `V`, `L` and `D` are never subtracted;
//! - `I` may only precede `V` or `X`, `X` may only precede `L`, `C` or `M`.

fn symbol_value(c: char) -> Option<u32> {
    match c.to_ascii_uppercase() {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    }
}

fn is_five_symbol(value: u32) -> bool {
    matches!(value, 5 | 50 | 500)
}

const MAX_REPEAT: u32 = 3;

/// Convert a Roman numeral to its value, or `None` if `text` is not a valid
/// numeral. The empty string folds to `Some(0)`.
pub fn to_int(text: &str) -> Option<u32> {
    let mut total = 0u32;
    let mut prev = 0u32;
    let mut word = 0u32;
    let mut repeats = 0u32;

    for c in text.chars() {
        let cur = symbol_value(c)?;
        if prev == 0 {
            repeats = 1;
            word = cur;
            prev = cur;
        } else if cur == prev {
            if is_five_symbol(cur) || repeats >= MAX_REPEAT {
                return None;
            }
            repeats += 1;
            word += cur;
        } else if cur > prev {
            if is_five_symbol(prev) {
                return None;
            }
            if (prev == 1 && !matches!(cur, 5 | 10)) || (prev == 10 && !matches!(cur, 50 | 100 | 1000))
            {
                return None;
            }
            repeats = 1;
            word = cur.checked_sub(word)?;
            prev = cur;
        } else {
            total += word;
            repeats = 1;
            word = cur;
            prev = cur;
        }
    }

    Some(total + word)
}

/// Return true if `text` is a valid Roman numeral.
pub fn is_valid(text: &str) -> bool {
    to_int(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_valid_numerals() {
        assert_eq!(to_int("III"), Some(3));
        assert_eq!(to_int("VII"), Some(7));
        assert_eq!(to_int("IX"), Some(9));
        assert_eq!(to_int("LXXX"), Some(80));
        assert_eq!(to_int("LXIX"), Some(69));
        assert_eq!(to_int("MCCC"), Some(1300));
        assert_eq!(to_int("MCMLXXXIV"), Some(1984));
        assert_eq!(to_int("xiv"), Some(14));
    }

    #[test]
    fn rejects_excess_repetition() {
        assert_eq!(to_int("IIII"), None);
        assert_eq!(to_int("XXXX"), None);
        assert_eq!(to_int("VV"), None);
        assert_eq!(to_int("LL"), None);
        assert_eq!(to_int("DD"), None);
    }

    #[test]
    fn rejects_illegal_subtraction() {
        assert_eq!(to_int("IL"), None);
        assert_eq!(to_int("IC"), None);
        assert_eq!(to_int("XD"), None);
        assert_eq!(to_int("VX"), None);
        assert_eq!(to_int("LC"), None);
        assert_eq!(to_int("DM"), None);
    }

    #[test]
    fn rejects_foreign_characters() {
        assert!(!is_valid("XIZ"));
        assert!(!is_valid("the"));
        assert!(is_valid("mix"));
        assert!(is_valid(""));
    }
}
