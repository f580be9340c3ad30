//! Numbering schemes used by Hungarian legal drafting.
//!
//! Covers the ordinal-word forms used by book and part headings
//! ("NYOLCADIK KÖNYV"), roman numerals for titles and chapters, and the
//! identifier successor rules of every sub-article element kind. The
//! ordinal tables are built once behind a [`LazyLock`] barrier and never
//! mutated afterwards.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Hungarian ordinals with irregular forms.
const SPECIAL_ORDINALS: [(u32, &str); 12] = [
    (1, "első"),
    (2, "második"),
    (10, "tizedik"),
    (20, "huszadik"),
    (30, "harmincadik"),
    (40, "negyvenedik"),
    (50, "ötvenedik"),
    (60, "hatvanadik"),
    (70, "hetvenedik"),
    (80, "nyolcvanadik"),
    (90, "kilencvenedik"),
    (100, "századik"),
];

const ONES_DIGIT: [(&str, u32); 9] = [
    ("egyedik", 1),
    ("kettedik", 2),
    ("harmadik", 3),
    ("negyedik", 4),
    ("ötödik", 5),
    ("hatodik", 6),
    ("hetedik", 7),
    ("nyolcadik", 8),
    ("kilencedik", 9),
];

const TENS_DIGIT: [(&str, u32); 10] = [
    ("", 0),
    ("tizen", 10),
    ("huszon", 20),
    ("harminc", 30),
    ("negyven", 40),
    ("ötven", 50),
    ("hatvan", 60),
    ("hetven", 70),
    ("nyolcvan", 80),
    ("kilencven", 90),
];

struct OrdinalTables {
    by_value: HashMap<u32, String>,
    by_text: HashMap<String, u32>,
}

static ORDINAL_TABLES: LazyLock<OrdinalTables> = LazyLock::new(|| {
    let mut by_value = HashMap::new();
    let mut by_text = HashMap::new();
    for (ones_text, ones_val) in ONES_DIGIT {
        for (tens_text, tens_val) in TENS_DIGIT {
            let value = tens_val + ones_val;
            if SPECIAL_ORDINALS.iter().any(|(v, _)| *v == value) {
                continue;
            }
            let text = format!("{tens_text}{ones_text}");
            by_text.insert(text.clone(), value);
            by_value.insert(value, text);
        }
    }
    for (value, text) in SPECIAL_ORDINALS {
        by_text.insert(text.to_string(), value);
        by_value.insert(value, text.to_string());
    }
    OrdinalTables { by_value, by_text }
});

/// Ordinal word form of a number, e.g. `25` → `"huszonötödik"`.
///
/// Returns `None` outside the 1..=100 range the tables cover.
#[must_use]
pub fn int_to_ordinal_hun(value: u32) -> Option<&'static str> {
    ORDINAL_TABLES.by_value.get(&value).map(String::as_str)
}

/// Parse an ordinal word form, e.g. `"Nyolcadik"` → `8`.
#[must_use]
pub fn ordinal_hun_to_int(text: &str) -> Option<u32> {
    ORDINAL_TABLES.by_text.get(&text.to_lowercase()).copied()
}

/// Roman numeral form of a number, e.g. `23` → `"XXIII"`.
#[must_use]
pub fn int_to_roman(mut value: u32) -> String {
    const NUMERALS: [(&str, u32); 13] = [
        ("M", 1000),
        ("CM", 900),
        ("D", 500),
        ("CD", 400),
        ("C", 100),
        ("XC", 90),
        ("L", 50),
        ("XL", 40),
        ("X", 10),
        ("IX", 9),
        ("V", 5),
        ("IV", 4),
        ("I", 1),
    ];
    let mut result = String::new();
    while value > 0 {
        for (text, val) in NUMERALS {
            if val <= value {
                value -= val;
                result.push_str(text);
                break;
            }
        }
    }
    result
}

const HUNGARIAN_UPPERCASE_EXTRA: [char; 9] = ['É', 'Á', 'Ő', 'Ú', 'Ű', 'Ö', 'Ü', 'Ó', 'Í'];

/// Whether every character is an uppercase letter of the Hungarian alphabet.
#[must_use]
pub fn is_uppercase_hun(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_uppercase() || HUNGARIAN_UPPERCASE_EXTRA.contains(&c))
}

fn next_letter(c: char) -> Option<char> {
    if !c.is_ascii_alphanumeric() {
        return None;
    }
    let next = (c as u8 + 1) as char;
    next.is_ascii_alphanumeric().then_some(next)
}

fn split_last_char(identifier: &str) -> Option<(&str, char)> {
    let last = identifier.chars().next_back()?;
    Some((&identifier[..identifier.len() - last.len_utf8()], last))
}

/// Successor of a numeric identifier: `"12"` → `"13"`, `"4b"` → `"4c"`.
///
/// Used by paragraphs, numeric points and numeric subpoints.
#[must_use]
pub fn next_numeric_identifier(identifier: &str) -> Option<String> {
    if identifier.is_empty() {
        return None;
    }
    if identifier.chars().all(|c| c.is_ascii_digit()) {
        return identifier.parse::<u64>().ok().map(|n| (n + 1).to_string());
    }
    let (number, postfix) = split_last_char(identifier)?;
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if !postfix.is_ascii_alphabetic() {
        return None;
    }
    next_letter(postfix).map(|n| format!("{number}{n}"))
}

/// Successor of an alphabetic point identifier.
///
/// Steps over the Hungarian digraphs: `"ny"` → `"o"`, `"sz"` → `"t"`.
#[must_use]
pub fn next_alphabetic_point_identifier(identifier: &str) -> Option<String> {
    match identifier {
        "ny" => return Some("o".to_string()),
        "sz" => return Some("t".to_string()),
        _ => {}
    }
    let mut chars = identifier.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    next_letter(c).map(String::from)
}

/// Successor of an alphabetic subpoint identifier: `"c"` → `"d"`, `"ab"` → `"ac"`.
///
/// Two-character subpoints carry their parent point's letter as a prefix.
#[must_use]
pub fn next_alphabetic_subpoint_identifier(identifier: &str) -> Option<String> {
    let chars: Vec<char> = identifier.chars().collect();
    match chars.as_slice() {
        [c] => next_letter(*c).map(String::from),
        [prefix, c] => next_letter(*c).map(|n| format!("{prefix}{n}")),
        _ => None,
    }
}

/// Successor of an article identifier.
///
/// Handles the plain (`"16"` → `"17"`), book-prefixed (`"3:116"` →
/// `"3:117"`) and letter-suffixed (`"212/A"` → `"212/B"`) shapes.
#[must_use]
pub fn next_article_identifier(identifier: &str) -> Option<String> {
    if let Some((prefix, letter)) = identifier.split_once('/') {
        let mut chars = letter.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        return next_letter(c).map(|n| format!("{prefix}/{n}"));
    }
    if let Some((book, number)) = identifier.split_once(':') {
        return number
            .parse::<u64>()
            .ok()
            .map(|n| format!("{book}:{}", n + 1));
    }
    identifier.parse::<u64>().ok().map(|n| (n + 1).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals() {
        assert_eq!(int_to_ordinal_hun(1), Some("első"));
        assert_eq!(int_to_ordinal_hun(8), Some("nyolcadik"));
        assert_eq!(int_to_ordinal_hun(25), Some("huszonötödik"));
        assert_eq!(int_to_ordinal_hun(100), Some("századik"));
        assert_eq!(int_to_ordinal_hun(0), None);
        assert_eq!(int_to_ordinal_hun(101), None);
    }

    #[test]
    fn test_ordinal_parsing() {
        assert_eq!(ordinal_hun_to_int("első"), Some(1));
        assert_eq!(ordinal_hun_to_int("NYOLCADIK"), Some(8));
        assert_eq!(ordinal_hun_to_int("huszonötödik"), Some(25));
        assert_eq!(ordinal_hun_to_int("nemszám"), None);
    }

    #[test]
    fn test_roman() {
        assert_eq!(int_to_roman(1), "I");
        assert_eq!(int_to_roman(4), "IV");
        assert_eq!(int_to_roman(23), "XXIII");
        assert_eq!(int_to_roman(1990), "MCMXC");
    }

    #[test]
    fn test_uppercase_hun() {
        assert!(is_uppercase_hun("KÖNYV"));
        assert!(is_uppercase_hun("ÁLTALÁNOS"));
        assert!(!is_uppercase_hun("Fejezet"));
        assert!(!is_uppercase_hun("1."));
    }

    #[test]
    fn test_numeric_successors() {
        assert_eq!(next_numeric_identifier("12"), Some("13".to_string()));
        assert_eq!(next_numeric_identifier("4b"), Some("4c".to_string()));
        assert_eq!(next_numeric_identifier(""), None);
        assert_eq!(next_numeric_identifier("b4"), None);
    }

    #[test]
    fn test_alphabetic_point_successors() {
        assert_eq!(
            next_alphabetic_point_identifier("a"),
            Some("b".to_string())
        );
        assert_eq!(
            next_alphabetic_point_identifier("ny"),
            Some("o".to_string())
        );
        assert_eq!(
            next_alphabetic_point_identifier("sz"),
            Some("t".to_string())
        );
        assert_eq!(next_alphabetic_point_identifier("ab"), None);
    }

    #[test]
    fn test_alphabetic_subpoint_successors() {
        assert_eq!(
            next_alphabetic_subpoint_identifier("c"),
            Some("d".to_string())
        );
        assert_eq!(
            next_alphabetic_subpoint_identifier("ab"),
            Some("ac".to_string())
        );
        assert_eq!(next_alphabetic_subpoint_identifier("abc"), None);
    }

    #[test]
    fn test_article_successors() {
        assert_eq!(next_article_identifier("16"), Some("17".to_string()));
        assert_eq!(next_article_identifier("3:116"), Some("3:117".to_string()));
        assert_eq!(next_article_identifier("212/A"), Some("212/B".to_string()));
        assert_eq!(
            next_article_identifier("1:234/A"),
            Some("1:234/B".to_string())
        );
        assert_eq!(next_article_identifier("tizenhat"), None);
    }
}
