use super::*;
use crate::config::{CleanupSettings, Replacement};

fn sanitizer() -> Sanitizer {
    Sanitizer::new(&CleanupSettings::default())
}

#[test]
fn display_applies_replacements_in_order_and_trims() {
    let s = sanitizer();
    assert_eq!(s.display("  Don\u{2019}t_Stop  ", false), "Don't Stop");
    assert_eq!(s.display("\u{201c}Quoted\u{201d}", false), "\"Quoted\"");
}

#[test]
fn filesystem_output_is_path_safe() {
    let s = sanitizer();
    assert_eq!(s.filesystem("AC/DC: Live?", false), "AC-DC- Live");
    assert_eq!(s.filesystem("a<b>c|d*e\"f", false), "abcdef");
}

#[test]
fn empty_source_strings_are_ignored() {
    let settings = CleanupSettings {
        display_chars: vec![Replacement::new(&["", "x"], "y")],
        ..CleanupSettings::default()
    };
    let s = Sanitizer::new(&settings);
    assert_eq!(s.display("axa", false), "aya");
}

#[test]
fn capitalize_titles_each_word_and_uppercases_numerals() {
    let s = sanitizer();
    assert_eq!(
        s.display("the lord of the rings iii", true),
        "The Lord Of The Rings III"
    );
    assert_eq!(s.display("symphony no. 9", true), "Symphony No. 9");
    assert_eq!(s.display("star wars ost", true), "Star Wars OST");
}

#[test]
fn capitalize_keeps_small_words_lowercase_except_first() {
    assert_eq!(capitalize_words("de la soul"), "De la Soul");
    assert_eq!(capitalize_words("la vie en rose"), "La Vie en Rose");
    assert_eq!(capitalize_words("ROMEO Y JULIETA"), "Romeo y Julieta");
}

#[test]
fn capitalize_handles_numeral_with_period() {
    assert_eq!(capitalize_words("iv. allegro"), "IV. Allegro");
    assert_eq!(capitalize_words("ii.   adagio"), "II. Adagio");
}

#[test]
fn capitalize_looks_past_opening_brackets() {
    assert_eq!(capitalize_words("song (live at wembley)"), "Song (Live At Wembley)");
    assert_eq!(capitalize_words("[remastered]"), "[Remastered]");
    assert_eq!(capitalize_words("{'99 mix}"), "{'99 Mix}");
    assert_eq!(capitalize_words("(2009)"), "(2009)");
}

#[test]
fn sanitize_number_keeps_part_before_slash() {
    assert_eq!(sanitize_number("5/12"), Some(5));
    assert_eq!(sanitize_number("07"), Some(7));
    assert_eq!(sanitize_number(" 3 "), Some(3));
}

#[test]
fn sanitize_number_rejects_garbage() {
    assert_eq!(sanitize_number("abc"), None);
    assert_eq!(sanitize_number(""), None);
    assert_eq!(sanitize_number("/4"), None);
}
