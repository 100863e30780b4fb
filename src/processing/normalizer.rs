use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Anything outside word chars, whitespace and : / @ . , ( ) - [ ]
    static ref NOISE_CHARS: Regex = Regex::new(r"[^\w\s:/@.,()\-\[\]]+").unwrap();
}

/// Strip OCR noise characters from a line and trim the result.
pub fn clean_text(raw: &str) -> String {
    NOISE_CHARS.replace_all(raw, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_allowlisted_punctuation() {
        assert_eq!(
            clean_text("Patient Name: Doe, John (Jr.) [x] a@b.com 01/02-85"),
            "Patient Name: Doe, John (Jr.) [x] a@b.com 01/02-85"
        );
    }

    #[test]
    fn test_removes_noise() {
        assert_eq!(clean_text("  *Home Phone*: ~214|555|0199; "), "Home Phone: 2145550199");
        assert_eq!(clean_text("✓ SSN#: 123-45-6789"), "SSN: 123-45-6789");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("***"), "");
    }
}
