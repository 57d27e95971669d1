// Static bidirectional directory of supported languages
//
// Pure lookup over a fixed closed set; unknown inputs resolve to
// sentinels rather than errors.

/// ISO 639-1 code to display name, for every language the workflow
/// supports. Order is insignificant.
const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("fr", "French"),
    ("es", "Spanish"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("nl", "Dutch"),
    ("ru", "Russian"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("bn", "Bengali"),
    ("pa", "Punjabi"),
    ("te", "Telugu"),
    ("mr", "Marathi"),
    ("ta", "Tamil"),
    ("ur", "Urdu"),
    ("gu", "Gujarati"),
    ("kn", "Kannada"),
    ("ml", "Malayalam"),
    ("th", "Thai"),
    ("vi", "Vietnamese"),
];

/// Sentinel name for codes outside the supported set
pub const UNKNOWN_NAME: &str = "Unknown";

/// Sentinel code for names outside the supported set
pub const FALLBACK_CODE: &str = "en";

/// Resolve a language code to its display name.
pub fn name_for_code(code: &str) -> &'static str {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, n)| *n)
        .unwrap_or(UNKNOWN_NAME)
}

/// Resolve a display name back to its language code.
pub fn code_for_name(name: &str) -> &'static str {
    LANGUAGES
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(c, _)| *c)
        .unwrap_or(FALLBACK_CODE)
}

/// All supported ISO 639-1 codes.
pub fn supported_codes() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|(c, _)| *c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_lookups() {
        assert_eq!(name_for_code("fr"), "French");
        assert_eq!(code_for_name("French"), "fr");
        assert_eq!(name_for_code("en"), "English");
    }

    #[test]
    fn test_unknown_sentinels() {
        assert_eq!(name_for_code("xx"), UNKNOWN_NAME);
        assert_eq!(name_for_code(""), UNKNOWN_NAME);
        assert_eq!(code_for_name("Klingon"), FALLBACK_CODE);
        assert_eq!(code_for_name(""), FALLBACK_CODE);
    }

    #[test]
    fn test_round_trip_stability() {
        for code in supported_codes() {
            let name = name_for_code(code);
            assert_eq!(name_for_code(code_for_name(name)), name);
        }
    }
}
