/// A language the OCR service can be asked to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognitionLanguage {
    pub code: &'static str,
    pub name: &'static str,
}

const fn language(code: &'static str, name: &'static str) -> RecognitionLanguage {
    RecognitionLanguage { code, name }
}

/// Languages accepted by the OCR service. The first entry lets the service detect it.
pub const SUPPORTED_LANGUAGES: &[RecognitionLanguage] = &[
    language("unk", "AutoDetect"),
    language("ar", "Arabic"),
    language("zh-Hans", "Chinese (Simplified)"),
    language("zh-Hant", "Chinese (Traditional)"),
    language("cs", "Czech"),
    language("da", "Danish"),
    language("nl", "Dutch"),
    language("en", "English"),
    language("fi", "Finnish"),
    language("fr", "French"),
    language("de", "German"),
    language("el", "Greek"),
    language("hu", "Hungarian"),
    language("it", "Italian"),
    language("ja", "Japanese"),
    language("ko", "Korean"),
    language("nb", "Norwegian"),
    language("pl", "Polish"),
    language("pt", "Portuguese"),
    language("ro", "Romanian"),
    language("ru", "Russian"),
    language("sr-Cyrl", "Serbian (Cyrillic)"),
    language("sr-Latn", "Serbian (Latin)"),
    language("sk", "Slovak"),
    language("es", "Spanish"),
    language("sv", "Swedish"),
    language("tr", "Turkish"),
];

/// The language every recognition request is sent with.
pub fn default_language() -> RecognitionLanguage {
    SUPPORTED_LANGUAGES[0]
}
