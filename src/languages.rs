//! ISO 639-1 language lookup table
//!
//! Maps two-letter language codes to English display names and extracts the
//! code embedded in a localization file name (`en.json`, `app.en.json`, ...).
//! This table is a collaborator of the pipeline, not part of it: the core
//! only consumes `Language` values resolved here.

use std::path::Path;

/// One ISO 639-1 entry: two-letter code and English display name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// All supported ISO 639-1 languages
pub const LANGUAGES: &[Language] = &[
    Language { code: "af", name: "Afrikaans" },
    Language { code: "am", name: "Amharic" },
    Language { code: "ar", name: "Arabic" },
    Language { code: "az", name: "Azerbaijani" },
    Language { code: "be", name: "Belarusian" },
    Language { code: "bg", name: "Bulgarian" },
    Language { code: "bn", name: "Bengali" },
    Language { code: "bs", name: "Bosnian" },
    Language { code: "ca", name: "Catalan" },
    Language { code: "cs", name: "Czech" },
    Language { code: "cy", name: "Welsh" },
    Language { code: "da", name: "Danish" },
    Language { code: "de", name: "German" },
    Language { code: "el", name: "Greek" },
    Language { code: "en", name: "English" },
    Language { code: "eo", name: "Esperanto" },
    Language { code: "es", name: "Spanish" },
    Language { code: "et", name: "Estonian" },
    Language { code: "eu", name: "Basque" },
    Language { code: "fa", name: "Persian" },
    Language { code: "fi", name: "Finnish" },
    Language { code: "fr", name: "French" },
    Language { code: "ga", name: "Irish" },
    Language { code: "gl", name: "Galician" },
    Language { code: "gu", name: "Gujarati" },
    Language { code: "ha", name: "Hausa" },
    Language { code: "he", name: "Hebrew" },
    Language { code: "hi", name: "Hindi" },
    Language { code: "hr", name: "Croatian" },
    Language { code: "hu", name: "Hungarian" },
    Language { code: "hy", name: "Armenian" },
    Language { code: "id", name: "Indonesian" },
    Language { code: "ig", name: "Igbo" },
    Language { code: "is", name: "Icelandic" },
    Language { code: "it", name: "Italian" },
    Language { code: "ja", name: "Japanese" },
    Language { code: "ka", name: "Georgian" },
    Language { code: "kk", name: "Kazakh" },
    Language { code: "km", name: "Khmer" },
    Language { code: "kn", name: "Kannada" },
    Language { code: "ko", name: "Korean" },
    Language { code: "ku", name: "Kurdish" },
    Language { code: "ky", name: "Kyrgyz" },
    Language { code: "lb", name: "Luxembourgish" },
    Language { code: "lo", name: "Lao" },
    Language { code: "lt", name: "Lithuanian" },
    Language { code: "lv", name: "Latvian" },
    Language { code: "mg", name: "Malagasy" },
    Language { code: "mk", name: "Macedonian" },
    Language { code: "ml", name: "Malayalam" },
    Language { code: "mn", name: "Mongolian" },
    Language { code: "mr", name: "Marathi" },
    Language { code: "ms", name: "Malay" },
    Language { code: "mt", name: "Maltese" },
    Language { code: "my", name: "Burmese" },
    Language { code: "ne", name: "Nepali" },
    Language { code: "nl", name: "Dutch" },
    Language { code: "no", name: "Norwegian" },
    Language { code: "pa", name: "Punjabi" },
    Language { code: "pl", name: "Polish" },
    Language { code: "ps", name: "Pashto" },
    Language { code: "pt", name: "Portuguese" },
    Language { code: "ro", name: "Romanian" },
    Language { code: "ru", name: "Russian" },
    Language { code: "sd", name: "Sindhi" },
    Language { code: "si", name: "Sinhala" },
    Language { code: "sk", name: "Slovak" },
    Language { code: "sl", name: "Slovenian" },
    Language { code: "so", name: "Somali" },
    Language { code: "sq", name: "Albanian" },
    Language { code: "sr", name: "Serbian" },
    Language { code: "sv", name: "Swedish" },
    Language { code: "sw", name: "Swahili" },
    Language { code: "ta", name: "Tamil" },
    Language { code: "te", name: "Telugu" },
    Language { code: "tg", name: "Tajik" },
    Language { code: "th", name: "Thai" },
    Language { code: "tk", name: "Turkmen" },
    Language { code: "tl", name: "Tagalog" },
    Language { code: "tr", name: "Turkish" },
    Language { code: "uk", name: "Ukrainian" },
    Language { code: "ur", name: "Urdu" },
    Language { code: "uz", name: "Uzbek" },
    Language { code: "vi", name: "Vietnamese" },
    Language { code: "xh", name: "Xhosa" },
    Language { code: "yo", name: "Yoruba" },
    Language { code: "zh", name: "Chinese" },
    Language { code: "zu", name: "Zulu" },
];

/// Look up a language by its two-letter ISO 639-1 code
///
/// # Example
///
/// ```ignore
/// assert_eq!(language_from_code("fr").unwrap().name, "French");
/// ```
pub fn language_from_code(code: &str) -> Option<&'static Language> {
    let code = code.to_lowercase();
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Extract the language embedded in a localization file name
///
/// The file name is split on `.`, `_` and `-`, and the first segment that is
/// a known ISO 639-1 code wins. `jsons/en.json` and `app.en.json` both
/// resolve to English.
pub fn language_from_filename<P: AsRef<Path>>(path: P) -> Option<&'static Language> {
    let file_name = path.as_ref().file_name()?.to_str()?;
    file_name
        .split(['.', '_', '-'])
        .find_map(language_from_code)
}

/// Iterate over every supported ISO 639-1 code
pub fn all_language_codes() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|l| l.code)
}
