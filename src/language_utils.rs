//! Language utilities for the transcription language option
//!
//! The speech recognizer expects ISO 639-1 codes where one exists. Users may
//! pass ISO 639-1, ISO 639-2/T or ISO 639-2/B codes; this module validates and
//! converts them.

use anyhow::{Result, anyhow};
use isolang::Language;

// ISO 639-2/B codes that differ from their ISO 639-2/T counterparts
const BIBLIOGRAPHIC_CODES: [(&str, &str); 18] = [
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    BIBLIOGRAPHIC_CODES
        .iter()
        .find(|(b, _)| *b == code)
        .map(|(_, t)| *t)
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 if Language::from_639_1(&normalized_code).is_some() => Ok(LanguageCodeType::Part1),
        3 if Language::from_639_3(&normalized_code).is_some() => Ok(LanguageCodeType::Part2T),
        3 if bibliographic_to_terminology(&normalized_code).is_some() => Ok(LanguageCodeType::Part2B),
        _ => Err(anyhow!("Invalid language code: {}", code)),
    }
}

fn to_language(code: &str) -> Result<Language> {
    let normalized_code = code.trim().to_lowercase();
    let language = match validate_language_code(&normalized_code)? {
        LanguageCodeType::Part1 => Language::from_639_1(&normalized_code),
        LanguageCodeType::Part2T => Language::from_639_3(&normalized_code),
        LanguageCodeType::Part2B => bibliographic_to_terminology(&normalized_code).and_then(Language::from_639_3),
    };
    language.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Code to hand to the recognizer: ISO 639-1 if the language has one,
/// ISO 639-2/T otherwise
pub fn to_recognizer_code(code: &str) -> Result<String> {
    let language = to_language(code)?;
    Ok(language
        .to_639_1()
        .map(str::to_string)
        .unwrap_or_else(|| language.to_639_3().to_string()))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (to_language(code1), to_language(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    Ok(to_language(code)?.to_name().to_string())
}
