/*!
 * Language utilities.
 *
 * This module provides the local script-based language detector and the
 * ISO 639 helpers used to name languages in user-facing messages.
 *
 * Detection is coarse: each candidate is a character class, the score is the
 * share of characters matching it, and the first candidate wins ties. Han
 * ideographs belong to both the `cmn` and `jpn` classes, so pure Han text
 * reports `cmn` because it is registered first.
 */

use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;

/// Code returned when nothing can be decided
pub const UNDETERMINED: &str = "und";

/// Target sentinel meaning "no language chosen"
pub const AUTO: &str = "auto";

/// Candidate scripts in registration order
static SCRIPT_CLASSES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("cmn", r"[\x{4E00}-\x{9FFF}]"),
        ("jpn", r"[\x{3040}-\x{30FF}\x{3400}-\x{4DBF}\x{4E00}-\x{9FFF}]"),
        ("kor", r"[\x{AC00}-\x{D7AF}\x{1100}-\x{11FF}]"),
        ("eng", r"[a-zA-Z]"),
    ]
    .into_iter()
    .map(|(code, pattern)| {
        // Patterns are literals; a failure here is a programming error
        let regex = Regex::new(pattern).unwrap_or_else(|e| panic!("bad class {}: {}", code, e));
        (code, regex)
    })
    .collect()
});

/// Result of a local detection
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Script code (`cmn`, `jpn`, `kor`, `eng` or `und`)
    pub code: &'static str,
    /// Share of characters in the winning class, 0.0..=1.0
    pub score: f64,
}

/// Detect the dominant script of `text` and report its score.
pub fn detect_script(text: &str) -> Detection {
    let length = text.chars().count();
    let mut best = Detection {
        code: UNDETERMINED,
        score: 0.0,
    };
    if length == 0 {
        return best;
    }

    for (code, class) in SCRIPT_CLASSES.iter() {
        let matches = class.find_iter(text).count();
        let score = matches as f64 / length as f64;
        if score > best.score {
            best = Detection { code: *code, score };
        }
    }
    best
}

/// Detect the script code of `text`; `und` for empty or unclassifiable text.
pub fn detect(text: &str) -> &'static str {
    detect_script(text).code
}

/// Map a script code to the provider's language vocabulary.
///
/// Unmapped codes, `und` included, fall back to `EN`.
pub fn map_to_provider_code(code: &str) -> &'static str {
    match code {
        "cmn" => "ZH",
        "jpn" => "JA",
        "kor" => "KO",
        _ => "EN",
    }
}

/// Detect `text` and express the result in provider codes.
pub fn detect_language(text: &str) -> &'static str {
    map_to_provider_code(detect(text))
}

/// True when `code` does not name a concrete target language.
pub fn is_auto_or_empty(code: &str) -> bool {
    let code = code.trim();
    code.is_empty() || code.eq_ignore_ascii_case(AUTO)
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    // If it's a 2-letter code, convert to 3-letter
    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    }
    // If it's already a 3-letter code, ensure it's ISO 639-2/T
    else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        // ISO 639-2/B codes that differ from ISO 639-2/T
        match normalized_code.as_str() {
            "fre" => return Ok("fra".to_string()),
            "ger" => return Ok("deu".to_string()),
            "dut" => return Ok("nld".to_string()),
            "gre" => return Ok("ell".to_string()),
            "chi" => return Ok("zho".to_string()),
            "cze" => return Ok("ces".to_string()),
            "per" => return Ok("fas".to_string()),
            "rum" => return Ok("ron".to_string()),
            "slo" => return Ok("slk".to_string()),
            _ => {}
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(normalized1), Ok(normalized2)) => normalized1 == normalized2,
        _ => false,
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Human-readable name for a provider code such as `FR` or `EN-US`.
///
/// Falls back to the code itself when it is not an ISO 639 code.
pub fn display_language_name(code: &str) -> String {
    let primary = code.split(['-', '_']).next().unwrap_or(code);
    get_language_name(primary).unwrap_or_else(|_| code.to_string())
}
