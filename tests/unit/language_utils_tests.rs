/*!
 * Tests for language detection and language code utilities
 */

use layerlingo::language_utils::{
    self, UNDETERMINED, detect, detect_language, detect_script, display_language_name,
    is_auto_or_empty, map_to_provider_code,
};

/// Test that empty text is undetermined
#[test]
fn test_detect_withEmptyText_shouldReturnUndetermined() {
    let detection = detect_script("");
    assert_eq!(detection.code, UNDETERMINED);
    assert_eq!(detection.score, 0.0);
}

/// Test that single-script text scores 1.0
#[test]
fn test_detectScript_withPureScripts_shouldScoreOne() {
    let cases = [
        ("漢字中文", "cmn"),
        ("ひらがな", "jpn"),
        ("한국어", "kor"),
        ("Hello", "eng"),
    ];
    for (text, expected) in cases {
        let detection = detect_script(text);
        assert_eq!(detection.code, expected, "text: {}", text);
        assert_eq!(detection.score, 1.0, "text: {}", text);
    }
}

/// Test that pure Han text is reported as the first registered candidate
#[test]
fn test_detect_withHanOnly_shouldPreferChineseOnTie() {
    assert_eq!(detect("中文"), "cmn");
}

/// Test the share based score with mixed scripts
#[test]
fn test_detectScript_withMixedText_shouldPickHighestShare() {
    // 3 Latin letters, 2 Hangul syllables, 1 space
    let detection = detect_script("abc 한국");
    assert_eq!(detection.code, "eng");
    assert!((detection.score - 0.5).abs() < f64::EPSILON);
}

/// Test mapping to provider codes
#[test]
fn test_mapToProviderCode_withKnownAndUnknownCodes_shouldFallBackToEnglish() {
    assert_eq!(map_to_provider_code("cmn"), "ZH");
    assert_eq!(map_to_provider_code("jpn"), "JA");
    assert_eq!(map_to_provider_code("kor"), "KO");
    assert_eq!(map_to_provider_code("eng"), "EN");
    assert_eq!(map_to_provider_code(UNDETERMINED), "EN");
    assert_eq!(map_to_provider_code("xyz"), "EN");
}

/// Test detection expressed in provider codes
#[test]
fn test_detectLanguage_withVariousScripts_shouldReturnProviderCodes() {
    assert_eq!(detect_language("你好世界"), "ZH");
    assert_eq!(detect_language("こんにちは"), "JA");
    assert_eq!(detect_language("안녕하세요"), "KO");
    assert_eq!(detect_language("Bonjour"), "EN");
    assert_eq!(detect_language("123"), "EN");
}

/// Test the missing target sentinel
#[test]
fn test_isAutoOrEmpty_withSentinels_shouldReturnTrue() {
    assert!(is_auto_or_empty(""));
    assert!(is_auto_or_empty("   "));
    assert!(is_auto_or_empty("auto"));
    assert!(is_auto_or_empty("AUTO"));
    assert!(!is_auto_or_empty("FR"));
}

/// Test language names used in notifications
#[test]
fn test_displayLanguageName_withProviderCodes_shouldReturnEnglishNames() {
    assert_eq!(display_language_name("FR"), "French");
    assert_eq!(display_language_name("EN-GB"), "English");
    assert_eq!(display_language_name("PT_BR"), "Portuguese");
    assert_eq!(display_language_name("XX"), "XX");
}

/// Test ISO code matching
#[test]
fn test_languageCodesMatch_withTwoAndThreeLetterCodes_shouldMatch() {
    assert!(language_utils::language_codes_match("fr", "fra"));
    assert!(language_utils::language_codes_match("de", "ger"));
    assert!(!language_utils::language_codes_match("en", "fr"));
}
