//! Language utilities for language tag handling
//!
//! Translation services accept ISO 639-1 codes, optionally followed by a
//! region or script subtag (`zh-CN`, `pt-BR`). This module validates such
//! tags, normalizes 3-letter codes to their 2-letter form and resolves
//! display names.

use anyhow::{anyhow, Result};
use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;

/// Languages offered by default, as (display name, tag)
pub const COMMON_LANGUAGES: [(&str, &str); 10] = [
    ("English", "en"),
    ("French", "fr"),
    ("Spanish", "es"),
    ("German", "de"),
    ("Chinese (Simplified)", "zh-CN"),
    ("Japanese", "ja"),
    ("Russian", "ru"),
    ("Portuguese", "pt"),
    ("Italian", "it"),
    ("Arabic", "ar"),
];

static LANGUAGE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]{2,3})(?:[-_]([A-Za-z]{2}|[A-Za-z]{4}|[0-9]{3}))?$").unwrap()
});

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

/// ISO 639-2/B codes that differ from their 639-2/T counterpart
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 && Language::from_639_1(&normalized_code).is_some() {
        return Ok(LanguageCodeType::Part1);
    }
    if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2T);
        }
        if part2b_to_part2t(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2B);
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Split a tag such as `zh-CN` into its primary code and optional subtag
fn split_tag(tag: &str) -> Result<(String, Option<String>)> {
    let trimmed = tag.trim();
    let captures = LANGUAGE_TAG
        .captures(trimmed)
        .ok_or_else(|| anyhow!("Invalid language tag: {}", tag))?;
    let primary = captures
        .get(1)
        .map(|m| m.as_str().to_lowercase())
        .ok_or_else(|| anyhow!("Invalid language tag: {}", tag))?;
    let subtag = captures.get(2).map(|m| m.as_str().to_string());
    Ok((primary, subtag))
}

/// Validate a language tag: an ISO code optionally followed by a region or script
pub fn validate_language_tag(tag: &str) -> Result<LanguageCodeType> {
    let (primary, _) = split_tag(tag)?;
    validate_language_code(&primary)
}

/// Normalize a tag to the form translation services expect.
///
/// The primary code becomes ISO 639-1 when one exists; a region subtag is
/// upper-cased and a script subtag title-cased (`ZH-cn` -> `zh-CN`).
pub fn normalize_language_tag(tag: &str) -> Result<String> {
    let (primary, subtag) = split_tag(tag)?;
    let primary = normalize_to_part1_or_part2t(&primary)?;

    Ok(match subtag {
        None => primary,
        Some(subtag) if subtag.len() == 4 => {
            let mut chars = subtag.chars();
            let script: String = chars
                .next()
                .map(|first| first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect())
                .unwrap_or_default();
            format!("{}-{}", primary, script)
        }
        Some(subtag) => format!("{}-{}", primary, subtag.to_uppercase()),
    })
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
    } else if normalized_code.len() == 3 {
        let part2t = part2b_to_part2t(&normalized_code).unwrap_or(&normalized_code);
        if let Some(lang) = Language::from_639_3(part2t) {
            return Ok(lang
                .to_639_1()
                .map(|c| c.to_string())
                .unwrap_or_else(|| part2t.to_string()));
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Get the English display name for a language tag
pub fn get_language_name(tag: &str) -> Result<String> {
    if let Some((name, _)) = COMMON_LANGUAGES
        .iter()
        .find(|(_, common)| common.eq_ignore_ascii_case(tag.trim()))
    {
        return Ok(name.to_string());
    }

    let (primary, _) = split_tag(tag)?;
    let language = match primary.len() {
        2 => Language::from_639_1(&primary),
        3 => Language::from_639_3(part2b_to_part2t(&primary).unwrap_or(&primary)),
        _ => None,
    };

    language
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language: {}", tag))
}
