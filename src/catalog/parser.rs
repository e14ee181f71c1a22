//! Channel post parser
//!
//! Extracts structured product fields (name, price, hashtags) from the
//! free-text caption of a channel post. Posts without a recognizable name
//! or price produce no entry and are skipped by the caller.

use regex::Regex;

use crate::utils::helpers::{extract_hashtags, normalize_whitespace};

/// Structured fields extracted from a channel post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPost {
    pub name: String,
    /// Whole caption, whitespace-normalized
    pub description: String,
    /// Price in minor units of the shop currency
    pub price: i64,
    /// Hashtags in order of appearance, lowercased, without '#'
    pub hashtags: Vec<String>,
}

/// Parser for free-text product posts
#[derive(Debug, Clone)]
pub struct PostParser {
    price_re: Regex,
}

impl PostParser {
    pub fn new() -> Self {
        // A price must be marked: a "narxi"/"price" label, a leading '$',
        // or a trailing currency word. A bare number is not a price.
        let price_re = Regex::new(
            r"(?i)(?:narxi|price)\s*:?\s*(\d+(?:[ ,]\d{3})*)|\$\s*(\d+(?:[ ,]\d{3})*)|(\d+(?:[ ,]\d{3})*)\s*(?:so'm|som|сум|uzs)",
        )
        .expect("price pattern is valid");

        Self { price_re }
    }

    /// Parse a post caption. Returns `None` when the name or price is
    /// missing or unparseable.
    pub fn parse(&self, text: &str) -> Option<ParsedPost> {
        let captures = self.price_re.captures(text)?;

        let (price_span, digits) = captures
            .iter()
            .skip(1)
            .flatten()
            .map(|m| (m.range(), m.as_str()))
            .next()?;

        let price: i64 = digits.replace([' ', ','], "").parse().ok()?;
        if price <= 0 {
            return None;
        }

        // The whole matched token (label, '$', currency word included) is
        // stripped when deriving the name.
        let full_match = captures.get(0).map(|m| m.range()).unwrap_or(price_span);

        let name = self.extract_name(text, full_match)?;
        let hashtags = extract_hashtags(text);
        let description = normalize_whitespace(text);

        Some(ParsedPost {
            name,
            description,
            price,
            hashtags,
        })
    }

    /// Derive the product name: the first line of the caption with the
    /// price token and any hashtags removed.
    fn extract_name(&self, text: &str, price_match: std::ops::Range<usize>) -> Option<String> {
        let mut cleaned = String::with_capacity(text.len());
        cleaned.push_str(&text[..price_match.start]);
        cleaned.push(' ');
        cleaned.push_str(&text[price_match.end..]);

        let first_line = cleaned
            .lines()
            .map(|line| {
                let without_tags: Vec<&str> = line
                    .split_whitespace()
                    .filter(|word| !word.starts_with('#'))
                    .collect();
                without_tags.join(" ")
            })
            .find(|line| !line.trim().is_empty())?;

        let name = normalize_whitespace(&first_line);
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

impl Default for PostParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollar_price_post() {
        let parser = PostParser::new();
        let parsed = parser.parse("Sneakers $40 #shoes").unwrap();
        assert_eq!(parsed.name, "Sneakers");
        assert_eq!(parsed.price, 40);
        assert_eq!(parsed.hashtags, vec!["shoes"]);
    }

    #[test]
    fn test_labelled_price_with_separators() {
        let parser = PostParser::new();
        let parsed = parser
            .parse("Qishki kurtka\nNarxi: 350 000 so'm\n#kurtka")
            .unwrap();
        assert_eq!(parsed.name, "Qishki kurtka");
        assert_eq!(parsed.price, 350_000);
        assert_eq!(parsed.hashtags, vec!["kurtka"]);
    }

    #[test]
    fn test_currency_suffix_price() {
        let parser = PostParser::new();
        let parsed = parser.parse("Futbolka 85,000 uzs #futbolka").unwrap();
        assert_eq!(parsed.name, "Futbolka");
        assert_eq!(parsed.price, 85_000);
    }

    #[test]
    fn test_missing_price_is_skipped() {
        let parser = PostParser::new();
        assert!(parser.parse("Yangi kolleksiya keldi! #shim").is_none());
    }

    #[test]
    fn test_bare_number_is_not_a_price() {
        let parser = PostParser::new();
        assert!(parser.parse("Model 2024 keldi #kepka").is_none());
    }

    #[test]
    fn test_missing_name_is_skipped() {
        let parser = PostParser::new();
        assert!(parser.parse("$40 #shoes").is_none());
    }

    #[test]
    fn test_multiple_hashtags_keep_order() {
        let parser = PostParser::new();
        let parsed = parser.parse("Etik $25 #etik #sale #yangi").unwrap();
        assert_eq!(parsed.hashtags, vec!["etik", "sale", "yangi"]);
    }

    #[test]
    fn test_description_is_normalized() {
        let parser = PostParser::new();
        let parsed = parser.parse("Sumka   charm\nNarxi: 120 000 so'm").unwrap();
        assert_eq!(parsed.description, "Sumka charm Narxi: 120 000 so'm");
    }
}
