//! Catalog pipeline integration tests
//!
//! End-to-end tests of the parse -> classify steps without a database.

use std::collections::HashMap;

use BazarBot::catalog::{CategoryClassifier, PostParser};
use BazarBot::config::Settings;

fn footwear_classifier() -> CategoryClassifier {
    let mut table = HashMap::new();
    table.insert("shoes".to_string(), "Footwear".to_string());
    CategoryClassifier::new(table, "Uncategorized")
}

#[test]
fn valid_post_yields_one_categorized_product() {
    let parser = PostParser::new();
    let classifier = footwear_classifier();

    let parsed = parser.parse("Sneakers $40 #shoes").expect("post should parse");

    assert_eq!(parsed.name, "Sneakers");
    assert_eq!(parsed.price, 40);
    assert_eq!(classifier.classify(&parsed.hashtags), "Footwear");
}

#[test]
fn post_without_price_yields_no_product() {
    let parser = PostParser::new();
    assert!(parser.parse("Sneakers, new collection #shoes").is_none());
}

#[test]
fn post_without_name_yields_no_product() {
    let parser = PostParser::new();
    assert!(parser.parse("$40 #shoes").is_none());
}

#[test]
fn unrecognized_hashtags_fall_back() {
    let parser = PostParser::new();
    let classifier = footwear_classifier();

    let parsed = parser.parse("Mystery box $5 #surprise").expect("post should parse");
    assert_eq!(classifier.classify(&parsed.hashtags), "Uncategorized");
}

#[test]
fn default_hashtag_table_classifies_shop_posts() {
    let parser = PostParser::new();
    let settings = Settings::default();
    let classifier = CategoryClassifier::from_config(&settings.catalog);

    let parsed = parser
        .parse("Qishki kurtka\nNarxi: 350 000 so'm\n#kurtka #yangi")
        .expect("post should parse");

    assert_eq!(parsed.price, 350_000);
    assert_eq!(classifier.classify(&parsed.hashtags), "Kurtkalar");
}

#[test]
fn classification_is_deterministic() {
    let classifier = footwear_classifier();
    let tags = vec!["sale".to_string(), "shoes".to_string()];

    let first = classifier.classify(&tags);
    let second = classifier.classify(&tags);
    assert_eq!(first, second);
}
