//! The built-in English pipeline: heuristic model + pattern resolver,
//! wired up by `build_recognizer` the way the CLI does it.

use std::sync::Arc;

use autoanno::backends::{build_recognizer, BuiltinModelLoader};
use autoanno::resolver::PatternResolver;
use autoanno::{AnnotatorConfig, EntityRecord, Recognizer, Span};
use chrono::NaiveDate;

fn recognizer(class: &str) -> Box<dyn Recognizer> {
    // Wednesday 2024-01-10 09:00
    let reference = NaiveDate::from_ymd_opt(2024, 1, 10)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let config = AnnotatorConfig {
        annotator_class: class.to_string(),
        ..AnnotatorConfig::default()
    };
    build_recognizer(
        &config,
        &BuiltinModelLoader,
        Arc::new(PatternResolver::with_reference(reference)),
        None,
    )
    .unwrap()
}

fn parse(sentence: &str) -> Vec<EntityRecord> {
    recognizer("MultiLingualAnnotator")
        .parse(sentence, None, None)
        .unwrap()
}

fn summary(entities: &[EntityRecord]) -> Vec<(&str, &str)> {
    entities
        .iter()
        .map(|e| (e.body.as_str(), e.entity_type.as_str()))
        .collect()
}

#[test]
fn alarm_time_and_date() {
    let found = parse("set an alarm for 7 am tomorrow");
    assert_eq!(summary(&found), vec![("7 am", "sys_time"), ("tomorrow", "sys_time")]);
    assert_eq!(found[0].span, Span::new(17, 20));
    assert_eq!(found[0].value["value"], "2024-01-11T07:00:00");
}

#[test]
fn hedged_duration_narrows_to_resolvable_part() {
    let found = parse("ready in nearly 15 minutes");
    assert_eq!(summary(&found), vec![("15 minutes", "sys_duration")]);
    assert_eq!(found[0].span, Span::new(16, 25));
}

#[test]
fn money_pulls_in_currency_symbol() {
    let found = parse("send $20 to Bob");
    assert_eq!(found[0].body, "$20");
    assert_eq!(found[0].span, Span::new(5, 7));
    assert_eq!(found[0].entity_type, "sys_amount-of-money");
    assert_eq!(found[1].body, "Bob");
    assert_eq!(found[1].entity_type, "sys_person");
}

#[test]
fn percent_becomes_fraction() {
    let found = recognizer("MultiLingualAnnotator")
        .parse("up 50% today", Some(&["sys_percent".to_string()]), None)
        .unwrap();
    assert_eq!(summary(&found), vec![("50%", "sys_percent")]);
    assert_eq!(found[0].value["value"], 0.5);
}

#[test]
fn possessive_is_stripped_from_person() {
    let found = parse("call Alice's office");
    assert_eq!(summary(&found), vec![("Alice", "sys_person")]);
    assert_eq!(found[0].span, Span::new(5, 9));
}

#[test]
fn type_filter_restricts_output() {
    let only_time = vec!["sys_time".to_string()];
    let found = recognizer("SpacyAnnotator")
        .parse("send $20 at 7 am", Some(&only_time), None)
        .unwrap();
    assert_eq!(summary(&found), vec![("7 am", "sys_time")]);
}

#[test]
fn supported_types_cover_system_entities() {
    let rec = recognizer("MultiLingualAnnotator");
    for ty in ["sys_time", "sys_interval", "sys_duration", "sys_number", "sys_person", "sys_org"] {
        assert!(rec.is_valid_entity(ty), "{ty} should be supported");
    }
    assert!(!rec.is_valid_entity("sys_weather"));
}

#[test]
fn empty_and_plain_sentences() {
    assert!(parse("").is_empty());
    assert!(parse("hello there").is_empty());
}
