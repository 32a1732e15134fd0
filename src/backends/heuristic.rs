//! Heuristic English NER model.
//!
//! Stands in for a statistical model when none is installed. Regexes find
//! numeric and temporal expressions, capitalization finds names. Labels use
//! the OntoNotes inventory so the value resolution rules apply unchanged.
//!
//! Core principles:
//! 1. Structural signals (capitalization, punctuation) are free features
//! 2. High-precision cues (Inc., Dr., in/from) cost little
//! 3. Lexicons stay small

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{NerModel, RawEntity};
use crate::offset::{char_slice, SpanConverter};
use crate::Result;

const LABELS: &[&str] = &[
    "PERSON", "ORG", "GPE", "CARDINAL", "ORDINAL", "MONEY", "PERCENT", "DATE", "TIME", "QUANTITY",
];

// Longer alternatives first so "sixty" is not read as "six".
const NUMBER: &str = r"(?:\d+(?:\.\d+)?|(?:eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety|hundred|thousand|million|zero|one|two|three|four|five|six|seven|eight|nine|ten)(?:[- ](?:one|two|three|four|five|six|seven|eight|nine|hundred|thousand|million))*)";

const WEEKDAYS: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";

const ORG_SUFFIX: &[&str] = &[
    "inc.", "inc", "corp.", "corp", "ltd.", "ltd", "llc", "co.", "plc", "foundation", "institute",
    "university", "college", "bank", "group", "agency", "company", "corporation", "holdings",
];
const PERSON_PREFIX: &[&str] = &["mr.", "mr", "ms.", "ms", "mrs.", "mrs", "dr.", "dr", "prof.", "prof"];
const LOC_PREPOSITION: &[&str] = &["in", "from", "near"];

// Capitalized only because they start a sentence or a command.
const COMMON_SENTENCE_STARTERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "it", "i", "he", "she", "we", "they", "you",
    "in", "on", "at", "to", "for", "from", "by", "with", "and", "but", "or", "so", "if", "please",
    "what", "where", "when", "who", "why", "how", "is", "are", "was", "can", "could", "would",
    "will", "do", "does", "set", "book", "find", "show", "get", "remind", "wake", "send", "order",
    "buy", "tell", "play", "add", "cancel", "turn", "call", "make", "meet", "schedule", "text",
    "email", "message", "ask", "hi", "hello", "thanks",
];

const KNOWN_ORGS: &[&str] = &[
    "google", "apple", "microsoft", "amazon", "facebook", "meta", "tesla", "twitter", "ibm",
    "intel", "nvidia", "oracle", "cisco", "samsung", "sony", "toyota", "nasa", "fbi", "bbc", "cnn",
    "reuters", "bloomberg", "spotify", "netflix", "uber", "airbnb", "paypal", "visa",
];

const KNOWN_LOCS: &[&str] = &[
    "paris", "london", "tokyo", "berlin", "rome", "madrid", "moscow", "beijing", "shanghai",
    "dubai", "singapore", "sydney", "toronto", "chicago", "boston", "seattle", "california",
    "texas", "florida", "new york", "san francisco", "washington", "europe", "asia", "africa",
    "america", "australia", "china", "india", "japan", "germany", "france", "italy", "spain",
    "brazil", "mexico", "russia", "korea", "canada", "uk", "usa",
];

const KNOWN_PERSONS: &[&str] = &[
    "john", "jane", "mary", "james", "robert", "michael", "william", "david", "richard", "thomas",
    "george", "elon", "jeff", "mark", "steve", "tim", "peter", "paul", "andrew", "alice", "bob",
    "maria", "anna", "sarah", "emma",
];

struct Rule {
    label: &'static str,
    regex: Regex,
    group: usize,
}

fn rule(label: &'static str, pattern: &str, group: usize) -> Rule {
    Rule {
        label,
        regex: Regex::new(pattern).expect("valid regex"),
        group,
    }
}

// Order is priority: earlier rules claim spans first.
static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let n = NUMBER;
    let days = WEEKDAYS;
    vec![
        rule("MONEY", &format!(r"(?i)[$€£¥]\s?({n})\b"), 1),
        rule("MONEY", &format!(r"(?i)\b{n}\s+(?:dollars?|euros?|pounds|bucks|cents?)\b"), 0),
        rule("PERCENT", &format!(r"(?i)\b{n}\s?(?:%|percent\b|per cent\b)"), 0),
        rule(
            "TIME",
            &format!(
                r"(?i)\b(?:(?:nearly|about|around|almost|roughly|over|under)\s+)?{n}\s+(?:seconds?|minutes?|mins?|hours?|hrs?)\b"
            ),
            0,
        ),
        rule("TIME", r"(?i)\b\d{1,2}(?::\d{2})?\s?(?:[ap]m\b|[ap]\.m\.)", 0),
        rule("TIME", r"\b\d{1,2}:\d{2}\b", 0),
        rule("TIME", r"(?i)\b(?:noon|midnight|tonight|this (?:morning|afternoon|evening))\b", 0),
        rule(
            "DATE",
            &format!(
                r"(?i)\b(?:(?:next|last|this)\s+(?:week|weekend|month|year|{days})|today|tomorrow|yesterday|{days})\b"
            ),
            0,
        ),
        rule("DATE", &format!(r"(?i)\b{n}\s+(?:days?|weeks?|months?|years?)\b"), 0),
        rule(
            "QUANTITY",
            &format!(
                r"(?i)\b{n}\s?(?:miles?|kilometers?|km|meters?|metres?|feet|foot|ft|inches|inch|kilograms?|kg|grams?|lbs?|liters?|litres?|gallons?|cups?|ounces?|oz)\b"
            ),
            0,
        ),
        rule(
            "ORDINAL",
            r"(?i)\b(?:\d+(?:st|nd|rd|th)|first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|eleventh|twelfth)\b",
            0,
        ),
        rule("CARDINAL", &format!(r"(?i)\b{n}\b"), 0),
    ]
});

/// Regex + capitalization English model.
///
/// ```rust
/// use autoanno::backends::{HeuristicNerModel, NerModel};
///
/// let model = HeuristicNerModel::new();
/// let found = model.infer("wake me at 7 am tomorrow").unwrap();
/// let labels: Vec<_> = found.iter().map(|e| e.label.as_str()).collect();
/// assert_eq!(labels, vec!["TIME", "DATE"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeuristicNerModel;

impl HeuristicNerModel {
    /// Create the model.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl NerModel for HeuristicNerModel {
    fn infer(&self, sentence: &str) -> Result<Vec<RawEntity>> {
        if sentence.is_empty() {
            return Ok(vec![]);
        }

        let mut found = Vec::new();
        let converter = SpanConverter::new(sentence);

        for rule in RULES.iter() {
            for caps in rule.regex.captures_iter(sentence) {
                let Some(m) = caps.get(rule.group) else {
                    continue;
                };
                let (start, end) = converter.range(m.start(), m.end());
                push(&mut found, RawEntity::new(m.as_str(), start, end, rule.label));
            }
        }

        find_names(sentence, &mut found);

        found.sort_by_key(|e| (e.start_char, e.end_char));
        Ok(found)
    }

    fn labels(&self) -> Vec<String> {
        LABELS.iter().map(|l| (*l).to_string()).collect()
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Add `entity` unless it overlaps something already found.
fn push(found: &mut Vec<RawEntity>, entity: RawEntity) -> bool {
    let clash = found
        .iter()
        .any(|e| entity.start_char < e.end_char && e.start_char < entity.end_char);
    if clash {
        return false;
    }
    found.push(entity);
    true
}

struct Word<'a> {
    text: &'a str,
    start: usize,
    end: usize,
}

impl Word<'_> {
    fn clean_lower(&self) -> String {
        self.text
            .trim_matches(|c: char| !c.is_alphanumeric())
            .trim_end_matches("'s")
            .to_lowercase()
    }

    fn starts_upper(&self) -> bool {
        self.text
            .trim_start_matches(|c: char| !c.is_alphanumeric())
            .chars()
            .next()
            .is_some_and(char::is_uppercase)
    }

    /// Punctuation or a possessive after this word ends a name.
    fn ends_run(&self) -> bool {
        self.text.ends_with(['.', ',', '!', '?', ';', ':', ')', ']', '}', '"']) || self.text.ends_with("'s")
    }
}

/// Whitespace-delimited words with character offsets, in one linear pass.
fn split_words(text: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut in_word = false;
    let mut word_start_byte = 0;
    let mut word_start_char = 0;
    let mut char_pos = 0;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if in_word {
                words.push(Word {
                    text: &text[word_start_byte..i],
                    start: word_start_char,
                    end: char_pos,
                });
                in_word = false;
            }
        } else if !in_word {
            in_word = true;
            word_start_byte = i;
            word_start_char = char_pos;
        }
        char_pos += 1;
    }
    if in_word {
        words.push(Word {
            text: &text[word_start_byte..],
            start: word_start_char,
            end: char_pos,
        });
    }
    words
}

/// Runs of capitalized words, joined by "of"/"the".
fn find_names(text: &str, found: &mut Vec<RawEntity>) {
    let words = split_words(text);
    let mut i = 0;

    while i < words.len() {
        if !words[i].starts_upper() {
            i += 1;
            continue;
        }

        let lower = words[i].clean_lower();
        let mut after_title = false;
        if PERSON_PREFIX.contains(&lower.as_str()) {
            if words.get(i + 1).is_some_and(Word::starts_upper) {
                after_title = true;
                i += 1;
            } else {
                i += 1;
                continue;
            }
        } else if COMMON_SENTENCE_STARTERS.contains(&lower.as_str()) {
            i += 1;
            continue;
        }

        let run_start = i;
        let mut run_end = i;
        while !words[run_end].ends_run() {
            match (words.get(run_end + 1), words.get(run_end + 2)) {
                (Some(next), _) if next.starts_upper() => run_end += 1,
                (Some(next), Some(after))
                    if matches!(next.text, "of" | "the") && after.starts_upper() =>
                {
                    run_end += 2
                }
                _ => break,
            }
        }
        i = run_end + 1;

        let run = &words[run_start..=run_end];
        let prev = run_start.checked_sub(1).map(|p| words[p].clean_lower());
        let (label, confident) = classify(run, prev.as_deref(), after_title);
        if !confident && run_start == 0 && run.len() == 1 {
            continue;
        }

        let first = &run[0];
        let last = &run[run.len() - 1];
        let lead = first.text.chars().take_while(|c| !c.is_alphanumeric()).count();
        let start = first.start + lead;
        let end = last.end - trailing_punct(last);
        if start >= end {
            continue;
        }
        push(found, RawEntity::new(char_slice(text, start, end), start, end, label));
    }
}

/// Trailing characters that are not part of the name. Keeps a possessive
/// and abbreviation dots ("Inc.").
fn trailing_punct(word: &Word<'_>) -> usize {
    let abbreviation = format!("{}.", word.clean_lower());
    if ORG_SUFFIX.contains(&abbreviation.as_str()) && word.text.ends_with('.') {
        return 0;
    }
    word.text
        .chars()
        .rev()
        .take_while(|c| matches!(c, '.' | ',' | '!' | '?' | ';' | ':' | ')' | ']' | '}' | '"'))
        .count()
}

/// Label a run of capitalized words. The flag is false for the fallback
/// guess.
fn classify(run: &[Word<'_>], prev: Option<&str>, after_title: bool) -> (&'static str, bool) {
    if after_title {
        return ("PERSON", true);
    }
    let words: Vec<String> = run.iter().map(Word::clean_lower).collect();
    let joined = words.join(" ");

    if words.iter().any(|w| ORG_SUFFIX.contains(&w.as_str())) || KNOWN_ORGS.contains(&joined.as_str()) {
        ("ORG", true)
    } else if KNOWN_LOCS.contains(&joined.as_str()) {
        ("GPE", true)
    } else if KNOWN_PERSONS.contains(&words[0].as_str()) {
        ("PERSON", true)
    } else if prev.is_some_and(|p| LOC_PREPOSITION.contains(&p)) {
        ("GPE", true)
    } else {
        ("PERSON", false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(text: &str) -> Vec<(String, String)> {
        HeuristicNerModel::new()
            .infer(text)
            .unwrap()
            .into_iter()
            .map(|e| (e.text, e.label))
            .collect()
    }

    fn pair(text: &str, label: &str) -> (String, String) {
        (text.to_string(), label.to_string())
    }

    #[test]
    fn test_alarm_sentence() {
        assert_eq!(
            labels("Set an alarm for 7 am tomorrow"),
            vec![pair("7 am", "TIME"), pair("tomorrow", "DATE")]
        );
    }

    #[test]
    fn test_hedged_duration_is_time() {
        assert_eq!(labels("ready in nearly 15 minutes"), vec![pair("nearly 15 minutes", "TIME")]);
    }

    #[test]
    fn test_money_excludes_symbol() {
        let found = HeuristicNerModel::new().infer("send $20 to Bob").unwrap();
        assert_eq!(found[0].text, "20");
        assert_eq!((found[0].start_char, found[0].end_char), (6, 8));
        assert_eq!(found[0].label, "MONEY");
        assert_eq!(found[1].label, "PERSON");
    }

    #[test]
    fn test_percent_quantity_ordinal() {
        assert_eq!(labels("up 50% today"), vec![pair("50%", "PERCENT"), pair("today", "DATE")]);
        assert_eq!(labels("walk 5 miles"), vec![pair("5 miles", "QUANTITY")]);
        assert_eq!(labels("the 3rd row"), vec![pair("3rd", "ORDINAL")]);
        assert_eq!(labels("buy twenty-five eggs"), vec![pair("twenty-five", "CARDINAL")]);
    }

    #[test]
    fn test_possessive_kept() {
        let found = HeuristicNerModel::new().infer("call Alice's office").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Alice's");
        assert_eq!((found[0].start_char, found[0].end_char), (5, 12));
    }

    #[test]
    fn test_org_and_location() {
        assert_eq!(
            labels("meeting with Acme Corp in Boston."),
            vec![pair("Acme Corp", "ORG"), pair("Boston", "GPE")]
        );
        assert_eq!(labels("Bank of America"), vec![pair("Bank of America", "ORG")]);
    }

    #[test]
    fn test_title_marks_person() {
        let found = HeuristicNerModel::new().infer("Dr. Smith called").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Smith");
        assert_eq!(found[0].start_char, 4);
        assert_eq!(found[0].label, "PERSON");
    }

    #[test]
    fn test_unicode_offsets_are_chars() {
        let found = HeuristicNerModel::new().infer("café at 7 pm").unwrap();
        assert_eq!(found[0].text, "7 pm");
        assert_eq!((found[0].start_char, found[0].end_char), (8, 12));
    }

    #[test]
    fn test_no_overlaps() {
        let found = HeuristicNerModel::new()
            .infer("Meet Mary on Monday at 10:30 for 2 hours near Paris")
            .unwrap();
        for (i, a) in found.iter().enumerate() {
            for b in &found[i + 1..] {
                assert!(a.end_char <= b.start_char, "{a:?} overlaps {b:?}");
            }
        }
        assert!(found.iter().any(|e| e.text == "Monday" && e.label == "DATE"));
        assert!(found.iter().any(|e| e.text == "Mary" && e.label == "PERSON"));
    }

    #[test]
    fn test_empty() {
        assert!(HeuristicNerModel::new().infer("").unwrap().is_empty());
        assert_eq!(HeuristicNerModel::new().labels().len(), 10);
    }
}
