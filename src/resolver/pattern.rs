//! Regex-backed English resolver.
//!
//! Covers the numeric and temporal dimensions a model-backed recognizer needs
//! values for:
//!
//! | dim               | examples                                  |
//! |-------------------|-------------------------------------------|
//! | `number`          | 15, 1,200, 50.5, fifty, one hundred and two |
//! | `ordinal`         | 3rd, third                                |
//! | `amount-of-money` | $20, 20 dollars, 5 bucks, €3.50           |
//! | `duration`        | 15 minutes, an hour, 2 weeks              |
//! | `time`            | 7 am, 19:30, noon, tomorrow, friday at 5pm, 3-5pm |
//! | `distance`        | 5 km, 3 miles                             |
//! | `quantity`        | 2 kg, 8 oz                                |
//! | `temperature`     | 20°C, 70 degrees                          |
//! | `volume`          | 2 liters, 1 gallon                        |
//! | `email`/`url`/`phone-number` | format-based                   |
//!
//! Overlapping candidates are all returned ("15 minutes" yields both a
//! duration and the number 15). Other languages produce no candidates.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{json, Number, Value};

use super::{filter_by_types, Candidate, SystemEntityResolver};
use crate::offset::SpanConverter;
use crate::schema;
use crate::Result;

const DIGITS: &str = r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?";

// Longer words first so alternation prefers "seventeen" over "seven".
const NUMBER_WORDS: &str = "eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|\
twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety|hundred|thousand|million|billion|\
zero|one|two|three|four|five|six|seven|eight|nine|ten";

fn number_pattern() -> String {
    format!(
        r"(?:{digits}|(?:{words})(?:[\s-]+(?:and\s+)?(?:{words}))*)",
        digits = DIGITS,
        words = NUMBER_WORDS
    )
}

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)\b{}\b", number_pattern())).expect("valid regex"));

static ORDINAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?P<n>\d+)(?:st|nd|rd|th)|(?P<w>first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|eleventh|twelfth|thirteenth|fourteenth|fifteenth|sixteenth|seventeenth|eighteenth|nineteenth|twentieth|thirtieth))\b",
    )
    .expect("valid regex")
});

static MONEY_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(?P<sym>[$€£¥₹₩₽])\s?(?P<num>{})\b",
        number_pattern()
    ))
    .expect("valid regex")
});

static MONEY_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?P<num>{})\s*(?P<cur>dollars?|bucks|euros?|cents?|usd|eur|gbp|yen|rupees?)\b",
        number_pattern()
    ))
    .expect("valid regex")
});

static MONEY_CENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b(?P<num>{})\s?¢", DIGITS)).expect("valid regex")
});

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?P<num>{}|an?)\s+(?P<unit>seconds?|secs?|minutes?|mins?|hours?|hrs?|days?|weeks?|months?|years?)\b",
        number_pattern()
    ))
    .expect("valid regex")
});

static CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?P<h>\d{1,2})(?::(?P<m>[0-5]\d))?\s*(?P<ap>[ap])\.?m\b\.?").expect("valid regex")
});

static CLOCK_24_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?P<h>[01]?\d|2[0-3]):(?P<m>[0-5]\d)\b").expect("valid regex"));

static NAMED_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?P<name>noon|midnight)\b").expect("valid regex"));

static DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?P<day>today|tomorrow|yesterday|monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
    )
    .expect("valid regex")
});

static INTERVAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:from\s+|between\s+)?(?P<h1>\d{1,2})(?::(?P<m1>[0-5]\d))?\s*(?:(?P<ap1>[ap])\.?m\.?)?\s*(?:-|to|until|till|and)\s*(?P<h2>\d{1,2})(?::(?P<m2>[0-5]\d))?\s*(?P<ap2>[ap])\.?m\b\.?",
    )
    .expect("valid regex")
});

static DAY_THEN_CLOCK_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s+(?:at\s+)?$").expect("valid regex"));

static CLOCK_THEN_DAY_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+$").expect("valid regex"));

static DISTANCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?P<num>{})\s*(?P<unit>kilometers?|kilometres?|km|miles?|mi|meters?|metres?|m|feet|foot|ft|inches|inch|yards?|yd)\b",
        number_pattern()
    ))
    .expect("valid regex")
});

static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?P<num>{})\s*(?P<unit>kilograms?|kg|grams?|g|pounds?|lbs?|ounces?|oz|tons?|cups?)\b",
        number_pattern()
    ))
    .expect("valid regex")
});

static VOLUME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(?P<num>{})\s*(?P<unit>milliliters?|millilitres?|ml|liters?|litres?|l|gallons?)\b",
        number_pattern()
    ))
    .expect("valid regex")
});

static TEMPERATURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<num>-?\b\d+(?:\.\d+)?)\s*(?P<unit>°\s*[cf]?|degrees?(?:\s+(?:celsius|fahrenheit))?|celsius|fahrenheit)",
    )
    .expect("valid regex")
});

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[\w.+-]+@[\w-]+(?:\.[\w-]+)+\b").expect("valid regex"));

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:https?://|www\.)[^\s]*[^\s.,!?;:]").expect("valid regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s-]?)?\(?\b\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b").expect("valid regex")
});

/// English regex resolver.
///
/// Relative temporal expressions resolve against a reference time: the
/// current local time unless pinned with [`PatternResolver::with_reference`].
#[derive(Debug, Clone, Default)]
pub struct PatternResolver {
    reference: Option<NaiveDateTime>,
}

impl PatternResolver {
    /// Resolver anchored at the current local time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver anchored at a fixed reference time.
    #[must_use]
    pub fn with_reference(reference: NaiveDateTime) -> Self {
        Self {
            reference: Some(reference),
        }
    }

    fn reference(&self) -> NaiveDateTime {
        self.reference.unwrap_or_else(|| Local::now().naive_local())
    }

    fn collect(&self, text: &str) -> Vec<Candidate> {
        let mut out = Collector::new(text);

        for m in NUMBER_RE.find_iter(text) {
            if let Some(value) = parse_number(m.as_str()) {
                out.push("number", m.start(), m.end(), json!({ "value": value }));
            }
        }

        for caps in ORDINAL_RE.captures_iter(text) {
            let n = match (caps.name("n"), caps.name("w")) {
                (Some(n), _) => n.as_str().parse::<i64>().ok(),
                (None, Some(w)) => ordinal_word(w.as_str()),
                _ => None,
            };
            if let (Some(n), Some(m)) = (n, caps.get(0)) {
                out.push("ordinal", m.start(), m.end(), json!({ "value": n }));
            }
        }

        collect_money(&mut out, text);
        collect_measures(&mut out, text);
        self.collect_temporal(&mut out, text);

        for m in EMAIL_RE.find_iter(text) {
            out.push("email", m.start(), m.end(), json!({ "value": m.as_str() }));
        }
        for m in URL_RE.find_iter(text) {
            out.push("url", m.start(), m.end(), json!({ "value": m.as_str() }));
        }
        for m in PHONE_RE.find_iter(text) {
            let digits: String = m.as_str().chars().filter(char::is_ascii_digit).collect();
            out.push("phone-number", m.start(), m.end(), json!({ "value": digits }));
        }

        let mut candidates = out.finish();
        candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        candidates
    }

    fn collect_temporal(&self, out: &mut Collector<'_>, text: &str) {
        let reference = self.reference();

        for caps in DURATION_RE.captures_iter(text) {
            let (Some(m), Some(num), Some(unit)) = (caps.get(0), caps.name("num"), caps.name("unit")) else {
                continue;
            };
            let amount = match num.as_str().to_lowercase().as_str() {
                "a" | "an" => Value::from(1),
                other => match parse_number(other) {
                    Some(v) => v,
                    None => continue,
                },
            };
            let (unit_name, seconds) = duration_unit(unit.as_str());
            let value = json!({
                "value": amount.clone(),
                "unit": unit_name,
                "normalized": { "value": scale(&amount, seconds), "unit": "second" },
            });
            out.push("duration", m.start(), m.end(), value);
        }

        let mut clocks: Vec<(usize, usize, NaiveTime, &'static str)> = Vec::new();
        for caps in CLOCK_RE.captures_iter(text) {
            if let (Some(m), Some((time, grain))) = (caps.get(0), clock_from(&caps, "h", "m", "ap", None)) {
                clocks.push((m.start(), m.end(), time, grain));
            }
        }
        for caps in CLOCK_24_RE.captures_iter(text) {
            if let (Some(m), Some((time, grain))) = (caps.get(0), clock_from(&caps, "h", "m", "", None)) {
                clocks.push((m.start(), m.end(), time, grain));
            }
        }
        for caps in NAMED_TIME_RE.captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            let hour = if m.as_str().eq_ignore_ascii_case("noon") { 12 } else { 0 };
            if let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) {
                clocks.push((m.start(), m.end(), time, "hour"));
            }
        }

        let mut days: Vec<(usize, usize, NaiveDate)> = Vec::new();
        for m in DAY_RE.find_iter(text) {
            if let Some(date) = relative_day(reference.date(), m.as_str()) {
                days.push((m.start(), m.end(), date));
            }
        }

        for &(start, end, time, grain) in &clocks {
            let at = next_occurrence(reference, time);
            out.push("time", start, end, time_value(at, grain));
        }
        for &(start, end, date) in &days {
            out.push("time", start, end, time_value(date.and_time(NaiveTime::MIN), "day"));
        }

        for &(d_start, d_end, date) in &days {
            for &(c_start, c_end, time, grain) in &clocks {
                let combined = if c_start >= d_end && DAY_THEN_CLOCK_GAP.is_match(&text[d_end..c_start]) {
                    Some((d_start, c_end))
                } else if d_start >= c_end && CLOCK_THEN_DAY_GAP.is_match(&text[c_end..d_start]) {
                    Some((c_start, d_end))
                } else {
                    None
                };
                if let Some((start, end)) = combined {
                    out.push("time", start, end, time_value(date.and_time(time), grain));
                }
            }
        }

        for caps in INTERVAL_RE.captures_iter(text) {
            let Some(m) = caps.get(0) else { continue };
            let shared = caps.name("ap2").map(|a| a.as_str());
            let from = clock_from(&caps, "h1", "m1", "ap1", shared);
            let to = clock_from(&caps, "h2", "m2", "ap2", None);
            let (Some((from_time, from_grain)), Some((to_time, to_grain))) = (from, to) else {
                continue;
            };
            let from_at = next_occurrence(reference, from_time);
            let mut to_at = from_at.date().and_time(to_time);
            if to_at < from_at {
                to_at += Duration::days(1);
            }
            let value = json!({
                "type": "interval",
                "from": { "value": iso(from_at), "grain": from_grain },
                "to": { "value": iso(to_at), "grain": to_grain },
            });
            out.push("time", m.start(), m.end(), value);
        }
    }
}

impl SystemEntityResolver for PatternResolver {
    fn get_candidates(
        &self,
        text: &str,
        language: &str,
        _locale: Option<&str>,
        entity_types: Option<&[String]>,
    ) -> Result<Vec<Candidate>> {
        if language != schema::ENGLISH {
            debug!("[resolver] no patterns for language {language}");
            return Ok(Vec::new());
        }
        Ok(filter_by_types(self.collect(text), entity_types))
    }

    fn supported_entity_types(&self, language: &str) -> BTreeSet<String> {
        if language == schema::ENGLISH {
            schema::resolver_types(language)
        } else {
            BTreeSet::new()
        }
    }

    fn name(&self) -> &'static str {
        "pattern"
    }
}

/// Accumulates candidates, converting byte offsets to characters.
struct Collector<'t> {
    text: &'t str,
    conv: SpanConverter,
    out: Vec<Candidate>,
}

impl<'t> Collector<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            text,
            conv: SpanConverter::new(text),
            out: Vec::new(),
        }
    }

    fn push(&mut self, dim: &str, byte_start: usize, byte_end: usize, value: Value) {
        let body = &self.text[byte_start..byte_end];
        let (start, end) = self.conv.range(byte_start, byte_end);
        self.out.push(Candidate::new(dim, body, start, end, value));
    }

    fn finish(self) -> Vec<Candidate> {
        self.out
    }
}

fn collect_money(out: &mut Collector<'_>, text: &str) {
    for caps in MONEY_PREFIX_RE.captures_iter(text) {
        let unit = caps.name("sym").map_or("unknown", |s| currency_unit(s.as_str()));
        push_measure(out, &caps, "amount-of-money", unit);
    }
    for caps in MONEY_SUFFIX_RE.captures_iter(text) {
        let unit = caps.name("cur").map_or("unknown", |s| currency_unit(s.as_str()));
        push_measure(out, &caps, "amount-of-money", unit);
    }
    for caps in MONEY_CENT_RE.captures_iter(text) {
        push_measure(out, &caps, "amount-of-money", "cent");
    }
}

fn collect_measures(out: &mut Collector<'_>, text: &str) {
    for caps in DISTANCE_RE.captures_iter(text) {
        let unit = caps.name("unit").map_or("metre", |u| distance_unit(u.as_str()));
        push_measure(out, &caps, "distance", unit);
    }
    for caps in QUANTITY_RE.captures_iter(text) {
        let unit = caps.name("unit").map_or("gram", |u| quantity_unit(u.as_str()));
        push_measure(out, &caps, "quantity", unit);
    }
    for caps in VOLUME_RE.captures_iter(text) {
        let unit = caps.name("unit").map_or("litre", |u| volume_unit(u.as_str()));
        push_measure(out, &caps, "volume", unit);
    }
    for caps in TEMPERATURE_RE.captures_iter(text) {
        let unit = caps.name("unit").map_or("degree", |u| temperature_unit(u.as_str()));
        push_measure(out, &caps, "temperature", unit);
    }
}

fn push_measure(out: &mut Collector<'_>, caps: &Captures<'_>, dim: &str, unit: &str) {
    let (Some(m), Some(num)) = (caps.get(0), caps.name("num")) else {
        return;
    };
    if let Some(value) = parse_number(num.as_str()) {
        out.push(dim, m.start(), m.end(), json!({ "value": value, "unit": unit }));
    }
}

/// Parse a digit or number-word string into a JSON number.
///
/// Digit strings with a decimal point become floats; everything else is an
/// integer.
fn parse_number(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        let cleaned = trimmed.replace(',', "");
        if cleaned.contains('.') {
            cleaned
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
        } else {
            cleaned.parse::<i64>().ok().map(Value::from)
        }
    } else {
        words_to_number(trimmed).map(Value::from)
    }
}

fn words_to_number(text: &str) -> Option<i64> {
    let mut total: i64 = 0;
    let mut current: i64 = 0;
    let mut seen = false;

    for token in text
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|t| !t.is_empty())
    {
        let token = token.to_lowercase();
        let magnitude = match token.as_str() {
            "and" => continue,
            "hundred" => {
                current = current.max(1).checked_mul(100)?;
                seen = true;
                continue;
            }
            "thousand" => 1_000,
            "million" => 1_000_000,
            "billion" => 1_000_000_000,
            other => {
                current = current.checked_add(small_number(other)?)?;
                seen = true;
                continue;
            }
        };
        total = total.checked_add(current.max(1).checked_mul(magnitude)?)?;
        current = 0;
        seen = true;
    }

    if seen {
        total.checked_add(current)
    } else {
        None
    }
}

fn small_number(word: &str) -> Option<i64> {
    let n = match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    };
    Some(n)
}

fn ordinal_word(word: &str) -> Option<i64> {
    const ORDINALS: &[&str] = &[
        "first",
        "second",
        "third",
        "fourth",
        "fifth",
        "sixth",
        "seventh",
        "eighth",
        "ninth",
        "tenth",
        "eleventh",
        "twelfth",
        "thirteenth",
        "fourteenth",
        "fifteenth",
        "sixteenth",
        "seventeenth",
        "eighteenth",
        "nineteenth",
        "twentieth",
    ];
    let lower = word.to_lowercase();
    if lower == "thirtieth" {
        return Some(30);
    }
    ORDINALS
        .iter()
        .position(|w| *w == lower)
        .map(|i| i as i64 + 1)
}

/// Multiply a JSON number by an integer factor, keeping integers integral
/// unless the product no longer fits.
fn scale(value: &Value, factor: i64) -> Value {
    if let Some(product) = value.as_i64().and_then(|i| i.checked_mul(factor)) {
        Value::from(product)
    } else {
        let f = value.as_f64().unwrap_or(0.0) * factor as f64;
        Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}

fn currency_unit(token: &str) -> &'static str {
    let lower = token.to_lowercase();
    match lower.as_str() {
        "$" | "usd" => "$",
        "€" | "eur" => "EUR",
        "£" | "gbp" => "GBP",
        "¥" | "yen" => "JPY",
        "₹" => "INR",
        "₩" => "KRW",
        "₽" => "RUB",
        "bucks" => "unknown",
        s if s.starts_with("dollar") => "$",
        s if s.starts_with("euro") => "EUR",
        s if s.starts_with("cent") => "cent",
        s if s.starts_with("rupee") => "INR",
        _ => "unknown",
    }
}

fn duration_unit(token: &str) -> (&'static str, i64) {
    let lower = token.to_lowercase();
    if lower.starts_with("sec") {
        ("second", 1)
    } else if lower.starts_with("min") {
        ("minute", 60)
    } else if lower.starts_with('h') {
        ("hour", 3_600)
    } else if lower.starts_with('d') {
        ("day", 86_400)
    } else if lower.starts_with('w') {
        ("week", 604_800)
    } else if lower.starts_with("mo") {
        ("month", 2_592_000)
    } else {
        ("year", 31_536_000)
    }
}

fn distance_unit(token: &str) -> &'static str {
    let lower = token.to_lowercase();
    if lower.starts_with('k') {
        "kilometre"
    } else if lower.starts_with("mi") {
        "mile"
    } else if lower.starts_with('m') {
        "metre"
    } else if lower.starts_with('f') {
        "foot"
    } else if lower.starts_with("in") {
        "inch"
    } else {
        "yard"
    }
}

fn quantity_unit(token: &str) -> &'static str {
    let lower = token.to_lowercase();
    if lower.starts_with('k') {
        "kilogram"
    } else if lower.starts_with('g') {
        "gram"
    } else if lower.starts_with('p') || lower.starts_with('l') {
        "pound"
    } else if lower.starts_with('o') {
        "ounce"
    } else if lower.starts_with('t') {
        "ton"
    } else {
        "cup"
    }
}

fn volume_unit(token: &str) -> &'static str {
    let lower = token.to_lowercase();
    if lower.starts_with("mil") || lower == "ml" {
        "millilitre"
    } else if lower.starts_with('g') {
        "gallon"
    } else {
        "litre"
    }
}

fn temperature_unit(token: &str) -> &'static str {
    let lower = token.to_lowercase();
    if lower.ends_with('c') || lower.contains("celsius") {
        "celsius"
    } else if lower.ends_with('f') || lower.contains("fahrenheit") {
        "fahrenheit"
    } else {
        "degree"
    }
}

/// Time of day from hour/minute/meridiem capture groups.
///
/// `fallback_meridiem` applies when the meridiem group is absent ("3 to
/// 5pm" reads the first bound as pm too).
fn clock_from(
    caps: &Captures<'_>,
    hour_group: &str,
    minute_group: &str,
    meridiem_group: &str,
    fallback_meridiem: Option<&str>,
) -> Option<(NaiveTime, &'static str)> {
    let hour: u32 = caps.name(hour_group)?.as_str().parse().ok()?;
    let minute_match = caps.name(minute_group);
    let minute: u32 = match minute_match {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    let meridiem = caps
        .name(meridiem_group)
        .map(|m| m.as_str())
        .or(fallback_meridiem)
        .and_then(|m| m.chars().next())
        .map(|c| c.to_ascii_lowercase());

    let hour = match meridiem {
        Some(m) => {
            if hour == 0 || hour > 12 {
                return None;
            }
            match (m, hour) {
                ('a', 12) => 0,
                ('a', h) => h,
                (_, 12) => 12,
                (_, h) => h + 12,
            }
        }
        None => hour,
    };

    let grain = if minute_match.is_some() { "minute" } else { "hour" };
    NaiveTime::from_hms_opt(hour, minute, 0).map(|t| (t, grain))
}

fn relative_day(today: NaiveDate, word: &str) -> Option<NaiveDate> {
    let lower = word.to_lowercase();
    let offset = match lower.as_str() {
        "today" => 0,
        "tomorrow" => 1,
        "yesterday" => -1,
        name => {
            const WEEKDAYS: &[&str] = &[
                "monday",
                "tuesday",
                "wednesday",
                "thursday",
                "friday",
                "saturday",
                "sunday",
            ];
            let target = WEEKDAYS.iter().position(|d| *d == name)? as i64;
            let current = i64::from(today.weekday().num_days_from_monday());
            match (target - current).rem_euclid(7) {
                0 => 7,
                n => n,
            }
        }
    };
    today.checked_add_signed(Duration::days(offset))
}

/// The first instant at or after `reference` with the given time of day.
fn next_occurrence(reference: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
    let same_day = reference.date().and_time(time);
    if time >= reference.time() {
        same_day
    } else {
        same_day + Duration::days(1)
    }
}

fn iso(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn time_value(at: NaiveDateTime, grain: &str) -> Value {
    json!({ "type": "value", "value": iso(at), "grain": grain })
}
