//! Label mapping tables.
//!
//! Raw NER labels (spaCy-style, lowercased) map onto canonical system entity
//! types; the rule-based resolver publishes which system types it can
//! produce per language. Both tables are fixed at compile time.

use std::collections::BTreeSet;

/// English ISO 639-1 code.
pub const ENGLISH: &str = "en";

/// Default English locale.
pub const ENGLISH_US_LOCALE: &str = "en_US";

/// Raw label → canonical system type, for labels with a dedicated heuristic.
const LABEL_TO_SYS: &[(&str, &str)] = &[
    ("money", "sys_amount-of-money"),
    ("cardinal", "sys_number"),
    ("ordinal", "sys_ordinal"),
    ("person", "sys_person"),
    ("percent", "sys_percent"),
    ("distance", "sys_distance"),
    ("quantity", "sys_weight"),
];

/// Raw labels that route through the temporal resolver.
pub const TEMPORAL_LABELS: &[&str] = &["time", "date", "datetime"];

/// Temporal types in resolution priority order.
pub const TEMPORAL_TYPES: &[&str] = &["sys_duration", "sys_interval", "sys_time"];

/// Raw labels normalized to `person` before lookup.
pub const PERSON_ALIASES: &[&str] = &["per", "persname"];

/// Raw label dropped outright.
pub const MISC_LABEL: &str = "misc";

/// System types that cannot be produced without the rule-based resolver.
pub const RESOLVER_DEPENDENT_TYPES: &[&str] = &[
    "sys_time",
    "sys_interval",
    "sys_duration",
    "sys_number",
    "sys_amount-of-money",
    "sys_ordinal",
    "sys_distance",
    "sys_quantity",
];

/// Currency symbols that may precede a money span.
pub const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹', '₩', '₽', '¢'];

/// Entity-field tokens meaning "every type".
pub const WILDCARD_TOKENS: &[&str] = &["*", ".*", ".+"];

/// Languages with a pretrained NER model in the catalog.
pub const MODEL_LANGUAGES: &[&str] = &[
    "zh", "da", "nl", "en", "fr", "de", "el", "it", "ja", "lt", "mk", "nb", "pl", "pt", "ro",
    "ru", "es",
];

/// Languages whose models are trained on web text rather than news.
pub const WEB_MODEL_LANGUAGES: &[&str] = &["en", "zh"];

/// Available model sizes.
pub const MODEL_SIZES: &[&str] = &["sm", "md", "lg"];

const NUMERIC_TEMPORAL: &[&str] = &[
    "sys_time",
    "sys_interval",
    "sys_duration",
    "sys_number",
    "sys_ordinal",
];

/// Types the rule-based resolver produces, per language.
const RESOLVER_TYPES: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "sys_time",
            "sys_interval",
            "sys_duration",
            "sys_number",
            "sys_ordinal",
            "sys_amount-of-money",
            "sys_distance",
            "sys_quantity",
            "sys_temperature",
            "sys_volume",
            "sys_email",
            "sys_phone-number",
            "sys_url",
        ],
    ),
    (
        "de",
        &[
            "sys_time",
            "sys_interval",
            "sys_duration",
            "sys_number",
            "sys_ordinal",
            "sys_amount-of-money",
            "sys_distance",
            "sys_temperature",
            "sys_volume",
            "sys_email",
            "sys_phone-number",
            "sys_url",
        ],
    ),
    (
        "es",
        &[
            "sys_time",
            "sys_interval",
            "sys_duration",
            "sys_number",
            "sys_ordinal",
            "sys_amount-of-money",
            "sys_distance",
            "sys_temperature",
            "sys_volume",
            "sys_email",
            "sys_phone-number",
            "sys_url",
        ],
    ),
    (
        "fr",
        &[
            "sys_time",
            "sys_interval",
            "sys_duration",
            "sys_number",
            "sys_ordinal",
            "sys_amount-of-money",
            "sys_distance",
            "sys_quantity",
            "sys_temperature",
            "sys_volume",
            "sys_email",
            "sys_phone-number",
            "sys_url",
        ],
    ),
    (
        "it",
        &[
            "sys_time",
            "sys_interval",
            "sys_duration",
            "sys_number",
            "sys_ordinal",
            "sys_amount-of-money",
            "sys_temperature",
            "sys_volume",
            "sys_email",
            "sys_phone-number",
            "sys_url",
        ],
    ),
    (
        "pt",
        &[
            "sys_time",
            "sys_interval",
            "sys_duration",
            "sys_number",
            "sys_ordinal",
            "sys_amount-of-money",
            "sys_distance",
            "sys_quantity",
            "sys_temperature",
            "sys_volume",
            "sys_email",
            "sys_phone-number",
            "sys_url",
        ],
    ),
    (
        "nl",
        &[
            "sys_time",
            "sys_interval",
            "sys_duration",
            "sys_number",
            "sys_ordinal",
            "sys_amount-of-money",
            "sys_distance",
            "sys_quantity",
            "sys_volume",
            "sys_email",
            "sys_phone-number",
            "sys_url",
        ],
    ),
    ("da", NUMERIC_TEMPORAL),
    ("nb", NUMERIC_TEMPORAL),
    ("pl", NUMERIC_TEMPORAL),
    ("ro", NUMERIC_TEMPORAL),
    ("sv", NUMERIC_TEMPORAL),
    (
        "ru",
        &[
            "sys_number",
            "sys_ordinal",
            "sys_amount-of-money",
            "sys_distance",
            "sys_quantity",
            "sys_email",
            "sys_phone-number",
            "sys_url",
        ],
    ),
    (
        "zh",
        &[
            "sys_time",
            "sys_interval",
            "sys_duration",
            "sys_number",
            "sys_ordinal",
            "sys_amount-of-money",
            "sys_distance",
            "sys_quantity",
            "sys_temperature",
            "sys_volume",
        ],
    ),
    (
        "ja",
        &[
            "sys_time",
            "sys_interval",
            "sys_duration",
            "sys_number",
            "sys_ordinal",
            "sys_temperature",
        ],
    ),
    (
        "ko",
        &[
            "sys_time",
            "sys_interval",
            "sys_duration",
            "sys_number",
            "sys_ordinal",
            "sys_amount-of-money",
            "sys_quantity",
            "sys_temperature",
        ],
    ),
];

/// Canonical type for a raw label with a dedicated heuristic, if any.
#[must_use]
pub fn label_to_sys(label: &str) -> Option<&'static str> {
    LABEL_TO_SYS
        .iter()
        .find(|(raw, _)| *raw == label)
        .map(|(_, sys)| *sys)
}

/// Canonical `sys_<label>` form for a label without a table entry.
#[must_use]
pub fn default_sys_type(label: &str) -> String {
    format!("sys_{}", label.replace('_', "-"))
}

/// Map a raw (lowercased) label to its canonical type, table first.
#[must_use]
pub fn canonical_type(label: &str) -> String {
    match label_to_sys(label) {
        Some(sys) => sys.to_string(),
        None => default_sys_type(label),
    }
}

/// Lowercase a raw label and fold person aliases.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    let lower = label.to_lowercase();
    if PERSON_ALIASES.contains(&lower.as_str()) {
        "person".to_string()
    } else {
        lower
    }
}

/// True for raw labels handled by the temporal resolver.
#[must_use]
pub fn is_temporal_label(label: &str) -> bool {
    TEMPORAL_LABELS.contains(&label)
}

/// True if producing `entity_type` needs the rule-based resolver.
#[must_use]
pub fn requires_resolver(entity_type: &str) -> bool {
    RESOLVER_DEPENDENT_TYPES.contains(&entity_type)
}

/// System types the rule-based resolver produces for `language`.
///
/// Unknown languages yield an empty set.
#[must_use]
pub fn resolver_types(language: &str) -> BTreeSet<String> {
    RESOLVER_TYPES
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|(_, types)| types.iter().map(|t| (*t).to_string()).collect())
        .unwrap_or_default()
}

/// True if `token` (after trimming) is an entity wildcard.
#[must_use]
pub fn is_wildcard(token: &str) -> bool {
    WILDCARD_TOKENS.contains(&token.trim())
}
