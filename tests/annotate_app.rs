//! Annotating and unannotating an application directory end to end.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use autoanno::backends::{build_recognizer, BuiltinModelLoader, NluProcessor, ScoredEntity};
use autoanno::resolver::PatternResolver;
use autoanno::{
    AnnotatorConfig, Annotator, BraceMarkup, EntityRecord, FsExampleStore, Result, Span,
    UnannotateOptions,
};
use serde_json::json;

const ALARM: &str = "domains/times/set_alarm/train.txt";
const WEATHER: &str = "domains/weather/check/train.txt";

const CONFIG: &str = r#"
annotator_class = "MultiLingualAnnotator"
language = "en"

[[annotate]]
domains = "times"
intents = ".*"
files = "train\\.txt"
entities = "(sys_time)"

[[unannotate]]
domains = "weather"
intents = ".*"
files = ".*"
entities = "*"
"#;

fn write(app: &Path, rel: &str, contents: &str) {
    let path = app.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn read(app: &Path, rel: &str) -> String {
    fs::read_to_string(app.join(rel)).unwrap()
}

fn app() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "annotator.toml", CONFIG);
    write(
        dir.path(),
        ALARM,
        "set an alarm for 7 am\nwake me at {6 am|sys_time}\n{unbalanced\n",
    );
    write(dir.path(), WEATHER, "weather at {noon|sys_time} in {Boston|city}\n");
    dir
}

fn annotator(app: &Path, config: &AnnotatorConfig) -> Annotator {
    let recognizer = build_recognizer(
        config,
        &BuiltinModelLoader,
        Arc::new(PatternResolver::new()),
        None,
    )
    .unwrap();
    Annotator::new(recognizer, Box::new(FsExampleStore::new(app)), Box::new(BraceMarkup))
}

#[test]
fn annotate_follows_rules() {
    let dir = app();
    let config = AnnotatorConfig::load_for_app(dir.path()).unwrap();
    let report = annotator(dir.path(), &config)
        .annotate(&config.annotate_options())
        .unwrap();

    assert_eq!(report.files_processed, 1);
    assert_eq!(report.examples_written, 2);
    assert_eq!(report.examples_skipped, 1);
    assert_eq!(
        read(dir.path(), ALARM),
        "set an alarm for {7 am|sys_time}\nwake me at {6 am|sys_time}\n"
    );
    // not selected by any annotate rule
    assert_eq!(read(dir.path(), WEATHER), "weather at {noon|sys_time} in {Boston|city}\n");
}

#[test]
fn unannotate_wildcard_keeps_custom_types() {
    let dir = app();
    let config = AnnotatorConfig::load_for_app(dir.path()).unwrap();
    let report = annotator(dir.path(), &config)
        .unannotate(&config.unannotate_options())
        .unwrap();

    assert_eq!(report.files_processed, 1);
    assert_eq!(read(dir.path(), WEATHER), "weather at noon in {Boston|city}\n");
}

#[test]
fn unannotate_all_strips_everything() {
    let dir = app();
    let config = AnnotatorConfig::load_for_app(dir.path()).unwrap();
    annotator(dir.path(), &config)
        .unannotate(&UnannotateOptions::all())
        .unwrap();

    assert_eq!(read(dir.path(), WEATHER), "weather at noon in Boston\n");
    assert_eq!(read(dir.path(), ALARM), "set an alarm for 7 am\nwake me at 6 am\n");
}

#[test]
fn bad_rule_pattern_is_reported() {
    let dir = app();
    let config = AnnotatorConfig::from_toml_str(
        r#"
[[annotate]]
domains = "(times"
intents = ".*"
files = ".*"
entities = "*"
"#,
    )
    .unwrap();
    let err = annotator(dir.path(), &config).annotate(&config.annotate_options());
    assert!(matches!(err, Err(autoanno::Error::Config(_))));
}

/// NLU pipeline that tags "Boston" as a city, recording where it was asked.
#[derive(Default)]
struct CityNlu {
    seen: Mutex<Vec<(String, String)>>,
}

impl NluProcessor for CityNlu {
    fn process(&self, sentence: &str, domain: &str, intent: &str) -> Result<Vec<ScoredEntity>> {
        self.seen
            .lock()
            .unwrap()
            .push((domain.to_string(), intent.to_string()));
        let Some(byte) = sentence.find("Boston") else {
            return Ok(Vec::new());
        };
        let start = sentence[..byte].chars().count();
        let city = EntityRecord::new("Boston", Span::new(start, start + 5), "city", json!(null));
        let unsure = EntityRecord::new("weather", Span::new(0, 6), "topic", json!(null));
        Ok(vec![ScoredEntity::new(city, 0.9), ScoredEntity::new(unsure, 0.2)])
    }

    fn entity_types(&self) -> BTreeSet<String> {
        ["city", "topic"].iter().map(|s| (*s).to_string()).collect()
    }
}

#[test]
fn bootstrap_annotates_from_nlu_predictions() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), WEATHER, "weather in Boston\n");

    let config = AnnotatorConfig {
        annotator_class: "BootstrapAnnotator".to_string(),
        confidence_threshold: 0.5,
        ..AnnotatorConfig::default()
    };
    let nlu = Arc::new(CityNlu::default());
    let recognizer = build_recognizer(
        &config,
        &BuiltinModelLoader,
        Arc::new(PatternResolver::new()),
        Some(nlu.clone() as Arc<dyn NluProcessor>),
    )
    .unwrap();
    let annotator = Annotator::new(
        recognizer,
        Box::new(FsExampleStore::new(dir.path())),
        Box::new(BraceMarkup),
    );
    annotator.annotate(&config.annotate_options()).unwrap();

    assert_eq!(read(dir.path(), WEATHER), "weather in {Boston|city}\n");
    assert_eq!(
        *nlu.seen.lock().unwrap(),
        vec![("weather".to_string(), "check".to_string())]
    );
}
