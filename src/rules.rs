//! Path-pattern rules: which files get which entity types.
//!
//! A rule names a domain, an intent and a file (all regular expressions) and
//! an entity selector:
//!
//! ```toml
//! [[annotate]]
//! domains = "times_and_dates"
//! intents = "(set|change)_alarm"
//! files = "train.*\\.txt"
//! entities = "(sys_time|sys_interval)"
//! ```
//!
//! Each rule becomes the path regex `.*/<domains>/<intents>/<files>`, anchored
//! at the start only, so `files = "train"` also selects `train.txt`.
//! Rules apply in order and a later rule replaces, rather than extends, the
//! selection of every path it matches.

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schema;
use crate::store::filter_file_paths;
use crate::{Error, Recognizer, Result};

/// A declarative file and entity selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRule {
    /// Domain directory pattern.
    pub domains: String,
    /// Intent directory pattern.
    pub intents: String,
    /// File name pattern.
    pub files: String,
    /// `|`-separated entity types (parentheses ignored), or a wildcard.
    pub entities: String,
}

impl AnnotationRule {
    /// Create a rule.
    #[must_use]
    pub fn new(
        domains: impl Into<String>,
        intents: impl Into<String>,
        files: impl Into<String>,
        entities: impl Into<String>,
    ) -> Self {
        Self {
            domains: domains.into(),
            intents: intents.into(),
            files: files.into(),
            entities: entities.into(),
        }
    }

    /// Every file, every entity type.
    #[must_use]
    pub fn wildcard() -> Self {
        Self::new(".*", ".*", ".*", ".*")
    }

    /// The path pattern for this rule, before anchoring.
    #[must_use]
    pub fn path_pattern(&self) -> String {
        format!(".*/{}/{}/{}", self.domains, self.intents, self.files)
    }
}

/// Entity types selected for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitySelection {
    /// Every type the recognizer supports.
    All,
    /// Exactly these (validated, lowercased) types. Empty means "leave the
    /// file alone".
    Types(Vec<String>),
}

impl EntitySelection {
    /// True when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, EntitySelection::Types(types) if types.is_empty())
    }

    /// Types to pass to [`Recognizer::parse`]; `None` means unrestricted.
    #[must_use]
    pub fn allowed_types(&self) -> Option<&[String]> {
        match self {
            EntitySelection::All => None,
            EntitySelection::Types(types) => Some(types),
        }
    }

    /// True when `entity_type` is explicitly listed. Case-insensitive.
    #[must_use]
    pub fn lists(&self, entity_type: &str) -> bool {
        match self {
            EntitySelection::All => false,
            EntitySelection::Types(types) => {
                let wanted = entity_type.to_lowercase();
                types.iter().any(|t| *t == wanted)
            }
        }
    }
}

impl Default for EntitySelection {
    fn default() -> Self {
        EntitySelection::Types(Vec::new())
    }
}

/// Selection per known file.
pub type FileEntityMap = BTreeMap<PathBuf, EntitySelection>;

struct CompiledRule {
    pattern: Regex,
    selection: EntitySelection,
}

/// Rules compiled against a recognizer.
pub struct RuleEngine {
    rules: Vec<CompiledRule>,
}

impl RuleEngine {
    /// Compile `rules`, validating entity tokens with `recognizer`.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if any path pattern is not a valid regex. Invalid
    /// entity tokens only log a warning and are skipped.
    pub fn compile(rules: &[AnnotationRule], recognizer: &dyn Recognizer) -> Result<Self> {
        let compiled = rules
            .iter()
            .map(|rule| {
                let source = rule.path_pattern();
                let pattern = Regex::new(&format!("^(?:{source})")).map_err(|e| {
                    Error::config(format!("invalid rule pattern {source:?}: {e}"))
                })?;
                Ok(CompiledRule {
                    pattern,
                    selection: select_entities(&rule.entities, recognizer),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules: compiled })
    }

    /// Number of compiled rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Map every path to its selection. Later rules win.
    #[must_use]
    pub fn build_file_entity_map(&self, paths: &[PathBuf]) -> FileEntityMap {
        let mut map: FileEntityMap = paths
            .iter()
            .map(|p| (p.clone(), EntitySelection::default()))
            .collect();

        for rule in &self.rules {
            let matched = filter_file_paths(&rule.pattern, paths);
            debug!("[rules] {} matched {} files", rule.pattern, matched.len());
            for path in matched {
                map.insert(path, rule.selection.clone());
            }
        }
        map
    }
}

fn select_entities(raw: &str, recognizer: &dyn Recognizer) -> EntitySelection {
    if schema::is_wildcard(raw) {
        return EntitySelection::All;
    }

    let cleaned = raw.replace(['(', ')'], "");
    let mut types = Vec::new();
    for token in cleaned.split('|') {
        let token = token.trim().to_lowercase();
        if recognizer.is_valid_entity(&token) {
            types.push(token);
        } else {
            warn!("[rules] {token:?} is not a valid entity for {}, skipping", recognizer.name());
        }
    }
    EntitySelection::Types(types)
}
