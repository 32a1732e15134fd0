//! Batch annotation over an application's training data.
//!
//! ```text
//!   rules ──▶ RuleEngine ──▶ FileEntityMap
//!                                 │  (files with a non-empty selection)
//!                                 ▼
//!   store.read_lines ──▶ markup.load_query ──▶ transform ──▶ markup.dump_queries ──▶ store.write
//!                         (bad lines dropped)   annotate:   parse + conflict::resolve
//!                                               unannotate: remove selected types
//! ```
//!
//! Each selected file is read once and written once.

use std::path::Path;

use log::{info, warn};

use crate::config::{AnnotateOptions, UnannotateOptions};
use crate::conflict;
use crate::markup::{MarkupCodec, ProcessedExample};
use crate::rules::{AnnotationRule, EntitySelection, FileEntityMap, RuleEngine};
use crate::store::{domain_intent, ExampleStore};
use crate::{ParseContext, Recognizer, Result};

/// Counts from one annotate or unannotate pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationReport {
    /// Files rewritten.
    pub files_processed: usize,
    /// Examples written back.
    pub examples_written: usize,
    /// Lines dropped because their markup could not be parsed.
    pub examples_skipped: usize,
}

/// Drives a recognizer over stored examples.
pub struct Annotator {
    recognizer: Box<dyn Recognizer>,
    store: Box<dyn ExampleStore>,
    markup: Box<dyn MarkupCodec>,
}

impl Annotator {
    /// Create an annotator.
    #[must_use]
    pub fn new(
        recognizer: Box<dyn Recognizer>,
        store: Box<dyn ExampleStore>,
        markup: Box<dyn MarkupCodec>,
    ) -> Self {
        Self {
            recognizer,
            store,
            markup,
        }
    }

    /// The recognizer in use.
    #[must_use]
    pub fn recognizer(&self) -> &dyn Recognizer {
        self.recognizer.as_ref()
    }

    /// Add recognized entities to every example selected by `options.rules`.
    pub fn annotate(&self, options: &AnnotateOptions) -> Result<AnnotationReport> {
        if options.rules.is_empty() {
            warn!("[annotate] no annotate rules configured, nothing to annotate");
            return Ok(AnnotationReport::default());
        }

        let map = self.file_entity_map(&options.rules)?;
        self.modify(&map, |example, selection| {
            let context = ParseContext::new(&example.domain, &example.intent);
            let found = self
                .recognizer
                .parse(&example.text, selection.allowed_types(), Some(&context))?;
            let current = std::mem::take(&mut example.entities);
            example.entities = conflict::resolve(current, found, options.overwrite);
            Ok(())
        })
    }

    /// Remove entities from every example selected by `options.rules`.
    ///
    /// A wildcard selection removes everything, or only supported types when
    /// `unannotate_supported_entities_only` is set. An explicit selection
    /// removes exactly the listed types.
    pub fn unannotate(&self, options: &UnannotateOptions) -> Result<AnnotationReport> {
        let options = options.effective();
        if options.rules.is_empty() {
            warn!("[unannotate] no unannotate rules configured, nothing to unannotate");
            return Ok(AnnotationReport::default());
        }

        let map = self.file_entity_map(&options.rules)?;
        let supported_only = options.unannotate_supported_entities_only;
        self.modify(&map, |example, selection| {
            example.entities.retain(|entity| match selection {
                EntitySelection::All => {
                    supported_only && !self.recognizer.is_valid_entity(&entity.entity_type)
                }
                EntitySelection::Types(_) => !selection.lists(&entity.entity_type),
            });
            Ok(())
        })
    }

    fn file_entity_map(&self, rules: &[AnnotationRule]) -> Result<FileEntityMap> {
        let engine = RuleEngine::compile(rules, self.recognizer.as_ref())?;
        let paths = self.store.all_file_paths()?;
        Ok(engine.build_file_entity_map(&paths))
    }

    fn modify<F>(&self, map: &FileEntityMap, mut transform: F) -> Result<AnnotationReport>
    where
        F: FnMut(&mut ProcessedExample, &EntitySelection) -> Result<()>,
    {
        let mut report = AnnotationReport::default();

        for (path, selection) in map.iter().filter(|(_, s)| !s.is_empty()) {
            let Some((domain, intent)) = domain_intent(path) else {
                warn!("[annotate] cannot tell domain and intent of {}, skipping", path.display());
                continue;
            };

            let (mut examples, skipped) = self.load_examples(path, &domain, &intent)?;
            info!("[annotate] processing {} ({} examples)", path.display(), examples.len());
            for example in &mut examples {
                transform(example, selection)?;
            }

            let mut contents = self.markup.dump_queries(&examples).join("\n");
            if !contents.is_empty() {
                contents.push('\n');
            }
            self.store.write(path, &contents)?;

            report.files_processed += 1;
            report.examples_written += examples.len();
            report.examples_skipped += skipped;
        }

        info!(
            "[annotate] {} files, {} examples written, {} skipped",
            report.files_processed, report.examples_written, report.examples_skipped
        );
        Ok(report)
    }

    fn load_examples(
        &self,
        path: &Path,
        domain: &str,
        intent: &str,
    ) -> Result<(Vec<ProcessedExample>, usize)> {
        let mut examples = Vec::new();
        let mut skipped = 0;
        for line in self.store.read_lines(path)? {
            match self.markup.load_query(&line, domain, intent) {
                Ok(example) => examples.push(example),
                Err(e) => {
                    warn!("[annotate] skipping query {line:?}: {e}");
                    skipped += 1;
                }
            }
        }
        Ok((examples, skipped))
    }
}
