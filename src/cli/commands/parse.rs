//! Parse command - recognize entities in one sentence

use clap::Parser;

use super::super::output::write_output;
use super::super::parser::OutputFormat;
use super::{open_recognizer, AppArgs};
use crate::{BraceMarkup, MarkupCodec, ParseContext, ProcessedExample};

/// Recognize entities in a single sentence
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Sentence to parse
    pub sentence: String,

    #[command(flatten)]
    pub app: AppArgs,

    /// Restrict to an entity type (repeatable)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub types: Vec<String>,

    /// Domain of the sentence (needed by BootstrapAnnotator)
    #[arg(long, requires = "intent")]
    pub domain: Option<String>,

    /// Intent of the sentence (needed by BootstrapAnnotator)
    #[arg(long, requires = "domain")]
    pub intent: Option<String>,

    /// Output format
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,
}

/// Run `autoanno parse`.
pub fn cmd_parse(args: ParseArgs) -> Result<(), String> {
    let config = args.app.load_config()?;
    let recognizer = open_recognizer(&config)?;

    let context = match (&args.domain, &args.intent) {
        (Some(domain), Some(intent)) => Some(ParseContext::new(domain, intent)),
        _ => None,
    };
    let types: Vec<String> = args.types.iter().map(|t| t.trim().to_lowercase()).collect();
    let filter = (!types.is_empty()).then_some(types.as_slice());

    let entities = recognizer
        .parse(&args.sentence, filter, context.as_ref())
        .map_err(|e| format!("Parse failed: {}", e))?;

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&entities)
            .map_err(|e| format!("Failed to serialize entities: {}", e))?,
        OutputFormat::Markup => {
            let example = ProcessedExample {
                text: args.sentence.clone(),
                domain: args.domain.clone().unwrap_or_default(),
                intent: args.intent.clone().unwrap_or_default(),
                entities,
            };
            BraceMarkup.dump_queries(&[example]).concat()
        }
    };
    write_output(&format!("{}\n", rendered), args.output.as_deref())
}
