//! Types command

use clap::Parser;

use super::super::output::write_output;
use super::{open_recognizer, AppArgs};

/// List the entity types the configured recognizer supports
#[derive(Parser, Debug)]
pub struct TypesArgs {
    #[command(flatten)]
    pub app: AppArgs,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,
}

/// Run `autoanno types`.
pub fn cmd_types(args: TypesArgs) -> Result<(), String> {
    let config = args.app.load_config()?;
    let recognizer = open_recognizer(&config)?;

    let mut out = String::new();
    for entity_type in recognizer.supported_entity_types() {
        out.push_str(entity_type);
        out.push('\n');
    }
    write_output(&out, args.output.as_deref())
}
