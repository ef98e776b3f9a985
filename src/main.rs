use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use ea_translator_lib::commands;
use ea_translator_lib::utils::export;

#[derive(Parser)]
#[command(name = "ea-translate")]
#[command(about = "Translate MQL5 Expert Advisor ASTs into JavaScript strategy classes")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", env = "EA_TRANSLATE_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate an AST JSON file into a JavaScript module
    Translate {
        /// Path to the AST JSON file
        ast: PathBuf,

        /// Write the generated code here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also write the input descriptors as JSON
        #[arg(short, long)]
        metadata: Option<PathBuf>,

        /// Translator settings (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the input-parameter descriptors of an AST as JSON
    Metadata {
        /// Path to the AST JSON file
        ast: PathBuf,

        /// Translator settings (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the built-in constant and function mappings as JSON
    Builtins,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ea_translator_lib::init_tracing(&cli.log_level);

    match cli.command {
        Commands::Translate { ast, out, metadata, config } => {
            let config = commands::load_config(config.as_deref())?;
            let result = commands::translate_file(&ast, &config)?;

            match out {
                Some(path) => export::write_code(&result.code, &path)?,
                None => print!("{}", result.code),
            }
            if let Some(path) = metadata {
                export::write_metadata_json(&result.metadata, &path)?;
            }
            info!(
                inputs = result.metadata.len(),
                warnings = result.warnings.len(),
                "Translation finished"
            );
        }
        Commands::Metadata { ast, config } => {
            let config = commands::load_config(config.as_deref())?;
            let descriptors = commands::describe_inputs(&ast, &config)?;
            println!("{}", serde_json::to_string_pretty(&descriptors)?);
        }
        Commands::Builtins => {
            println!("{}", serde_json::to_string_pretty(&commands::builtin_catalogue())?);
        }
    }

    Ok(())
}
