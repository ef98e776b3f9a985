use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::engine::classifier::classify;
use crate::engine::metadata::extract_metadata;
use crate::errors::AppError;
use crate::models::ast::Program;
use crate::models::config::TranslatorConfig;
use crate::models::translation::{InputDescriptor, TranslationResult};
use crate::utils::{builtins, codegen};

// ── Loading ──

/// Decode an AST JSON document.
pub fn parse_program(json: &str) -> Result<Program, AppError> {
    serde_json::from_str(json).map_err(|e| AppError::InvalidAst(e.to_string()))
}

/// Read and decode an AST JSON file.
pub fn load_program(path: &Path) -> Result<Program, AppError> {
    let text = read_file(path)?;
    let program = parse_program(&text)?;
    info!(
        "Loaded AST from {} ({} declarations)",
        path.display(),
        program.declarations.len()
    );
    Ok(program)
}

/// Load translator settings; no path means defaults.
pub fn load_config(path: Option<&Path>) -> Result<TranslatorConfig, AppError> {
    let config = match path {
        None => TranslatorConfig::default(),
        Some(path) => {
            let text = read_file(path)?;
            serde_json::from_str(&text)
                .map_err(|e| AppError::InvalidConfig(format!("{}: {}", path.display(), e)))?
        }
    };
    config.validate()?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<String, AppError> {
    if !path.exists() {
        return Err(AppError::FileNotFound(path.display().to_string()));
    }
    std::fs::read_to_string(path).map_err(|e| AppError::FileRead(format!("{}: {}", path.display(), e)))
}

// ── Translation ──

/// Translate an AST file into generated code plus input metadata.
pub fn translate_file(ast_path: &Path, config: &TranslatorConfig) -> Result<TranslationResult, AppError> {
    let program = load_program(ast_path)?;
    let result = codegen::translate(&program, config);
    for warning in &result.warnings {
        tracing::warn!("{}: {}", ast_path.display(), warning);
    }
    Ok(result)
}

/// Input descriptors only, for the UI form generator. Defaults render with
/// the same settings `translate_file` would use.
pub fn describe_inputs(ast_path: &Path, config: &TranslatorConfig) -> Result<Vec<InputDescriptor>, AppError> {
    let program = load_program(ast_path)?;
    let scope = classify(&program, config);
    Ok(extract_metadata(&scope))
}

// ── Catalogue ──

#[derive(Debug, Clone, Serialize)]
pub struct BuiltinEntry {
    pub name: &'static str,
    pub target: &'static str,
}

/// The built-in constant and function tables, sorted by source name.
#[derive(Debug, Clone, Serialize)]
pub struct BuiltinCatalogue {
    pub constants: Vec<BuiltinEntry>,
    pub functions: Vec<BuiltinEntry>,
}

pub fn builtin_catalogue() -> BuiltinCatalogue {
    let entries = |table: Vec<(&'static str, &'static str)>| {
        table
            .into_iter()
            .map(|(name, target)| BuiltinEntry { name, target })
            .collect()
    };
    BuiltinCatalogue {
        constants: entries(builtins::constants()),
        functions: entries(builtins::functions()),
    }
}
