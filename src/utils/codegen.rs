use std::fmt::Write as FmtWrite;

use chrono::{SecondsFormat, Utc};
use tracing::info;

use crate::engine::classifier::{classify, Scope};
use crate::engine::emitter::{render_method, EmitContext};
use crate::engine::metadata::extract_metadata;
use crate::models::ast::Program;
use crate::models::config::TranslatorConfig;
use crate::models::translation::TranslationResult;
use crate::utils::builtins::HOST_API_FIELD;

/// Name of the constructor argument carrying caller-supplied input values.
const PARAMETERS_ARG: &str = "parameters";

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Translate a parsed Expert Advisor into a JavaScript class plus the
/// input-parameter metadata for the UI.
///
/// Never fails: unsupported nodes leave comment markers in the output and
/// unknown type tags default to `0`.
pub fn translate(program: &Program, config: &TranslatorConfig) -> TranslationResult {
    let scope = classify(program, config);
    let mut out = String::with_capacity(4096);

    js_header(&mut out, program, config);
    writeln!(out, "class {} {{", config.class_name).ok();
    js_constructor(&mut out, &scope, config);
    js_methods(&mut out, &scope, config);
    writeln!(out, "}}").ok();
    writeln!(out).ok();
    writeln!(out, "module.exports = {};", config.class_name).ok();

    let metadata = extract_metadata(&scope);
    info!(
        "Translated {}: {} inputs, {} globals, {} methods, {} warnings",
        program_label(program, config),
        scope.inputs.len(),
        scope.globals.len(),
        scope.functions.len(),
        scope.warnings.len()
    );

    TranslationResult {
        code: out,
        metadata,
        warnings: scope.warnings,
    }
}

// ══════════════════════════════════════════════════════════════
// Sections
// ══════════════════════════════════════════════════════════════

fn program_label<'a>(program: &'a Program, config: &'a TranslatorConfig) -> &'a str {
    program.name.as_deref().unwrap_or(&config.class_name)
}

fn js_header(out: &mut String, program: &Program, config: &TranslatorConfig) {
    writeln!(out, "/**").ok();
    writeln!(out, " * Expert Advisor: {}", program_label(program, config)).ok();
    writeln!(out, " * Translated from MQL5 by ea-translator.").ok();
    if config.include_timestamp {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        writeln!(out, " * Generated at {}", now).ok();
    }
    writeln!(out, " */").ok();
    writeln!(out).ok();
}

/// Inputs may be overridden by the caller; globals always start from their
/// compiled default. The adapter is stored first so defaults can call into it.
fn js_constructor(out: &mut String, scope: &Scope, config: &TranslatorConfig) {
    let member = config.indent_for(1);
    let body = config.indent_for(2);

    writeln!(out, "{}constructor({} = {{}}, {}) {{", member, PARAMETERS_ARG, HOST_API_FIELD).ok();
    writeln!(out, "{}this.{} = {};", body, HOST_API_FIELD, HOST_API_FIELD).ok();
    for input in &scope.inputs {
        writeln!(
            out,
            "{}this.{name} = {args}.{name} !== undefined ? {args}.{name} : {default};",
            body,
            name = input.name,
            args = PARAMETERS_ARG,
            default = input.default_value
        )
        .ok();
    }
    for global in &scope.globals {
        writeln!(out, "{}this.{} = {};", body, global.name, global.default_value).ok();
    }
    writeln!(out, "{}}}", member).ok();
}

fn js_methods(out: &mut String, scope: &Scope, config: &TranslatorConfig) {
    for func in &scope.functions {
        let mut ctx = EmitContext::at_depth(scope, config, 1);
        writeln!(out).ok();
        writeln!(out, "{}", render_method(&mut ctx, func)).ok();
    }
}

// ══════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════
