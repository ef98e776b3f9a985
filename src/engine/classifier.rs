use std::collections::HashSet;

use tracing::{debug, warn};

use crate::engine::emitter::{render_expression, EmitContext};
use crate::models::ast::{Declaration, FunctionDeclaration, Program, VariableDeclaration};
use crate::models::config::TranslatorConfig;
use crate::utils::builtins;

/// A script-level variable with its default already rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedVariable {
    pub name: String,
    pub var_type: String,
    pub default_value: String,
}

/// Symbol table for one translation: the three declaration partitions plus
/// the name sets the emitter resolves against. Never outlives the call.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    pub inputs: Vec<ClassifiedVariable>,
    pub globals: Vec<ClassifiedVariable>,
    pub functions: Vec<&'a FunctionDeclaration>,
    pub warnings: Vec<String>,
    input_names: HashSet<String>,
    global_names: HashSet<String>,
    function_names: HashSet<String>,
}

impl<'a> Scope<'a> {
    pub fn is_input(&self, name: &str) -> bool {
        self.input_names.contains(name)
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.global_names.contains(name)
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.function_names.contains(name)
    }
}

/// Partition the program's declarations and resolve every variable default.
///
/// Names are placed first so the global set is complete before any default
/// expression is rendered (defaults may reference other globals).
pub fn classify<'a>(program: &'a Program, config: &TranslatorConfig) -> Scope<'a> {
    let mut partition = Partition::default();
    for decl in &program.declarations {
        match decl {
            Declaration::Variable(var) => partition.place_variable(var),
            Declaration::Function(func) => partition.place_function(func),
            Declaration::Unsupported { kind } => {
                warn!("Skipping unsupported declaration: {}", kind);
                partition.warnings.push(format!("Skipped unsupported declaration '{}'", kind));
            }
        }
    }

    let mut scope = Scope {
        input_names: partition.inputs.iter().map(|v| v.name.clone()).collect(),
        global_names: partition.globals.iter().map(|v| v.name.clone()).collect(),
        function_names: partition.functions.iter().map(|f| f.name.clone()).collect(),
        functions: partition.functions,
        warnings: partition.warnings,
        ..Default::default()
    };

    let inputs = resolve_defaults(&scope, config, &partition.inputs);
    let globals = resolve_defaults(&scope, config, &partition.globals);
    scope.inputs = inputs;
    scope.globals = globals;

    debug!(
        "Classified {} inputs, {} globals, {} functions",
        scope.inputs.len(),
        scope.globals.len(),
        scope.functions.len()
    );
    scope
}

/// Explicit default rendered as an expression, else the type-table default.
pub fn resolve_default(ctx: &EmitContext, var: &VariableDeclaration) -> String {
    match &var.default_value {
        Some(expr) => render_expression(ctx, expr),
        None => builtins::type_default(&var.var_type).to_string(),
    }
}

fn resolve_defaults(
    scope: &Scope,
    config: &TranslatorConfig,
    vars: &[&VariableDeclaration],
) -> Vec<ClassifiedVariable> {
    let ctx = EmitContext::new(scope, config);
    vars.iter()
        .map(|var| ClassifiedVariable {
            name: var.name.clone(),
            var_type: var.var_type.clone(),
            default_value: resolve_default(&ctx, var),
        })
        .collect()
}

// ── Partitioning ──
//
// Redeclared names: the later declaration wins. It keeps the slot of the
// first occurrence within its own partition; crossing partitions moves the
// name over. Each collision is reported.

#[derive(Default)]
struct Partition<'a> {
    inputs: Vec<&'a VariableDeclaration>,
    globals: Vec<&'a VariableDeclaration>,
    functions: Vec<&'a FunctionDeclaration>,
    warnings: Vec<String>,
}

impl<'a> Partition<'a> {
    fn place_variable(&mut self, var: &'a VariableDeclaration) {
        let (own, other) = if var.is_input {
            (&mut self.inputs, &mut self.globals)
        } else {
            (&mut self.globals, &mut self.inputs)
        };

        if let Some(pos) = other.iter().position(|v| v.name == var.name) {
            other.remove(pos);
            own.push(var);
            let msg = format!(
                "Variable '{}' redeclared as {}; later declaration wins",
                var.name,
                if var.is_input { "input" } else { "global" }
            );
            warn!("{}", msg);
            self.warnings.push(msg);
        } else if let Some(slot) = own.iter_mut().find(|v| v.name == var.name) {
            *slot = var;
            let msg = format!("Variable '{}' declared twice; later declaration wins", var.name);
            warn!("{}", msg);
            self.warnings.push(msg);
        } else {
            own.push(var);
        }
    }

    fn place_function(&mut self, func: &'a FunctionDeclaration) {
        if let Some(slot) = self.functions.iter_mut().find(|f| f.name == func.name) {
            *slot = func;
            let msg = format!("Function '{}' declared twice; later declaration wins", func.name);
            warn!("{}", msg);
            self.warnings.push(msg);
        } else {
            self.functions.push(func);
        }
    }
}
