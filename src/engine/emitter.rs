use tracing::{debug, warn};

use crate::engine::classifier::{resolve_default, Scope};
use crate::models::ast::{Expression, ForStatement, FunctionDeclaration, IfStatement, Statement};
use crate::models::config::TranslatorConfig;
use crate::utils::builtins;

/// Per-function emission state. Created fresh for every function (and for
/// default rendering) so nothing leaks between translations.
pub struct EmitContext<'a> {
    scope: &'a Scope<'a>,
    config: &'a TranslatorConfig,
    depth: usize,
}

impl<'a> EmitContext<'a> {
    pub fn new(scope: &'a Scope<'a>, config: &'a TranslatorConfig) -> Self {
        EmitContext { scope, config, depth: 0 }
    }

    pub fn at_depth(scope: &'a Scope<'a>, config: &'a TranslatorConfig, depth: usize) -> Self {
        EmitContext { scope, config, depth }
    }

    fn indent(&self) -> String {
        self.config.indent_for(self.depth)
    }
}

// ══════════════════════════════════════════════════════════════
// Functions
// ══════════════════════════════════════════════════════════════

/// Render a script function as a class method whose header sits at the
/// context's depth.
pub fn render_method(ctx: &mut EmitContext, func: &FunctionDeclaration) -> String {
    debug!("Emitting method {}", func.name);
    let params: Vec<&str> = func.parameters.iter().map(|p| p.name.as_str()).collect();
    let header = format!("{}{}({}) ", ctx.indent(), func.name, params.join(", "));
    header + &render_braced(ctx, &func.body)
}

// ══════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════

/// Render a statement at the context's current depth. Multi-line results are
/// joined with `\n` and carry no trailing newline; an empty block renders as
/// an empty string.
pub fn render_statement(ctx: &mut EmitContext, stmt: &Statement) -> String {
    match stmt {
        Statement::Block(body) => body
            .iter()
            .map(|s| render_statement(ctx, s))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Statement::If(if_stmt) => format!("{}{}", ctx.indent(), render_if(ctx, if_stmt)),
        Statement::For(for_stmt) => format!("{}{}", ctx.indent(), render_for(ctx, for_stmt)),
        Statement::While(while_stmt) => {
            let header = format!("{}while ({}) ", ctx.indent(), render_expression(ctx, &while_stmt.condition));
            header + &render_braced(ctx, &while_stmt.body)
        }
        Statement::Return(Some(value)) => format!("{}return {};", ctx.indent(), render_expression(ctx, value)),
        Statement::Return(None) => format!("{}return;", ctx.indent()),
        Statement::Break => format!("{}break;", ctx.indent()),
        Statement::Continue => format!("{}continue;", ctx.indent()),
        Statement::Expression(expr) => format!("{}{};", ctx.indent(), render_expression(ctx, expr)),
        Statement::Local(var) => format!("{}let {} = {};", ctx.indent(), var.name, resolve_default(ctx, var)),
        Statement::Unsupported { kind } => {
            warn!("Unsupported statement kind: {}", kind);
            format!("{}// Unsupported statement: {}", ctx.indent(), kind)
        }
    }
}

/// `if (...) { ... }` without leading indentation, so an else-if can be
/// appended to the closing brace of the previous branch.
fn render_if(ctx: &mut EmitContext, stmt: &IfStatement) -> String {
    let mut out = format!("if ({}) ", render_expression(ctx, &stmt.condition));
    out.push_str(&render_braced(ctx, &stmt.then_branch));

    match stmt.else_branch.as_deref() {
        None => {}
        Some(Statement::If(next)) => {
            out.push_str(" else ");
            out.push_str(&render_if(ctx, next));
        }
        Some(other) => {
            out.push_str(" else ");
            out.push_str(&render_braced(ctx, other));
        }
    }
    out
}

fn render_for(ctx: &mut EmitContext, stmt: &ForStatement) -> String {
    let init = render_clause(ctx, &stmt.init);
    let condition = render_clause(ctx, &stmt.condition);
    let update = render_clause(ctx, &stmt.update);
    let header = format!("for ({}; {}; {}) ", init, condition, update);
    header + &render_braced(ctx, &stmt.body)
}

fn render_clause(ctx: &EmitContext, expr: &Option<Expression>) -> String {
    expr.as_ref().map(|e| render_expression(ctx, e)).unwrap_or_default()
}

/// `{`, the body one level deeper, then `}` at the current depth. Single
/// statements get the same treatment as blocks.
fn render_braced(ctx: &mut EmitContext, body: &Statement) -> String {
    ctx.depth += 1;
    let inner = render_statement(ctx, body);
    ctx.depth -= 1;

    if inner.is_empty() {
        format!("{{\n{}}}", ctx.indent())
    } else {
        format!("{{\n{}\n{}}}", inner, ctx.indent())
    }
}

// ══════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════

/// Render an expression as a single inline fragment.
pub fn render_expression(ctx: &EmitContext, expr: &Expression) -> String {
    match expr {
        Expression::Number(value) => format_number(*value),
        Expression::String(value) => format!("\"{}\"", escape_string(value)),
        Expression::Boolean(value) => value.to_string(),
        Expression::Identifier(name) => resolve_identifier(ctx, name),
        Expression::Binary { operator, left, right } => format!(
            "({} {} {})",
            render_expression(ctx, left),
            operator,
            render_expression(ctx, right)
        ),
        Expression::Unary { operator, operand, prefix: true } => {
            let operand = render_expression(ctx, operand);
            // `- -x` must not fuse into a decrement.
            let sign_clash = match (operator.chars().last(), operand.chars().next()) {
                (Some(op), Some(first)) => op == first && (op == '-' || op == '+'),
                _ => false,
            };
            if sign_clash {
                format!("{} {}", operator, operand)
            } else {
                format!("{}{}", operator, operand)
            }
        }
        Expression::Unary { operator, operand, prefix: false } => {
            format!("{}{}", render_expression(ctx, operand), operator)
        }
        Expression::Assignment { operator, left, right } => format!(
            "{} {} {}",
            render_expression(ctx, left),
            operator,
            render_expression(ctx, right)
        ),
        Expression::Conditional { condition, then_value, else_value } => format!(
            "({} ? {} : {})",
            render_expression(ctx, condition),
            render_expression(ctx, then_value),
            render_expression(ctx, else_value)
        ),
        Expression::Call { callee, arguments } => {
            let args: Vec<String> = arguments.iter().map(|a| render_expression(ctx, a)).collect();
            format!("{}({})", resolve_callee(ctx, callee), args.join(", "))
        }
        Expression::ArrayAccess { array, index } => {
            format!("{}[{}]", render_expression(ctx, array), render_expression(ctx, index))
        }
        Expression::Unsupported { kind } => {
            warn!("Unsupported expression kind: {}", kind);
            format!("/* Unsupported expression: {} */", kind)
        }
    }
}

/// Globals shadow built-ins; anything else is a local or parameter.
fn resolve_identifier(ctx: &EmitContext, name: &str) -> String {
    if ctx.scope.is_global(name) || (ctx.config.qualify_inputs && ctx.scope.is_input(name)) {
        format!("this.{}", name)
    } else if let Some(mapped) = builtins::constant(name) {
        mapped.to_string()
    } else {
        name.to_string()
    }
}

fn resolve_callee(ctx: &EmitContext, callee: &str) -> String {
    if let Some(mapped) = builtins::function(callee) {
        mapped.to_string()
    } else if ctx.config.qualify_user_functions && ctx.scope.is_function(callee) {
        format!("this.{}", callee)
    } else {
        callee.to_string()
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else {
        value.to_string()
    }
}

fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
