use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ══════════════════════════════════════════════════════════════
// Program / declarations
// ══════════════════════════════════════════════════════════════

/// A parsed Expert Advisor script, as handed over by the front-end parser.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(alias = "body")]
    pub declarations: Vec<Declaration>,
}

/// Top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Variable(VariableDeclaration),
    Function(FunctionDeclaration),
    /// Any declaration kind the translator does not handle (structs, #property, ...).
    Unsupported { kind: String },
}

/// `input double lotSize = 0.1;` or a plain global / local variable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclaration {
    pub name: String,
    pub var_type: String,
    #[serde(default)]
    pub default_value: Option<Expression>,
    #[serde(default)]
    pub is_input: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDeclaration {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub body: Statement,
    #[serde(default)]
    pub return_type: Option<String>,
}

/// Function parameter. Accepts either a bare name or `{ name, paramType }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ParameterNode")]
pub struct Parameter {
    pub name: String,
    pub param_type: Option<String>,
}

// ══════════════════════════════════════════════════════════════
// Statements / expressions
// ══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Vec<Statement>),
    If(IfStatement),
    For(ForStatement),
    While(WhileStatement),
    Return(Option<Expression>),
    Break,
    Continue,
    Expression(Expression),
    /// Local variable declared inside a function body.
    Local(VariableDeclaration),
    Unsupported { kind: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub init: Option<Expression>,
    pub condition: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    String(String),
    Boolean(bool),
    Identifier(String),
    Binary {
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        operator: String,
        operand: Box<Expression>,
        prefix: bool,
    },
    Assignment {
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Conditional {
        condition: Box<Expression>,
        then_value: Box<Expression>,
        else_value: Box<Expression>,
    },
    Call {
        callee: String,
        arguments: Vec<Expression>,
    },
    ArrayAccess {
        array: Box<Expression>,
        index: Box<Expression>,
    },
    Unsupported { kind: String },
}

// ── Builders (used by hand-assembled trees) ──

impl Expression {
    pub fn ident(name: &str) -> Self {
        Expression::Identifier(name.to_string())
    }

    pub fn string(value: &str) -> Self {
        Expression::String(value.to_string())
    }

    pub fn binary(operator: &str, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn assign(left: Expression, right: Expression) -> Self {
        Expression::Assignment {
            operator: "=".to_string(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(callee: &str, arguments: Vec<Expression>) -> Self {
        Expression::Call {
            callee: callee.to_string(),
            arguments,
        }
    }
}

impl Statement {
    pub fn expr(expression: Expression) -> Self {
        Statement::Expression(expression)
    }

    pub fn if_else(condition: Expression, then_branch: Statement, else_branch: Option<Statement>) -> Self {
        Statement::If(IfStatement {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        })
    }
}

// ══════════════════════════════════════════════════════════════
// Wire format
// ══════════════════════════════════════════════════════════════
//
// Every node carries a string "type" tag, read before anything else. Known
// tags decode strictly into the typed tree; an unknown tag is kept as
// `Unsupported { kind }` so the emitter can leave a marker in its place. A
// missing tag, or a known tag whose fields don't fit, is a decode error, so a
// broken child never downgrades a supported ancestor.

/// Decoded node: either the typed form or the unknown tag.
enum Tagged<T> {
    Known(T),
    Other(String),
}

fn decode_tagged<'de, D, T>(deserializer: D, known_tags: &[&str]) -> Result<Tagged<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let kind = match value.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(_) => return Err(D::Error::custom("node \"type\" must be a string")),
        None => return Err(D::Error::custom("node without a \"type\" tag")),
    };
    if !known_tags.contains(&kind.as_str()) {
        return Ok(Tagged::Other(kind));
    }
    serde_json::from_value(value)
        .map(Tagged::Known)
        .map_err(|e| D::Error::custom(format!("{}: {}", kind, e)))
}

const DECLARATION_TAGS: &[&str] = &["VariableDeclaration", "FunctionDeclaration"];

#[derive(Deserialize)]
#[serde(tag = "type")]
enum KnownDeclaration {
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(FunctionDeclaration),
}

impl<'de> Deserialize<'de> for Declaration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match decode_tagged(deserializer, DECLARATION_TAGS)? {
            Tagged::Known(KnownDeclaration::VariableDeclaration(v)) => Declaration::Variable(v),
            Tagged::Known(KnownDeclaration::FunctionDeclaration(f)) => Declaration::Function(f),
            Tagged::Other(kind) => Declaration::Unsupported { kind },
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParameterNode {
    Name(String),
    Typed {
        name: String,
        #[serde(default, rename = "paramType")]
        param_type: Option<String>,
    },
}

impl From<ParameterNode> for Parameter {
    fn from(node: ParameterNode) -> Self {
        match node {
            ParameterNode::Name(name) => Parameter { name, param_type: None },
            ParameterNode::Typed { name, param_type } => Parameter { name, param_type },
        }
    }
}

const STATEMENT_TAGS: &[&str] = &[
    "BlockStatement",
    "IfStatement",
    "ForStatement",
    "WhileStatement",
    "ReturnStatement",
    "BreakStatement",
    "ContinueStatement",
    "ExpressionStatement",
    "VariableDeclaration",
];

#[derive(Deserialize)]
#[serde(tag = "type")]
enum KnownStatement {
    BlockStatement {
        body: Vec<Statement>,
    },
    IfStatement {
        condition: Expression,
        #[serde(alias = "thenBranch")]
        consequent: Box<Statement>,
        #[serde(default, alias = "elseBranch")]
        alternate: Option<Box<Statement>>,
    },
    ForStatement {
        #[serde(default)]
        init: Option<Expression>,
        #[serde(default)]
        condition: Option<Expression>,
        #[serde(default, alias = "increment")]
        update: Option<Expression>,
        body: Box<Statement>,
    },
    WhileStatement {
        condition: Expression,
        body: Box<Statement>,
    },
    ReturnStatement {
        #[serde(default, alias = "argument")]
        value: Option<Expression>,
    },
    BreakStatement {},
    ContinueStatement {},
    ExpressionStatement {
        expression: Expression,
    },
    VariableDeclaration(VariableDeclaration),
}

impl<'de> Deserialize<'de> for Statement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match decode_tagged::<D, KnownStatement>(deserializer, STATEMENT_TAGS)? {
            Tagged::Known(known) => known.into(),
            Tagged::Other(kind) => Statement::Unsupported { kind },
        })
    }
}

impl From<KnownStatement> for Statement {
    fn from(known: KnownStatement) -> Self {
        match known {
            KnownStatement::BlockStatement { body } => Statement::Block(body),
            KnownStatement::IfStatement { condition, consequent, alternate } => Statement::If(IfStatement {
                condition,
                then_branch: consequent,
                else_branch: alternate,
            }),
            KnownStatement::ForStatement { init, condition, update, body } => Statement::For(ForStatement {
                init,
                condition,
                update,
                body,
            }),
            KnownStatement::WhileStatement { condition, body } => {
                Statement::While(WhileStatement { condition, body })
            }
            KnownStatement::ReturnStatement { value } => Statement::Return(value),
            KnownStatement::BreakStatement {} => Statement::Break,
            KnownStatement::ContinueStatement {} => Statement::Continue,
            KnownStatement::ExpressionStatement { expression } => Statement::Expression(expression),
            KnownStatement::VariableDeclaration(decl) => Statement::Local(decl),
        }
    }
}

const EXPRESSION_TAGS: &[&str] = &[
    "NumberLiteral",
    "StringLiteral",
    "BooleanLiteral",
    "Identifier",
    "BinaryExpression",
    "UnaryExpression",
    "AssignmentExpression",
    "ConditionalExpression",
    "CallExpression",
    "ArrayAccess",
];

fn default_prefix() -> bool {
    true
}

fn default_assign_operator() -> String {
    "=".to_string()
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum KnownExpression {
    NumberLiteral {
        value: f64,
    },
    StringLiteral {
        value: String,
    },
    BooleanLiteral {
        value: bool,
    },
    Identifier {
        name: String,
    },
    BinaryExpression {
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    UnaryExpression {
        operator: String,
        #[serde(alias = "argument")]
        operand: Box<Expression>,
        #[serde(default = "default_prefix")]
        prefix: bool,
    },
    AssignmentExpression {
        #[serde(default = "default_assign_operator")]
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    ConditionalExpression {
        #[serde(alias = "test")]
        condition: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
    },
    CallExpression {
        callee: String,
        #[serde(default)]
        arguments: Vec<Expression>,
    },
    ArrayAccess {
        array: Box<Expression>,
        index: Box<Expression>,
    },
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match decode_tagged::<D, KnownExpression>(deserializer, EXPRESSION_TAGS)? {
            Tagged::Known(known) => known.into(),
            Tagged::Other(kind) => Expression::Unsupported { kind },
        })
    }
}

impl From<KnownExpression> for Expression {
    fn from(known: KnownExpression) -> Self {
        match known {
            KnownExpression::NumberLiteral { value } => Expression::Number(value),
            KnownExpression::StringLiteral { value } => Expression::String(value),
            KnownExpression::BooleanLiteral { value } => Expression::Boolean(value),
            KnownExpression::Identifier { name } => Expression::Identifier(name),
            KnownExpression::BinaryExpression { operator, left, right } => {
                Expression::Binary { operator, left, right }
            }
            KnownExpression::UnaryExpression { operator, operand, prefix } => {
                Expression::Unary { operator, operand, prefix }
            }
            KnownExpression::AssignmentExpression { operator, left, right } => {
                Expression::Assignment { operator, left, right }
            }
            KnownExpression::ConditionalExpression { condition, consequent, alternate } => {
                Expression::Conditional {
                    condition,
                    then_value: consequent,
                    else_value: alternate,
                }
            }
            KnownExpression::CallExpression { callee, arguments } => Expression::Call { callee, arguments },
            KnownExpression::ArrayAccess { array, index } => Expression::ArrayAccess { array, index },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_program() {
        let program: Program = serde_json::from_value(json!({
            "name": "Scalper",
            "declarations": [
                { "type": "VariableDeclaration", "name": "lotSize", "varType": "double", "isInput": true,
                  "defaultValue": { "type": "NumberLiteral", "value": 0.1 } },
                { "type": "FunctionDeclaration", "name": "OnTick", "parameters": ["a", { "name": "b", "paramType": "int" }],
                  "body": { "type": "BlockStatement", "body": [
                      { "type": "ReturnStatement" }
                  ] } }
            ]
        }))
        .unwrap();

        assert_eq!(program.name.as_deref(), Some("Scalper"));
        assert_eq!(program.declarations.len(), 2);
        match &program.declarations[0] {
            Declaration::Variable(v) => {
                assert_eq!(v.name, "lotSize");
                assert!(v.is_input);
                assert_eq!(v.default_value, Some(Expression::Number(0.1)));
            }
            other => panic!("expected variable, got {:?}", other),
        }
        match &program.declarations[1] {
            Declaration::Function(f) => {
                assert_eq!(f.parameters[0].name, "a");
                assert_eq!(f.parameters[1].param_type.as_deref(), Some("int"));
                assert_eq!(f.body, Statement::Block(vec![Statement::Return(None)]));
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kinds_are_kept() {
        let stmt: Statement = serde_json::from_value(json!({
            "type": "BlockStatement",
            "body": [
                { "type": "SwitchStatement", "discriminant": { "type": "Identifier", "name": "x" } },
                { "type": "ExpressionStatement", "expression": { "type": "LambdaExpression" } }
            ]
        }))
        .unwrap();

        assert_eq!(
            stmt,
            Statement::Block(vec![
                Statement::Unsupported { kind: "SwitchStatement".into() },
                Statement::Expression(Expression::Unsupported { kind: "LambdaExpression".into() }),
            ])
        );

        let decl: Declaration = serde_json::from_value(json!({ "type": "StructDeclaration" })).unwrap();
        assert_eq!(decl, Declaration::Unsupported { kind: "StructDeclaration".into() });
    }

    #[test]
    fn test_else_if_and_postfix() {
        let stmt: Statement = serde_json::from_value(json!({
            "type": "IfStatement",
            "condition": { "type": "BooleanLiteral", "value": true },
            "consequent": { "type": "BreakStatement" },
            "alternate": {
                "type": "IfStatement",
                "condition": { "type": "Identifier", "name": "x" },
                "consequent": { "type": "ContinueStatement" }
            }
        }))
        .unwrap();
        match stmt {
            Statement::If(s) => {
                assert_eq!(*s.then_branch, Statement::Break);
                assert!(matches!(s.else_branch.as_deref(), Some(Statement::If(_))));
            }
            other => panic!("expected if, got {:?}", other),
        }

        let expr: Expression = serde_json::from_value(json!({
            "type": "UnaryExpression", "operator": "++", "prefix": false,
            "operand": { "type": "Identifier", "name": "i" }
        }))
        .unwrap();
        assert_eq!(
            expr,
            Expression::Unary { operator: "++".into(), operand: Box::new(Expression::ident("i")), prefix: false }
        );
    }

    #[test]
    fn test_integer_number_literal() {
        let expr: Expression = serde_json::from_value(json!({ "type": "NumberLiteral", "value": 3 })).unwrap();
        assert_eq!(expr, Expression::Number(3.0));
    }

    #[test]
    fn test_untyped_node_is_rejected() {
        let result: Result<Expression, _> = serde_json::from_value(json!({ "name": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_untyped_child_fails_whole_node() {
        let result: Result<Statement, _> = serde_json::from_value(json!({
            "type": "ExpressionStatement",
            "expression": {
                "type": "CallExpression", "callee": "Print",
                "arguments": [ { "name": "x" } ]
            }
        }));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("type"), "unexpected error: {}", err);

        let result: Result<Expression, _> = serde_json::from_value(json!({
            "type": "CallExpression", "callee": "Print", "arguments": [ { "type": 7 } ]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_known_tag_with_wrong_shape_is_rejected() {
        let result: Result<Declaration, _> = serde_json::from_value(json!({
            "type": "FunctionDeclaration", "name": "OnTick"
        }));
        assert!(result.is_err());

        let result: Result<Expression, _> = serde_json::from_value(json!({
            "type": "BinaryExpression", "operator": "+",
            "left": { "type": "NumberLiteral", "value": 1 }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_alternate_field_names() {
        let x = || json!({ "type": "Identifier", "name": "x" });

        let program: Program = serde_json::from_value(json!({
            "body": [ { "type": "VariableDeclaration", "name": "a", "varType": "int" } ]
        }))
        .unwrap();
        assert_eq!(program.declarations.len(), 1);
        assert!(matches!(&program.declarations[0], Declaration::Variable(v) if v.name == "a" && !v.is_input));

        let stmt: Statement = serde_json::from_value(json!({
            "type": "IfStatement",
            "condition": x(),
            "thenBranch": { "type": "BreakStatement" },
            "elseBranch": { "type": "ContinueStatement" }
        }))
        .unwrap();
        assert_eq!(
            stmt,
            Statement::if_else(Expression::ident("x"), Statement::Break, Some(Statement::Continue))
        );

        let stmt: Statement = serde_json::from_value(json!({
            "type": "ForStatement",
            "increment": { "type": "UnaryExpression", "operator": "++", "prefix": false, "argument": x() },
            "body": { "type": "BlockStatement", "body": [] }
        }))
        .unwrap();
        assert_eq!(
            stmt,
            Statement::For(ForStatement {
                init: None,
                condition: None,
                update: Some(Expression::Unary {
                    operator: "++".into(),
                    operand: Box::new(Expression::ident("x")),
                    prefix: false,
                }),
                body: Box::new(Statement::Block(vec![])),
            })
        );

        let stmt: Statement = serde_json::from_value(json!({ "type": "ReturnStatement", "argument": x() })).unwrap();
        assert_eq!(stmt, Statement::Return(Some(Expression::ident("x"))));

        let expr: Expression = serde_json::from_value(json!({
            "type": "UnaryExpression", "operator": "!", "argument": x()
        }))
        .unwrap();
        assert_eq!(
            expr,
            Expression::Unary { operator: "!".into(), operand: Box::new(Expression::ident("x")), prefix: true }
        );

        let expr: Expression = serde_json::from_value(json!({
            "type": "ConditionalExpression",
            "test": x(),
            "consequent": { "type": "NumberLiteral", "value": 1 },
            "alternate": { "type": "NumberLiteral", "value": 2 }
        }))
        .unwrap();
        assert_eq!(
            expr,
            Expression::Conditional {
                condition: Box::new(Expression::ident("x")),
                then_value: Box::new(Expression::Number(1.0)),
                else_value: Box::new(Expression::Number(2.0)),
            }
        );
    }
}
