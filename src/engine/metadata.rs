use crate::engine::classifier::Scope;
use crate::models::translation::InputDescriptor;

/// One descriptor per input parameter, in declaration order, for the UI form
/// generator. Defaults are the ones the classifier already rendered, so the
/// form shows exactly what the constructor falls back to.
pub fn extract_metadata(scope: &Scope) -> Vec<InputDescriptor> {
    scope
        .inputs
        .iter()
        .map(|input| InputDescriptor {
            name: input.name.clone(),
            param_type: input.var_type.clone(),
            default_value: input.default_value.clone(),
            description: format!("{} parameter", input.var_type),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classifier::classify;
    use crate::models::ast::{Declaration, Expression, Program, VariableDeclaration};
    use crate::models::config::TranslatorConfig;

    fn input(name: &str, var_type: &str, default_value: Option<Expression>) -> Declaration {
        Declaration::Variable(VariableDeclaration {
            name: name.into(),
            var_type: var_type.into(),
            default_value,
            is_input: true,
        })
    }

    #[test]
    fn test_lot_size_descriptor() {
        let program = Program {
            name: None,
            declarations: vec![input("lotSize", "double", Some(Expression::Number(0.1)))],
        };
        let scope = classify(&program, &TranslatorConfig::default());
        let metadata = extract_metadata(&scope);

        assert_eq!(
            metadata,
            vec![InputDescriptor {
                name: "lotSize".into(),
                param_type: "double".into(),
                default_value: "0.1".into(),
                description: "double parameter".into(),
            }]
        );

        let json = serde_json::to_value(&metadata[0]).unwrap();
        assert_eq!(json["type"], "double");
        assert_eq!(json["defaultValue"], "0.1");
    }

    #[test]
    fn test_descriptors_follow_declaration_order_and_skip_globals() {
        let program = Program {
            name: None,
            declarations: vec![
                input("comment", "string", Some(Expression::string("EA \"alpha\""))),
                Declaration::Variable(VariableDeclaration {
                    name: "state".into(),
                    var_type: "int".into(),
                    default_value: None,
                    is_input: false,
                }),
                input("useTrailing", "bool", None),
                input("period", "ENUM_TIMEFRAMES", Some(Expression::ident("PERIOD_H1"))),
            ],
        };
        let scope = classify(&program, &TranslatorConfig::default());
        let metadata = extract_metadata(&scope);

        let names: Vec<&str> = metadata.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["comment", "useTrailing", "period"]);
        assert_eq!(metadata[0].default_value, r#""EA \"alpha\"""#);
        assert_eq!(metadata[1].default_value, "false");
        assert_eq!(metadata[2].default_value, "16385");
        assert_eq!(metadata[2].description, "ENUM_TIMEFRAMES parameter");
    }
}
