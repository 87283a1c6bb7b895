//! Update statement construction.
//!
//! Pure translation from field assignments to the store's update
//! grammar. The grammar forbids literal values inline, so every value
//! binds through a generated `:vN` placeholder; attribute names go
//! through `#fN` placeholders as well, since plain names can collide
//! with the grammar's reserved words.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

/// A rendered `SET` statement with its placeholder bindings.
#[derive(Debug, Clone)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

/// Renders one assignment clause per entry, joined by `, `.
///
/// Returns `None` for an empty assignment list so callers can skip the
/// write entirely.
pub fn build_update_expression(
    assignments: Vec<(&'static str, AttributeValue)>,
) -> Option<UpdateExpression> {
    if assignments.is_empty() {
        return None;
    }

    let mut clauses = Vec::with_capacity(assignments.len());
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    for (i, (field, value)) in assignments.into_iter().enumerate() {
        let name_placeholder = format!("#f{i}");
        let value_placeholder = format!(":v{i}");
        clauses.push(format!("{name_placeholder} = {value_placeholder}"));
        names.insert(name_placeholder, field.to_string());
        values.insert(value_placeholder, value);
    }

    Some(UpdateExpression {
        expression: format!("SET {}", clauses.join(", ")),
        names,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_assignments_build_nothing() {
        assert!(build_update_expression(Vec::new()).is_none());
    }

    #[test]
    fn single_field_renders_one_clause() {
        let expr = build_update_expression(vec![(
            "price",
            AttributeValue::N("9.99".to_string()),
        )])
        .unwrap();

        assert_eq!(expr.expression, "SET #f0 = :v0");
        assert_eq!(expr.names.get("#f0").unwrap(), "price");
        assert_eq!(
            expr.values.get(":v0").unwrap(),
            &AttributeValue::N("9.99".to_string())
        );
    }

    #[test]
    fn multiple_fields_join_with_comma_separator() {
        let expr = build_update_expression(vec![
            ("title", AttributeValue::S("Dune".to_string())),
            ("pages", AttributeValue::N("412".to_string())),
        ])
        .unwrap();

        assert_eq!(expr.expression, "SET #f0 = :v0, #f1 = :v1");
        assert_eq!(expr.names.len(), 2);
        assert_eq!(expr.values.len(), 2);
    }

    #[test]
    fn every_clause_has_parallel_name_and_value_bindings() {
        let expr = build_update_expression(vec![
            ("email", AttributeValue::S("a@x.com".to_string())),
            ("is_active", AttributeValue::Bool(false)),
            ("full_name", AttributeValue::S("Alice".to_string())),
        ])
        .unwrap();

        for i in 0..3 {
            assert!(expr.names.contains_key(&format!("#f{i}")));
            assert!(expr.values.contains_key(&format!(":v{i}")));
        }
    }

    #[test]
    fn reserved_word_field_names_hide_behind_placeholders() {
        // "year" is reserved in the update grammar; the statement must
        // only ever carry the placeholder.
        let expr = build_update_expression(vec![(
            "published_year",
            AttributeValue::N("1965".to_string()),
        )])
        .unwrap();

        assert!(!expr.expression.contains("published_year"));
        assert_eq!(expr.names.get("#f0").unwrap(), "published_year");
    }

    #[test]
    fn arbitrary_string_values_bind_without_escaping() {
        let tricky = "SET title = :v0, or so it SAYS";
        let expr = build_update_expression(vec![(
            "description",
            AttributeValue::S(tricky.to_string()),
        )])
        .unwrap();

        assert_eq!(expr.expression, "SET #f0 = :v0");
        assert_eq!(
            expr.values.get(":v0").unwrap(),
            &AttributeValue::S(tricky.to_string())
        );
    }
}
