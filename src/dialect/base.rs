use super::{Dialect, OffsetStyle, OperationGenerator, TruncateStyle};
use crate::fragment::SqlFragment;
use crate::statement::PlaceholderFormat;
use std::borrow::Cow;
use std::collections::HashMap;

/// The ANSI base dialect: double-quote identifier quoting, unnumbered `?`
/// placeholders and the operation set shared by every supported database.
/// Concrete dialects derive from it with [`Dialect::extend_with`].
pub fn ansi() -> Dialect {
    Dialect {
        name: "ansi",
        operations: base_operations(),
        quote_char: '"',
        placeholders: PlaceholderFormat::QUESTION,
        offset_style: OffsetStyle::Plain,
        truncate_style: TruncateStyle::Truncate,
    }
}

fn base_operations() -> HashMap<Cow<'static, str>, OperationGenerator> {
    use OperationGenerator::*;

    let operations = [
        ("+", BinaryInfix("+".into())),
        ("-", BinaryInfix("-".into())),
        ("*", BinaryInfix("*".into())),
        ("/", BinaryInfix("/".into())),
        ("%", BinaryInfix("%".into())),
        // Both equality spellings are accepted; ANSI renders `=`.
        ("=", BinaryInfix("=".into())),
        ("==", BinaryInfix("=".into())),
        ("!=", BinaryInfix("!=".into())),
        ("<", BinaryInfix("<".into())),
        (">", BinaryInfix(">".into())),
        ("<=", BinaryInfix("<=".into())),
        (">=", BinaryInfix(">=".into())),
        ("AND", BinaryInfix("AND".into())),
        ("OR", BinaryInfix("OR".into())),
        ("NOT", UnaryPrefix("NOT".into())),
        ("LIKE", BinaryInfix("LIKE".into())),
        ("IS_NULL", UnaryPostfix("IS NULL".into())),
        ("IS_NOT_NULL", UnaryPostfix("IS NOT NULL".into())),
        ("MAX", FunctionCall("MAX".into())),
        ("MIN", FunctionCall("MIN".into())),
        ("AVG", FunctionCall("AVG".into())),
        ("SUM", FunctionCall("SUM".into())),
        ("COUNT", FunctionCall("COUNT".into())),
        ("COUNT_ROWS", Constant("COUNT(*)".into())),
        ("COALESCE", FunctionCall("COALESCE".into())),
        (
            "CONCAT",
            Custom {
                arity: None,
                generate: concat_with_pipes,
            },
        ),
    ];

    operations
        .into_iter()
        .map(|(name, generator)| (Cow::Borrowed(name), generator))
        .collect()
}

/// `CONCAT` renders through the standard `||` operator.
fn concat_with_pipes<'a>(arguments: Vec<SqlFragment<'a>>) -> crate::Result<SqlFragment<'a>> {
    Ok(SqlFragment::join(" || ", arguments).paren())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expression;
    use crate::generator::generate_expression;
    use crate::types::{ids, SqlType};

    fn integer() -> SqlType {
        SqlType::new(ids::INTEGER, "INTEGER")
    }

    #[test]
    fn binary_operations_parenthesize() {
        let expression = Expression::operation(
            "+",
            [Expression::column("a"), Expression::constant(1, integer())],
        );

        let sql = generate_expression(&ansi(), expression)
            .unwrap()
            .build()
            .unsafe_debug_sql();

        assert_eq!("(\"a\" + 1)", sql);
    }

    #[test]
    fn both_equality_spellings_render_ansi_equals() {
        for name in ["=", "=="] {
            let expression = Expression::operation(
                name,
                [Expression::column("a"), Expression::column("b")],
            );

            let sql = generate_expression(&ansi(), expression)
                .unwrap()
                .build()
                .unsafe_debug_sql();

            assert_eq!("(\"a\" = \"b\")", sql);
        }
    }

    #[test]
    fn concat_renders_through_pipes() {
        let expression = Expression::operation(
            "CONCAT",
            [
                Expression::column("first"),
                Expression::constant(" ", SqlType::new(ids::VARCHAR, "VARCHAR")),
                Expression::column("last"),
            ],
        );

        let sql = generate_expression(&ansi(), expression)
            .unwrap()
            .build()
            .unsafe_debug_sql();

        assert_eq!("(\"first\" || ' ' || \"last\")", sql);
    }

    #[test]
    fn count_rows_is_a_zero_argument_keyword() {
        let expression = Expression::operation("COUNT_ROWS", []);

        let sql = generate_expression(&ansi(), expression)
            .unwrap()
            .build()
            .unsafe_debug_sql();

        assert_eq!("COUNT(*)", sql);
    }

    #[test]
    fn null_checks_render_postfix() {
        let expression = Expression::operation("IS_NULL", [Expression::column("a")]);

        let sql = generate_expression(&ansi(), expression)
            .unwrap()
            .build()
            .unsafe_debug_sql();

        assert_eq!("(\"a\" IS NULL)", sql);
    }
}
