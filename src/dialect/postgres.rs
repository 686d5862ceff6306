use super::{ansi, expect_arity, Dialect, OperationGenerator};
use crate::ast::Expression;
use crate::fragment::SqlFragment;
use crate::problem::{ProblemBehavior, Problems};
use crate::statement::PlaceholderFormat;
use crate::types::{
    check_round_trip, ids, infer_with_standard_rules, unsupported_without_underlying_type, Bits,
    SqlType, SqlTypeReference, TypeMapping, ValueType,
};

/// The PostgreSQL dialect. Differences from the base: placeholders are
/// `$1`, `$2`, … with one-based numbering, inequality is spelled `<>`,
/// and `IIF` does not exist and expands to a `CASE WHEN`.
pub fn postgres() -> Dialect {
    let mut dialect = ansi().extend_with([
        ("!=", OperationGenerator::BinaryInfix("<>".into())),
        (
            "IIF",
            OperationGenerator::Custom {
                arity: Some(3),
                generate: iif_as_case,
            },
        ),
    ]);

    dialect.name = "postgres";
    dialect.placeholders = PlaceholderFormat::DOLLAR_NUMBERED;
    dialect
}

fn iif_as_case<'a>(arguments: Vec<SqlFragment<'a>>) -> crate::Result<SqlFragment<'a>> {
    let [condition, consequent, alternative] = expect_arity("IIF", arguments)?;

    let case = SqlFragment::code("CASE WHEN ")
        + condition
        + " THEN "
        + consequent
        + " ELSE "
        + alternative
        + " END";

    Ok(case.paren())
}

/// Type mapping for PostgreSQL.
///
/// The native type system is rich enough that most mappings are exact.
/// The remaining degradations are half-precision floats, which widen to
/// `real`, and [`ValueType::Mixed`], which has no counterpart and is
/// stored as `text`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresTypeMapping;

impl PostgresTypeMapping {
    fn text() -> SqlType {
        SqlType::new(ids::VARCHAR, "text")
    }

    fn boolean() -> SqlType {
        SqlType::new(ids::BOOLEAN, "boolean")
    }
}

impl TypeMapping for PostgresTypeMapping {
    fn value_type_to_sql(
        &self,
        value_type: &ValueType,
        behavior: ProblemBehavior,
        problems: &mut Problems,
    ) -> crate::Result<SqlType> {
        let sql_type = match value_type {
            ValueType::Integer(Bits::Bits16) => SqlType::new(ids::SMALLINT, "smallint"),
            ValueType::Integer(Bits::Bits32) => SqlType::new(ids::INTEGER, "integer"),
            ValueType::Integer(Bits::Bits64) => SqlType::new(ids::BIGINT, "bigint"),
            // No half-precision float; `real` is the narrowest.
            ValueType::Float(Bits::Bits16 | Bits::Bits32) => SqlType::new(ids::REAL, "real"),
            ValueType::Float(Bits::Bits64) => SqlType::new(ids::DOUBLE, "double precision"),
            ValueType::Decimal { precision, scale } => {
                SqlType::sized(ids::NUMERIC, "numeric", *precision, *scale)
            }
            ValueType::Char {
                length: Some(length),
                variable: true,
            } => SqlType::sized(ids::VARCHAR, "varchar", Some(*length), None),
            ValueType::Char {
                length: None,
                variable: true,
            } => Self::text(),
            ValueType::Char {
                length,
                variable: false,
            } => SqlType::sized(ids::CHAR, "char", *length, None),
            ValueType::Boolean => Self::boolean(),
            // `bytea` has no length argument.
            ValueType::Binary { .. } => SqlType::new(ids::VARBINARY, "bytea"),
            ValueType::Date => SqlType::new(ids::DATE, "date"),
            ValueType::Time => SqlType::new(ids::TIME, "time"),
            ValueType::DateTime { with_timezone: false } => SqlType::new(ids::TIMESTAMP, "timestamp"),
            ValueType::DateTime { with_timezone: true } => {
                SqlType::new(ids::TIMESTAMP_WITH_TIMEZONE, "timestamptz")
            }
            ValueType::Mixed => Self::text(),
            ValueType::Unsupported {
                underlying: Some(underlying),
                ..
            } => underlying.clone(),
            ValueType::Unsupported { name, underlying: None } => {
                return Err(unsupported_without_underlying_type(name))
            }
        };

        check_round_trip(self, value_type, &sql_type, behavior, problems)?;

        Ok(sql_type)
    }

    fn sql_type_to_value_type(&self, sql_type: &SqlType) -> ValueType {
        match sql_type.id() {
            ids::SMALLINT | ids::TINYINT => ValueType::Integer(Bits::Bits16),
            ids::INTEGER => ValueType::Integer(Bits::Bits32),
            ids::BIGINT => ValueType::Integer(Bits::Bits64),
            ids::REAL | ids::FLOAT => ValueType::Float(Bits::Bits32),
            ids::DOUBLE => ValueType::Float(Bits::Bits64),
            ids::NUMERIC | ids::DECIMAL => ValueType::Decimal {
                precision: sql_type.precision(),
                scale: sql_type.scale(),
            },
            ids::VARCHAR | ids::LONGVARCHAR | ids::CLOB => ValueType::Char {
                length: sql_type.precision(),
                variable: true,
            },
            ids::CHAR => ValueType::Char {
                length: sql_type.precision(),
                variable: false,
            },
            ids::BINARY | ids::VARBINARY | ids::LONGVARBINARY | ids::BLOB => ValueType::Binary {
                length: None,
                variable: true,
            },
            ids::BOOLEAN | ids::BIT => ValueType::Boolean,
            ids::DATE => ValueType::Date,
            ids::TIME | ids::TIME_WITH_TIMEZONE => ValueType::Time,
            ids::TIMESTAMP => ValueType::DateTime { with_timezone: false },
            ids::TIMESTAMP_WITH_TIMEZONE => ValueType::DateTime { with_timezone: true },
            _ => ValueType::Unsupported {
                name: sql_type.name().to_owned(),
                underlying: Some(sql_type.clone()),
            },
        }
    }

    fn infer_return_type(
        &self,
        from_metadata: &dyn Fn(&Expression<'_>) -> SqlTypeReference,
        operation: &str,
        arguments: &[SqlTypeReference],
        expression: &Expression<'_>,
    ) -> SqlTypeReference {
        infer_with_standard_rules(
            Self::boolean(),
            Self::text(),
            from_metadata,
            operation,
            arguments,
            expression,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Context, FromSpec, Query};
    use crate::error::ErrorKind;
    use crate::problem::Problem;

    fn to_sql(value_type: ValueType) -> (SqlType, Problems) {
        let mut problems = Problems::new();
        let sql_type = PostgresTypeMapping
            .value_type_to_sql(&value_type, ProblemBehavior::ReportWarning, &mut problems)
            .unwrap();

        (sql_type, problems)
    }

    fn render(expression: Expression<'_>) -> String {
        crate::generator::generate_expression(&postgres(), expression)
            .unwrap()
            .build()
            .unsafe_debug_sql()
    }

    #[test]
    fn placeholders_are_numbered_from_one() {
        let varchar = SqlType::new(ids::VARCHAR, "varchar");
        let bigint = SqlType::new(ids::BIGINT, "bigint");
        let query = Query::select_all(
            Context::new(FromSpec::table("users", "u"))
                .filter(Expression::operation(
                    "=",
                    [
                        Expression::column("name"),
                        Expression::constant("ada", varchar),
                    ],
                ))
                .filter(Expression::operation(
                    ">",
                    [Expression::column("age"), Expression::constant(30, bigint)],
                )),
        );

        let (sql, parameters) = postgres().prepare(query).unwrap();

        assert_eq!(
            "SELECT * FROM \"users\" AS \"u\" WHERE (\"name\" = $1) AND (\"age\" > $2)",
            sql
        );
        assert_eq!(Some("ada"), parameters[0].value.as_str());
        assert_eq!(Some(30), parameters[1].value.as_i64());
    }

    #[test]
    fn inequality_is_spelled_with_angle_brackets() {
        let expression = Expression::operation(
            "!=",
            [
                Expression::column("a"),
                Expression::constant(1, SqlType::new(ids::INTEGER, "integer")),
            ],
        );

        assert_eq!("(\"a\" <> 1)", render(expression));
    }

    #[test]
    fn iif_expands_to_a_case_expression() {
        let expression = Expression::operation(
            "IIF",
            [
                Expression::operation("IS_NULL", [Expression::column("a")]),
                Expression::column("b"),
                Expression::column("c"),
            ],
        );

        assert_eq!(
            "(CASE WHEN (\"a\" IS NULL) THEN \"b\" ELSE \"c\" END)",
            render(expression)
        );
    }

    #[test]
    fn iif_still_takes_exactly_three_arguments() {
        let error = postgres()
            .operation("IIF")
            .unwrap()
            .apply("IIF", vec![SqlFragment::code("1")])
            .unwrap_err();

        assert!(matches!(
            error.kind(),
            ErrorKind::ArityMismatch {
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn integer_widths_map_to_the_native_types() {
        for (bits, name) in [
            (Bits::Bits16, "smallint"),
            (Bits::Bits32, "integer"),
            (Bits::Bits64, "bigint"),
        ] {
            let (sql_type, problems) = to_sql(ValueType::Integer(bits));

            assert_eq!(name, sql_type.name());
            assert!(problems.is_empty(), "integer width {bits:?} degraded");
        }
    }

    #[test]
    fn half_floats_widen_to_real_with_a_problem() {
        let (sql_type, problems) = to_sql(ValueType::Float(Bits::Bits16));

        assert_eq!("real", sql_type.name());
        assert_eq!(1, problems.len());

        let (_, problems) = to_sql(ValueType::Float(Bits::Bits32));
        assert!(problems.is_empty());
    }

    #[test]
    fn timestamps_keep_their_timezone_flag() {
        let (with, problems) = to_sql(ValueType::DateTime { with_timezone: true });
        assert_eq!("timestamptz", with.name());
        assert!(problems.is_empty());

        let (without, problems) = to_sql(ValueType::DateTime { with_timezone: false });
        assert_eq!("timestamp", without.name());
        assert!(problems.is_empty());
    }

    #[test]
    fn mixed_degrades_to_text_with_a_problem() {
        let (sql_type, problems) = to_sql(ValueType::Mixed);

        assert_eq!("text", sql_type.name());
        assert_eq!(1, problems.len());
        assert!(matches!(
            problems.iter().next().unwrap(),
            Problem::InexactTypeCoercion { .. }
        ));
    }

    #[test]
    fn unsupported_types_pass_through_their_underlying_type() {
        let jsonb = SqlType::new(ids::OTHER, "jsonb");
        let value_type = PostgresTypeMapping.sql_type_to_value_type(&jsonb);

        assert!(matches!(
            &value_type,
            ValueType::Unsupported { name, .. } if name == "jsonb"
        ));

        let (sql_type, problems) = to_sql(value_type);
        assert_eq!("jsonb", sql_type.name());
        assert!(problems.is_empty());
    }
}
