use super::{ansi, Dialect, OffsetStyle, OperationGenerator, TruncateStyle};
use crate::ast::Expression;
use crate::problem::{ProblemBehavior, Problems};
use crate::types::{
    check_round_trip, ids, infer_with_standard_rules, unsupported_without_underlying_type, Bits,
    SqlType, SqlTypeReference, TypeMapping, ValueType,
};

/// The SQLite dialect. Differences from the base: `IIF` exists as a
/// function, `OFFSET` needs a `LIMIT` in front of it, and `TRUNCATE` does
/// not exist.
pub fn sqlite() -> Dialect {
    let mut dialect = ansi().extend_with([("IIF", OperationGenerator::FunctionCall("IIF".into()))]);

    dialect.name = "sqlite";
    dialect.offset_style = OffsetStyle::RequiresLimit;
    dialect.truncate_style = TruncateStyle::DeleteFrom;
    dialect
}

/// Type mapping for SQLite.
///
/// SQLite stores everything in five storage classes, so the mapping works
/// on declared types: the artificial `BOOLEAN` and `ANY` declarations
/// round-trip cleanly, while small integers, floats and temporal types
/// degrade and report an inexact coercion.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteTypeMapping;

impl SqliteTypeMapping {
    fn text() -> SqlType {
        SqlType::new(ids::LONGVARCHAR, "TEXT")
    }

    fn boolean() -> SqlType {
        SqlType::new(ids::BOOLEAN, "BOOLEAN")
    }
}

impl TypeMapping for SqliteTypeMapping {
    fn value_type_to_sql(
        &self,
        value_type: &ValueType,
        behavior: ProblemBehavior,
        problems: &mut Problems,
    ) -> crate::Result<SqlType> {
        let sql_type = match value_type {
            // All integer storage is 64-bit.
            ValueType::Integer(_) => SqlType::new(ids::INTEGER, "INTEGER"),
            ValueType::Float(_) => SqlType::new(ids::REAL, "REAL"),
            ValueType::Decimal { precision, scale } => {
                SqlType::sized(ids::DECIMAL, "DECIMAL", *precision, *scale)
            }
            ValueType::Char {
                length: Some(length),
                variable: true,
            } => SqlType::sized(ids::VARCHAR, "VARCHAR", Some(*length), None),
            ValueType::Char {
                length,
                variable: false,
            } => SqlType::sized(ids::CHAR, "CHAR", *length, None),
            ValueType::Char { .. } => Self::text(),
            ValueType::Boolean => Self::boolean(),
            ValueType::Binary { .. } => SqlType::new(ids::BLOB, "BLOB"),
            // No temporal storage classes; the chrono convention is
            // ISO-8601 text.
            ValueType::Date | ValueType::Time | ValueType::DateTime { .. } => Self::text(),
            ValueType::Mixed => SqlType::new(ids::OTHER, "ANY"),
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
            ids::INTEGER | ids::BIGINT | ids::SMALLINT | ids::TINYINT => {
                ValueType::Integer(Bits::Bits64)
            }
            ids::REAL | ids::FLOAT | ids::DOUBLE => ValueType::Float(Bits::Bits64),
            ids::NUMERIC | ids::DECIMAL => ValueType::Decimal {
                precision: sql_type.precision(),
                scale: sql_type.scale(),
            },
            ids::VARCHAR => ValueType::Char {
                length: sql_type.precision(),
                variable: true,
            },
            ids::CHAR => ValueType::Char {
                length: sql_type.precision(),
                variable: false,
            },
            ids::LONGVARCHAR | ids::CLOB => ValueType::Char {
                length: None,
                variable: true,
            },
            ids::BINARY | ids::VARBINARY | ids::LONGVARBINARY | ids::BLOB => ValueType::Binary {
                length: None,
                variable: true,
            },
            ids::BOOLEAN | ids::BIT => ValueType::Boolean,
            ids::DATE => ValueType::Date,
            ids::TIME => ValueType::Time,
            ids::TIMESTAMP => ValueType::DateTime { with_timezone: false },
            ids::TIMESTAMP_WITH_TIMEZONE => ValueType::DateTime { with_timezone: true },
            ids::OTHER => ValueType::Mixed,
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
    use crate::ast::{Context, FromSpec, Query, SelectItem};
    use crate::error::ErrorKind;
    use crate::problem::Problem;

    fn to_sql(value_type: ValueType) -> (SqlType, Problems) {
        let mut problems = Problems::new();
        let sql_type = SqliteTypeMapping
            .value_type_to_sql(&value_type, ProblemBehavior::ReportWarning, &mut problems)
            .unwrap();

        (sql_type, problems)
    }

    #[test]
    fn booleans_round_trip_cleanly() {
        let (sql_type, problems) = to_sql(ValueType::Boolean);

        assert_eq!(ids::BOOLEAN, sql_type.id());
        assert!(problems.is_empty());
        assert_eq!(
            ValueType::Boolean,
            SqliteTypeMapping.sql_type_to_value_type(&sql_type)
        );
    }

    #[test]
    fn small_integers_widen_with_a_problem() {
        let (sql_type, problems) = to_sql(ValueType::Integer(Bits::Bits16));

        assert_eq!(ids::INTEGER, sql_type.id());
        assert_eq!(1, problems.len());
        assert!(matches!(
            problems.iter().next().unwrap(),
            Problem::InexactTypeCoercion { .. }
        ));

        // 64-bit integers are the native width and stay quiet.
        let (_, problems) = to_sql(ValueType::Integer(Bits::Bits64));
        assert!(problems.is_empty());
    }

    #[test]
    fn dates_become_text_with_a_problem() {
        let (sql_type, problems) = to_sql(ValueType::Date);

        assert_eq!("TEXT", sql_type.name());
        assert_eq!(1, problems.len());
    }

    #[test]
    fn date_coercion_escalates_under_report_error() {
        let mut problems = Problems::new();
        let error = SqliteTypeMapping
            .value_type_to_sql(&ValueType::Date, ProblemBehavior::ReportError, &mut problems)
            .unwrap_err();

        assert!(matches!(error.kind(), ErrorKind::InexactTypeCoercion { .. }));
    }

    #[test]
    fn mixed_maps_to_the_any_declaration() {
        let (sql_type, problems) = to_sql(ValueType::Mixed);

        assert_eq!(ids::OTHER, sql_type.id());
        assert_eq!("ANY", sql_type.name());
        assert!(problems.is_empty());
    }

    #[test]
    fn unsupported_without_a_concrete_type_is_illegal() {
        let mut problems = Problems::new();
        let value_type = ValueType::Unsupported {
            name: "geometry".into(),
            underlying: None,
        };

        let error = SqliteTypeMapping
            .value_type_to_sql(&value_type, ProblemBehavior::ReportWarning, &mut problems)
            .unwrap_err();

        assert!(matches!(error.kind(), ErrorKind::IllegalArgument(_)));
    }

    #[test]
    fn equality_inference_is_boolean_regardless_of_arguments() {
        let integer = SqlType::new(ids::INTEGER, "INTEGER");
        let expression = Expression::operation(
            "==",
            [Expression::column("a"), Expression::column("b")],
        );
        let arguments = [
            SqlTypeReference::Known(integer.clone()),
            SqlTypeReference::Known(integer),
        ];

        let inferred = SqliteTypeMapping.infer_return_type(
            &|_| SqlTypeReference::FromMetadata,
            "==",
            &arguments,
            &expression,
        );

        assert_eq!(
            SqlTypeReference::Known(SqliteTypeMapping::boolean()),
            inferred
        );
    }

    #[test]
    fn generates_the_aliased_arithmetic_select() {
        let query = Query::select(
            vec![SelectItem::new(
                Expression::operation(
                    "+",
                    [
                        Expression::qualified_column("t", "a"),
                        Expression::constant(1, SqlType::new(ids::INTEGER, "INTEGER")),
                    ],
                ),
                "c",
            )],
            Context::new(FromSpec::table("t", "t")),
        );

        let (sql, parameters) = sqlite().prepare(query).unwrap();

        assert_eq!("SELECT (\"t\".\"a\" + ?) AS \"c\" FROM \"t\" AS \"t\"", sql);
        assert_eq!(1, parameters.len());
        assert_eq!(Some(1), parameters[0].value.as_i64());
    }

    #[test]
    fn bare_offset_gets_the_unbounded_limit() {
        let query = Query::select_all(Context::new(FromSpec::table("users", "u")).offset(10));

        let (sql, _) = sqlite().prepare(query).unwrap();

        assert_eq!("SELECT * FROM \"users\" AS \"u\" LIMIT -1 OFFSET 10", sql);
    }

    #[test]
    fn iif_renders_as_a_function() {
        let boolean = SqlType::new(ids::BOOLEAN, "BOOLEAN");
        let expression = Expression::operation(
            "IIF",
            [
                Expression::operation(
                    ">",
                    [
                        Expression::column("a"),
                        Expression::constant(1, SqlType::new(ids::INTEGER, "INTEGER")),
                    ],
                ),
                Expression::constant(true, boolean.clone()),
                Expression::constant(false, boolean),
            ],
        );

        let sql = crate::generator::generate_expression(&sqlite(), expression)
            .unwrap()
            .build()
            .unsafe_debug_sql();

        assert_eq!("IIF((\"a\" > 1), TRUE, FALSE)", sql);
    }
}
