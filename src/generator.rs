//! Generation of SQL from query trees.
//!
//! Every function here is pure: a dialect descriptor and a tree go in, a
//! [`SqlFragment`] rope comes out. Nothing turns into a string until the
//! rope is flattened into a [`Statement`](crate::statement::Statement)
//! and prepared with the placeholder format of the dialect.

use crate::ast::{
    Assignment, ColumnDescription, Context, CreateTable, DropTable, Expression, FromSpec, Join,
    NullsOrder, Order, OrderDescriptor, Query, SelectItem, TruncateTable,
};
use crate::dialect::{Dialect, OffsetStyle, TruncateStyle};
use crate::error::{Error, ErrorKind};
use crate::fragment::SqlFragment;
use crate::problem::{ProblemBehavior, Problems};
use crate::types::TypeMapping;
use std::borrow::Cow;

/// Generates a complete data statement.
pub fn generate_query<'a>(dialect: &Dialect, query: Query<'a>) -> crate::Result<SqlFragment<'a>> {
    match query {
        Query::Select { items, context } => {
            let mut columns = Vec::with_capacity(items.len());

            for item in items {
                columns.push(generate_select_item(dialect, item)?);
            }

            Ok(SqlFragment::code("SELECT ")
                + SqlFragment::join(", ", columns)
                + generate_select_context(dialect, context)?)
        }
        Query::SelectAll { context } => {
            Ok(SqlFragment::code("SELECT *") + generate_select_context(dialect, context)?)
        }
        Query::Insert { table, assignments } => generate_insert(dialect, table, assignments),
        Query::Update {
            table,
            assignments,
            filters,
        } => generate_update(dialect, table, assignments, filters),
        Query::Delete { table, filters } => generate_delete(dialect, table, filters),
    }
}

fn generate_select_item<'a>(
    dialect: &Dialect,
    item: SelectItem<'a>,
) -> crate::Result<SqlFragment<'a>> {
    Ok(generate_expression(dialect, item.expression)?
        + " AS "
        + dialect.quote_identifier(&item.alias)?)
}

/// Generates the tail of a `SELECT` in fixed clause order. Every clause
/// keyword appears only when its content is non-empty.
pub fn generate_select_context<'a>(
    dialect: &Dialect,
    context: Context<'a>,
) -> crate::Result<SqlFragment<'a>> {
    let mut fragment = SqlFragment::code(" FROM ") + generate_from_part(dialect, context.from)?;

    fragment = fragment + generate_filters(dialect, context.filters)?.prefixed(" WHERE ");

    let mut group_by = Vec::with_capacity(context.group_by.len());

    for expression in context.group_by {
        group_by.push(generate_expression(dialect, expression)?);
    }

    fragment = fragment + SqlFragment::join(", ", group_by).prefixed(" GROUP BY ");

    let mut order_by = Vec::with_capacity(context.order_by.len());

    for order in context.order_by {
        order_by.push(generate_order(dialect, order)?);
    }

    fragment = fragment + SqlFragment::join(", ", order_by).prefixed(" ORDER BY ");

    Ok(fragment + generate_limit_offset(dialect, context.limit, context.offset))
}

/// Row counts come from the caller, not from data, and are rendered
/// inline rather than bound.
fn generate_limit_offset<'a>(
    dialect: &Dialect,
    limit: Option<u64>,
    offset: Option<u64>,
) -> SqlFragment<'a> {
    match (limit, offset) {
        (Some(limit), Some(offset)) => SqlFragment::code(format!(" LIMIT {limit} OFFSET {offset}")),
        (Some(limit), None) => SqlFragment::code(format!(" LIMIT {limit}")),
        (None, Some(offset)) => match dialect.offset_style() {
            OffsetStyle::Plain => SqlFragment::code(format!(" OFFSET {offset}")),
            OffsetStyle::RequiresLimit => SqlFragment::code(format!(" LIMIT -1 OFFSET {offset}")),
        },
        (None, None) => SqlFragment::empty(),
    }
}

fn generate_filters<'a>(
    dialect: &Dialect,
    filters: Vec<Expression<'a>>,
) -> crate::Result<SqlFragment<'a>> {
    let mut generated = Vec::with_capacity(filters.len());

    for filter in filters {
        generated.push(generate_expression(dialect, filter)?);
    }

    Ok(SqlFragment::join(" AND ", generated))
}

/// Generates one source of a `FROM` clause.
pub fn generate_from_part<'a>(
    dialect: &Dialect,
    from: FromSpec<'a>,
) -> crate::Result<SqlFragment<'a>> {
    match from {
        FromSpec::Table { name, alias } => {
            Ok(dialect.quote_identifier(&name)? + " AS " + dialect.quote_identifier(&alias)?)
        }
        FromSpec::RawQuery { sql, alias } => {
            Ok(SqlFragment::code(sql).paren() + " AS " + dialect.quote_identifier(&alias)?)
        }
        FromSpec::SubQuery { query, alias } => Ok(generate_query(dialect, *query)?.paren()
            + " AS "
            + dialect.quote_identifier(&alias)?),
        FromSpec::Join(join) => generate_join(dialect, *join),
    }
}

fn generate_join<'a>(dialect: &Dialect, join: Join<'a>) -> crate::Result<SqlFragment<'a>> {
    let fragment = generate_from_part(dialect, join.left)?
        + format!(" {} ", join.kind.keyword())
        + generate_from_part(dialect, join.right)?;

    Ok(fragment + generate_filters(dialect, join.on)?.prefixed(" ON "))
}

/// Generates one `ORDER BY` term: the expression, an optional collation,
/// the explicit direction and the optional null placement, in that order.
pub fn generate_order<'a>(
    dialect: &Dialect,
    order: OrderDescriptor<'a>,
) -> crate::Result<SqlFragment<'a>> {
    let mut fragment = generate_expression(dialect, order.expression)?;

    if let Some(collation) = order.collation {
        fragment = fragment + " COLLATE " + dialect.quote_identifier(&collation)?;
    }

    fragment = fragment
        + match order.direction {
            Order::Asc => " ASC",
            Order::Desc => " DESC",
        };

    if let Some(nulls) = order.nulls {
        fragment = fragment
            + match nulls {
                NullsOrder::First => " NULLS FIRST",
                NullsOrder::Last => " NULLS LAST",
            };
    }

    Ok(fragment)
}

/// Generates a scalar expression. Constants become interpolations without
/// exception; operations resolve against the operation table of the
/// dialect and fail when the name is not registered.
pub fn generate_expression<'a>(
    dialect: &Dialect,
    expression: Expression<'a>,
) -> crate::Result<SqlFragment<'a>> {
    match expression {
        Expression::Column { origin: None, name } => dialect.quote_identifier(&name),
        Expression::Column {
            origin: Some(origin),
            name,
        } => Ok(dialect.quote_identifier(&origin)? + "." + dialect.quote_identifier(&name)?),
        Expression::Constant { value, sql_type } => {
            Ok(SqlFragment::interpolation(value, sql_type))
        }
        Expression::Operation { name, arguments } => {
            let generator = dialect.operation(&name)?;
            let mut generated = Vec::with_capacity(arguments.len());

            for argument in arguments {
                generated.push(generate_expression(dialect, argument)?);
            }

            generator.apply(&name, generated)
        }
    }
}

fn generate_insert<'a>(
    dialect: &Dialect,
    table: Cow<'a, str>,
    assignments: Vec<Assignment<'a>>,
) -> crate::Result<SqlFragment<'a>> {
    let fragment = SqlFragment::code("INSERT INTO ") + dialect.quote_identifier(&table)?;

    if assignments.is_empty() {
        return Ok(fragment + " DEFAULT VALUES");
    }

    let mut columns = Vec::with_capacity(assignments.len());
    let mut values = Vec::with_capacity(assignments.len());

    for assignment in assignments {
        columns.push(dialect.quote_identifier(&assignment.column)?);
        values.push(generate_expression(dialect, assignment.value)?);
    }

    Ok(fragment
        + " "
        + SqlFragment::join(", ", columns).paren()
        + " VALUES "
        + SqlFragment::join(", ", values).paren())
}

fn generate_update<'a>(
    dialect: &Dialect,
    table: Cow<'a, str>,
    assignments: Vec<Assignment<'a>>,
    filters: Vec<Expression<'a>>,
) -> crate::Result<SqlFragment<'a>> {
    if assignments.is_empty() {
        let kind = ErrorKind::illegal_argument("An UPDATE needs at least one assignment");
        return Err(Error::from(kind));
    }

    let mut sets = Vec::with_capacity(assignments.len());

    for assignment in assignments {
        sets.push(
            dialect.quote_identifier(&assignment.column)?
                + " = "
                + generate_expression(dialect, assignment.value)?,
        );
    }

    Ok(SqlFragment::code("UPDATE ")
        + dialect.quote_identifier(&table)?
        + " SET "
        + SqlFragment::join(", ", sets)
        + generate_filters(dialect, filters)?.prefixed(" WHERE "))
}

fn generate_delete<'a>(
    dialect: &Dialect,
    table: Cow<'a, str>,
    filters: Vec<Expression<'a>>,
) -> crate::Result<SqlFragment<'a>> {
    Ok(SqlFragment::code("DELETE FROM ")
        + dialect.quote_identifier(&table)?
        + generate_filters(dialect, filters)?.prefixed(" WHERE "))
}

/// Generates a `CREATE TABLE` statement. Column types go through the
/// given type mapping, which routes coercion problems per `behavior`.
pub fn generate_create_table<'a>(
    dialect: &Dialect,
    mapping: &dyn TypeMapping,
    create: CreateTable<'a>,
    behavior: ProblemBehavior,
    problems: &mut Problems,
) -> crate::Result<SqlFragment<'a>> {
    let CreateTable {
        name,
        columns,
        primary_key,
        temporary,
        if_not_exists,
    } = create;

    let mut fragment = SqlFragment::code("CREATE ");

    if temporary {
        fragment = fragment + "TEMPORARY ";
    }

    fragment = fragment + "TABLE ";

    if if_not_exists {
        fragment = fragment + "IF NOT EXISTS ";
    }

    fragment = fragment + dialect.quote_identifier(&name)? + " ";

    let mut definitions = Vec::with_capacity(columns.len() + 1);

    for column in columns {
        definitions.push(generate_column_description(
            dialect, mapping, column, behavior, problems,
        )?);
    }

    if !primary_key.is_empty() {
        let mut key_columns = Vec::with_capacity(primary_key.len());

        for column in &primary_key {
            key_columns.push(dialect.quote_identifier(column)?);
        }

        definitions
            .push(SqlFragment::code("PRIMARY KEY ") + SqlFragment::join(", ", key_columns).paren());
    }

    Ok(fragment + SqlFragment::join(", ", definitions).paren())
}

fn generate_column_description<'a>(
    dialect: &Dialect,
    mapping: &dyn TypeMapping,
    column: ColumnDescription<'a>,
    behavior: ProblemBehavior,
    problems: &mut Problems,
) -> crate::Result<SqlFragment<'a>> {
    let sql_type = mapping.value_type_to_sql(&column.value_type, behavior, problems)?;
    let mut fragment = dialect.quote_identifier(&column.name)? + " " + sql_type.to_string();

    if column.not_null {
        fragment = fragment + " NOT NULL";
    }

    if let Some(default) = column.default {
        fragment = fragment + " DEFAULT " + SqlFragment::code(default);
    }

    Ok(fragment)
}

/// Generates a `DROP TABLE` statement.
pub fn generate_drop_table<'a>(
    dialect: &Dialect,
    drop: DropTable<'a>,
) -> crate::Result<SqlFragment<'a>> {
    let mut fragment = SqlFragment::code("DROP TABLE ");

    if drop.if_exists {
        fragment = fragment + "IF EXISTS ";
    }

    Ok(fragment + dialect.quote_identifier(&drop.name)?)
}

/// Empties a table, with the statement shape the dialect supports.
pub fn generate_truncate_table<'a>(
    dialect: &Dialect,
    truncate: TruncateTable<'a>,
) -> crate::Result<SqlFragment<'a>> {
    let keyword = match dialect.truncate_style() {
        TruncateStyle::Truncate => "TRUNCATE TABLE ",
        TruncateStyle::DeleteFrom => "DELETE FROM ",
    };

    Ok(SqlFragment::code(keyword) + dialect.quote_identifier(&truncate.name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::JoinKind;
    use crate::dialect::ansi;
    use crate::fragment::BindValue;
    use crate::types::{ids, SqlType};

    fn prepare(query: Query<'_>) -> (String, Vec<BindValue<'_>>) {
        ansi().prepare(query).unwrap()
    }

    fn integer(value: i64) -> Expression<'static> {
        Expression::constant(value, SqlType::new(ids::BIGINT, "BIGINT"))
    }

    fn text(value: &str) -> Expression<'_> {
        Expression::constant(value, SqlType::new(ids::VARCHAR, "VARCHAR"))
    }

    #[test]
    fn inner_joins_render_their_conditions() {
        let join = Join::new(
            JoinKind::Inner,
            FromSpec::table("a", "a"),
            FromSpec::table("b", "b"),
            Expression::operation(
                "=",
                [
                    Expression::qualified_column("a", "id"),
                    Expression::qualified_column("b", "aid"),
                ],
            ),
        );
        let query = Query::select_all(Context::new(FromSpec::join(join)));

        let (sql, parameters) = prepare(query);

        assert_eq!(
            "SELECT * FROM \"a\" AS \"a\" INNER JOIN \"b\" AS \"b\" ON (\"a\".\"id\" = \"b\".\"aid\")",
            sql
        );
        assert!(parameters.is_empty());
    }

    #[test]
    fn multiple_join_conditions_combine_with_and() {
        let join = Join::new(
            JoinKind::Left,
            FromSpec::table("a", "a"),
            FromSpec::table("b", "b"),
            Expression::operation(
                "=",
                [
                    Expression::qualified_column("a", "id"),
                    Expression::qualified_column("b", "aid"),
                ],
            ),
        )
        .and_on(Expression::operation(
            "=",
            [
                Expression::qualified_column("a", "tenant"),
                Expression::qualified_column("b", "tenant"),
            ],
        ));
        let query = Query::select_all(Context::new(FromSpec::join(join)));

        let (sql, _) = prepare(query);

        assert_eq!(
            "SELECT * FROM \"a\" AS \"a\" LEFT JOIN \"b\" AS \"b\" ON (\"a\".\"id\" = \"b\".\"aid\") AND (\"a\".\"tenant\" = \"b\".\"tenant\")",
            sql
        );
    }

    #[test]
    fn cross_joins_have_no_on_clause() {
        let join = Join::cross(FromSpec::table("a", "a"), FromSpec::table("b", "b"));
        let query = Query::select_all(Context::new(FromSpec::join(join)));

        let (sql, _) = prepare(query);

        assert_eq!("SELECT * FROM \"a\" AS \"a\" CROSS JOIN \"b\" AS \"b\"", sql);
    }

    #[test]
    fn clauses_keep_their_fixed_order() {
        let context = Context::new(FromSpec::table("events", "e"))
            .filter(Expression::operation(
                "=",
                [Expression::qualified_column("e", "kind"), text("click")],
            ))
            .group_by(Expression::qualified_column("e", "day"))
            .order_by(OrderDescriptor::new(
                Expression::qualified_column("e", "day"),
                Order::Asc,
            ))
            .limit(10);
        let query = Query::select(
            vec![SelectItem::new(Expression::operation("COUNT_ROWS", []), "n")],
            context,
        );

        let (sql, parameters) = prepare(query);

        assert_eq!(
            "SELECT COUNT(*) AS \"n\" FROM \"events\" AS \"e\" WHERE (\"e\".\"kind\" = ?) GROUP BY \"e\".\"day\" ORDER BY \"e\".\"day\" ASC LIMIT 10",
            sql
        );
        assert_eq!(1, parameters.len());
    }

    #[test]
    fn orderings_render_collation_direction_and_null_placement() {
        let context = Context::new(FromSpec::table("users", "u")).order_by(
            OrderDescriptor::new(Expression::column("name"), Order::Desc)
                .collate("fi_FI")
                .nulls(NullsOrder::Last),
        );

        let (sql, _) = prepare(Query::select_all(context));

        assert_eq!(
            "SELECT * FROM \"users\" AS \"u\" ORDER BY \"name\" COLLATE \"fi_FI\" DESC NULLS LAST",
            sql
        );
    }

    #[test]
    fn limit_and_offset_render_together() {
        let context = Context::new(FromSpec::table("users", "u")).limit(10).offset(20);

        let (sql, _) = prepare(Query::select_all(context));

        assert_eq!("SELECT * FROM \"users\" AS \"u\" LIMIT 10 OFFSET 20", sql);
    }

    #[test]
    fn subqueries_nest_with_their_own_alias() {
        let inner = Query::select_all(Context::new(FromSpec::table("t", "t")).limit(1));
        let query = Query::select_all(Context::new(FromSpec::sub_query(inner, "s")));

        let (sql, _) = prepare(query);

        assert_eq!(
            "SELECT * FROM (SELECT * FROM \"t\" AS \"t\" LIMIT 1) AS \"s\"",
            sql
        );
    }

    #[test]
    fn raw_queries_are_emitted_verbatim() {
        let query = Query::select_all(Context::new(FromSpec::raw_query("SELECT 1 AS one", "raw")));

        let (sql, _) = prepare(query);

        assert_eq!("SELECT * FROM (SELECT 1 AS one) AS \"raw\"", sql);
    }

    #[test]
    fn inserts_bind_every_value() {
        let query = Query::insert(
            "users",
            vec![
                Assignment::new("name", text("ada")),
                Assignment::new("age", integer(36)),
            ],
        );

        let (sql, parameters) = prepare(query);

        assert_eq!(
            "INSERT INTO \"users\" (\"name\", \"age\") VALUES (?, ?)",
            sql
        );
        assert_eq!(Some("ada"), parameters[0].value.as_str());
        assert_eq!(Some(36), parameters[1].value.as_i64());
    }

    #[test]
    fn empty_inserts_fall_back_to_default_values() {
        let (sql, parameters) = prepare(Query::insert("users", Vec::new()));

        assert_eq!("INSERT INTO \"users\" DEFAULT VALUES", sql);
        assert!(parameters.is_empty());
    }

    #[test]
    fn updates_set_then_filter() {
        let query = Query::update(
            "users",
            vec![Assignment::new("age", integer(37))],
            vec![Expression::operation(
                "=",
                [Expression::column("id"), integer(1)],
            )],
        );

        let (sql, parameters) = prepare(query);

        assert_eq!("UPDATE \"users\" SET \"age\" = ? WHERE (\"id\" = ?)", sql);
        assert_eq!(Some(37), parameters[0].value.as_i64());
        assert_eq!(Some(1), parameters[1].value.as_i64());
    }

    #[test]
    fn updates_without_assignments_are_rejected() {
        let error = ansi()
            .prepare(Query::update("users", Vec::new(), Vec::new()))
            .unwrap_err();

        assert!(matches!(error.kind(), ErrorKind::IllegalArgument(_)));
    }

    #[test]
    fn deletes_render_with_and_without_filters() {
        let (sql, parameters) = prepare(Query::delete(
            "users",
            vec![Expression::operation(
                "=",
                [Expression::column("id"), integer(1)],
            )],
        ));

        assert_eq!("DELETE FROM \"users\" WHERE (\"id\" = ?)", sql);
        assert_eq!(1, parameters.len());

        let (sql, _) = prepare(Query::delete("users", Vec::new()));

        assert_eq!("DELETE FROM \"users\"", sql);
    }

    #[test]
    fn unsupported_operations_fail_from_any_depth() {
        let query = Query::select_all(
            Context::new(FromSpec::table("t", "t")).filter(Expression::operation(
                "NOT",
                [Expression::operation("FROBNICATE", [Expression::column("a")])],
            )),
        );

        let error = ansi().prepare(query).unwrap_err();

        assert!(matches!(
            error.kind(),
            ErrorKind::UnsupportedOperation { operation, .. } if operation == "FROBNICATE"
        ));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn create_table_maps_column_types_and_collects_problems() {
        use crate::dialect::{sqlite, SqliteTypeMapping};
        use crate::types::{Bits, ValueType};

        let create = CreateTable::new(
            "users",
            vec![
                ColumnDescription::new("id", ValueType::Integer(Bits::Bits64)).not_null(),
                ColumnDescription::new(
                    "name",
                    ValueType::Char {
                        length: Some(255),
                        variable: true,
                    },
                ),
                ColumnDescription::new("created_at", ValueType::DateTime { with_timezone: false })
                    .default("CURRENT_TIMESTAMP"),
            ],
        )
        .primary_key(["id"]);

        let mut problems = Problems::new();
        let sql = generate_create_table(
            &sqlite(),
            &SqliteTypeMapping,
            create,
            ProblemBehavior::ReportWarning,
            &mut problems,
        )
        .unwrap()
        .build()
        .unsafe_debug_sql();

        assert_eq!(
            "CREATE TABLE \"users\" (\"id\" INTEGER NOT NULL, \"name\" VARCHAR(255), \"created_at\" TEXT DEFAULT CURRENT_TIMESTAMP, PRIMARY KEY (\"id\"))",
            sql
        );
        // The datetime column degraded to text.
        assert_eq!(1, problems.len());
    }

    #[test]
    fn temporary_and_guarded_create_table_render_their_keywords() {
        struct Passthrough;

        impl TypeMapping for Passthrough {
            fn value_type_to_sql(
                &self,
                _: &crate::types::ValueType,
                _: ProblemBehavior,
                _: &mut Problems,
            ) -> crate::Result<SqlType> {
                Ok(SqlType::new(ids::INTEGER, "INTEGER"))
            }

            fn sql_type_to_value_type(&self, _: &SqlType) -> crate::types::ValueType {
                crate::types::ValueType::Integer(crate::types::Bits::Bits64)
            }

            fn infer_return_type(
                &self,
                from_metadata: &dyn Fn(&Expression<'_>) -> crate::types::SqlTypeReference,
                _: &str,
                _: &[crate::types::SqlTypeReference],
                expression: &Expression<'_>,
            ) -> crate::types::SqlTypeReference {
                from_metadata(expression)
            }
        }

        let create = CreateTable::new(
            "scratch",
            vec![ColumnDescription::new(
                "id",
                crate::types::ValueType::Integer(crate::types::Bits::Bits64),
            )],
        )
        .temporary()
        .if_not_exists();

        let mut problems = Problems::new();
        let sql = generate_create_table(
            &ansi(),
            &Passthrough,
            create,
            ProblemBehavior::ReportWarning,
            &mut problems,
        )
        .unwrap()
        .build()
        .unsafe_debug_sql();

        assert_eq!(
            "CREATE TEMPORARY TABLE IF NOT EXISTS \"scratch\" (\"id\" INTEGER)",
            sql
        );
    }

    #[test]
    fn drop_table_renders_the_existence_guard() {
        let sql = generate_drop_table(&ansi(), DropTable::new("users").if_exists())
            .unwrap()
            .build()
            .unsafe_debug_sql();

        assert_eq!("DROP TABLE IF EXISTS \"users\"", sql);
    }

    #[test]
    fn truncation_follows_the_dialect_style() {
        let sql = generate_truncate_table(&ansi(), TruncateTable::new("events"))
            .unwrap()
            .build()
            .unsafe_debug_sql();

        assert_eq!("TRUNCATE TABLE \"events\"", sql);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn truncation_becomes_a_delete_where_truncate_is_missing() {
        let sql = generate_truncate_table(&crate::dialect::sqlite(), TruncateTable::new("events"))
            .unwrap()
            .build()
            .unsafe_debug_sql();

        assert_eq!("DELETE FROM \"events\"", sql);
    }
}
