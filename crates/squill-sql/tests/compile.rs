use pretty_assertions::assert_eq;
use squill_core::{
    schema::{CustomOp, FieldDescriptor, RecordDescriptor, RelationDescriptor, SchemaRegistry},
    stmt::{ColumnType, Direction, FilterNode, Op, Operand, OrderSpec, Page, Value},
};
use squill_sql::{stmt, Dialect, Serializer, Statement};

fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();

    registry
        .register(
            &RecordDescriptor::new("User", "users")
                .field(FieldDescriptor::new("id", ColumnType::I64))
                .field(FieldDescriptor::new("name", ColumnType::Text))
                .field(FieldDescriptor::new("age", ColumnType::I64))
                .relation(RelationDescriptor::to_many("posts", "id", "user_id", "posts"))
                .custom_op(CustomOp {
                    name: "_between",
                    arity: Some(2),
                    render: |ident, placeholders| {
                        format!("{ident} BETWEEN {} AND {}", placeholders[0], placeholders[1])
                    },
                }),
        )
        .unwrap();

    registry
        .register(
            &RecordDescriptor::new("Post", "posts")
                .field(FieldDescriptor::new("id", ColumnType::I64))
                .field(FieldDescriptor::new("user_id", ColumnType::I64))
                .field(FieldDescriptor::new("title", ColumnType::Text)),
        )
        .unwrap();

    registry
}

fn select(filter: Option<FilterNode>) -> Statement {
    stmt::Select::new("users").filter(filter).into()
}

#[test]
fn select_without_filter_matches_all() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());

    let mut args = Vec::<Value>::new();
    let sql = serializer.serialize(&select(None), &mut args).unwrap();

    assert_eq!(sql, r#"SELECT "id", "name", "age" FROM "users";"#);
    assert!(args.is_empty());
}

#[test]
fn select_with_filter_order_and_page() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());

    let statement: Statement = stmt::Select::new("users")
        .filter(Some(FilterNode::gt("age", 30i64)))
        .order(OrderSpec::from_iter([
            ("age", Direction::Desc),
            ("name", Direction::Asc),
        ]))
        .page(Page::limit(10).offset(20))
        .into();

    let mut args = Vec::<Value>::new();
    let sql = serializer.serialize(&statement, &mut args).unwrap();

    assert_eq!(
        sql,
        r#"SELECT "id", "name", "age" FROM "users" WHERE "age" > $1 ORDER BY "age" DESC, "name" ASC LIMIT 10 OFFSET 20;"#
    );
    assert_eq!(args, [Value::I64(30)]);
}

#[test]
fn limit_zero_is_rendered() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());

    let statement: Statement = stmt::Select::new("users").page(Page::limit(0)).into();

    let mut args = Vec::<Value>::new();
    let sql = serializer.serialize(&statement, &mut args).unwrap();

    assert_eq!(sql, r#"SELECT "id", "name", "age" FROM "users" LIMIT 0;"#);
}

#[test]
fn compilation_is_deterministic() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());

    let filter = FilterNode::and([
        FilterNode::ge("age", 18i64),
        FilterNode::or([
            FilterNode::like("name", "A%"),
            FilterNode::not(FilterNode::eq("name", "Bob")),
        ]),
    ]);

    let map = registry.field_map("users").unwrap();

    let mut first_args = Vec::<Value>::new();
    let first = serializer
        .where_clause(Some(&filter), map, &mut first_args)
        .unwrap();

    let mut second_args = Vec::<Value>::new();
    let second = serializer
        .where_clause(Some(&filter), map, &mut second_args)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first_args, second_args);
}

#[test]
fn boolean_composition() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::mysql());
    let map = registry.field_map("users").unwrap();

    // {_and: [{age: {_gte: 18}}, {_not: {name: {_eq: "Bob"}}}]}
    let filter = FilterNode::and([
        FilterNode::ge("age", 18i64),
        FilterNode::not(FilterNode::eq("name", "Bob")),
    ]);

    let mut args = Vec::<Value>::new();
    let sql = serializer
        .where_clause(Some(&filter), map, &mut args)
        .unwrap();

    assert_eq!(sql, "((`age` >= ?) AND (NOT (`name` = ?)))");
    assert_eq!(args, [Value::I64(18), Value::String("Bob".into())]);
}

#[test]
fn empty_combinators_are_always_true() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());
    let map = registry.field_map("users").unwrap();

    for filter in [FilterNode::and([]), FilterNode::or([])] {
        let mut args = Vec::<Value>::new();
        let sql = serializer
            .where_clause(Some(&filter), map, &mut args)
            .unwrap();
        assert_eq!(sql, "1 = 1");
        assert!(args.is_empty());
    }
}

#[test]
fn absent_filter_compiles_to_nothing() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());
    let map = registry.field_map("users").unwrap();

    let mut args = Vec::<Value>::new();
    let sql = serializer.where_clause(None, map, &mut args).unwrap();

    assert_eq!(sql, "");
    assert!(args.is_empty());
}

#[test]
fn membership_operators() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());
    let map = registry.field_map("users").unwrap();

    let filter = FilterNode::is_in("id", [1i64, 2, 3]);
    let mut args = Vec::<Value>::new();
    let sql = serializer
        .where_clause(Some(&filter), map, &mut args)
        .unwrap();

    assert_eq!(sql, r#""id" IN ($1, $2, $3)"#);
    assert_eq!(args, [Value::I64(1), Value::I64(2), Value::I64(3)]);
}

#[test]
fn empty_membership_never_matches() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());
    let map = registry.field_map("users").unwrap();

    let mut args = Vec::<Value>::new();
    let sql = serializer
        .where_clause(Some(&FilterNode::is_in("id", Vec::<i64>::new())), map, &mut args)
        .unwrap();
    assert_eq!(sql, "1 = 0");

    let sql = serializer
        .where_clause(Some(&FilterNode::not_in("id", Vec::<i64>::new())), map, &mut args)
        .unwrap();
    assert_eq!(sql, "1 = 1");
    assert!(args.is_empty());
}

#[test]
fn relation_filter_compiles_to_correlated_subquery() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());
    let map = registry.field_map("users").unwrap();

    let filter = FilterNode::relation("posts", FilterNode::like("title", "Intro%"));

    let mut args = Vec::<Value>::new();
    let sql = serializer
        .where_clause(Some(&filter), map, &mut args)
        .unwrap();

    assert_eq!(
        sql,
        r#""id" IN (SELECT "user_id" FROM "posts" WHERE "title" LIKE $1)"#
    );
    assert_eq!(args, [Value::String("Intro%".into())]);
}

#[test]
fn relation_against_unregistered_table_is_a_schema_error() {
    let mut registry = SchemaRegistry::new();
    registry
        .register(
            &RecordDescriptor::new("User", "users")
                .field(FieldDescriptor::new("id", ColumnType::I64))
                .relation(RelationDescriptor::to_many("posts", "id", "user_id", "posts")),
        )
        .unwrap();

    let serializer = Serializer::new(&registry, Dialect::postgresql());
    let map = registry.field_map("users").unwrap().clone();

    let filter = FilterNode::relation("posts", FilterNode::and([]));
    let mut args = Vec::<Value>::new();
    let err = serializer
        .where_clause(Some(&filter), &map, &mut args)
        .unwrap_err();

    assert!(err.is_schema());
}

#[test]
fn unknown_column_is_a_validation_error() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());
    let map = registry.field_map("users").unwrap();

    let mut args = Vec::<Value>::new();
    let err = serializer
        .where_clause(Some(&FilterNode::eq("nope", 1i64)), map, &mut args)
        .unwrap_err();

    assert!(err.is_validation());
}

#[test]
fn unknown_order_column_is_a_validation_error() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());

    let statement: Statement = stmt::Select::new("users")
        .order(OrderSpec::asc("nope"))
        .into();

    let mut args = Vec::<Value>::new();
    let err = serializer.serialize(&statement, &mut args).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn operand_arity_is_validated() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());
    let map = registry.field_map("users").unwrap();

    let mut args = Vec::<Value>::new();

    // A sequence operand on a comparison operator
    let filter = FilterNode::leaf("age", Op::Gt, Operand::Many(vec![Value::I64(1)]));
    let err = serializer
        .where_clause(Some(&filter), map, &mut args)
        .unwrap_err();
    assert!(err.is_validation());

    // A scalar operand on a membership operator
    let filter = FilterNode::leaf("age", Op::In, Operand::One(Value::I64(1)));
    let err = serializer
        .where_clause(Some(&filter), map, &mut args)
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn custom_operator_renders_through_declaration() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());
    let map = registry.field_map("users").unwrap();

    let filter = FilterNode::leaf(
        "age",
        Op::Custom("_between"),
        Operand::Many(vec![Value::I64(20), Value::I64(30)]),
    );

    let mut args = Vec::<Value>::new();
    let sql = serializer
        .where_clause(Some(&filter), map, &mut args)
        .unwrap();

    assert_eq!(sql, r#""age" BETWEEN $1 AND $2"#);
    assert_eq!(args, [Value::I64(20), Value::I64(30)]);
}

#[test]
fn custom_operator_arity_is_validated() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());
    let map = registry.field_map("users").unwrap();

    let filter = FilterNode::leaf(
        "age",
        Op::Custom("_between"),
        Operand::Many(vec![Value::I64(20)]),
    );

    let mut args = Vec::<Value>::new();
    let err = serializer
        .where_clause(Some(&filter), map, &mut args)
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn undeclared_custom_operator_is_a_validation_error() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());
    let map = registry.field_map("posts").unwrap();

    let filter = FilterNode::leaf(
        "title",
        Op::Custom("_between"),
        Operand::Many(vec![Value::I64(1), Value::I64(2)]),
    );

    let mut args = Vec::<Value>::new();
    let err = serializer
        .where_clause(Some(&filter), map, &mut args)
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn insert_with_key_sentinel_on_postgresql() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());

    let statement: Statement = stmt::Insert {
        table: "users".into(),
        columns: vec!["id".into(), "name".into(), "age".into()],
        rows: vec![
            vec![
                stmt::Cell::Generated,
                stmt::Cell::Bind("Alice".into()),
                stmt::Cell::Bind(25i64.into()),
            ],
            vec![
                stmt::Cell::Generated,
                stmt::Cell::Bind("Bob".into()),
                stmt::Cell::Bind(35i64.into()),
            ],
        ],
        returning: true,
    }
    .into();

    let mut args = Vec::<Value>::new();
    let sql = serializer.serialize(&statement, &mut args).unwrap();

    assert_eq!(
        sql,
        r#"INSERT INTO "users" ("id", "name", "age") VALUES (DEFAULT, $1, $2), (DEFAULT, $3, $4) RETURNING "id", "name", "age";"#
    );
    assert_eq!(
        args,
        [
            Value::String("Alice".into()),
            Value::I64(25),
            Value::String("Bob".into()),
            Value::I64(35),
        ]
    );
}

#[test]
fn insert_with_omitted_key_on_sqlite() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::sqlite());

    let statement: Statement = stmt::Insert {
        table: "users".into(),
        columns: vec!["name".into(), "age".into()],
        rows: vec![vec![
            stmt::Cell::Bind("Alice".into()),
            stmt::Cell::Bind(25i64.into()),
        ]],
        returning: true,
    }
    .into();

    let mut args = Vec::<Value>::new();
    let sql = serializer.serialize(&statement, &mut args).unwrap();

    assert_eq!(
        sql,
        r#"INSERT INTO "users" ("name", "age") VALUES (?1, ?2) RETURNING "id", "name", "age";"#
    );
}

#[test]
fn insert_with_output_clause_on_mssql() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::mssql());

    let statement: Statement = stmt::Insert {
        table: "users".into(),
        columns: vec!["id".into(), "name".into(), "age".into()],
        rows: vec![vec![
            stmt::Cell::Generated,
            stmt::Cell::Bind("Alice".into()),
            stmt::Cell::Bind(25i64.into()),
        ]],
        returning: true,
    }
    .into();

    let mut args = Vec::<Value>::new();
    let sql = serializer.serialize(&statement, &mut args).unwrap();

    assert_eq!(
        sql,
        "INSERT INTO [users] ([id], [name], [age]) OUTPUT INSERTED.[id], INSERTED.[name], INSERTED.[age] VALUES (NULL, @p1, @p2);"
    );
}

#[test]
fn insert_returning_is_rejected_on_mysql() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::mysql());

    let statement: Statement = stmt::Insert {
        table: "users".into(),
        columns: vec!["name".into(), "age".into()],
        rows: vec![vec![
            stmt::Cell::Bind("Alice".into()),
            stmt::Cell::Bind(25i64.into()),
        ]],
        returning: true,
    }
    .into();

    let mut args = Vec::<Value>::new();
    assert!(serializer.serialize(&statement, &mut args).is_err());
}

#[test]
fn update_by_primary_key() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::postgresql());

    let statement: Statement = stmt::Update {
        table: "users".into(),
        assignments: vec![
            ("name".into(), "Alice Updated".into()),
            ("age".into(), 26i64.into()),
        ],
        filter: FilterNode::eq("id", 2i64),
        returning: true,
    }
    .into();

    let mut args = Vec::<Value>::new();
    let sql = serializer.serialize(&statement, &mut args).unwrap();

    assert_eq!(
        sql,
        r#"UPDATE "users" SET "name" = $1, "age" = $2 WHERE "id" = $3 RETURNING "id", "name", "age";"#
    );
    // SET arguments come first, then the filter's: index-aligned with
    // placeholder order.
    assert_eq!(
        args,
        [
            Value::String("Alice Updated".into()),
            Value::I64(26),
            Value::I64(2),
        ]
    );
}

#[test]
fn delete_with_returning_and_output() {
    let registry = registry();

    let statement: Statement = stmt::Delete {
        table: "users".into(),
        filter: Some(FilterNode::eq("id", 7i64)),
        returning: true,
    }
    .into();

    let serializer = Serializer::new(&registry, Dialect::postgresql());
    let mut args = Vec::<Value>::new();
    let sql = serializer.serialize(&statement, &mut args).unwrap();
    assert_eq!(
        sql,
        r#"DELETE FROM "users" WHERE "id" = $1 RETURNING "id", "name", "age";"#
    );

    let serializer = Serializer::new(&registry, Dialect::mssql());
    let mut args = Vec::<Value>::new();
    let sql = serializer.serialize(&statement, &mut args).unwrap();
    assert_eq!(
        sql,
        "DELETE FROM [users] OUTPUT DELETED.[id], DELETED.[name], DELETED.[age] WHERE [id] = @p1;"
    );
}

#[test]
fn mysql_placeholders_are_positional() {
    let registry = registry();
    let serializer = Serializer::new(&registry, Dialect::mysql());
    let map = registry.field_map("users").unwrap();

    let filter = FilterNode::and([
        FilterNode::eq("name", "Alice"),
        FilterNode::is_in("id", [1i64, 2]),
    ]);

    let mut args = Vec::<Value>::new();
    let sql = serializer
        .where_clause(Some(&filter), map, &mut args)
        .unwrap();

    assert_eq!(sql, "((`name` = ?) AND (`id` IN (?, ?)))");
    assert_eq!(
        args,
        [Value::String("Alice".into()), Value::I64(1), Value::I64(2)]
    );
}
