use super::*;
use crate::column::{Column, Projection};
use crate::expr::{Float, FamilyKind, Integer, Text, count_star, lit, max, sum};
use crate::table::{Joinable, Table, cte};
use crate::value::Value;

struct Table1 {
    table: Table,
    col1: Column<Text>,
    col_float: Column<Float>,
    col_int: Column<Integer>,
}

fn table1() -> Table1 {
    let table = Table::new("db", "table1").with_columns([
        ("col1", FamilyKind::Text),
        ("col_float", FamilyKind::Float),
        ("col_int", FamilyKind::Integer),
    ]);
    Table1 {
        col1: table.column("col1"),
        col_float: table.column("col_float"),
        col_int: table.column("col_int"),
        table,
    }
}

fn pg(stmt: &impl SqlStatement) -> BuiltSql {
    stmt.build(Dialect::postgres()).unwrap()
}

fn build_err(stmt: &impl SqlStatement) -> crate::error::SqlError {
    stmt.build(Dialect::postgres()).unwrap_err()
}

fn sample_select(t: &Table1) -> SelectStatement {
    select((&t.col1, &t.col_float))
        .from(&t.table)
        .where_(t.col_int.gt_eq(10))
        .order_by(t.col_int.desc())
}

// ─── SELECT ─────────────────────────────────────────────────────────────────

#[test]
fn select_renders_formatted_sql() {
    let t = table1();
    let built = pg(&sample_select(&t));
    assert_eq!(
        built.sql,
        "\nSELECT table1.col1 AS \"table1.col1\",\n     table1.col_float AS \"table1.col_float\"\nFROM db.table1\nWHERE table1.col_int >= $1\nORDER BY table1.col_int DESC;\n"
    );
    assert_eq!(built.args, vec![Value::Int(10)]);
}

#[test]
fn select_debug_sql_inlines_arguments() {
    let t = table1();
    let sql = sample_select(&t).debug_sql(Dialect::postgres()).unwrap();
    assert!(sql.contains("WHERE table1.col_int >= 10\n"), "{sql}");
}

#[test]
fn select_for_mysql() {
    let t = table1();
    let built = sample_select(&t).build(Dialect::mysql()).unwrap();
    assert_eq!(
        built.sql,
        "\nSELECT table1.col1 AS `table1.col1`,\n     table1.col_float AS `table1.col_float`\nFROM db.table1\nWHERE table1.col_int >= ?\nORDER BY table1.col_int DESC;\n"
    );
    assert_eq!(built.args, vec![Value::Int(10)]);
}

#[test]
fn building_twice_is_identical() {
    let t = table1();
    let stmt = sample_select(&t);
    assert_eq!(pg(&stmt), pg(&stmt));
}

#[test]
fn text_values_never_reach_the_sql() {
    let t = table1();
    let stmt = select(&t.col1)
        .from(&t.table)
        .where_(t.col1.eq("'; DROP TABLE x; --"));
    let built = pg(&stmt);
    assert!(!built.sql.contains("DROP"));
    assert_eq!(built.args, vec![Value::from("'; DROP TABLE x; --")]);
}

#[test]
fn select_grouping_and_paging() {
    let t = table1();
    let stmt = select((&t.col_int, count_star().as_("cnt")))
        .from(&t.table)
        .group_by(&t.col_int)
        .having(count_star().gt(1))
        .limit(10)
        .offset(20);
    let built = pg(&stmt);
    assert_eq!(
        built.sql,
        "\nSELECT table1.col_int AS \"table1.col_int\",\n     COUNT(*) AS \"cnt\"\nFROM db.table1\nGROUP BY table1.col_int\nHAVING COUNT(*) > $1\nLIMIT $2\nOFFSET $3;\n"
    );
    assert_eq!(
        built.args,
        vec![Value::Int(1), Value::Int(10), Value::Int(20)]
    );
}

#[test]
fn repeated_where_is_anded() {
    let t = table1();
    let stmt = select(&t.col1)
        .from(&t.table)
        .where_(t.col_int.gt(1))
        .where_(t.col_int.lt(9));
    assert!(
        pg(&stmt)
            .sql
            .contains("\nWHERE (table1.col_int > $1) AND (table1.col_int < $2);")
    );
}

#[test]
fn distinct_and_row_locks() {
    let t = table1();
    let stmt = select(&t.col1)
        .distinct()
        .from(&t.table)
        .for_(RowLock::update().skip_locked());
    assert_eq!(
        pg(&stmt).sql,
        "\nSELECT DISTINCT table1.col1 AS \"table1.col1\"\nFROM db.table1\nFOR UPDATE SKIP LOCKED;\n"
    );
}

#[test]
fn all_columns_projection() {
    let t = table1();
    let stmt = select(t.table.all_columns().except(&t.col_float)).from(&t.table);
    assert_eq!(
        pg(&stmt).sql,
        "\nSELECT table1.col1 AS \"table1.col1\",\n     table1.col_int AS \"table1.col_int\"\nFROM db.table1;\n"
    );
    assert_eq!(
        stmt.projections()[0].aliases(),
        vec!["table1.col1".to_string(), "table1.col_int".to_string()]
    );
}

#[test]
fn empty_projection_fails() {
    let t = table1();
    let err = build_err(&select(Vec::<Projection>::new()).from(&t.table));
    assert!(err.is_serialize());
    assert!(err.to_string().starts_with("SELECT"), "{err}");
}

#[test]
fn reserved_names_are_quoted() {
    let user = Table::new("", "user");
    let order: Column<Integer> = user.column("order");
    let stmt = select(&order).from(&user);
    assert_eq!(
        pg(&stmt).sql,
        "\nSELECT \"user\".\"order\" AS \"user.order\"\nFROM \"user\";\n"
    );
}

#[test]
fn aliased_table_qualifies_columns() {
    let users = Table::new("", "users").alias("u");
    let id: Column<Integer> = users.column("id");
    let stmt = select(&id).from(&users);
    assert_eq!(
        pg(&stmt).sql,
        "\nSELECT u.id AS \"u.id\"\nFROM users AS u;\n"
    );
}

// ─── Joins and derived tables ───────────────────────────────────────────────

#[test]
fn join_conditions_render_on_their_own_line() {
    let users = Table::new("", "users");
    let orders = Table::new("", "orders");
    let uid: Column<Integer> = users.column("id");
    let owner: Column<Integer> = orders.column("user_id");

    let stmt = select(&uid).from(users.clone().left_join(&orders, owner.eq(&uid)));
    assert_eq!(
        pg(&stmt).sql,
        "\nSELECT users.id AS \"users.id\"\nFROM users\n     LEFT JOIN orders ON (orders.user_id = users.id);\n"
    );

    let cross = select(&uid).from(users.cross_join(&orders));
    assert!(pg(&cross).sql.contains("FROM users\n     CROSS JOIN orders;"));
}

#[test]
fn derived_table_columns_are_rebased() {
    let orders = Table::new("", "orders");
    let owner: Column<Integer> = orders.column("user_id");
    let amount: Column<Integer> = orders.column("amount");

    let sub = select((&owner, sum(&amount).as_("total")))
        .from(&orders)
        .group_by(&owner)
        .as_table("s");
    let total: Column<Integer> = sub.column("total").unwrap();
    assert!(sub.column::<Integer>("orders.user_id").is_some());
    assert!(sub.column::<Integer>("missing").is_none());

    let stmt = select((owner.via(&sub), &total)).from(&sub);
    assert_eq!(
        pg(&stmt).sql,
        "\nSELECT s.\"orders.user_id\" AS \"orders.user_id\",\n     s.\"total\" AS \"total\"\nFROM (\n          SELECT orders.user_id AS \"orders.user_id\",\n               SUM(orders.amount) AS \"total\"\n          FROM orders\n          GROUP BY orders.user_id\n     ) AS s;\n"
    );
}

#[test]
fn scalar_sub_query_in_projection() {
    let t = table1();
    let top = select(max(&t.col_int))
        .from(&t.table)
        .as_expr::<Integer>()
        .as_("top");
    let stmt = select(top);
    assert_eq!(
        pg(&stmt).sql,
        "\nSELECT (\n          SELECT MAX(table1.col_int)\n          FROM db.table1\n     ) AS \"top\";\n"
    );
}

// ─── Set operations ─────────────────────────────────────────────────────────

#[test]
fn union_with_order_and_limit() {
    let t = table1();
    let stmt = select(&t.col_int)
        .from(&t.table)
        .where_(t.col_int.gt(1))
        .union_all(select(&t.col_int).from(&t.table).where_(t.col_int.lt(0)))
        .order_by(&t.col_int)
        .limit(5);
    let built = pg(&stmt);
    assert_eq!(
        built.sql,
        "\n(\n     (\n          SELECT table1.col_int AS \"table1.col_int\"\n          FROM db.table1\n          WHERE table1.col_int > $1\n     )\n     UNION ALL\n     (\n          SELECT table1.col_int AS \"table1.col_int\"\n          FROM db.table1\n          WHERE table1.col_int < $2\n     )\n)\nORDER BY \"table1.col_int\"\nLIMIT $3;\n"
    );
    assert_eq!(built.args.len(), 3);
    assert_eq!(stmt.kind(), StatementKind::SetOperation);
}

#[test]
fn chained_unions_flatten() {
    let t = table1();
    let a = select(&t.col_int).from(&t.table);
    let stmt = a.clone().union(a.clone()).union(a);
    let sql = pg(&stmt).sql;
    assert_eq!(sql.matches("UNION").count(), 2);
    assert!(!sql.starts_with("\n(\n     ("));
}

#[test]
fn set_statements_chain_every_operator() {
    let t = table1();
    let a = select(&t.col_int).from(&t.table);
    let sql = pg(&a.clone().intersect_all(a.clone()).intersect_all(a.clone())).sql;
    assert_eq!(sql.matches("INTERSECT ALL").count(), 2);

    let sql = pg(&a.clone().except_all(a.clone()).except_all(a.clone())).sql;
    assert_eq!(sql.matches("EXCEPT ALL").count(), 2);

    let stmt = a.clone().union(a.clone()).intersect_all(a.clone()).except_all(a);
    let sql = pg(&stmt).sql;
    assert_eq!(sql.matches("UNION").count(), 1);
    assert_eq!(sql.matches("INTERSECT ALL").count(), 1);
    assert_eq!(sql.matches("EXCEPT ALL").count(), 1);
}

#[test]
fn one_branch_union_fails() {
    let t = table1();
    let stmt = SetStatement::new(
        SetOperator::Union,
        false,
        vec![select(&t.col_int).from(&t.table).into()],
    );
    let err = build_err(&stmt);
    assert!(err.to_string().contains("at least two"), "{err}");
}

// ─── INSERT ─────────────────────────────────────────────────────────────────

#[test]
fn insert_values_and_returning() {
    let t = table1();
    let stmt = t
        .table
        .insert((&t.col1, &t.col_int))
        .values(("a", 1))
        .values(("b", 2))
        .returning(&t.col_int);
    let built = pg(&stmt);
    assert_eq!(
        built.sql,
        "\nINSERT INTO db.table1 (col1, col_int)\nVALUES ($1, $2),\n       ($3, $4)\nRETURNING table1.col_int AS \"table1.col_int\";\n"
    );
    assert_eq!(
        built.args,
        vec![
            Value::from("a"),
            Value::Int(1),
            Value::from("b"),
            Value::Int(2)
        ]
    );
}

#[test]
fn insert_defaults_and_upsert() {
    let t = table1();
    let stmt = t
        .table
        .insert((&t.col1, &t.col_int))
        .values(("a", lit::default()))
        .on_conflict(&t.col1)
        .do_update(t.col_int.set(t.col_int.excluded()));
    assert_eq!(
        pg(&stmt).sql,
        "\nINSERT INTO db.table1 (col1, col_int)\nVALUES ($1, DEFAULT)\nON CONFLICT (col1) DO UPDATE\n     SET col_int = excluded.col_int;\n"
    );

    let nothing = t
        .table
        .insert(&t.col1)
        .values("a")
        .on_conflict(&t.col1)
        .do_nothing();
    assert!(pg(&nothing).sql.ends_with("\nON CONFLICT (col1) DO NOTHING;\n"));
}

#[test]
fn insert_on_duplicate_key_for_mysql() {
    let t = table1();
    let stmt = t
        .table
        .insert((&t.col1, &t.col_int))
        .values(("a", 1))
        .on_duplicate_key_update(t.col_int.set(5));
    let built = stmt.build(Dialect::mysql()).unwrap();
    assert_eq!(
        built.sql,
        "\nINSERT INTO db.table1 (col1, col_int)\nVALUES (?, ?)\nON DUPLICATE KEY UPDATE col_int = ?;\n"
    );
    assert_eq!(built.args.len(), 3);
}

#[test]
fn insert_from_query() {
    let t = table1();
    let stmt = t
        .table
        .insert(&t.col_int)
        .query(select(&t.col_int).from(&t.table));
    assert_eq!(
        pg(&stmt).sql,
        "\nINSERT INTO db.table1 (col_int)\nSELECT table1.col_int AS \"table1.col_int\"\nFROM db.table1;\n"
    );
}

#[test]
fn insert_without_rows_fails() {
    let t = table1();
    let err = build_err(&t.table.insert(&t.col1));
    assert!(err.to_string().starts_with("INSERT"), "{err}");
}

#[test]
fn insert_row_width_must_match() {
    let t = table1();
    let stmt = t.table.insert((&t.col1, &t.col_int)).values(("a",));
    let err = build_err(&stmt);
    assert!(err.to_string().contains("1 values for 2 columns"), "{err}");
}

#[test]
fn insert_rows_and_query_are_exclusive() {
    let t = table1();
    let stmt = t
        .table
        .insert(&t.col_int)
        .values(1)
        .query(select(&t.col_int).from(&t.table));
    assert!(build_err(&stmt).is_serialize());
}

// ─── UPDATE / DELETE ────────────────────────────────────────────────────────

#[test]
fn update_assignments_align() {
    let t = table1();
    let stmt = t
        .table
        .update()
        .set((t.col1.set("x"), t.col_int.set(3)))
        .where_(t.col_int.eq(1));
    let built = pg(&stmt);
    assert_eq!(
        built.sql,
        "\nUPDATE db.table1\nSET col1 = $1,\n    col_int = $2\nWHERE table1.col_int = $3;\n"
    );
    assert_eq!(built.args.len(), 3);
}

#[test]
fn update_requires_where_and_set() {
    let t = table1();
    let err = build_err(&t.table.update().set(t.col_int.set(1)));
    assert!(err.to_string().contains("WHERE"), "{err}");

    let err = build_err(&t.table.update().where_(t.col_int.eq(1)));
    assert!(err.to_string().contains("SET"), "{err}");
}

#[test]
fn delete_with_returning() {
    let t = table1();
    let stmt = t
        .table
        .delete()
        .where_(t.col_int.eq(1))
        .returning(&t.col1);
    assert_eq!(
        pg(&stmt).sql,
        "\nDELETE FROM db.table1\nWHERE table1.col_int = $1\nRETURNING table1.col1 AS \"table1.col1\";\n"
    );
}

#[test]
fn delete_without_where_fails() {
    let t = table1();
    let err = build_err(&t.table.delete());
    assert!(err.is_serialize());
    assert_eq!(err.to_string(), "DELETE: WHERE clause is required");
}

#[test]
fn delete_with_order_and_limit_for_mysql() {
    let t = table1();
    let stmt = t
        .table
        .delete()
        .where_(t.col_int.gt(5))
        .order_by(t.col_int.asc())
        .limit(1);
    assert_eq!(
        stmt.build(Dialect::mysql()).unwrap().sql,
        "\nDELETE FROM db.table1\nWHERE table1.col_int > ?\nORDER BY table1.col_int ASC\nLIMIT 1;\n"
    );
}

// ─── LOCK ───────────────────────────────────────────────────────────────────

#[test]
fn lock_modes() {
    let t = table1();
    assert_eq!(pg(&t.table.lock()).sql, "\nLOCK TABLE db.table1;\n");
    assert_eq!(
        pg(&t.table.lock().in_(LockMode::Exclusive).nowait()).sql,
        "\nLOCK TABLE db.table1 IN EXCLUSIVE MODE NOWAIT;\n"
    );
    assert_eq!(
        t.table
            .lock()
            .in_(LockMode::Read)
            .build(Dialect::mysql())
            .unwrap()
            .sql,
        "\nLOCK TABLES db.table1 READ;\n"
    );
    assert_eq!(t.table.lock().kind(), StatementKind::Lock);
}

#[test]
fn lock_without_tables_fails() {
    assert!(build_err(&LockStatement::tables(Vec::new())).is_serialize());
}

// ─── WITH ───────────────────────────────────────────────────────────────────

#[test]
fn with_statement_references_cte_columns() {
    let t = table1();
    let recent = cte("recent");
    let stmt = with(
        [recent.as_(select(&t.col_int).from(&t.table).where_(t.col_int.gt(5)))],
        select(t.col_int.via(&recent)).from(&recent),
    );
    assert_eq!(
        pg(&stmt).sql,
        "\nWITH recent AS (\n     SELECT table1.col_int AS \"table1.col_int\"\n     FROM db.table1\n     WHERE table1.col_int > $1\n)\nSELECT recent.\"table1.col_int\" AS \"table1.col_int\"\nFROM recent;\n"
    );
    assert_eq!(stmt.kind(), StatementKind::Select);
}

#[test]
fn with_takes_the_kind_of_its_body() {
    let t = table1();
    let doomed = cte("doomed");
    let stmt = with(
        [doomed.as_(select(&t.col_int).from(&t.table))],
        t.table.delete().where_(t.col_int.in_query(
            select(doomed.column::<Integer>("table1.col_int")).from(&doomed),
        )),
    );
    assert_eq!(stmt.kind(), StatementKind::Delete);
    assert!(pg(&stmt).sql.starts_with("\nWITH doomed AS (\n"));
}

#[test]
fn recursive_cte_with_column_names() {
    let nums = cte("nums").columns(["n"]);
    let n: Column<Integer> = nums.column("n");
    let body = select(lit::constant_int(1))
        .union_all(select(n.add(1)).from(&nums).where_(n.lt(10)));
    let stmt = with_recursive([nums.as_(body)], select(&n).from(&nums));
    let sql = pg(&stmt).sql;
    assert!(sql.starts_with("\nWITH RECURSIVE nums (n) AS (\n"), "{sql}");
    assert!(sql.ends_with("\nSELECT nums.\"n\" AS \"n\"\nFROM nums;\n"), "{sql}");
}

#[test]
fn statement_enum_dispatches() {
    let t = table1();
    let stmt: Statement = sample_select(&t).into();
    assert_eq!(stmt.kind(), StatementKind::Select);
    assert_eq!(stmt.projections().len(), 2);
    assert_eq!(pg(&stmt), pg(&sample_select(&t)));
}
