//! End-to-end tests: parse a query, bind its conditions, generate rows, and
//! check the columns that come out.

use pretty_assertions::assert_eq;
use rowgen::timestamp::{from_int, to_date, to_timestamp};
use rowgen::{bind_conditions, Column, ColumnType, Generator, Table};
use rowgen_sql::parse_query;

const SEED: u64 = 42;
const ROWS: usize = 12;

/// Build a table for `schema`, bind the WHERE/QUALIFY conditions of
/// `query`, generate `ROWS` rows with the default worker count, and
/// finalize and sort every column.
fn generate(query: &str, schema: Vec<Column>) -> Table {
    let stmt = parse_query(query).unwrap();
    let mut table = Table::new(schema, ROWS);
    bind_conditions(&mut table, &stmt.conditions()).unwrap();
    Generator::new().generate(&table, SEED).unwrap();
    table.finalize_ints();
    table.sort_ints();
    table.sort_timestamps();
    table
}

fn sorted_ints(table: &Table, name: &str) -> Vec<i64> {
    table.ints(name).unwrap().values().to_vec()
}

#[test]
fn int_equality_pins_every_row() {
    let table = generate(
        "SELECT * FROM t WHERE col_a = 10",
        vec![Column::new("col_a", ColumnType::Int)],
    );
    assert_eq!(sorted_ints(&table, "col_a"), vec![10; ROWS]);
}

#[test]
fn int_range_with_excluded_point() {
    let table = generate(
        "SELECT * FROM t WHERE col_a != 10 AND col_a > 3 AND col_a < 100",
        vec![Column::new("col_a", ColumnType::Int)],
    );
    let values = sorted_ints(&table, "col_a");

    assert_eq!(values.len(), ROWS);
    for v in &values {
        assert!((4..=99).contains(v), "{v} out of range");
        assert_ne!(*v, 10);
    }
    let mut resorted = values.clone();
    resorted.sort_unstable();
    assert_eq!(values, resorted);
}

#[test]
fn or_is_flattened_into_the_conjunction() {
    let table = generate(
        "SELECT * FROM t WHERE col_a > 5 OR col_a = 10 AND col_b = 5",
        vec![
            Column::new("col_a", ColumnType::Int),
            Column::new("col_b", ColumnType::Int),
        ],
    );
    // The point constraints dominate: every leaf of the expression applies.
    assert_eq!(sorted_ints(&table, "col_a"), vec![10; ROWS]);
    assert_eq!(sorted_ints(&table, "col_b"), vec![5; ROWS]);
}

#[test]
fn timestamp_date_equality_is_midnight_utc() {
    let table = generate(
        "SELECT * FROM t WHERE col_a = '2013-06-17'",
        vec![Column::new("col_a", ColumnType::Timestamp)],
    );
    let expected = from_int(to_date("2013-06-17").unwrap());
    assert_eq!(table.timestamps("col_a").unwrap(), vec![expected; ROWS]);
}

#[test]
fn timestamp_rfc3339_equality() {
    let table = generate(
        "SELECT * FROM t WHERE col_a = \"2013-06-17T14:29:00Z\"",
        vec![Column::new("col_a", ColumnType::Timestamp)],
    );
    let expected = from_int(to_timestamp("2013-06-17T14:29:00Z").unwrap());
    assert_eq!(table.timestamps("col_a").unwrap(), vec![expected; ROWS]);
}

#[test]
fn timestamp_range_with_excluded_instant() {
    let table = generate(
        "SELECT * FROM t \
         WHERE col_a != '2013-06-17T15:21:00Z' \
         AND col_a > '2013-06-17T15:10:00Z' \
         AND col_a < '2013-06-17T15:45:00Z'",
        vec![Column::new("col_a", ColumnType::Timestamp)],
    );
    let values = table.timestamps("col_a").unwrap();
    assert_eq!(values.len(), ROWS);

    let lo = to_timestamp("2013-06-17T15:10:00Z").unwrap();
    let hi = to_timestamp("2013-06-17T15:45:00Z").unwrap();
    let excluded = to_timestamp("2013-06-17T15:21:00Z").unwrap();
    for ts in &values {
        let secs = ts.timestamp();
        assert!(lo < secs && secs < hi, "{ts} out of range");
        assert_ne!(secs, excluded);
    }
    let mut resorted = values.clone();
    resorted.sort_unstable();
    assert_eq!(values, resorted);
}

#[test]
fn bare_bool_reference_pins_true() {
    let table = generate(
        "SELECT * FROM t WHERE col_a",
        vec![Column::new("col_a", ColumnType::Bool)],
    );
    assert_eq!(table.bools("col_a").unwrap(), vec![true; ROWS]);
}

#[test]
fn bool_false_literal_pins_false() {
    let table = generate(
        "SELECT * FROM t WHERE col_a = false",
        vec![Column::new("col_a", ColumnType::Bool)],
    );
    assert_eq!(table.bools("col_a").unwrap(), vec![false; ROWS]);
}

#[test]
fn two_bool_columns() {
    let table = generate(
        "SELECT * FROM t WHERE col_a = true AND col_b = false",
        vec![
            Column::new("col_a", ColumnType::Bool),
            Column::new("col_b", ColumnType::Bool),
        ],
    );
    assert_eq!(table.bools("col_a").unwrap(), vec![true; ROWS]);
    assert_eq!(table.bools("col_b").unwrap(), vec![false; ROWS]);
}

#[test]
fn sorted_output_is_deterministic_in_the_seed() {
    let query = "SELECT * FROM t WHERE col_a != 10 AND col_a > 3 AND col_a < 100";
    let schema = || {
        vec![
            Column::new("col_a", ColumnType::Int),
            Column::new("col_b", ColumnType::Int),
        ]
    };

    let first = generate(query, schema());
    let second = generate(query, schema());

    assert_eq!(sorted_ints(&first, "col_a"), sorted_ints(&second, "col_a"));
    assert_eq!(sorted_ints(&first, "col_b"), sorted_ints(&second, "col_b"));
}

#[test]
fn qualify_conditions_apply_like_where_conditions() {
    let table = generate(
        "SELECT * FROM t WHERE col_a >= 0 QUALIFY col_a <= 0",
        vec![Column::new("col_a", ColumnType::Int)],
    );
    assert_eq!(sorted_ints(&table, "col_a"), vec![0; ROWS]);
}

#[test]
fn joins_are_parsed_but_ignored() {
    let table = generate(
        "SELECT * FROM t JOIN u ON t.id = u.id WHERE col_a = 3",
        vec![Column::new("col_a", ColumnType::Int)],
    );
    assert_eq!(sorted_ints(&table, "col_a"), vec![3; ROWS]);
}

#[test]
fn wipe_allows_a_fresh_generation() {
    let query = "SELECT * FROM t WHERE col_a = 10";
    let stmt = parse_query(query).unwrap();
    let mut table = Table::new(vec![Column::new("col_a", ColumnType::Int)], ROWS);
    bind_conditions(&mut table, &stmt.conditions()).unwrap();

    Generator::new().generate(&table, SEED).unwrap();
    table.finalize_ints();
    assert_eq!(table.ints("col_a").unwrap().len(), ROWS);

    table.wipe();
    assert!(table.ints("col_a").is_none());

    Generator::new().generate(&table, SEED).unwrap();
    table.finalize_ints();
    assert_eq!(
        table.ints("col_a").unwrap().values().to_vec(),
        vec![10i64; ROWS]
    );
}
