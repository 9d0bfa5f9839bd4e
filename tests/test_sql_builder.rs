//! Unit tests for SqlBuilder query construction.

use mtg_ingest::SqlBuilder;

// ---------------------------------------------------------------------------
// Basic construction
// ---------------------------------------------------------------------------

#[test]
fn new_creates_select_star_from_table() {
    let (sql, params) = SqlBuilder::new("cards").build();
    assert_eq!(sql, "SELECT *\nFROM cards");
    assert!(params.is_empty());
}

#[test]
fn select_replaces_default_star() {
    let (sql, _) = SqlBuilder::new("decks").select(&["id", "owner"]).build();
    assert!(sql.starts_with("SELECT id, owner\n"));
}

// ---------------------------------------------------------------------------
// WHERE conditions
// ---------------------------------------------------------------------------

#[test]
fn where_eq_adds_equality_with_param() {
    let (sql, params) = SqlBuilder::new("decks").where_eq("owner", "alice").build();
    assert!(sql.contains("WHERE owner = ?"));
    assert_eq!(params, vec!["alice"]);
}

#[test]
fn where_contains_wraps_value_in_wildcards() {
    let (sql, params) = SqlBuilder::new("cards").where_contains("name", "Bolt").build();
    assert!(sql.contains("LOWER(name) LIKE LOWER(?)"));
    assert_eq!(params, vec!["%Bolt%"]);
}

#[test]
fn json_predicates_bind_path_before_value() {
    let (sql, params) = SqlBuilder::new("cards")
        .where_json_contains("document", "oracle_text", "draw")
        .where_json_eq("document", "createdByUser.userName", "alice")
        .build();
    assert!(sql.contains("LOWER(json_extract_string(document, ?)) LIKE LOWER(?)"));
    assert!(sql.contains("json_extract_string(document, ?) = ?"));
    assert_eq!(
        params,
        vec!["$.oracle_text", "%draw%", "$.createdByUser.userName", "alice"]
    );
}

#[test]
fn json_path_accepts_rooted_form() {
    let (_, params) = SqlBuilder::new("cards")
        .where_json_eq("document", "$.set", "mh3")
        .build();
    assert_eq!(params[0], "$.set");
}

#[test]
fn where_in_adds_in_clause() {
    let (sql, params) = SqlBuilder::new("cards").where_in("id", &["a", "b", "c"]).build();
    assert!(sql.contains("id IN (?, ?, ?)"));
    assert_eq!(params, vec!["a", "b", "c"]);
}

#[test]
fn where_in_empty_produces_false() {
    let (sql, params) = SqlBuilder::new("cards").where_in("id", &[]).build();
    assert!(sql.contains("WHERE FALSE"));
    assert!(params.is_empty());
}

#[test]
fn multiple_where_clauses_joined_with_and() {
    let (sql, _) = SqlBuilder::new("decks")
        .where_eq("owner", "a")
        .where_eq("format", "commander")
        .build();
    assert!(sql.contains("WHERE owner = ? AND format = ?"));
}

// ---------------------------------------------------------------------------
// GROUP BY / ORDER BY / LIMIT / OFFSET
// ---------------------------------------------------------------------------

#[test]
fn grouping_and_ordering_render_in_sql_order() {
    let (sql, _) = SqlBuilder::new("decks")
        .select(&["owner", "COUNT(*) AS decks"])
        .group_by(&["owner"])
        .order_by(&["decks DESC"])
        .limit(5)
        .offset(10)
        .build();
    assert_eq!(
        sql,
        "SELECT owner, COUNT(*) AS decks\nFROM decks\nGROUP BY owner\nORDER BY decks DESC\nLIMIT 5\nOFFSET 10"
    );
}
