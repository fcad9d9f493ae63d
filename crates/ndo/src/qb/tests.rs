//! Integration tests for the qb module.

use crate::qb::{Cond, Join, StatementKind, Where, delete, find, insert, update};
use crate::value::{Fields, Value};
use serde_json::json;

#[test]
fn test_find_basic() {
    let qb = find("users");
    assert_eq!(qb.to_sql(), "SELECT * FROM users as users");
}

#[test]
fn test_find_with_conditions() {
    let stmt = find("users")
        .eq("status", "active")
        .compare("age", ">", 18)
        .limit(10)
        .build()
        .unwrap();

    assert!(stmt.sql.starts_with("SELECT * FROM users as users"));
    assert!(stmt.sql.contains("WHERE (status = ? AND age > ?)"));
    assert!(stmt.sql.ends_with("LIMIT 10"));
    assert_eq!(stmt.kind(), StatementKind::Select);
}

#[test]
fn test_comparisons_bind_one_value_each() {
    let conds: Vec<Cond> = (0..5).map(|i| Cond::compare(format!("c{i}"), ">=", i)).collect();
    let stmt = find("t").filter(Where::all(conds)).build().unwrap();
    assert_eq!(stmt.values.len(), 5);
    assert_eq!(stmt.placeholder_count(), 5);
    assert_eq!(stmt.values[4], Value::Int(4));
}

#[test]
fn test_placeholders_match_values() {
    let select = find("orders|o")
        .join(Join::inner("customers|c").on("c.id = o.customer_id"))
        .eq("o.state", "open")
        .or_eq("o.state", "pending")
        .in_list("o.region", ["eu", "us"])
        .operator("o.deleted_at", "IS NULL")
        .build()
        .unwrap();
    assert_eq!(select.placeholder_count(), select.values.len());

    let insert = insert("orders")
        .rows([
            Fields::new().set("total", 10.5).call("createdAt", "NOW"),
            Fields::new().set("total", 3.0).call("createdAt", "NOW"),
        ])
        .build()
        .unwrap();
    assert_eq!(insert.placeholder_count(), insert.values.len());
    assert_eq!(insert.kind(), StatementKind::Insert);

    let update = update("orders")
        .set("state", "closed")
        .call("closedAt", "NOW")
        .compare("total", "<", 0)
        .build()
        .unwrap();
    assert_eq!(update.placeholder_count(), update.values.len());
    assert_eq!(update.kind(), StatementKind::Update);
}

#[test]
fn test_multi_placeholder_operators() {
    let stmt = find("t").between("a", 1, 5).eq("b", 2).build().unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM t as t WHERE (a BETWEEN ? AND ? AND b = ?)");
    assert_eq!(stmt.placeholder_count(), stmt.values.len());

    // one value for two placeholders never builds
    let err = find("t").compare("a", "BETWEEN ? AND ?", 1).build().unwrap_err();
    assert_eq!(err.status_code(), 500);
    assert!(find("t").compare("a", "BETWEEN ? AND ?", 1).to_sql().is_empty());
    assert!(update("t").set("x", 1).compare("a", "IN (?, ?)", 1).build().is_err());
    assert!(delete("t").compare_values("a", "= ?", [1, 2]).build().is_err());
}

#[test]
fn test_builds_are_independent() {
    let qb = find("t").eq("a", 1);
    let first = qb.build().unwrap();
    let second = qb.build().unwrap();
    assert_eq!(first, second);
    assert_eq!(second.values, vec![Value::Int(1)]);
}

#[test]
fn test_insert_basic() {
    let sql = insert("users")
        .set("username", "alice")
        .set("email", "alice@example.com")
        .to_sql();
    assert_eq!(sql, "INSERT INTO users (username, email) VALUES (?, ?)");
}

#[test]
fn test_update_basic() {
    let sql = update("users").set("status", "inactive").eq("id", 1i64).to_sql();
    assert_eq!(sql, "UPDATE users SET status = ? WHERE (id = ?)");
}

#[test]
fn test_delete_basic() {
    let sql = delete("users").eq("id", 1i64).to_sql();
    assert_eq!(sql, "DELETE FROM users WHERE (id = ?)");
}

#[test]
fn test_delete_safe_default() {
    // Without WHERE nothing is built
    let stmt = delete("users").build().unwrap();
    assert!(stmt.is_empty());
    assert!(stmt.values.is_empty());
}

#[test]
fn test_descriptor_form() {
    let stmt = find("users|u")
        .fields(["u.id", "u.first_name|firstName"])
        .joins_json(&json!({"left": [{"table": "roles|r", "on": ["r.id = u.role_id"]}]}))
        .filter_json(&json!({
            "and": [{"field": "u.age", "operator": ">=", "value": 21}],
            "or": [{"u.city": "Oslo"}, {"u.city": "Bergen"}]
        }))
        .order_json(&json!({"u.id": "desc"}))
        .build()
        .unwrap();

    assert_eq!(
        stmt.sql,
        "SELECT u.id as \"id\", u.first_name as \"firstName\" FROM users as u \
         LEFT JOIN roles AS r ON r.id = u.role_id \
         WHERE (u.age >= ?) AND (u.city = ? OR u.city = ?) ORDER BY u.id DESC"
    );
    assert_eq!(
        stmt.values,
        vec![Value::Int(21), Value::from("Oslo"), Value::from("Bergen")]
    );
}
