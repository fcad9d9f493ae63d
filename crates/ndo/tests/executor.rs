//! Executor behavior against a scripted in-memory adapter.

use ndo::{
    Adapter, Dialect, NdoConfig, NdoError, NdoResult, Outcome, Postgres, Record, Response, Value,
    qb, Ndo,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Records every statement and replays scripted responses in order.
///
/// When the script runs dry, SELECTs get no rows and everything else one
/// affected row.
#[derive(Default)]
struct Scripted {
    dialect: Postgres,
    sent: Mutex<Vec<(String, Vec<Value>)>>,
    script: Mutex<VecDeque<NdoResult<Response>>>,
}

impl Scripted {
    fn then(self, response: NdoResult<Response>) -> Self {
        self.script.lock().unwrap().push_back(response);
        self
    }

    fn sent(&self) -> Vec<(String, Vec<Value>)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Adapter for Scripted {
    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    async fn execute(&self, sql: &str, values: &[Value]) -> NdoResult<Response> {
        self.sent
            .lock()
            .unwrap()
            .push((sql.to_string(), values.to_vec()));
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(response) => response,
            None if sql.starts_with("SELECT") => Ok(Response::Rows(Vec::new())),
            None => Ok(Response::Affected(1)),
        }
    }

    async fn commit(&self) -> NdoResult<()> {
        self.sent.lock().unwrap().push(("COMMIT".to_string(), Vec::new()));
        Ok(())
    }

    async fn rollback(&self) -> NdoResult<()> {
        self.sent.lock().unwrap().push(("ROLLBACK".to_string(), Vec::new()));
        Ok(())
    }
}

fn row(cells: &[(&str, Value)]) -> Record {
    cells
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn ndo(adapter: Scripted) -> Ndo<Scripted> {
    Ndo::with_config(adapter, NdoConfig::new())
}

#[tokio::test]
async fn find_rekeys_columns_to_camel_case() {
    let adapter = Scripted::default().then(Ok(Response::Rows(vec![row(&[
        ("USER_ID", Value::Int(1)),
        ("first_name", Value::from("Ada")),
    ])])));
    let ndo = ndo(adapter);

    let rows = ndo.find(qb::find("users").eq("status", "active")).await.unwrap();

    assert_eq!(rows.len(), 1);
    let names: Vec<&str> = rows[0].column_names().collect();
    assert_eq!(names, ["userId", "firstName"]);
    assert_eq!(rows[0].get("firstName"), Some(&Value::from("Ada")));

    let sent = ndo.adapter().sent();
    assert_eq!(sent[0].0, "SELECT * FROM users as users WHERE (status = ?)");
    assert_eq!(sent[0].1, vec![Value::from("active")]);
}

#[tokio::test]
async fn find_applies_dialect_null_ordering() {
    let ndo = ndo(Scripted::default());
    ndo.find(qb::find("t").order_by("a")).await.unwrap();

    let sent = ndo.adapter().sent();
    assert_eq!(sent[0].0, "SELECT * FROM t as t ORDER BY a ASC NULLS FIRST");
}

#[tokio::test]
async fn find_one_limits_and_unwraps() {
    let adapter = Scripted::default().then(Ok(Response::Rows(vec![row(&[("id", Value::Int(9))])])));
    let ndo = ndo(adapter);

    let found = ndo.find_one(qb::find("t").eq("id", 9)).await.unwrap();
    assert_eq!(found.and_then(|r| r.into_first()), Some(Value::Int(9)));
    assert!(ndo.adapter().sent()[0].0.ends_with("LIMIT 1"));

    let missing = ndo.find_one(qb::find("t").eq("id", 10)).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn insert_returns_last_id() {
    let adapter = Scripted::default()
        .then(Ok(Response::Affected(1)))
        .then(Ok(Response::Rows(vec![row(&[("id", Value::Int(42))])])));
    let ndo = ndo(adapter);

    let id = ndo
        .insert(qb::insert("users").set("firstName", "Ada").call("createdAt", "NOW"))
        .await
        .unwrap();
    assert_eq!(id, Some(Value::Int(42)));

    let sent = ndo.adapter().sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, "INSERT INTO users (first_name, created_at) VALUES (?, NOW())");
    assert_eq!(sent[0].1.len(), 1);
    assert_eq!(
        sent[1].0,
        "SELECT currval(pg_get_serial_sequence('users','id')) as \"id\""
    );
}

#[tokio::test]
async fn insert_null_id_is_none() {
    let adapter = Scripted::default()
        .then(Ok(Response::Affected(1)))
        .then(Ok(Response::Rows(vec![row(&[("id", Value::Null)])])));
    let ndo = ndo(adapter);
    let id = ndo.insert(qb::insert("logs").set("msg", "x")).await.unwrap();
    assert_eq!(id, None);
}

#[tokio::test]
async fn insert_invalid_table_sends_nothing() {
    let ndo = ndo(Scripted::default());
    let err = ndo.insert(qb::insert("").set("a", 1)).await.unwrap_err();
    assert!(err.is_invalid_table());
    assert!(ndo.adapter().sent().is_empty());
}

#[tokio::test]
async fn mismatched_placeholders_are_never_sent() {
    let ndo = ndo(Scripted::default());
    let err = ndo
        .find(qb::find("t").compare("a", "BETWEEN ? AND ?", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, NdoError::Validation(_)));
    assert!(
        ndo.delete(qb::delete("t").compare_values("a", "IN (?, ?)", [1]))
            .await
            .is_err()
    );
    assert!(ndo.adapter().sent().is_empty());
}

#[tokio::test]
async fn delete_without_conditions_is_never_sent() {
    let ndo = ndo(Scripted::default());
    let affected = ndo.delete(qb::delete("users")).await.unwrap();
    assert_eq!(affected, 0);
    assert!(ndo.adapter().sent().is_empty());
}

#[tokio::test]
async fn update_and_delete_report_affected_rows() {
    let adapter = Scripted::default()
        .then(Ok(Response::Affected(3)))
        .then(Ok(Response::Affected(2)));
    let ndo = ndo(adapter);

    let updated = ndo
        .update(qb::update("users").set("status", "inactive").compare("age", "<", 18))
        .await
        .unwrap();
    assert_eq!(updated, 3);

    let deleted = ndo.delete(qb::delete("users").eq("status", "inactive")).await.unwrap();
    assert_eq!(deleted, 2);
}

#[tokio::test]
async fn raw_insert_uses_table_token_for_last_id() {
    let adapter = Scripted::default()
        .then(Ok(Response::Affected(1)))
        .then(Ok(Response::Rows(vec![row(&[("id", Value::Int(5))])])));
    let ndo = ndo(adapter);

    let outcome = ndo
        .execute("INSERT INTO tags (name) VALUES (?)", &[Value::from("rust")])
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::LastId(Some(Value::Int(5))));
    assert!(ndo.adapter().sent()[1].0.contains("'tags'"));
}

#[tokio::test]
async fn raw_blank_sql_is_rejected() {
    let ndo = ndo(Scripted::default());
    let err = ndo.execute("   ", &[]).await.unwrap_err();
    assert!(matches!(err, NdoError::EmptyStatement(_)));
    assert!(ndo.adapter().sent().is_empty());
}

#[tokio::test]
async fn driver_errors_surface_with_status() {
    let adapter = Scripted::default().then(Err(NdoError::Other("relation does not exist".into())));
    let ndo = ndo(adapter);

    let err = ndo.find(qb::find("missing")).await.unwrap_err();
    assert_eq!(err.status_code(), 500);
    assert!(err.to_string().contains("relation does not exist"));

    let err = err.with_status(404);
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn commit_and_rollback_pass_through() {
    let ndo = ndo(Scripted::default());
    ndo.commit().await.unwrap();
    ndo.rollback().await.unwrap();

    let sent: Vec<String> = ndo.adapter().sent().into_iter().map(|(sql, _)| sql).collect();
    assert_eq!(sent, ["COMMIT", "ROLLBACK"]);
}
