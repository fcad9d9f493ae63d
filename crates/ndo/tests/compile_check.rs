//! Compile-only checks: every supported connection type plugs into `Ndo`.

#![allow(dead_code)]

use ndo::{NdoConfig, NdoResult, Ndo, PgAdapter, qb};

async fn _client_compiles(client: tokio_postgres::Client) -> NdoResult<()> {
    let ndo = Ndo::new(PgAdapter::new(client));
    ndo.find(qb::find("users").eq("id", 1)).await?;
    Ok(())
}

async fn _transaction_compiles(client: &mut tokio_postgres::Client) -> NdoResult<()> {
    let tx = client.transaction().await?;
    let ndo = Ndo::with_config(PgAdapter::new(tx), NdoConfig::from_env());
    ndo.insert(qb::insert("users").set("name", "Ada")).await?;
    let tx = ndo.into_inner().into_inner();
    tx.commit().await?;
    Ok(())
}

#[cfg(feature = "pool")]
async fn _pool_client_compiles(pool: deadpool_postgres::Pool) -> NdoResult<()> {
    let client = pool.get().await?;
    let ndo = Ndo::new(PgAdapter::new(client));
    ndo.delete(qb::delete("sessions").eq("user_id", 1)).await?;
    Ok(())
}

#[cfg(feature = "hana")]
async fn _hana_compiles(conn: hdbconnect::Connection) -> NdoResult<()> {
    let ndo = Ndo::new(ndo::HanaAdapter::new(conn));
    ndo.update(qb::update("USERS").set("status", "x").eq("id", 1)).await?;
    ndo.commit().await?;
    Ok(())
}

fn _futures_are_send() {
    fn assert_send<T: Send>(_: T) {}
    fn check(ndo: &Ndo<PgAdapter<tokio_postgres::Client>>) {
        assert_send(ndo.find(qb::find("t")));
        assert_send(ndo.execute("SELECT 1", &[]));
    }
    let _ = check;
}
