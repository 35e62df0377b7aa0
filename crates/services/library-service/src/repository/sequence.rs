//! Identity sequences of the relational tables.

use sea_orm::{ConnectionTrait, DatabaseBackend, DbErr, EntityName, EntityTrait, Statement};

use domain::EntityId;

/// Move the `id` sequence of `E`'s table past an explicitly inserted `id`.
///
/// Postgres leaves a serial sequence alone when a row is inserted with an
/// explicit key, so the next generated key could collide with it. The
/// sequence only ever moves forward.
pub(crate) async fn advance_id_sequence<E, C>(conn: &C, id: EntityId) -> Result<(), DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let backend = conn.get_database_backend();
    if backend != DatabaseBackend::Postgres {
        return Ok(());
    }

    let table = E::default().table_name().to_string();
    let sql = format!(
        "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
         GREATEST(nextval(pg_get_serial_sequence('{table}', 'id')), $1))"
    );
    conn.execute(Statement::from_sql_and_values(backend, sql, [id.into()]))
        .await?;
    tracing::debug!(table = %table, id, "Advanced id sequence");
    Ok(())
}
