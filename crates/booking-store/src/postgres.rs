use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Booking, BookingId, BookingQuery, BookingRepository, CustomerId, Money, Result, SalonId,
    ServiceId, StoreError,
};

const SELECT_COLUMNS: &str = "SELECT id, customer_id, salon_id, service_ids, start_time, end_time, \
     total_price, payment_method, status, payment_status, created_at, updated_at FROM bookings";

/// PostgreSQL-backed booking repository.
#[derive(Clone)]
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url` and wraps the resulting pool.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_booking(row: PgRow) -> Result<Booking> {
        let service_ids: Vec<Uuid> = row.try_get("service_ids")?;
        let payment_method: String = row.try_get("payment_method")?;
        let status: String = row.try_get("status")?;
        let payment_status: String = row.try_get("payment_status")?;

        Ok(Booking {
            id: BookingId::from_uuid(row.try_get::<Uuid, _>("id")?),
            customer_id: CustomerId::from_uuid(row.try_get::<Uuid, _>("customer_id")?),
            salon_id: SalonId::from_uuid(row.try_get::<Uuid, _>("salon_id")?),
            service_ids: service_ids
                .into_iter()
                .map(ServiceId::from_uuid)
                .collect::<BTreeSet<_>>(),
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            total_price: Money::new(row.try_get("total_price")?),
            payment_method: payment_method.parse().map_err(StoreError::InvalidRow)?,
            status: status.parse().map_err(StoreError::InvalidRow)?,
            payment_status: payment_status.parse().map_err(StoreError::InvalidRow)?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn service_uuids(booking: &Booking) -> Vec<Uuid> {
        booking.service_ids.iter().map(ServiceId::as_uuid).collect()
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    #[tracing::instrument(skip(self, booking), fields(booking_id = %booking.id))]
    async fn insert(&self, booking: &Booking) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if booking.status.holds_slot() {
            // Serializes inserts per salon until the transaction ends.
            sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
                .bind(booking.salon_id.to_string())
                .execute(&mut *tx)
                .await?;

            let conflicting: Option<Uuid> = sqlx::query_scalar(
                r#"
                SELECT id FROM bookings
                WHERE salon_id = $1 AND id <> $2 AND status <> 'CANCELLED'
                  AND start_time < $4 AND $3 < end_time
                ORDER BY start_time
                LIMIT 1
                "#,
            )
            .bind(booking.salon_id.as_uuid())
            .bind(booking.id.as_uuid())
            .bind(booking.start_time)
            .bind(booking.end_time)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(conflicting) = conflicting {
                return Err(StoreError::SlotTaken {
                    salon_id: booking.salon_id,
                    start: booking.start_time,
                    conflicting: BookingId::from_uuid(conflicting),
                });
            }
        }

        sqlx::query(
            r#"
            INSERT INTO bookings (id, customer_id, salon_id, service_ids, start_time, end_time,
                                  total_price, payment_method, status, payment_status,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.customer_id.as_uuid())
        .bind(booking.salon_id.as_uuid())
        .bind(Self::service_uuids(booking))
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.total_price.amount())
        .bind(booking.payment_method.as_str())
        .bind(booking.status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("bookings_pkey")
            {
                return StoreError::Duplicate(booking.id);
            }
            StoreError::Database(e)
        })?;

        tx.commit().await?;

        metrics::counter!("booking_store_inserts_total").increment(1);
        Ok(())
    }

    #[tracing::instrument(skip(self, booking), fields(booking_id = %booking.id))]
    async fn update(&self, booking: &Booking) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET customer_id = $2, salon_id = $3, service_ids = $4, start_time = $5,
                end_time = $6, total_price = $7, payment_method = $8, status = $9,
                payment_status = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.customer_id.as_uuid())
        .bind(booking.salon_id.as_uuid())
        .bind(Self::service_uuids(booking))
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.total_price.amount())
        .bind(booking.payment_method.as_str())
        .bind(booking.status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(booking.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        let row: Option<PgRow> = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_booking).transpose()
    }

    async fn find(&self, query: BookingQuery) -> Result<Vec<Booking>> {
        let mut sql = format!("{SELECT_COLUMNS} WHERE 1=1");
        let mut param_count = 0;

        // Build dynamic query
        if query.customer_id.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND customer_id = ${param_count}"));
        }
        if query.salon_id.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND salon_id = ${param_count}"));
        }
        if query.starts_from.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND start_time >= ${param_count}"));
        }
        if query.starts_before.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND start_time < ${param_count}"));
        }
        if query.statuses.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND status = ANY(${param_count})"));
        }

        sql.push_str(" ORDER BY start_time ASC, created_at ASC");

        if query.limit.is_some() {
            param_count += 1;
            sql.push_str(&format!(" LIMIT ${param_count}"));
        }

        let mut sqlx_query = sqlx::query(&sql);

        if let Some(id) = query.customer_id {
            sqlx_query = sqlx_query.bind(id.as_uuid());
        }
        if let Some(id) = query.salon_id {
            sqlx_query = sqlx_query.bind(id.as_uuid());
        }
        if let Some(from) = query.starts_from {
            sqlx_query = sqlx_query.bind(from);
        }
        if let Some(before) = query.starts_before {
            sqlx_query = sqlx_query.bind(before);
        }
        if let Some(statuses) = query.statuses {
            let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();
            sqlx_query = sqlx_query.bind(statuses);
        }
        if let Some(limit) = query.limit {
            sqlx_query = sqlx_query.bind(limit as i64);
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_booking).collect()
    }
}
