use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

use slotkeeper_core::booking::{Booking, BookingStatus};
use slotkeeper_core::ids::{BookingId, ProviderId};
use slotkeeper_ports::error::PortError;
use slotkeeper_ports::outbound::BookingRepository;
use slotkeeper_ports::types::BookingFilter;

use super::SqliteDb;

const DEFAULT_PER_PAGE: u32 = 50;

/// True when another active booking of the same provider overlaps
/// `[start_time, end_time)` on `date`. Binds: provider, date, id, three active
/// statuses, end, start.
const OVERLAP_EXISTS: &str = "EXISTS (
    SELECT 1 FROM bookings other
    WHERE other.provider_id = ? AND other.date = ? AND other.id != ?
      AND other.status IN (?, ?, ?)
      AND other.start_time < ? AND ? < other.end_time
)";

fn encode(booking: &Booking) -> Result<String, PortError> {
    serde_json::to_string(booking).map_err(|e| PortError::Persistence(e.to_string()))
}

fn decode(rows: Vec<(String,)>) -> Result<Vec<Booking>, PortError> {
    rows.into_iter()
        .map(|(data,)| {
            serde_json::from_str(&data).map_err(|e| PortError::Persistence(e.to_string()))
        })
        .collect()
}

/// Appends the binds for [`OVERLAP_EXISTS`] plus whether the check applies.
/// Bookings leaving the active set never collide.
fn bind_overlap<'q>(
    query: sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>,
    booking: &Booking,
) -> sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>> {
    let [a, b, c] = BookingStatus::ACTIVE;
    query
        .bind(booking.status().is_active())
        .bind(booking.provider_id().to_string())
        .bind(booking.date().to_string())
        .bind(booking.id().to_string())
        .bind(a.as_str())
        .bind(b.as_str())
        .bind(c.as_str())
        .bind(booking.end().to_string())
        .bind(booking.start().to_string())
}

#[async_trait]
impl BookingRepository for SqliteDb {
    async fn create(&self, booking: &Booking) -> Result<(), PortError> {
        let data = encode(booking)?;

        let sql = format!(
            "INSERT INTO bookings
                (id, provider_id, client_id, date, start_time, end_time, status, data, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE NOT (? AND {OVERLAP_EXISTS})"
        );
        let query = sqlx::query(&sql)
            .bind(booking.id().to_string())
            .bind(booking.provider_id().to_string())
            .bind(booking.client_id().to_string())
            .bind(booking.date().to_string())
            .bind(booking.start().to_string())
            .bind(booking.end().to_string())
            .bind(booking.status().as_str())
            .bind(&data)
            .bind(booking.created_at().to_rfc3339());

        let result = bind_overlap(query, booking)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PortError::SlotTaken);
        }
        Ok(())
    }

    async fn save(&self, booking: &Booking) -> Result<(), PortError> {
        let data = encode(booking)?;

        let sql = format!(
            "UPDATE bookings SET date = ?, start_time = ?, end_time = ?, status = ?, data = ?
             WHERE id = ? AND NOT (? AND {OVERLAP_EXISTS})"
        );
        let query = sqlx::query(&sql)
            .bind(booking.date().to_string())
            .bind(booking.start().to_string())
            .bind(booking.end().to_string())
            .bind(booking.status().as_str())
            .bind(&data)
            .bind(booking.id().to_string());

        let result = bind_overlap(query, booking)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        if result.rows_affected() == 0 {
            let exists: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM bookings WHERE id = ?")
                .bind(booking.id().to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;
            return Err(match exists {
                Some(_) => PortError::SlotTaken,
                None => PortError::NotFound,
            });
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, PortError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT data FROM bookings WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        match row {
            Some((data,)) => {
                let booking: Booking = serde_json::from_str(&data)
                    .map_err(|e| PortError::Persistence(e.to_string()))?;
                Ok(Some(booking))
            }
            None => Ok(None),
        }
    }

    async fn active_on_date(
        &self,
        provider_id: &ProviderId,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, PortError> {
        let [a, b, c] = BookingStatus::ACTIVE;
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT data FROM bookings
             WHERE provider_id = ? AND date = ? AND status IN (?, ?, ?)
             ORDER BY start_time",
        )
        .bind(provider_id.to_string())
        .bind(date.to_string())
        .bind(a.as_str())
        .bind(b.as_str())
        .bind(c.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        decode(rows)
    }

    async fn find_by_filter(&self, filter: &BookingFilter) -> Result<Vec<Booking>, PortError> {
        let mut sql = String::from("SELECT data FROM bookings WHERE 1=1");
        let mut binds: Vec<String> = Vec::new();

        if let Some(provider_id) = &filter.provider_id {
            sql.push_str(" AND provider_id = ?");
            binds.push(provider_id.to_string());
        }
        if let Some(client_id) = &filter.client_id {
            sql.push_str(" AND client_id = ?");
            binds.push(client_id.to_string());
        }
        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            binds.push(status.as_str().to_string());
        }

        sql.push_str(" ORDER BY date DESC, start_time DESC");

        let per_page = if filter.per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            filter.per_page
        };
        let offset = u64::from(filter.page.saturating_sub(1)) * u64::from(per_page);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        sql.push_str(&format!(" LIMIT {per_page} OFFSET {offset}"));

        let mut query = sqlx::query_as::<_, (String,)>(&sql);
        for b in &binds {
            query = query.bind(b);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        decode(rows)
    }
}
