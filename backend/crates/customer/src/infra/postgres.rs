//! PostgreSQL Repository Implementation

use kernel::id::ClientDataId;
use sqlx::PgPool;

use crate::domain::client_data::{ClientData, NewClientData};
use crate::domain::repository::ClientDataRepository;
use crate::domain::value_object::{ContactEmail, Uid};
use crate::error::CustomerResult;

/// PostgreSQL-backed client data repository
#[derive(Clone)]
pub struct PgClientDataRepository {
    pool: PgPool,
}

impl PgClientDataRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ClientDataRepository for PgClientDataRepository {
    async fn find_by_uid(&self, uid: &Uid) -> CustomerResult<Option<ClientData>> {
        let row = sqlx::query_as::<_, ClientDataRow>(
            r#"
            SELECT id, uid, email, image, coupon_used
            FROM client_data
            WHERE uid = $1
            "#,
        )
        .bind(uid.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ClientDataRow::into_client))
    }

    async fn create_if_absent(&self, data: &NewClientData) -> CustomerResult<(ClientData, bool)> {
        let inserted = sqlx::query_as::<_, ClientDataRow>(
            r#"
            INSERT INTO client_data (uid, email, image, coupon_used)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (uid) DO NOTHING
            RETURNING id, uid, email, image, coupon_used
            "#,
        )
        .bind(data.uid.as_str())
        .bind(data.email.as_ref().map(ContactEmail::as_str))
        .bind(data.image.as_deref())
        .bind(data.coupon_used)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok((row.into_client(), true));
        }

        // Lost a race with a concurrent first visit.
        let existing = self
            .find_by_uid(&data.uid)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok((existing, false))
    }

    async fn upsert(&self, data: &NewClientData) -> CustomerResult<ClientData> {
        let row = sqlx::query_as::<_, ClientDataRow>(
            r#"
            INSERT INTO client_data (uid, email, image, coupon_used)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (uid) DO UPDATE SET
                email = EXCLUDED.email,
                image = COALESCE(EXCLUDED.image, client_data.image),
                coupon_used = EXCLUDED.coupon_used
            RETURNING id, uid, email, image, coupon_used
            "#,
        )
        .bind(data.uid.as_str())
        .bind(data.email.as_ref().map(ContactEmail::as_str))
        .bind(data.image.as_deref())
        .bind(data.coupon_used)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_client())
    }

    async fn set_coupon_used(&self, uid: &Uid, used: bool) -> CustomerResult<bool> {
        let updated = sqlx::query("UPDATE client_data SET coupon_used = $2 WHERE uid = $1")
            .bind(uid.as_str())
            .bind(used)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(updated > 0)
    }

    async fn claim_coupon(&self, uid: &Uid) -> CustomerResult<bool> {
        let claimed = sqlx::query(
            "UPDATE client_data SET coupon_used = TRUE WHERE uid = $1 AND NOT coupon_used",
        )
        .bind(uid.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(claimed > 0)
    }

    async fn set_image(&self, uid: &Uid, image: &[u8]) -> CustomerResult<bool> {
        let updated = sqlx::query("UPDATE client_data SET image = $2 WHERE uid = $1")
            .bind(uid.as_str())
            .bind(image)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(updated > 0)
    }
}

#[derive(sqlx::FromRow)]
struct ClientDataRow {
    id: i64,
    uid: String,
    email: Option<String>,
    image: Option<Vec<u8>>,
    coupon_used: bool,
}

impl ClientDataRow {
    fn into_client(self) -> ClientData {
        ClientData {
            id: ClientDataId::from_db(self.id),
            uid: Uid::from_db(self.uid),
            email: self.email.map(ContactEmail::from_db),
            image: self.image,
            coupon_used: self.coupon_used,
        }
    }
}
