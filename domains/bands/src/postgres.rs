//! Postgres-backed band directory

use async_trait::async_trait;
use sqlx::PgPool;
use stagelink_common::Result;
use uuid::Uuid;

use crate::{BandDirectory, BandMembers};

#[derive(Clone)]
pub struct PgBandDirectory {
    pool: PgPool,
}

impl PgBandDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BandDirectory for PgBandDirectory {
    async fn get_band_members(&self, band_id: Uuid) -> Result<Option<BandMembers>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bands WHERE id = $1)",
        )
        .bind(band_id)
        .fetch_one(&self.pool)
        .await?;

        if !exists {
            return Ok(None);
        }

        let members = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT user_id
            FROM band_members
            WHERE band_id = $1
            ORDER BY joined_at ASC
            "#,
        )
        .bind(band_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(BandMembers { band_id, members }))
    }
}
