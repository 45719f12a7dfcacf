//! Postgres-backed conversation store
//!
//! Runtime-checked queries; the database's own uniqueness and foreign-key
//! constraints arbitrate concurrent writes, surfaced to callers as the
//! contract's soft-fail `None` results.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use stagelink_common::Result;
use uuid::Uuid;

use crate::domain::entities::{BookingDetails, Conversation, Message, StoredMessage};
use crate::domain::ids::{BandRef, ConversationId, UserRef};
use crate::domain::views::{BandSummary, ConversationSummary, ConversationView, UserSummary};
use crate::repository::ConversationStore;

#[derive(Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn messages_for(&self, conversation_id: Uuid) -> Result<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, sender_id, recipient_id, content, booking, sent_at, is_read
            FROM messages
            WHERE conversation_id = $1
            ORDER BY sent_at ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MessageRow::into_message).collect()
    }
}

/// Row shape of the messages table
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    sender_id: Uuid,
    recipient_id: Uuid,
    content: Option<String>,
    booking: Option<Json<BookingDetails>>,
    sent_at: DateTime<Utc>,
    is_read: bool,
}

impl MessageRow {
    /// Rebuild the entity, re-checking the content invariant
    fn into_message(self) -> Result<Message> {
        let message = Message::from_stored(StoredMessage {
            id: self.id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            content: self.content,
            booking: self.booking.map(|j| j.0),
            sent_at: self.sent_at,
            is_read: self.is_read,
        })?;
        Ok(message)
    }
}

/// Row shape of the conversations table
#[derive(Debug, sqlx::FromRow)]
struct ConversationRow {
    id: Uuid,
    user_id: Uuid,
    band_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationRow {
    fn into_conversation(self, messages: Vec<Message>) -> Conversation {
        Conversation {
            id: ConversationId::from_uuid(self.id),
            user_id: UserRef::from_uuid(self.user_id),
            band_id: BandRef::from_uuid(self.band_id),
            messages,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Conversation joined with both participant summaries
#[derive(Debug, sqlx::FromRow)]
struct ViewRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_id: Uuid,
    user_first_name: String,
    user_family_name: String,
    user_image_url: Option<String>,
    band_id: Uuid,
    band_name: String,
    band_image_url: Option<String>,
}

impl ViewRow {
    fn user_summary(&self) -> UserSummary {
        UserSummary {
            id: self.user_id,
            first_name: self.user_first_name.clone(),
            family_name: self.user_family_name.clone(),
            image_url: self.user_image_url.clone(),
        }
    }

    fn band_summary(&self) -> BandSummary {
        BandSummary {
            id: self.band_id,
            name: self.band_name.clone(),
            image_url: self.band_image_url.clone(),
        }
    }
}

/// Listing row: participants plus the most recent message, if any
#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user_id: Uuid,
    user_first_name: String,
    user_family_name: String,
    user_image_url: Option<String>,
    band_id: Uuid,
    band_name: String,
    band_image_url: Option<String>,
    last_message_id: Option<Uuid>,
    last_sender_id: Option<Uuid>,
    last_recipient_id: Option<Uuid>,
    last_content: Option<String>,
    last_booking: Option<Json<BookingDetails>>,
    last_sent_at: Option<DateTime<Utc>>,
    last_is_read: Option<bool>,
}

impl SummaryRow {
    fn into_summary(self) -> Result<ConversationSummary> {
        let last_message = match self.last_message_id {
            Some(id) => Some(Message::from_stored(StoredMessage {
                id,
                sender_id: self.last_sender_id.unwrap_or_default(),
                recipient_id: self.last_recipient_id.unwrap_or_default(),
                content: self.last_content,
                booking: self.last_booking.map(|j| j.0),
                sent_at: self.last_sent_at.unwrap_or_else(Utc::now),
                is_read: self.last_is_read.unwrap_or(false),
            })?),
            None => None,
        };

        Ok(ConversationSummary {
            id: ConversationId::from_uuid(self.id),
            user: UserSummary {
                id: self.user_id,
                first_name: self.user_first_name,
                family_name: self.user_family_name,
                image_url: self.user_image_url,
            },
            band: BandSummary {
                id: self.band_id,
                name: self.band_name,
                image_url: self.band_image_url,
            },
            last_message,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SUMMARY_QUERY: &str = r#"
    SELECT c.id, c.created_at, c.updated_at,
           u.id AS user_id, u.first_name AS user_first_name,
           u.family_name AS user_family_name, u.image_url AS user_image_url,
           b.id AS band_id, b.name AS band_name, b.image_url AS band_image_url,
           m.id AS last_message_id, m.sender_id AS last_sender_id,
           m.recipient_id AS last_recipient_id, m.content AS last_content,
           m.booking AS last_booking, m.sent_at AS last_sent_at,
           m.is_read AS last_is_read
    FROM conversations c
    JOIN users u ON u.id = c.user_id
    JOIN bands b ON b.id = c.band_id
    LEFT JOIN LATERAL (
        SELECT id, sender_id, recipient_id, content, booking, sent_at, is_read
        FROM messages
        WHERE conversation_id = c.id
        ORDER BY sent_at DESC
        LIMIT 1
    ) m ON TRUE
"#;

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn create(&self, conversation: &Conversation) -> Result<Option<Conversation>> {
        let result = sqlx::query_as::<_, ConversationRow>(
            r#"
            INSERT INTO conversations (id, user_id, band_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, band_id, created_at, updated_at
            "#,
        )
        .bind(conversation.id.as_uuid())
        .bind(conversation.user_id.as_uuid())
        .bind(conversation.band_id.as_uuid())
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(Some(row.into_conversation(Vec::new()))),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn append_message(
        &self,
        conversation_id: ConversationId,
        message: &Message,
        mark_read_on_arrival: bool,
    ) -> Result<Option<Message>> {
        let is_read = message.is_read || mark_read_on_arrival;

        let result = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (
                id, conversation_id, sender_id, recipient_id,
                content, booking, sent_at, is_read
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, sender_id, recipient_id, content, booking, sent_at, is_read
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(conversation_id.as_uuid())
        .bind(message.sender_id)
        .bind(message.recipient_id)
        .bind(&message.content)
        .bind(message.booking.clone().map(Json))
        .bind(message.sent_at)
        .bind(is_read)
        .fetch_one(&self.pool)
        .await;

        let row = match result {
            Ok(row) => row,
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Appending counts as activity for recency ordering
        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(conversation_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(Some(row.into_message()?))
    }

    async fn mark_read(&self, conversation_id: ConversationId, reader_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE messages
            SET is_read = TRUE
            WHERE conversation_id = $1 AND recipient_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(conversation_id.as_uuid())
        .bind(reader_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(&self, id: ConversationId) -> Result<Option<Conversation>> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, user_id, band_id, created_at, updated_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let messages = self.messages_for(row.id).await?;
        Ok(Some(row.into_conversation(messages)))
    }

    async fn get_view(&self, id: ConversationId) -> Result<Option<ConversationView>> {
        let row = sqlx::query_as::<_, ViewRow>(
            r#"
            SELECT c.id, c.created_at, c.updated_at,
                   u.id AS user_id, u.first_name AS user_first_name,
                   u.family_name AS user_family_name, u.image_url AS user_image_url,
                   b.id AS band_id, b.name AS band_name, b.image_url AS band_image_url
            FROM conversations c
            JOIN users u ON u.id = c.user_id
            JOIN bands b ON b.id = c.band_id
            WHERE c.id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let messages = self.messages_for(row.id).await?;

        Ok(Some(ConversationView {
            id: ConversationId::from_uuid(row.id),
            user: row.user_summary(),
            band: row.band_summary(),
            messages,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }))
    }

    async fn get_by_participants(
        &self,
        user_id: UserRef,
        band_id: BandRef,
    ) -> Result<Option<Conversation>> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, user_id, band_id, created_at, updated_at
            FROM conversations
            WHERE user_id = $1 AND band_id = $2
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(band_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let messages = self.messages_for(row.id).await?;
        Ok(Some(row.into_conversation(messages)))
    }

    async fn list_for_user(&self, user_id: UserRef) -> Result<Vec<ConversationSummary>> {
        let query = format!("{SUMMARY_QUERY} WHERE c.user_id = $1 ORDER BY c.updated_at DESC");
        let rows = sqlx::query_as::<_, SummaryRow>(&query)
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(SummaryRow::into_summary).collect()
    }

    async fn list_for_band(&self, band_id: BandRef) -> Result<Vec<ConversationSummary>> {
        let query = format!("{SUMMARY_QUERY} WHERE c.band_id = $1 ORDER BY c.updated_at DESC");
        let rows = sqlx::query_as::<_, SummaryRow>(&query)
            .bind(band_id.as_uuid())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(SummaryRow::into_summary).collect()
    }

    async fn delete(&self, id: ConversationId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
