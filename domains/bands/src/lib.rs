//! Band directory: membership lookup consumed by the chat core
//!
//! The booking, offer, and profile sides of the marketplace own band data;
//! the chat core only needs to answer "who are the members of band X" for
//! band-side authorization. This crate exposes that single concern as a
//! trait with a Postgres implementation and an in-memory mock for tests.

pub mod mock;
pub mod postgres;

use async_trait::async_trait;
use stagelink_common::Result;
use uuid::Uuid;

pub use mock::MockBandDirectory;
pub use postgres::PgBandDirectory;

/// Membership roster for one band
#[derive(Debug, Clone, PartialEq)]
pub struct BandMembers {
    pub band_id: Uuid,
    pub members: Vec<Uuid>,
}

impl BandMembers {
    /// True iff the given account is a member of this band
    pub fn contains(&self, member_id: Uuid) -> bool {
        self.members.contains(&member_id)
    }
}

/// Membership lookup contract.
///
/// `get_band_members` returns `None` when the band does not exist; an empty
/// roster is a valid answer for an existing band with no members yet.
#[async_trait]
pub trait BandDirectory: Send + Sync {
    async fn get_band_members(&self, band_id: Uuid) -> Result<Option<BandMembers>>;
}
