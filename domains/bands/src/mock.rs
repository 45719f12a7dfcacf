//! Mock band directory
//!
//! In-memory roster map used by unit and integration tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use stagelink_common::Result;
use uuid::Uuid;

use crate::{BandDirectory, BandMembers};

/// Mock band directory backed by a roster map
#[derive(Debug, Default)]
pub struct MockBandDirectory {
    rosters: RwLock<HashMap<Uuid, Vec<Uuid>>>,
}

impl MockBandDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a band with the given member ids, replacing any prior roster
    pub fn insert_band(&self, band_id: Uuid, members: Vec<Uuid>) {
        self.rosters
            .write()
            .expect("roster lock poisoned")
            .insert(band_id, members);
    }
}

#[async_trait]
impl BandDirectory for MockBandDirectory {
    async fn get_band_members(&self, band_id: Uuid) -> Result<Option<BandMembers>> {
        let rosters = self.rosters.read().expect("roster lock poisoned");
        Ok(rosters
            .get(&band_id)
            .map(|members| BandMembers {
                band_id,
                members: members.clone(),
            }))
    }
}
