//! Agency repository.

use brokerdesk_core::renewal::{TimezoneCache, parse_timezone};
use chrono::Utc;
use chrono_tz::Tz;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use uuid::Uuid;

use crate::entities::agencies;

/// Agency (tenant) repository.
#[derive(Debug, Clone)]
pub struct AgencyRepository {
    db: DatabaseConnection,
}

impl AgencyRepository {
    /// Creates a new agency repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an agency by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<agencies::Model>, DbErr> {
        agencies::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates an agency with a fixed ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        id: Uuid,
        name: &str,
        timezone: &str,
    ) -> Result<agencies::Model, DbErr> {
        let now = Utc::now().into();
        agencies::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            timezone: Set(timezone.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// The agency's time zone, through the cache.
    ///
    /// Unknown agencies and unrecognised zone names resolve to UTC.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn timezone(&self, agency_id: Uuid, cache: &TimezoneCache) -> Result<Tz, DbErr> {
        if let Some(tz) = cache.get(agency_id) {
            return Ok(tz);
        }

        let tz = self
            .find_by_id(agency_id)
            .await?
            .map_or(Tz::UTC, |agency| parse_timezone(&agency.timezone));

        cache.insert(agency_id, tz);
        Ok(tz)
    }
}
