//! `SeaORM` Entity for policies table.

use brokerdesk_core::links::PolicyRef;
use brokerdesk_core::policy::Policy;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PolicyStatus, PolicyType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "policies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub agency_id: Uuid,
    pub client_id: Uuid,
    pub carrier: String,
    pub policy_number: String,
    pub policy_type: PolicyType,
    pub effective_date: Date,
    pub expiration_date: Date,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub premium: Decimal,
    #[sea_orm(column_type = "JsonBinary")]
    pub details: Json,
    pub status: PolicyStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Clients,
    #[sea_orm(has_many = "super::activities::Entity")]
    Activities,
    #[sea_orm(has_many = "super::documents::Entity")]
    Documents,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Activities.def()
    }
}

impl Related<super::documents::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The policy's id and owning client.
    pub const fn reference(&self) -> PolicyRef {
        PolicyRef {
            id: self.id,
            client_id: self.client_id,
        }
    }
}

impl From<Model> for Policy {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            client_id: model.client_id,
            carrier: model.carrier,
            policy_number: model.policy_number,
            policy_type: model.policy_type.into(),
            effective_date: model.effective_date,
            expiration_date: model.expiration_date,
            premium: model.premium,
            details: model.details,
            status: model.status.into(),
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        }
    }
}
