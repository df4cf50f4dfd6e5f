//! `SeaORM` Entity for activities table.

use brokerdesk_core::activity::Activity;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ActivityType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub agency_id: Uuid,
    pub activity_type: ActivityType,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub client_id: Option<Uuid>,
    pub policy_id: Option<Uuid>,
    pub due_date: Option<DateTimeWithTimeZone>,
    pub completed: bool,
    pub completed_at: Option<DateTimeWithTimeZone>,
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
    #[sea_orm(
        belongs_to = "super::policies::Entity",
        from = "Column::PolicyId",
        to = "super::policies::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Policies,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::policies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Policies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Activity {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            activity_type: model.activity_type.into(),
            description: model.description,
            client_id: model.client_id,
            policy_id: model.policy_id,
            due_date: model.due_date.map(|d| d.to_utc()),
            completed: model.completed,
            completed_at: model.completed_at.map(|d| d.to_utc()),
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        }
    }
}
