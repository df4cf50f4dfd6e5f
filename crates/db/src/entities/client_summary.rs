//! `SeaORM` Entity for the client_summary view.

use brokerdesk_core::client::{Client, ClientSummary};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "client_summary")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub agency_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub policy_count: i64,
    pub active_policies: i64,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_premium: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ClientSummary {
    fn from(model: Model) -> Self {
        Self {
            client: Client {
                id: model.id,
                first_name: model.first_name,
                last_name: model.last_name,
                email: model.email,
                phone: model.phone,
                address: model.address,
                notes: model.notes,
                created_at: model.created_at.to_utc(),
                updated_at: model.updated_at.to_utc(),
            },
            policy_count: model.policy_count,
            active_policies: model.active_policies,
            total_premium: model.total_premium,
        }
    }
}
