//! Query-building helpers shared by the repositories.

use brokerdesk_core::links::PolicyRef;
use brokerdesk_core::listing::SortOrder;
use sea_orm::sea_query::{Condition, Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

use crate::entities::{clients, policies};

/// `lower(column) LIKE pattern ESCAPE '\'`.
///
/// `pattern` must already be lowercased and escaped, see
/// [`brokerdesk_core::search::like_pattern`].
pub(crate) fn ilike<C: ColumnTrait>(column: C, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column))))
        .like(LikeExpr::new(pattern).escape('\\'))
}

/// Any of `columns` matches `pattern` case-insensitively.
pub(crate) fn any_ilike<C: ColumnTrait>(columns: &[C], pattern: &str) -> Condition {
    columns
        .iter()
        .fold(Condition::any(), |cond, column| cond.add(ilike(*column, pattern)))
}

pub(crate) const fn order(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

/// Returns true if the client exists in the agency.
pub(crate) async fn client_exists<C: ConnectionTrait>(
    db: &C,
    client_id: Uuid,
    agency_id: Uuid,
) -> Result<bool, DbErr> {
    let count = clients::Entity::find_by_id(client_id)
        .filter(clients::Column::AgencyId.eq(agency_id))
        .count(db)
        .await?;

    Ok(count > 0)
}

/// Looks up a policy in the agency and returns its owner.
pub(crate) async fn policy_ref<C: ConnectionTrait>(
    db: &C,
    policy_id: Uuid,
    agency_id: Uuid,
) -> Result<Option<PolicyRef>, DbErr> {
    let policy = policies::Entity::find_by_id(policy_id)
        .filter(policies::Column::AgencyId.eq(agency_id))
        .one(db)
        .await?;

    Ok(policy.map(|p| p.reference()))
}
