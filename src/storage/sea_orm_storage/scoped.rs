//! 租户范围查询辅助
//!
//! 学校级实体统一带 organization_id / school_id，多数还带 deleted_at。
//! 这里集中生成带范围过滤的查询，避免每个仓储方法各写一遍。

use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    Select, SqlErr,
};

use crate::errors::{NazimError, Result};
use crate::models::{PaginatedResponse, PaginationInfo, PaginationQuery, TenantScope};
use crate::utils::escape_like_pattern;

/// 带租户列的实体
pub(crate) trait TenantEntity: EntityTrait {
    fn organization_column() -> Self::Column;
    fn school_column() -> Self::Column;
    fn id_column() -> Self::Column;
    /// 无 deleted_at 的表返回 None，删除时物理删除
    fn deleted_column() -> Option<Self::Column>;
}

macro_rules! tenant_entity {
    (@impl $module:ident, $deleted:expr) => {
        impl TenantEntity for crate::entity::$module::Entity {
            fn organization_column() -> Self::Column {
                crate::entity::$module::Column::OrganizationId
            }

            fn school_column() -> Self::Column {
                crate::entity::$module::Column::SchoolId
            }

            fn id_column() -> Self::Column {
                crate::entity::$module::Column::Id
            }

            fn deleted_column() -> Option<Self::Column> {
                $deleted
            }
        }
    };
    (soft: $($module:ident),+ $(,)?) => {
        $(tenant_entity!(@impl $module, Some(crate::entity::$module::Column::DeletedAt));)+
    };
    (hard: $($module:ident),+ $(,)?) => {
        $(tenant_entity!(@impl $module, None);)+
    };
}

tenant_entity!(soft:
    academic_years,
    announcements,
    buildings,
    classes,
    donations,
    events,
    exams,
    fee_assignments,
    fee_exceptions,
    fee_payments,
    fee_structures,
    hostel_allocations,
    hostel_rooms,
    library_books,
    library_loans,
    rooms,
    staff,
    students,
    subjects,
    teacher_preferences,
    timetables,
);

tenant_entity!(hard: attendance_records, exam_results);

/// 当前 Unix 秒
pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// 限定在租户范围内且未删除的查询
pub(crate) fn scoped<E: TenantEntity>(scope: &TenantScope) -> Select<E> {
    let select = E::find()
        .filter(E::organization_column().eq(scope.organization_id))
        .filter(E::school_column().eq(scope.school_id));
    match E::deleted_column() {
        Some(deleted) => select.filter(deleted.is_null()),
        None => select,
    }
}

/// 按 ID 查询租户范围内的记录
pub(crate) async fn find_scoped<E, C>(
    db: &C,
    scope: &TenantScope,
    id: i64,
) -> Result<Option<E::Model>>
where
    E: TenantEntity,
    C: ConnectionTrait,
{
    Ok(scoped::<E>(scope)
        .filter(E::id_column().eq(id))
        .one(db)
        .await?)
}

/// 删除租户范围内的记录：有 deleted_at 列时软删除，否则物理删除
pub(crate) async fn delete_scoped<E, C>(db: &C, scope: &TenantScope, id: i64) -> Result<bool>
where
    E: TenantEntity,
    C: ConnectionTrait,
{
    let tenant = Condition::all()
        .add(E::id_column().eq(id))
        .add(E::organization_column().eq(scope.organization_id))
        .add(E::school_column().eq(scope.school_id));

    let rows_affected = match E::deleted_column() {
        Some(deleted) => {
            E::update_many()
                .col_expr(deleted, Expr::value(now()))
                .filter(tenant)
                .filter(deleted.is_null())
                .exec(db)
                .await?
                .rows_affected
        }
        None => E::delete_many().filter(tenant).exec(db).await?.rows_affected,
    };

    Ok(rows_affected > 0)
}

/// 分页查询并转换为业务实体
pub(crate) async fn fetch_page<'db, E, C, T, F>(
    select: Select<E>,
    db: &'db C,
    pagination: &PaginationQuery,
    map: F,
) -> Result<PaginatedResponse<T>>
where
    E: EntityTrait,
    E::Model: Sync + 'db,
    C: ConnectionTrait,
    T: ts_rs::TS + Send,
    F: Fn(E::Model) -> T + Send,
{
    let (page, size) = pagination.normalized();
    let paginator = select.paginate(db, size);
    let total = paginator.num_items().await?;
    let models = paginator.fetch_page(page - 1).await?;

    Ok(PaginatedResponse {
        items: models.into_iter().map(map).collect(),
        pagination: PaginationInfo::new(page, size, total, total.div_ceil(size)),
    })
}

/// 多列模糊搜索，搜索词为空时返回 None
pub(crate) fn search_condition<C>(search: Option<&str>, columns: &[C]) -> Option<Condition>
where
    C: ColumnTrait,
{
    let term = search.map(str::trim).filter(|s| !s.is_empty())?;
    let escaped = escape_like_pattern(term);
    Some(
        columns
            .iter()
            .fold(Condition::any(), |cond, col| cond.add(col.contains(&escaped))),
    )
}

/// 唯一约束冲突
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// 关联记录必须存在于同一租户内
pub(crate) async fn ensure_scoped<E, C>(
    db: &C,
    scope: &TenantScope,
    id: i64,
    label: &str,
) -> Result<E::Model>
where
    E: TenantEntity,
    C: ConnectionTrait,
{
    find_scoped::<E, C>(db, scope, id)
        .await?
        .ok_or_else(|| NazimError::validation(format!("{label} {id} does not exist in this school")))
}
