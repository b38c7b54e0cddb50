//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 每个业务域一个文件，直接为 `SeaOrmStorage` 实现对应的存储子 trait。

mod academic;
mod activity_logs;
mod attendance;
mod communications;
mod donations;
mod exams;
mod fees;
mod files;
mod hostel;
mod library;
mod organizations;
mod schools;
mod scoped;
mod staff;
mod students;
mod timetables;
mod users;

use crate::config::AppConfig;
use crate::errors::{NazimError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| NazimError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite，测试专用
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        // 内存库每个连接相互独立，只能用单连接
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .map_err(|e| NazimError::database_connection(format!("SQLite 连接失败: {e}")))?;
        Migrator::up(&db, None)
            .await
            .map_err(|e| NazimError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| NazimError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| NazimError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| NazimError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(NazimError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 存储测试共用的种子数据
#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::academic::CreateClassRequest;
    use crate::models::organizations::CreateOrganizationRequest;
    use crate::models::schools::CreateSchoolRequest;
    use crate::models::staff::CreateStaffRequest;
    use crate::models::students::{CreateStudentRequest, Gender, Student};
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::models::{OrgScope, TenantScope};
    use crate::storage::prelude::*;

    pub(crate) async fn seed_org(storage: &SeaOrmStorage, slug: &str) -> OrgScope {
        let org = storage
            .create_organization(CreateOrganizationRequest {
                name: format!("Org {slug}"),
                slug: slug.to_string(),
                email: None,
                phone: None,
                address: None,
            })
            .await
            .unwrap();
        OrgScope {
            organization_id: org.id,
        }
    }

    /// 新建组织及其下一所学校
    pub(crate) async fn seed_school(storage: &SeaOrmStorage, slug: &str) -> TenantScope {
        let org = seed_org(storage, slug).await;
        let school = storage
            .create_school(
                &org,
                CreateSchoolRequest {
                    name: format!("School {slug}"),
                    code: slug.to_uppercase(),
                    address: None,
                    phone: None,
                    email: None,
                    principal_name: None,
                },
            )
            .await
            .unwrap();
        TenantScope::new(org.organization_id, school.id)
    }

    pub(crate) async fn seed_user(
        storage: &SeaOrmStorage,
        username: &str,
        organization_id: i64,
    ) -> i64 {
        storage
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: "hashed".to_string(),
                role: UserRole::Staff,
                full_name: None,
                phone: None,
                organization_id: Some(organization_id),
                default_school_id: None,
            })
            .await
            .unwrap()
            .id
    }

    pub(crate) async fn seed_class(storage: &SeaOrmStorage, scope: &TenantScope, name: &str) -> i64 {
        storage
            .create_class(
                scope,
                CreateClassRequest {
                    academic_year_id: None,
                    name: name.to_string(),
                    section: None,
                    grade_level: None,
                    class_teacher_id: None,
                    room_id: None,
                    capacity: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    pub(crate) fn student_request(admission_no: &str, class_id: Option<i64>) -> CreateStudentRequest {
        CreateStudentRequest {
            class_id,
            admission_no: admission_no.to_string(),
            full_name: format!("Student {admission_no}"),
            father_name: None,
            gender: Gender::Male,
            date_of_birth: None,
            guardian_name: None,
            guardian_phone: None,
            address: None,
            admission_date: None,
            status: None,
        }
    }

    pub(crate) async fn seed_student(
        storage: &SeaOrmStorage,
        scope: &TenantScope,
        admission_no: &str,
        class_id: Option<i64>,
    ) -> Student {
        storage
            .create_student(scope, student_request(admission_no, class_id))
            .await
            .unwrap()
    }

    pub(crate) async fn seed_staff(
        storage: &SeaOrmStorage,
        scope: &TenantScope,
        employee_id: &str,
    ) -> i64 {
        storage
            .create_staff(
                scope,
                CreateStaffRequest {
                    user_id: None,
                    employee_id: employee_id.to_string(),
                    full_name: format!("Teacher {employee_id}"),
                    email: None,
                    phone: None,
                    department: None,
                    designation: None,
                    hire_date: None,
                    salary: None,
                    status: None,
                },
            )
            .await
            .unwrap()
            .id
    }
}
