pub use sea_orm_migration::prelude::*;

mod common;
mod m20260301_000001_create_core_tables;
mod m20260301_000002_create_fee_tables;
mod m20260301_000003_create_activity_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_core_tables::Migration),
            Box::new(m20260301_000002_create_fee_tables::Migration),
            Box::new(m20260301_000003_create_activity_logs::Migration),
        ]
    }
}
