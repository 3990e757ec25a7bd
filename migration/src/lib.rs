pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20261019_000001_content_tables;
mod m20261019_000002_skills;
mod m20261019_000003_visitor_and_stats;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_content_tables::Migration),
            Box::new(m20261019_000002_skills::Migration),
            Box::new(m20261019_000003_visitor_and_stats::Migration),
        ]
    }
}
