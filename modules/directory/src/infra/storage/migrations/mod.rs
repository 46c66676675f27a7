use sea_orm_migration::prelude::*;

mod m20250301_000003_create_directory;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250301_000003_create_directory::Migration)]
    }
}
