use sea_orm_migration::prelude::*;

mod m20241210_190412_create_tables;

pub(crate) struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20241210_190412_create_tables::Migration)]
    }
}
