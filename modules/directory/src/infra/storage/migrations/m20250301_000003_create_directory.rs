use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OurVeterinaires::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OurVeterinaires::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OurVeterinaires::Nom).string().not_null())
                    .col(ColumnDef::new(OurVeterinaires::Prenom).string().not_null())
                    .col(ColumnDef::new(OurVeterinaires::Matricule).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_our_veterinaires_matricule")
                    .table(OurVeterinaires::Table)
                    .col(OurVeterinaires::Matricule)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CabinetVeterinaires::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CabinetVeterinaires::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CabinetVeterinaires::Name).string().not_null())
                    .col(ColumnDef::new(CabinetVeterinaires::Address).string().not_null())
                    .col(ColumnDef::new(CabinetVeterinaires::City).string())
                    .col(ColumnDef::new(CabinetVeterinaires::Phone).string())
                    .col(ColumnDef::new(CabinetVeterinaires::Latitude).double().not_null())
                    .col(ColumnDef::new(CabinetVeterinaires::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(CabinetVeterinaires::IsFeatured)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CabinetVeterinaires::CabinetType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CabinetVeterinaires::Matricule)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cabinet_veterinaires_name_address")
                    .table(CabinetVeterinaires::Table)
                    .col(CabinetVeterinaires::Name)
                    .col(CabinetVeterinaires::Address)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VeterinaireProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VeterinaireProfiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VeterinaireProfiles::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VeterinaireProfiles::SubscriptionTypeHint).string())
                    .col(ColumnDef::new(VeterinaireProfiles::ImagePath).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_veterinaire_profiles_user_id")
                    .table(VeterinaireProfiles::Table)
                    .col(VeterinaireProfiles::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VeterinaireProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CabinetVeterinaires::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OurVeterinaires::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OurVeterinaires {
    Table,
    Id,
    Nom,
    Prenom,
    Matricule,
}

#[derive(DeriveIden)]
enum CabinetVeterinaires {
    Table,
    Id,
    Name,
    Address,
    City,
    Phone,
    Latitude,
    Longitude,
    IsFeatured,
    CabinetType,
    Matricule,
}

#[derive(DeriveIden)]
enum VeterinaireProfiles {
    Table,
    Id,
    UserId,
    SubscriptionTypeHint,
    ImagePath,
}
