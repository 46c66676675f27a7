use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    #[sea_orm(unique)]
    pub email: String,
    pub telephone: Option<String>,
    pub adresse_cabinet: String,
    pub num_matricule: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub is_first_login: bool,
    /// "INACTIVE" | "ACTIVE"
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
