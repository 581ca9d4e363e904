use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub client_name: String,

    #[sea_orm(column_type = "Text")]
    pub case_status: String,

    /// Set once on insert, never updated.
    pub date_created: ChronoDateTimeUtc,

    pub case_file: Option<String>,

    pub interim_orders_file: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::proceedings::Entity")]
    Proceedings,
}

impl Related<super::proceedings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proceedings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
