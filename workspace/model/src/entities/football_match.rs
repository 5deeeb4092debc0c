use sea_orm::entity::prelude::*;

/// A match between two clubs. Home and away teams must differ; the check
/// lives in the domain crate and runs on every save.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub date: Date,
    /// Free-form result, e.g. "2:1". At most 50 characters.
    pub result: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::club::Entity",
        from = "Column::HomeTeamId",
        to = "super::club::Column::Id",
        on_delete = "Cascade"
    )]
    HomeTeam,
    #[sea_orm(
        belongs_to = "super::club::Entity",
        from = "Column::AwayTeamId",
        to = "super::club::Column::Id",
        on_delete = "Cascade"
    )]
    AwayTeam,
}

impl ActiveModelBehavior for ActiveModel {}
