use sea_orm::entity::prelude::*;

/// A player registered with a club.
///
/// Jersey numbers are unique per club. The `(club_id, number)` pair carries a
/// unique index; the reserved-number validator in the domain crate reports the
/// friendly error before the index is hit.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Jersey number in `0..=100`.
    pub number: i32,
    pub age: i32,
    /// ISO 3166-1 alpha-2 country code, stored uppercase.
    pub nationality: String,
    pub position_id: Option<i32>,
    pub club_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::club::Entity",
        from = "Column::ClubId",
        to = "super::club::Column::Id",
        on_delete = "Cascade"
    )]
    Club,
    #[sea_orm(
        belongs_to = "super::position::Entity",
        from = "Column::PositionId",
        to = "super::position::Column::Id",
        on_delete = "SetNull"
    )]
    Position,
}

impl Related<super::club::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Club.def()
    }
}

impl Related<super::position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Position.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
