use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create leagues table
        manager
            .create_table(
                Table::create()
                    .table(Leagues::Table)
                    .if_not_exists()
                    .col(pk_auto(Leagues::Id))
                    .col(string_len(Leagues::Name, 100))
                    .col(string_len(Leagues::Country, 2))
                    .to_owned(),
            )
            .await?;

        // Create clubs table
        manager
            .create_table(
                Table::create()
                    .table(Clubs::Table)
                    .if_not_exists()
                    .col(pk_auto(Clubs::Id))
                    .col(string_len(Clubs::Name, 100))
                    .col(integer(Clubs::LeagueId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_club_league")
                            .from(Clubs::Table, Clubs::LeagueId)
                            .to(Leagues::Table, Leagues::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create positions table
        manager
            .create_table(
                Table::create()
                    .table(Positions::Table)
                    .if_not_exists()
                    .col(pk_auto(Positions::Id))
                    .col(string_len(Positions::ShortName, 3))
                    .col(string_len(Positions::LongName, 100))
                    .to_owned(),
            )
            .await?;

        // Create players table
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(pk_auto(Players::Id))
                    .col(string_len(Players::Name, 100))
                    .col(integer(Players::Number))
                    .col(integer(Players::Age))
                    .col(string_len(Players::Nationality, 2))
                    .col(integer_null(Players::PositionId))
                    .col(integer(Players::ClubId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_position")
                            .from(Players::Table, Players::PositionId)
                            .to(Positions::Table, Positions::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_club")
                            .from(Players::Table, Players::ClubId)
                            .to(Clubs::Table, Clubs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Jersey numbers are unique within a club
        manager
            .create_index(
                Index::create()
                    .name("idx_players_club_number")
                    .table(Players::Table)
                    .col(Players::ClubId)
                    .col(Players::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create matches table
        manager
            .create_table(
                Table::create()
                    .table(Matches::Table)
                    .if_not_exists()
                    .col(pk_auto(Matches::Id))
                    .col(integer(Matches::HomeTeamId))
                    .col(integer(Matches::AwayTeamId))
                    .col(date(Matches::Date))
                    .col(string_len(Matches::Result, 50))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_match_home_team")
                            .from(Matches::Table, Matches::HomeTeamId)
                            .to(Clubs::Table, Clubs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_match_away_team")
                            .from(Matches::Table, Matches::AwayTeamId)
                            .to(Clubs::Table, Clubs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Matches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Positions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clubs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leagues::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Leagues {
    Table,
    Id,
    Name,
    Country,
}

#[derive(DeriveIden)]
enum Clubs {
    Table,
    Id,
    Name,
    LeagueId,
}

#[derive(DeriveIden)]
enum Positions {
    Table,
    Id,
    ShortName,
    LongName,
}

#[derive(DeriveIden)]
enum Players {
    Table,
    Id,
    Name,
    Number,
    Age,
    Nationality,
    PositionId,
    ClubId,
}

#[derive(DeriveIden)]
enum Matches {
    Table,
    Id,
    HomeTeamId,
    AwayTeamId,
    Date,
    Result,
}
