use anyhow::Context as _;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use crate::{
    database::Database,
    model::{
        PageRequest, Player, PlayerChanges, PlayerFilter, PlayerOrder, PlayerRecord, Profession,
        Race,
    },
    store::PlayerStore,
};

const SELECT_PLAYERS: &str = "SELECT id, name, title, race, profession, birthday, experience, level, until_next_level, banned FROM players";

#[derive(sqlx::FromRow)]
struct PlayerRow {
    id: i64,
    name: String,
    title: String,
    race: String,
    profession: String,
    birthday: DateTime<Utc>,
    experience: i32,
    level: i32,
    until_next_level: i32,
    banned: bool,
}

pub async fn insert_player(db: &Database, record: &PlayerRecord) -> anyhow::Result<Player> {
    let row: PlayerRow = sqlx::query_as(
        "INSERT INTO players (
            name,
            title,
            race,
            profession,
            birthday,
            experience,
            level,
            until_next_level,
            banned
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING id, name, title, race, profession, birthday, experience, level, until_next_level, banned",
    )
    .bind(&record.name)
    .bind(&record.title)
    .bind(record.race.as_str())
    .bind(record.profession.as_str())
    .bind(record.birthday)
    .bind(record.experience)
    .bind(record.level)
    .bind(record.until_next_level)
    .bind(record.banned)
    .fetch_one(db.pool())
    .await?;

    to_player(row)
}

/// Look a player up, going through the cache when one is configured.
pub async fn get_player(db: &Database, id: i64) -> anyhow::Result<Option<Player>> {
    let key = player_cache_key(db, id);
    db.cache()
        .get_or_load_json(&key, db.cache_ttl(), || load_player(db, id))
        .await
}

async fn load_player(db: &Database, id: i64) -> anyhow::Result<Option<Player>> {
    let row: Option<PlayerRow> = sqlx::query_as(
        "SELECT id, name, title, race, profession, birthday, experience, level, until_next_level, banned
         FROM players
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_player).transpose()
}

/// Overwrite the columns present in `changes` in a single statement.
pub async fn update_player(
    db: &Database,
    id: i64,
    changes: &PlayerChanges,
) -> anyhow::Result<Option<Player>> {
    let pool = db.pool();
    let key = player_cache_key(db, id);

    let row = db
        .cache()
        .evict_around(&key, move || async move {
            let row: Option<PlayerRow> = sqlx::query_as(
                "UPDATE players
                 SET
                    name = COALESCE($2, name),
                    title = COALESCE($3, title),
                    race = COALESCE($4, race),
                    profession = COALESCE($5, profession),
                    birthday = COALESCE($6, birthday),
                    experience = COALESCE($7, experience),
                    level = COALESCE($8, level),
                    until_next_level = COALESCE($9, until_next_level),
                    banned = COALESCE($10, banned)
                 WHERE id = $1
                 RETURNING id, name, title, race, profession, birthday, experience, level, until_next_level, banned",
            )
            .bind(id)
            .bind(changes.name.as_deref())
            .bind(changes.title.as_deref())
            .bind(changes.race.map(Race::as_str))
            .bind(changes.profession.map(Profession::as_str))
            .bind(changes.birthday)
            .bind(changes.experience)
            .bind(changes.level)
            .bind(changes.until_next_level)
            .bind(changes.banned)
            .fetch_optional(pool)
            .await?;

            anyhow::Ok(row)
        })
        .await?;

    row.map(to_player).transpose()
}

pub async fn delete_player(db: &Database, id: i64) -> anyhow::Result<bool> {
    let pool = db.pool();
    let key = player_cache_key(db, id);

    let deleted = db
        .cache()
        .evict_around(&key, move || async move {
            let result = sqlx::query("DELETE FROM players WHERE id = $1")
                .bind(id)
                .execute(pool)
                .await?;
            anyhow::Ok(result.rows_affected())
        })
        .await?;

    Ok(deleted > 0)
}

pub async fn list_players(
    db: &Database,
    filter: &PlayerFilter,
    order: PlayerOrder,
    page: PageRequest,
) -> anyhow::Result<Vec<Player>> {
    let mut builder = list_query(filter, order, page)?;
    let rows: Vec<PlayerRow> = builder.build_query_as().fetch_all(db.pool()).await?;

    rows.into_iter().map(to_player).collect()
}

pub async fn count_players(db: &Database, filter: &PlayerFilter) -> anyhow::Result<i64> {
    let mut builder = count_query(filter);
    let count: i64 = builder
        .build_query_scalar()
        .fetch_one(db.pool())
        .await?;

    Ok(count)
}

fn list_query(
    filter: &PlayerFilter,
    order: PlayerOrder,
    page: PageRequest,
) -> anyhow::Result<QueryBuilder<'static, Postgres>> {
    let offset = i64::try_from(page.offset()).context("page offset out of i64 range")?;

    let mut builder = QueryBuilder::<Postgres>::new(SELECT_PLAYERS);
    filter.push_where(&mut builder);
    order.push_order_by(&mut builder);
    builder.push(" LIMIT ");
    builder.push_bind(i64::from(page.size));
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    Ok(builder)
}

fn count_query(filter: &PlayerFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM players");
    filter.push_where(&mut builder);
    builder
}

fn player_cache_key(db: &Database, id: i64) -> String {
    db.cache().key(format!("player:{id}"))
}

fn to_player(row: PlayerRow) -> anyhow::Result<Player> {
    let race = row
        .race
        .parse::<Race>()
        .with_context(|| format!("player {} row has invalid race", row.id))?;
    let profession = row
        .profession
        .parse::<Profession>()
        .with_context(|| format!("player {} row has invalid profession", row.id))?;

    Ok(Player {
        id: row.id,
        name: row.name,
        title: row.title,
        race,
        profession,
        birthday: row.birthday,
        experience: row.experience,
        level: row.level,
        until_next_level: row.until_next_level,
        banned: row.banned,
    })
}

#[async_trait]
impl PlayerStore for Database {
    async fn insert(&self, record: &PlayerRecord) -> anyhow::Result<Player> {
        insert_player(self, record).await
    }

    async fn fetch(&self, id: i64) -> anyhow::Result<Option<Player>> {
        get_player(self, id).await
    }

    async fn apply(&self, id: i64, changes: &PlayerChanges) -> anyhow::Result<Option<Player>> {
        update_player(self, id, changes).await
    }

    async fn remove(&self, id: i64) -> anyhow::Result<bool> {
        delete_player(self, id).await
    }

    async fn list(
        &self,
        filter: &PlayerFilter,
        order: PlayerOrder,
        page: PageRequest,
    ) -> anyhow::Result<Vec<Player>> {
        list_players(self, filter, order, page).await
    }

    async fn count(&self, filter: &PlayerFilter) -> anyhow::Result<i64> {
        count_players(self, filter).await
    }
}
