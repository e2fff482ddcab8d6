use bson::{DateTime, doc};
use futures::FutureExt;
use mongodb::{Client, ClientSession, Database, error::Result as MongoResult};
use roster_db::models::{Team, TeamMember, User};
use tracing::debug;

use super::base::{BaseDao, DaoResult, map_write_error};

pub struct TeamDao {
    client: Client,
    pub base: BaseDao<Team>,
    pub users: BaseDao<User>,
}

impl TeamDao {
    pub fn new(client: &Client, db: &Database) -> Self {
        Self {
            client: client.clone(),
            base: BaseDao::new(db, Team::COLLECTION),
            users: BaseDao::new(db, User::COLLECTION),
        }
    }

    /// Registers the team and upserts all members in one transaction.
    ///
    /// Write conflicts with a concurrent transaction are retried by the
    /// driver, so a racing creator of the same team ends up with
    /// `DaoError::DuplicateKey` once the winner commits. Any failure leaves
    /// no member write visible.
    pub async fn create_with_members(
        &self,
        team_name: &str,
        members: &[TeamMember],
        now: DateTime,
    ) -> DaoResult<()> {
        let mut session = self.client.start_session().await?;
        session
            .start_transaction()
            .and_run((self, team_name, members, now), |session, ctx| {
                let (dao, team_name, members, now) = *ctx;
                async move { dao.write_team(team_name, members, now, session).await }.boxed()
            })
            .await
            .map_err(map_write_error)
    }

    async fn write_team(
        &self,
        team_name: &str,
        members: &[TeamMember],
        now: DateTime,
        session: &mut ClientSession,
    ) -> MongoResult<()> {
        self.base
            .collection()
            .insert_one(Team::new(team_name, now))
            .session(&mut *session)
            .await?;
        for member in members {
            self.upsert_member(team_name, member, now, session).await?;
        }
        debug!(team = team_name, members = members.len(), "Team written in transaction");
        Ok(())
    }

    /// Last write wins: name, active flag and affiliation are replaced.
    async fn upsert_member(
        &self,
        team_name: &str,
        member: &TeamMember,
        now: DateTime,
        session: &mut ClientSession,
    ) -> MongoResult<()> {
        self.users
            .collection()
            .update_one(
                doc! { "_id": member.user_id.as_str() },
                doc! {
                    "$set": {
                        "username": member.username.as_str(),
                        "team_name": team_name,
                        "is_active": member.is_active,
                        "updated_at": now,
                    },
                    "$setOnInsert": { "created_at": now },
                },
            )
            .upsert(true)
            .session(&mut *session)
            .await?;
        Ok(())
    }

    pub async fn find_members(&self, team_name: &str) -> DaoResult<Vec<User>> {
        self.users
            .find_many(doc! { "team_name": team_name }, Some(doc! { "_id": 1 }))
            .await
    }
}
