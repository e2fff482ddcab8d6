use bson::{doc, DateTime};
use mongodb::{Database, options::ReturnDocument};
use roster_db::models::User;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn find_by_id(&self, user_id: &str) -> DaoResult<Option<User>> {
        match self.base.find_by_id(user_id).await {
            Ok(user) => Ok(Some(user)),
            Err(DaoError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn set_active(
        &self,
        user_id: &str,
        is_active: bool,
        now: DateTime,
    ) -> DaoResult<Option<User>> {
        Ok(self
            .base
            .collection()
            .find_one_and_update(
                doc! { "_id": user_id },
                doc! { "$set": { "is_active": is_active, "updated_at": now } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }
}
