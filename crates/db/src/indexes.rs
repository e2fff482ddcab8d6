use mongodb::{Database, IndexModel};
use tracing::info;

use crate::models::{PullRequest, User};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Teams are keyed by name through `_id`, nothing extra to index.

    // Users
    create_indexes(
        db,
        User::COLLECTION,
        vec![index(bson::doc! { "team_name": 1, "is_active": 1 })],
    )
    .await?;

    // Pull Requests
    create_indexes(
        db,
        PullRequest::COLLECTION,
        vec![
            index(bson::doc! { "reviewers": 1, "created_at": -1 }),
            index(bson::doc! { "author_id": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
