use mongodb::{Client, Collection, Database};
use std::error::Error;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    /// Connects and makes sure every user-scoped collection has a `user_id` index.
    pub async fn new<'a, I>(uri: &str, user_collections: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        // Extract database name from URI or use default
        let db_name = database_name(uri);
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };

        mongodb.ensure_indexes(user_collections).await;

        Ok(mongodb)
    }

    /// Creates `user_id` indexes. Failures are not fatal, the collection may not exist yet.
    async fn ensure_indexes<'a, I>(&self, user_collections: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        use mongodb::bson::{doc, Document};
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users_index = IndexModel::builder().keys(doc! { "user_id": 1 }).build();
        match self.collection::<Document>("users").create_index(users_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(user_id)"),
            Err(e) => log::debug!("   ℹ️  Index not created for users: {}", e),
        }

        for name in user_collections {
            let index = IndexModel::builder().keys(doc! { "user_id": 1 }).build();

            match self.collection::<Document>(name).create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: {}(user_id)", name),
                Err(e) => log::debug!("   ℹ️  Index not created for {}: {}", name, e),
            }
        }

        log::info!("✅ Database indexes ready");
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub async fn ping(&self) -> bool {
        self.db.list_collection_names().await.is_ok()
    }
}

/// Database from the URI path (`scheme://authority/<db>?options`), "marketing" when absent
fn database_name(uri: &str) -> &str {
    let rest = uri.split_once("://").map_or(uri, |(_, rest)| rest);

    rest.split_once('/')
        .and_then(|(_, path)| path.split('?').next())
        .filter(|name| !name.is_empty())
        .unwrap_or("marketing")
}
