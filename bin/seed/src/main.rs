//! Seeds the reference data the forum cannot create through its own UI:
//! the category set and a demo account. Safe to re-run; existing rows are
//! left alone.

use rf_auth_simple::SimpleAuthProvider;
use rf_core::traits::{AuthProvider, ForumRepo};
use rf_db_sqlite::SqliteForumRepo;

const CATEGORIES: &[(&str, &str)] = &[
    ("General", "general"),
    ("Tech", "tech"),
    ("Random", "random"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:rusty_forum.db".to_string());
    let repo = SqliteForumRepo::new(&database_url).await?;

    for (name, url_code) in CATEGORIES {
        if repo.get_category_by_code(url_code).await?.is_none() {
            let category = repo.create_category(name, url_code).await?;
            log::info!("created category {} (/category/{})", category.name, category.url_code);
        }
    }

    if repo.get_user_by_name("demo").await?.is_none() {
        let auth = SimpleAuthProvider::new();
        let password = std::env::var("DEMO_PASSWORD").unwrap_or_else(|_| "demo-password".to_string());
        let hash = auth.hash_password(&password)?;
        repo.create_user("demo", &hash).await?;
        log::info!("created demo user");
    }

    Ok(())
}
