//! # rf-db-sqlite Implementation
//!
//! Maps the SQLite relational model to the `rf-core` domain models. The
//! schema is bootstrapped on pool creation, so `sqlite::memory:` works out
//! of the box for tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rf_core::models::{Category, Comment, NewComment, NewTopic, Topic, User};
use rf_core::traits::ForumRepo;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

pub struct SqliteForumRepo {
    pool: SqlitePool,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS categories (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    url_code   TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS topics (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    message     TEXT NOT NULL,
    category_id INTEGER NOT NULL REFERENCES categories(id),
    user_id     INTEGER REFERENCES users(id),
    user_name   TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS comments (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    topic_id   INTEGER NOT NULL REFERENCES topics(id),
    no         INTEGER NOT NULL,
    message    TEXT NOT NULL,
    image      TEXT,
    user_id    INTEGER REFERENCES users(id),
    user_name  TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (topic_id, no)
);
CREATE TABLE IF NOT EXISTS votes (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    comment_id INTEGER NOT NULL REFERENCES comments(id),
    created_at TEXT NOT NULL
);
";

impl SqliteForumRepo {
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database exists per connection; cap the pool at one
        // connection so every query sees the same database.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement).execute(&pool).await?;
        }

        Ok(Self { pool })
    }
}

fn category_from_row(row: &SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        url_code: row.get("url_code"),
    }
}

fn topic_from_row(row: &SqliteRow) -> Topic {
    Topic {
        id: row.get("id"),
        title: row.get("title"),
        message: row.get("message"),
        category_id: row.get("category_id"),
        user_id: row.get("user_id"),
        user_name: row.get("user_name"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
    }
}

fn comment_from_row(row: &SqliteRow) -> Comment {
    Comment {
        id: row.get("id"),
        topic_id: row.get("topic_id"),
        no: row.get("no"),
        message: row.get("message"),
        image: row.get("image"),
        user_id: row.get("user_id"),
        user_name: row.get("user_name"),
        created_at: row.get::<DateTime<Utc>, _>("created_at"),
        vote_count: row.get("vote_count"),
    }
}

#[async_trait]
impl ForumRepo for SqliteForumRepo {
    async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name, url_code FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn get_category(&self, id: i64) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, url_code FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(category_from_row))
    }

    async fn get_category_by_code(&self, url_code: &str) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, url_code FROM categories WHERE url_code = ?")
            .bind(url_code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(category_from_row))
    }

    async fn create_category(&self, name: &str, url_code: &str) -> anyhow::Result<Category> {
        let result = sqlx::query("INSERT INTO categories (name, url_code) VALUES (?, ?)")
            .bind(name)
            .bind(url_code)
            .execute(&self.pool)
            .await?;
        Ok(Category {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            url_code: url_code.to_string(),
        })
    }

    async fn create_topic(&self, topic: NewTopic) -> anyhow::Result<Topic> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO topics (title, message, category_id, user_id, user_name, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&topic.title)
        .bind(&topic.message)
        .bind(topic.category_id)
        .bind(topic.user_id)
        .bind(&topic.user_name)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Topic {
            id: result.last_insert_rowid(),
            title: topic.title,
            message: topic.message,
            category_id: topic.category_id,
            user_id: topic.user_id,
            user_name: topic.user_name,
            created_at,
        })
    }

    async fn get_topic(&self, id: i64) -> anyhow::Result<Option<Topic>> {
        let row = sqlx::query("SELECT * FROM topics WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(topic_from_row))
    }

    async fn list_topics(&self) -> anyhow::Result<Vec<Topic>> {
        let rows = sqlx::query("SELECT * FROM topics ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(topic_from_row).collect())
    }

    async fn list_topics_by_category(
        &self,
        category_id: i64,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Topic>> {
        let rows = sqlx::query(
            "SELECT * FROM topics WHERE category_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        )
        .bind(category_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(topic_from_row).collect())
    }

    async fn count_topics_by_category(&self, category_id: i64) -> anyhow::Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM topics WHERE category_id = ?")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    async fn search_topics(&self, query: &str) -> anyhow::Result<Vec<Topic>> {
        let rows = sqlx::query(
            "SELECT * FROM topics \
             WHERE title LIKE '%' || ? || '%' OR message LIKE '%' || ? || '%' \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(query)
        .bind(query)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(topic_from_row).collect())
    }

    /// Inserts the comment with `no` computed by a correlated subquery in
    /// the same statement, so two concurrent submissions cannot read the
    /// same count. `UNIQUE (topic_id, no)` backs this up at the schema
    /// level.
    async fn create_comment(&self, comment: NewComment) -> anyhow::Result<Comment> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO comments (topic_id, no, message, image, user_id, user_name, created_at) \
             VALUES (?, (SELECT COUNT(*) + 1 FROM comments WHERE topic_id = ?), ?, ?, ?, ?, ?)",
        )
        .bind(comment.topic_id)
        .bind(comment.topic_id)
        .bind(&comment.message)
        .bind(&comment.image)
        .bind(comment.user_id)
        .bind(&comment.user_name)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query("SELECT *, 0 AS vote_count FROM comments WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await?;
        Ok(comment_from_row(&row))
    }

    async fn list_comments(&self, topic_id: i64) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT c.*, \
                    (SELECT COUNT(*) FROM votes v WHERE v.comment_id = c.id) AS vote_count \
             FROM comments c WHERE c.topic_id = ? ORDER BY c.no ASC",
        )
        .bind(topic_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(comment_from_row).collect())
    }

    async fn get_comment(&self, topic_id: i64, no: i64) -> anyhow::Result<Option<Comment>> {
        let row = sqlx::query(
            "SELECT c.*, \
                    (SELECT COUNT(*) FROM votes v WHERE v.comment_id = c.id) AS vote_count \
             FROM comments c WHERE c.topic_id = ? AND c.no = ?",
        )
        .bind(topic_id)
        .bind(no)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(comment_from_row))
    }

    async fn add_vote(&self, comment_id: i64) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO votes (comment_id, created_at) VALUES (?, ?)")
            .bind(comment_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_user_by_name(&self, username: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| User {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
        }))
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> anyhow::Result<User> {
        let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        })
    }
}
