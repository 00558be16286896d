//! # rf-storage-local
//!
//! Local filesystem implementation of `MediaStore` for comment image
//! attachments. Content-addressable storage with directory sharding and
//! webp thumbnailing.

use async_trait::async_trait;
use image::io::Reader as ImageReader;
use rf_core::traits::MediaStore;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g., "./data/uploads")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/static/uploads")
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self { root_path: root, url_prefix }
    }

    /// Sharded path: "ab/cd/ab cd ef...hash"
    fn sharded_path(&self, hash: &str) -> PathBuf {
        let mut path = self.root_path.clone();
        path.push(&hash[0..2]);
        path.push(&hash[2..4]);
        path.push(hash);
        path
    }

    /// 250px webp thumbnail next to the original.
    async fn generate_thumbnail(&self, source_path: &Path, hash: &str) -> anyhow::Result<()> {
        let data = fs::read(source_path).await?;
        let img = ImageReader::new(Cursor::new(data)).with_guessed_format()?.decode()?;

        let thumb = img.thumbnail(250, 250);
        let mut thumb_path = source_path
            .parent()
            .expect("sharded paths always have a parent")
            .to_path_buf();
        thumb_path.push(format!("thumb_{hash}.webp"));
        thumb.save_with_format(thumb_path, image::ImageFormat::WebP)?;
        Ok(())
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    /// Saves an upload under its SHA-256 hash, deduplicating identical
    /// files. Non-image payloads are rejected by the decode step.
    async fn save_upload(&self, data: Vec<u8>, _content_type: &str) -> anyhow::Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(&data);
        let hash = format!("{:x}", hasher.finalize());

        let target_path = self.sharded_path(&hash);
        let parent = target_path.parent().expect("sharded paths always have a parent");
        fs::create_dir_all(parent).await?;

        if !target_path.exists() {
            fs::write(&target_path, &data).await?;
            self.generate_thumbnail(&target_path, &hash).await?;
        }

        Ok(hash)
    }

    fn url(&self, media_id: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.url_prefix,
            &media_id[0..2],
            &media_id[2..4],
            media_id
        )
    }

    fn thumbnail_url(&self, media_id: &str) -> String {
        format!(
            "{}/{}/{}/thumb_{}.webp",
            self.url_prefix,
            &media_id[0..2],
            &media_id[2..4],
            media_id
        )
    }
}
