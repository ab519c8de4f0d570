//! SQLite-backed catalog implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension};

use super::{CanonicalFile, CatalogError, CatalogStore, FailedIdentityRecord, SkipRecord};
use crate::torrent::{TorrentRecord, TorrentType};

/// Stored in place of a missing file index or episode so that the composite
/// unique key also covers movies and single-file torrents.
const NONE_SENTINEL: i64 = -1;

/// SQLite-backed catalog.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Open the catalog, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- One row per ingested torrent
            CREATE TABLE IF NOT EXISTS torrents (
                info_hash TEXT PRIMARY KEY,
                provider TEXT NOT NULL,
                title TEXT NOT NULL,
                type TEXT NOT NULL,
                size INTEGER NOT NULL,
                upload_date TEXT NOT NULL,
                seeders INTEGER NOT NULL DEFAULT 0,
                torrent_link TEXT,
                magnet_link TEXT,
                imdb_id TEXT,
                kitsu_id TEXT,
                pack INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_torrents_provider ON torrents(provider);

            -- Canonical files; -1 stands for a missing file index or episode
            CREATE TABLE IF NOT EXISTS files (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                info_hash TEXT NOT NULL REFERENCES torrents(info_hash) ON DELETE CASCADE,
                file_index INTEGER NOT NULL,
                title TEXT NOT NULL,
                size INTEGER NOT NULL,
                imdb_id TEXT,
                kitsu_id TEXT,
                season INTEGER,
                episode INTEGER NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(info_hash, file_index, episode)
            );

            CREATE INDEX IF NOT EXISTS idx_files_imdb ON files(imdb_id, season, episode);
            CREATE INDEX IF NOT EXISTS idx_files_kitsu ON files(kitsu_id, episode);

            CREATE TABLE IF NOT EXISTS skip_torrents (
                info_hash TEXT PRIMARY KEY,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS failed_identities (
                info_hash TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_torrent(row: &rusqlite::Row) -> rusqlite::Result<TorrentRecord> {
        let type_str: String = row.get(3)?;
        let torrent_type: TorrentType = type_str
            .parse()
            .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into()))?;
        let size: i64 = row.get(4)?;
        let upload_date = parse_timestamp(&row.get::<_, String>(5)?);

        Ok(TorrentRecord {
            info_hash: row.get(0)?,
            provider: row.get(1)?,
            title: row.get(2)?,
            torrent_type,
            size: size.max(0) as u64,
            upload_date,
            seeders: row.get(6)?,
            torrent_link: row.get(7)?,
            magnet_link: row.get(8)?,
            imdb_id: row.get(9)?,
            kitsu_id: row.get(10)?,
            pack: row.get(11)?,
        })
    }

    fn row_to_file(row: &rusqlite::Row) -> rusqlite::Result<CanonicalFile> {
        let file_index: i64 = row.get(1)?;
        let size: i64 = row.get(3)?;
        let episode: i64 = row.get(7)?;

        Ok(CanonicalFile {
            info_hash: row.get(0)?,
            file_index: from_sentinel(file_index),
            title: row.get(2)?,
            size: size.max(0) as u64,
            imdb_id: row.get(4)?,
            kitsu_id: row.get(5)?,
            season: row.get(6)?,
            episode: from_sentinel(episode),
        })
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn to_sentinel(value: Option<u32>) -> i64 {
    value.map(i64::from).unwrap_or(NONE_SENTINEL)
}

fn from_sentinel(value: i64) -> Option<u32> {
    u32::try_from(value).ok()
}

impl CatalogStore for SqliteCatalog {
    fn get_torrent(&self, info_hash: &str) -> Result<Option<TorrentRecord>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT info_hash, provider, title, type, size, upload_date, seeders, torrent_link,
                    magnet_link, imdb_id, kitsu_id, pack
             FROM torrents WHERE info_hash = ?",
            params![info_hash.to_lowercase()],
            Self::row_to_torrent,
        )
        .optional()
        .map_err(|e| match e {
            rusqlite::Error::FromSqlConversionFailure(..) => CatalogError::Corrupt(e.to_string()),
            _ => CatalogError::Database(e.to_string()),
        })
    }

    fn create_torrent(&self, torrent: &TorrentRecord) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO torrents (info_hash, provider, title, type, size, upload_date, seeders,
                                   torrent_link, magnet_link, imdb_id, kitsu_id, pack,
                                   created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(info_hash) DO UPDATE SET
                provider = excluded.provider,
                title = excluded.title,
                type = excluded.type,
                size = excluded.size,
                upload_date = excluded.upload_date,
                seeders = excluded.seeders,
                torrent_link = COALESCE(excluded.torrent_link, torrent_link),
                magnet_link = COALESCE(excluded.magnet_link, magnet_link),
                imdb_id = COALESCE(excluded.imdb_id, imdb_id),
                kitsu_id = COALESCE(excluded.kitsu_id, kitsu_id),
                pack = excluded.pack,
                updated_at = excluded.updated_at",
            params![
                torrent.info_hash.to_lowercase(),
                &torrent.provider,
                &torrent.title,
                torrent.torrent_type.as_str(),
                torrent.size as i64,
                torrent.upload_date.to_rfc3339(),
                torrent.seeders,
                &torrent.torrent_link,
                &torrent.magnet_link,
                &torrent.imdb_id,
                &torrent.kitsu_id,
                torrent.pack,
                &now_str,
                &now_str,
            ],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(())
    }

    fn create_file(&self, file: &CanonicalFile) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        let info_hash = file.info_hash.to_lowercase();

        let torrent_exists = conn
            .query_row(
                "SELECT 1 FROM torrents WHERE info_hash = ?",
                params![&info_hash],
                |_| Ok(()),
            )
            .optional()
            .map_err(|e| CatalogError::Database(e.to_string()))?
            .is_some();
        if !torrent_exists {
            return Err(CatalogError::MissingTorrent(info_hash));
        }

        conn.execute(
            "INSERT INTO files (info_hash, file_index, title, size, imdb_id, kitsu_id, season,
                                episode, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(info_hash, file_index, episode) DO UPDATE SET
                title = excluded.title,
                size = excluded.size,
                imdb_id = excluded.imdb_id,
                kitsu_id = excluded.kitsu_id,
                season = excluded.season,
                updated_at = excluded.updated_at",
            params![
                &info_hash,
                to_sentinel(file.file_index),
                &file.title,
                file.size as i64,
                &file.imdb_id,
                &file.kitsu_id,
                file.season,
                to_sentinel(file.episode),
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_files(&self, info_hash: &str) -> Result<Vec<CanonicalFile>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT info_hash, file_index, title, size, imdb_id, kitsu_id, season, episode
                 FROM files WHERE info_hash = ?
                 ORDER BY season, episode, file_index",
            )
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![info_hash.to_lowercase()], Self::row_to_file)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut files = Vec::new();
        for row in rows {
            files.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(files)
    }

    fn delete_torrent(&self, info_hash: &str) -> Result<bool, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute(
                "DELETE FROM torrents WHERE info_hash = ?",
                params![info_hash.to_lowercase()],
            )
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(deleted > 0)
    }

    fn get_skip_torrent(&self, info_hash: &str) -> Result<Option<SkipRecord>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT info_hash, created_at FROM skip_torrents WHERE info_hash = ?",
            params![info_hash.to_lowercase()],
            |row| {
                Ok(SkipRecord {
                    info_hash: row.get(0)?,
                    created_at: parse_timestamp(&row.get::<_, String>(1)?),
                })
            },
        )
        .optional()
        .map_err(|e| CatalogError::Database(e.to_string()))
    }

    fn create_skip_torrent(&self, info_hash: &str) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO skip_torrents (info_hash, created_at) VALUES (?, ?)",
            params![info_hash.to_lowercase(), Utc::now().to_rfc3339()],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(())
    }

    fn get_failed_identity(
        &self,
        info_hash: &str,
    ) -> Result<Option<FailedIdentityRecord>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT info_hash, title, created_at FROM failed_identities WHERE info_hash = ?",
            params![info_hash.to_lowercase()],
            |row| {
                Ok(FailedIdentityRecord {
                    info_hash: row.get(0)?,
                    title: row.get(1)?,
                    created_at: parse_timestamp(&row.get::<_, String>(2)?),
                })
            },
        )
        .optional()
        .map_err(|e| CatalogError::Database(e.to_string()))
    }

    fn create_failed_identity(&self, info_hash: &str, title: &str) -> Result<(), CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO failed_identities (info_hash, title, created_at) VALUES (?, ?, ?)
             ON CONFLICT(info_hash) DO UPDATE SET title = excluded.title",
            params![info_hash.to_lowercase(), title, Utc::now().to_rfc3339()],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn create_test_catalog() -> SqliteCatalog {
        SqliteCatalog::in_memory().unwrap()
    }

    fn episode(info_hash: &str, file_index: u32, season: u32, episode: u32) -> CanonicalFile {
        CanonicalFile {
            info_hash: info_hash.to_string(),
            file_index: Some(file_index),
            title: format!("Show.S{:02}E{:02}.mkv", season, episode),
            size: 500,
            imdb_id: Some("tt0903747".to_string()),
            kitsu_id: None,
            season: Some(season),
            episode: Some(episode),
        }
    }

    #[test]
    fn test_create_and_get_torrent() {
        let catalog = create_test_catalog();
        let mut record = fixtures::series_record("Show.S01.1080p");
        record.imdb_id = Some("tt0903747".to_string());
        catalog.create_torrent(&record).unwrap();

        let stored = catalog.get_torrent(&record.info_hash).unwrap().unwrap();
        assert_eq!(stored.title, "Show.S01.1080p");
        assert_eq!(stored.torrent_type, TorrentType::Series);
        assert_eq!(stored.size, record.size);
        assert_eq!(stored.imdb_id.as_deref(), Some("tt0903747"));
    }

    #[test]
    fn test_get_missing_torrent() {
        let catalog = create_test_catalog();
        assert!(catalog.get_torrent(&"0".repeat(40)).unwrap().is_none());
    }

    #[test]
    fn test_create_torrent_upserts() {
        let catalog = create_test_catalog();
        let mut record = fixtures::series_record("Show.S01.1080p");
        catalog.create_torrent(&record).unwrap();
        record.seeders = 99;
        catalog.create_torrent(&record).unwrap();

        let stored = catalog.get_torrent(&record.info_hash).unwrap().unwrap();
        assert_eq!(stored.seeders, 99);
    }

    #[test]
    fn test_info_hash_case_insensitive() {
        let catalog = create_test_catalog();
        let record = fixtures::series_record("Show.S01.1080p");
        catalog.create_torrent(&record).unwrap();
        assert!(catalog
            .get_torrent(&record.info_hash.to_uppercase())
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_file_requires_torrent() {
        let catalog = create_test_catalog();
        let err = catalog.create_file(&episode(&"a".repeat(40), 0, 1, 1)).unwrap_err();
        assert!(matches!(err, CatalogError::MissingTorrent(_)));
    }

    #[test]
    fn test_file_upsert_on_composite_key() {
        let catalog = create_test_catalog();
        let record = fixtures::series_record("Show.S01.1080p");
        catalog.create_torrent(&record).unwrap();

        catalog.create_file(&episode(&record.info_hash, 0, 1, 1)).unwrap();
        catalog.create_file(&episode(&record.info_hash, 0, 1, 1)).unwrap();
        // same file, second episode
        catalog.create_file(&episode(&record.info_hash, 0, 1, 2)).unwrap();

        let files = catalog.get_files(&record.info_hash).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].episode, Some(2));
    }

    #[test]
    fn test_movie_file_without_index_is_unique() {
        let catalog = create_test_catalog();
        let record = fixtures::movie_record("Movie.2020.1080p");
        catalog.create_torrent(&record).unwrap();

        let movie = CanonicalFile {
            info_hash: record.info_hash.clone(),
            file_index: None,
            title: record.title.clone(),
            size: record.size,
            imdb_id: Some("tt1234567".to_string()),
            kitsu_id: None,
            season: None,
            episode: None,
        };
        catalog.create_file(&movie).unwrap();
        catalog.create_file(&movie).unwrap();

        let files = catalog.get_files(&record.info_hash).unwrap();
        assert_eq!(files, vec![movie]);
    }

    #[test]
    fn test_delete_cascades_to_files() {
        let catalog = create_test_catalog();
        let record = fixtures::series_record("Show.S01.1080p");
        catalog.create_torrent(&record).unwrap();
        catalog.create_file(&episode(&record.info_hash, 0, 1, 1)).unwrap();

        assert!(catalog.delete_torrent(&record.info_hash).unwrap());
        assert!(catalog.get_torrent(&record.info_hash).unwrap().is_none());
        assert!(catalog.get_files(&record.info_hash).unwrap().is_empty());
        assert!(!catalog.delete_torrent(&record.info_hash).unwrap());
    }

    #[test]
    fn test_skip_records() {
        let catalog = create_test_catalog();
        let hash = "b".repeat(40);
        assert!(catalog.get_skip_torrent(&hash).unwrap().is_none());
        catalog.create_skip_torrent(&hash).unwrap();
        catalog.create_skip_torrent(&hash).unwrap();
        assert_eq!(catalog.get_skip_torrent(&hash).unwrap().unwrap().info_hash, hash);
    }

    #[test]
    fn test_failed_identity_records() {
        let catalog = create_test_catalog();
        let hash = "c".repeat(40);
        assert!(catalog.get_failed_identity(&hash).unwrap().is_none());
        catalog.create_failed_identity(&hash, "Unknown Thing").unwrap();

        let record = catalog.get_failed_identity(&hash).unwrap().unwrap();
        assert_eq!(record.title, "Unknown Thing");
    }

    #[test]
    fn test_on_disk_catalog_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let record = fixtures::series_record("Show.S01.1080p");
        {
            let catalog = SqliteCatalog::new(&path).unwrap();
            catalog.create_torrent(&record).unwrap();
        }
        let catalog = SqliteCatalog::new(&path).unwrap();
        assert!(catalog.get_torrent(&record.info_hash).unwrap().is_some());
    }
}
