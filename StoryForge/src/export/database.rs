//! Relational story database
//!
//! Materializes a resolved [`Project`] into SQLite. Rows are written in six
//! groups, each in its own transaction, because later groups reference the
//! row ids generated by earlier ones:
//!
//! 1. images -> `asset`
//! 2. default localization text -> `localization`
//! 3. entities -> `entity`
//! 4. dialogues -> `dialogue`, speaker lists -> `dialoguespeaker`
//! 5. fragments of known dialogues -> `fragment`
//! 6. edges between stored fragments -> `fragmentconnection`
//!
//! A group that fails is rolled back; groups committed before it stay.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rusqlite::{Connection, Transaction, params};

use crate::error::{Error, ReferenceKind, Result};
use crate::project::Project;

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS asset (
        id          INTEGER NOT NULL PRIMARY KEY,
        data        TEXT NOT NULL,
        meta        TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS localization (
        id          INTEGER NOT NULL PRIMARY KEY,
        text        TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS entity (
        id          INTEGER NOT NULL PRIMARY KEY,
        name_id     INTEGER NOT NULL REFERENCES localization(id),
        preview_id  INTEGER NOT NULL REFERENCES asset(id)
    );

    CREATE TABLE IF NOT EXISTS dialogue (
        id          INTEGER NOT NULL PRIMARY KEY,
        name_id     INTEGER NOT NULL REFERENCES localization(id)
    );

    CREATE TABLE IF NOT EXISTS dialoguespeaker (
        id          INTEGER NOT NULL PRIMARY KEY,
        dialogue_id INTEGER NOT NULL REFERENCES dialogue(id) ON DELETE CASCADE,
        speaker_id  INTEGER NOT NULL REFERENCES entity(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS fragment (
        id          INTEGER NOT NULL PRIMARY KEY,
        dialogue_id INTEGER NOT NULL REFERENCES dialogue(id) ON DELETE CASCADE,
        speaker_id  INTEGER NOT NULL REFERENCES entity(id) ON DELETE CASCADE,
        text_id     INTEGER NOT NULL REFERENCES localization(id)
    );

    CREATE TABLE IF NOT EXISTS fragmentconnection (
        id          INTEGER NOT NULL PRIMARY KEY,
        source_id   INTEGER NOT NULL REFERENCES fragment(id) ON DELETE CASCADE,
        target_id   INTEGER NOT NULL REFERENCES fragment(id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_entity_name ON entity(name_id);
    CREATE INDEX IF NOT EXISTS idx_entity_preview ON entity(preview_id);
    CREATE INDEX IF NOT EXISTS idx_dialogue_name ON dialogue(name_id);
    CREATE INDEX IF NOT EXISTS idx_dialoguespeaker_dialogue ON dialoguespeaker(dialogue_id);
    CREATE INDEX IF NOT EXISTS idx_dialoguespeaker_speaker ON dialoguespeaker(speaker_id);
    CREATE INDEX IF NOT EXISTS idx_fragment_dialogue ON fragment(dialogue_id);
    CREATE INDEX IF NOT EXISTS idx_fragment_speaker ON fragment(speaker_id);
    CREATE INDEX IF NOT EXISTS idx_fragment_text ON fragment(text_id);
    CREATE INDEX IF NOT EXISTS idx_fragmentconnection_source ON fragmentconnection(source_id);
    CREATE INDEX IF NOT EXISTS idx_fragmentconnection_target ON fragmentconnection(target_id);
";

/// Source id -> generated row id, for one table
type RowIds = HashMap<String, i64>;

/// Rows written by [`StoryDatabase::materialize`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeStats {
    pub assets: usize,
    pub localizations: usize,
    pub entities: usize,
    pub dialogues: usize,
    pub dialogue_speakers: usize,
    pub fragments: usize,
    /// Fragments left out because their dialogue was never parsed
    pub skipped_fragments: usize,
    pub connections: usize,
}

/// SQLite story database
pub struct StoryDatabase {
    conn: Connection,
}

impl StoryDatabase {
    /// Open (or create) a database file and ensure the tables exist.
    ///
    /// Missing parent directories are created. Existing rows are left in place.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        tracing::debug!("Opened story database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Self { conn };
        db.create_tables()?;
        Ok(db)
    }

    /// Create every table and index that does not exist yet.
    pub fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Borrow the underlying connection for queries.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Write a resolved project into the database.
    ///
    /// # Errors
    /// Fails with `UnresolvedReference` when a row points at a key that was
    /// never parsed and with `MissingSpeaker` when a stored fragment has no
    /// speaker. The group being written is rolled back.
    pub fn materialize(&mut self, project: &Project) -> Result<MaterializeStats> {
        let mut stats = MaterializeStats::default();

        let tx = self.conn.transaction()?;
        let assets = insert_assets(&tx, project)?;
        tx.commit()?;
        stats.assets = assets.len();
        tracing::debug!("Stored {} assets", stats.assets);

        let tx = self.conn.transaction()?;
        let texts = insert_localization(&tx, project)?;
        tx.commit()?;
        stats.localizations = texts.len();
        tracing::debug!("Stored {} localization entries", stats.localizations);

        let tx = self.conn.transaction()?;
        let entities = insert_entities(&tx, project, &texts, &assets)?;
        tx.commit()?;
        stats.entities = entities.len();
        tracing::debug!("Stored {} entities", stats.entities);

        let tx = self.conn.transaction()?;
        let (dialogues, speaker_rows) = insert_dialogues(&tx, project, &texts, &entities)?;
        tx.commit()?;
        stats.dialogues = dialogues.len();
        stats.dialogue_speakers = speaker_rows;
        tracing::debug!("Stored {} dialogues, {} speaker links", stats.dialogues, speaker_rows);

        let tx = self.conn.transaction()?;
        let fragments = insert_fragments(&tx, project, &dialogues, &entities, &texts)?;
        tx.commit()?;
        stats.fragments = fragments.len();
        stats.skipped_fragments = project.fragments.len() - fragments.len();
        tracing::debug!("Stored {} fragments", stats.fragments);

        let tx = self.conn.transaction()?;
        stats.connections = insert_connections(&tx, project, &fragments)?;
        tx.commit()?;
        tracing::debug!("Stored {} fragment connections", stats.connections);

        Ok(stats)
    }
}

fn resolve(ids: &RowIds, kind: ReferenceKind, key: &str) -> Result<i64> {
    ids.get(key).copied().ok_or_else(|| Error::UnresolvedReference {
        kind,
        key: key.to_string(),
    })
}

fn insert_assets(tx: &Transaction<'_>, project: &Project) -> Result<RowIds> {
    let mut ids = RowIds::new();
    let mut stmt = tx.prepare("INSERT INTO asset (data, meta) VALUES (?1, ?2)")?;
    for (key, image) in &project.images {
        let meta = serde_json::json!({"width": image.width, "height": image.height});
        stmt.execute(params![image.uri, meta.to_string()])?;
        ids.insert(key.clone(), tx.last_insert_rowid());
    }
    Ok(ids)
}

fn insert_localization(tx: &Transaction<'_>, project: &Project) -> Result<RowIds> {
    let mut ids = RowIds::new();
    let mut stmt = tx.prepare("INSERT INTO localization (text) VALUES (?1)")?;
    for key in project.localization.keys() {
        let Some(text) = project.default_text(key) else {
            tracing::warn!("Localization '{}' has no default text, not stored", key);
            continue;
        };
        stmt.execute(params![text])?;
        ids.insert(key.clone(), tx.last_insert_rowid());
    }
    Ok(ids)
}

fn insert_entities(
    tx: &Transaction<'_>,
    project: &Project,
    texts: &RowIds,
    assets: &RowIds,
) -> Result<RowIds> {
    let mut ids = RowIds::new();
    let mut stmt = tx.prepare("INSERT INTO entity (name_id, preview_id) VALUES (?1, ?2)")?;
    for (key, entity) in &project.entities {
        let name = resolve(texts, ReferenceKind::Localization, &entity.name)?;
        let preview = resolve(assets, ReferenceKind::Asset, &entity.preview)?;
        stmt.execute(params![name, preview])?;
        ids.insert(key.clone(), tx.last_insert_rowid());
    }
    Ok(ids)
}

fn insert_dialogues(
    tx: &Transaction<'_>,
    project: &Project,
    texts: &RowIds,
    entities: &RowIds,
) -> Result<(RowIds, usize)> {
    let mut ids = RowIds::new();
    let mut speaker_rows = 0;
    let mut dialogue_stmt = tx.prepare("INSERT INTO dialogue (name_id) VALUES (?1)")?;
    let mut speaker_stmt =
        tx.prepare("INSERT INTO dialoguespeaker (dialogue_id, speaker_id) VALUES (?1, ?2)")?;

    for (key, dialogue) in &project.dialogues {
        let name = resolve(texts, ReferenceKind::Localization, &dialogue.name)?;
        dialogue_stmt.execute(params![name])?;
        let dialogue_id = tx.last_insert_rowid();
        ids.insert(key.clone(), dialogue_id);

        for speaker in &dialogue.speakers {
            let speaker_id = resolve(entities, ReferenceKind::Entity, speaker)?;
            speaker_stmt.execute(params![dialogue_id, speaker_id])?;
            speaker_rows += 1;
        }
    }
    Ok((ids, speaker_rows))
}

fn insert_fragments(
    tx: &Transaction<'_>,
    project: &Project,
    dialogues: &RowIds,
    entities: &RowIds,
    texts: &RowIds,
) -> Result<RowIds> {
    let mut ids = RowIds::new();
    let mut stmt = tx.prepare(
        "INSERT INTO fragment (dialogue_id, speaker_id, text_id) VALUES (?1, ?2, ?3)",
    )?;

    for (key, fragment) in &project.fragments {
        let Some(&dialogue_id) = dialogues.get(&fragment.dialogue) else {
            tracing::warn!(
                "Fragment '{}' belongs to unknown dialogue '{}', not stored",
                key,
                fragment.dialogue
            );
            continue;
        };
        let speaker = fragment.speaker.as_deref().ok_or_else(|| Error::MissingSpeaker {
            fragment: key.clone(),
        })?;
        let speaker_id = resolve(entities, ReferenceKind::Speaker, speaker)?;
        let text_id = resolve(texts, ReferenceKind::Localization, &fragment.text)?;

        stmt.execute(params![dialogue_id, speaker_id, text_id])?;
        ids.insert(key.clone(), tx.last_insert_rowid());
    }
    Ok(ids)
}

/// One row per output edge (source -> target) and one per input edge
/// (fragment -> its input), between stored fragments only.
fn insert_connections(
    tx: &Transaction<'_>,
    project: &Project,
    fragments: &RowIds,
) -> Result<usize> {
    let mut rows = 0;
    let mut stmt =
        tx.prepare("INSERT INTO fragmentconnection (source_id, target_id) VALUES (?1, ?2)")?;

    for (key, fragment) in &project.fragments {
        let Some(&source_id) = fragments.get(key) else {
            continue;
        };
        for other in fragment.outputs.iter().chain(&fragment.inputs) {
            if let Some(&target_id) = fragments.get(other) {
                stmt.execute(params![source_id, target_id])?;
                rows += 1;
            }
        }
    }
    Ok(rows)
}
