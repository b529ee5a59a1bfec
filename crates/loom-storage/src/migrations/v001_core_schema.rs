//! Entries, representations, assets, memories, the per-owner chain, typed
//! relationships, and the chat-stream counters (§3).

use rusqlite::Connection;

use loom_core::errors::LoomResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> LoomResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS entries (
            id          TEXT PRIMARY KEY,
            public_id   TEXT NOT NULL UNIQUE,
            owner_id    TEXT NOT NULL,
            entry_type  TEXT NOT NULL,
            title       TEXT NOT NULL,
            metadata    TEXT NOT NULL DEFAULT '{}',
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL,
            version     INTEGER NOT NULL DEFAULT 1,
            provenance  TEXT,
            chain_hash  TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_entries_owner ON entries (owner_id);
        CREATE INDEX IF NOT EXISTS idx_entries_owner_type ON entries (owner_id, entry_type);

        CREATE TABLE IF NOT EXISTS representations (
            id          TEXT PRIMARY KEY,
            entry_id    TEXT NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
            form        TEXT NOT NULL,
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL,
            UNIQUE (entry_id, form)
        );
        CREATE INDEX IF NOT EXISTS idx_representations_entry ON representations (entry_id);

        CREATE TABLE IF NOT EXISTS assets (
            id            TEXT PRIMARY KEY,
            entry_id      TEXT NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
            content_type  TEXT NOT NULL,
            byte_len      INTEGER NOT NULL,
            storage_key   TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_assets_entry ON assets (entry_id);

        CREATE TABLE IF NOT EXISTS memories (
            id                TEXT PRIMARY KEY,
            owner_id          TEXT NOT NULL,
            source_entry_id   TEXT NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
            chunk_index       INTEGER NOT NULL,
            kind              TEXT NOT NULL,
            content           TEXT NOT NULL,
            confidence        REAL NOT NULL,
            valid_from        TEXT NOT NULL,
            valid_until       TEXT,
            source_agent      TEXT NOT NULL,
            derivation_depth  INTEGER NOT NULL DEFAULT 0,
            derived_from      TEXT,
            content_hash      TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_memories_owner ON memories (owner_id);
        CREATE INDEX IF NOT EXISTS idx_memories_owner_hash ON memories (owner_id, content_hash);
        CREATE INDEX IF NOT EXISTS idx_memories_source_entry ON memories (source_entry_id);
        CREATE INDEX IF NOT EXISTS idx_memories_owner_valid ON memories (owner_id, valid_until);

        CREATE TABLE IF NOT EXISTS chain_records (
            owner_id        TEXT NOT NULL,
            sequence        INTEGER NOT NULL,
            previous_hash   TEXT NOT NULL,
            this_hash       TEXT NOT NULL,
            entry_id        TEXT NOT NULL,
            memory_id       TEXT NOT NULL,
            kind            TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            PRIMARY KEY (owner_id, sequence)
        );

        CREATE TABLE IF NOT EXISTS relationships (
            id                   TEXT PRIMARY KEY,
            source_entry_id      TEXT NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
            target_entry_id      TEXT NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
            relationship_type    TEXT NOT NULL,
            metadata             TEXT,
            UNIQUE (source_entry_id, target_entry_id, relationship_type)
        );
        CREATE INDEX IF NOT EXISTS idx_relationships_source ON relationships (source_entry_id, relationship_type);
        CREATE INDEX IF NOT EXISTS idx_relationships_target ON relationships (target_entry_id, relationship_type);

        CREATE TABLE IF NOT EXISTS chat_streams (
            entry_id          TEXT PRIMARY KEY REFERENCES entries (id) ON DELETE CASCADE,
            message_count     INTEGER NOT NULL DEFAULT 0,
            last_message_at   TEXT,
            last_role         TEXT,
            last_message_id   TEXT,
            last_extraction_enqueued_at TEXT
        );

        CREATE VIRTUAL TABLE IF NOT EXISTS memories_fts USING fts5 (
            content,
            content='memories',
            content_rowid='rowid'
        );
        CREATE TRIGGER IF NOT EXISTS memories_fts_insert AFTER INSERT ON memories BEGIN
            INSERT INTO memories_fts (rowid, content) VALUES (new.rowid, new.content);
        END;
        CREATE TRIGGER IF NOT EXISTS memories_fts_delete AFTER DELETE ON memories BEGIN
            INSERT INTO memories_fts (memories_fts, rowid, content) VALUES ('delete', old.rowid, old.content);
        END;
        CREATE TRIGGER IF NOT EXISTS memories_fts_update AFTER UPDATE ON memories BEGIN
            INSERT INTO memories_fts (memories_fts, rowid, content) VALUES ('delete', old.rowid, old.content);
            INSERT INTO memories_fts (rowid, content) VALUES (new.rowid, new.content);
        END;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
