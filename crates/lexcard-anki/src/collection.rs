//! SQLite collection writer

use crate::error::Result;
use crate::model::NoteModel;
use crate::render::{cloze_indices, note_tags, strip_html};
use lexcard_domain::{Card, CardType};
use rusqlite::{params, Connection};
use serde_json::{json, Map, Value};
use sha1::{Digest, Sha1};
use std::path::Path;

/// Anki field separator inside `notes.flds`
pub const FIELD_SEPARATOR: char = '\x1f';

/// Collection under construction
///
/// Ids are derived from a millisecond timestamp fixed at creation, so one
/// collection never reuses an id.
pub struct Collection {
    conn: Connection,
    deck_id: i64,
    created_ms: i64,
    next_id: i64,
    notes: usize,
    cards: usize,
}

impl Collection {
    /// Create a collection file with one deck
    pub fn create<P: AsRef<Path>>(
        path: P,
        deck_id: i64,
        deck_name: &str,
        created_ms: i64,
    ) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;

        let collection = Self {
            conn,
            deck_id,
            created_ms,
            next_id: created_ms,
            notes: 0,
            cards: 0,
        };
        collection.write_col_row(deck_name)?;
        Ok(collection)
    }

    fn write_col_row(&self, deck_name: &str) -> Result<()> {
        let secs = self.created_ms / 1000;

        let mut models = Map::new();
        for model in [NoteModel::basic(), NoteModel::cloze()] {
            models.insert(model.id.to_string(), model.to_json(self.deck_id, secs));
        }

        let mut decks = Map::new();
        decks.insert("1".to_string(), deck_json(1, "Default", secs));
        decks.insert(self.deck_id.to_string(), deck_json(self.deck_id, deck_name, secs));

        let conf = json!({
            "activeDecks": [1],
            "curDeck": 1,
            "newSpread": 0,
            "collapseTime": 1200,
            "timeLim": 0,
            "estTimes": true,
            "dueCounts": true,
            "curModel": null,
            "nextPos": 1,
            "sortType": "noteFld",
            "sortBackwards": false,
            "addToCur": true
        });

        self.conn.execute(
            "INSERT INTO col (id, crt, mod, scm, ver, dty, usn, ls, conf, models, decks, dconf, tags)
             VALUES (1, ?1, ?2, ?2, 11, 0, 0, 0, ?3, ?4, ?5, ?6, '{}')",
            params![
                secs,
                self.created_ms,
                serde_json::to_string(&conf)?,
                serde_json::to_string(&Value::Object(models))?,
                serde_json::to_string(&Value::Object(decks))?,
                serde_json::to_string(&default_deck_conf())?,
            ],
        )?;
        Ok(())
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add one note and its cards
    ///
    /// Basic notes get one card. Cloze notes get one card per distinct
    /// deletion index, and one card when the text has none.
    pub fn add_card(&mut self, card: &Card) -> Result<()> {
        let model = NoteModel::for_card(card);
        let fields = model.field_values(card);
        let flds = fields.join(&FIELD_SEPARATOR.to_string());
        let sort_field = strip_html(fields.first().map(String::as_str).unwrap_or(""));

        let note_id = self.allocate_id();
        let modified = self.created_ms / 1000;
        self.conn.execute(
            "INSERT INTO notes (id, guid, mid, mod, usn, tags, flds, sfld, csum, flags, data)
             VALUES (?1, ?2, ?3, ?4, -1, ?5, ?6, ?7, ?8, 0, '')",
            params![
                note_id,
                guid_for(&flds),
                model.id,
                modified,
                note_tags(&card.tags),
                flds,
                sort_field,
                field_checksum(&sort_field),
            ],
        )?;
        self.notes += 1;

        let ordinals: Vec<u32> = match card.card_type {
            CardType::Basic => vec![0],
            CardType::Cloze => {
                let indices = cloze_indices(&card.answer);
                if indices.is_empty() {
                    vec![0]
                } else {
                    indices.into_iter().map(|n| n - 1).collect()
                }
            }
        };

        for ord in ordinals {
            let card_id = self.allocate_id();
            let due = i64::try_from(self.notes).unwrap_or(i64::MAX);
            self.conn.execute(
                "INSERT INTO cards (id, nid, did, ord, mod, usn, type, queue, due, ivl, factor,
                                    reps, lapses, left, odue, odid, flags, data)
                 VALUES (?1, ?2, ?3, ?4, ?5, -1, 0, 0, ?6, 0, 0, 0, 0, 0, 0, 0, 0, '')",
                params![card_id, note_id, self.deck_id, ord, modified, due],
            )?;
            self.cards += 1;
        }
        Ok(())
    }

    /// Number of notes written so far
    pub fn note_count(&self) -> usize {
        self.notes
    }

    /// Number of cards written so far
    pub fn card_count(&self) -> usize {
        self.cards
    }

    /// Flush and close the database
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }
}

fn deck_json(id: i64, name: &str, modified: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "desc": "",
        "mod": modified,
        "usn": -1,
        "collapsed": false,
        "browserCollapsed": false,
        "newToday": [0, 0],
        "revToday": [0, 0],
        "lrnToday": [0, 0],
        "timeToday": [0, 0],
        "dyn": 0,
        "conf": 1,
        "extendNew": 10,
        "extendRev": 50
    })
}

fn default_deck_conf() -> Value {
    json!({
        "1": {
            "id": 1,
            "name": "Default",
            "mod": 0,
            "usn": 0,
            "maxTaken": 60,
            "autoplay": true,
            "timer": 0,
            "replayq": true,
            "dyn": false,
            "new": {
                "delays": [1, 10],
                "ints": [1, 4, 7],
                "initialFactor": 2500,
                "order": 1,
                "perDay": 20,
                "bury": true,
                "separate": true
            },
            "rev": {
                "perDay": 100,
                "ease4": 1.3,
                "fuzz": 0.05,
                "ivlFct": 1,
                "maxIvl": 36500,
                "bury": true,
                "minSpace": 1
            },
            "lapse": {
                "delays": [10],
                "mult": 0,
                "minInt": 1,
                "leechFails": 8,
                "leechAction": 0
            }
        }
    })
}

/// First 8 hex digits of the SHA-1 of the sort field, as an integer
pub fn field_checksum(sort_field: &str) -> i64 {
    let digest = Sha1::digest(sort_field.as_bytes());
    i64::from(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
}

fn guid_for(flds: &str) -> String {
    Sha1::digest(flds.as_bytes())
        .iter()
        .take(8)
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_checksum() {
        // sha1("") = da39a3ee...
        assert_eq!(field_checksum(""), 0xda39a3ee);
        // sha1("abc") = a9993e36...
        assert_eq!(field_checksum("abc"), 0xa9993e36);
    }

    #[test]
    fn test_cloze_card_per_index() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut collection =
            Collection::create(dir.path().join("c.anki2"), 42, "deck", 1_700_000_000_000).unwrap();

        let mut cloze = Card::basic("", "{{c1::经营者}}不得{{c3::滥用}}");
        cloze.card_type = CardType::Cloze;
        collection.add_card(&cloze).unwrap();
        collection.add_card(&Card::basic("Q", "A")).unwrap();

        assert_eq!(collection.note_count(), 2);
        assert_eq!(collection.card_count(), 3);

        let mut stmt = collection
            .conn
            .prepare("SELECT ord FROM cards ORDER BY id")
            .unwrap();
        let ords: Vec<i64> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(ords, vec![0, 2, 0]);
    }
}
