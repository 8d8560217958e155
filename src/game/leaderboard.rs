use crate::error::StorageError;
use crate::model::{GameKind, LeaderboardEntry, Level};
use chrono::Local;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const SCORES_FILE: &str = "scores.json";
pub const MAX_ENTRIES: usize = 10;

/// Top scores per game, written through to `scores.json` after every change. Without a
/// backing file (or when writing fails) it keeps working from memory.
#[derive(Debug)]
pub struct Leaderboard {
    path: Option<PathBuf>,
    scores: HashMap<GameKind, Vec<LeaderboardEntry>>,
}

impl Leaderboard {
    pub fn open(data_dir: &Path) -> Self {
        let mut leaderboard = Self {
            path: Some(data_dir.join(SCORES_FILE)),
            scores: HashMap::new(),
        };

        // Load existing data
        leaderboard.load_all();
        leaderboard
    }

    pub fn in_memory() -> Self {
        let mut leaderboard = Self {
            path: None,
            scores: HashMap::new(),
        };
        leaderboard.load_all();
        leaderboard
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn load_all(&mut self) {
        // Initialize empty lists for all games
        for game in GameKind::all() {
            self.scores.insert(game, Vec::new());
        }

        let Some(path) = &self.path else {
            return;
        };
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(target: "leaderboard", "No scores at {} yet", path.display());
                return;
            }
            Err(e) => {
                warn!(target: "leaderboard", "Could not read {}: {}", path.display(), e);
                return;
            }
        };

        let stored: HashMap<String, Vec<LeaderboardEntry>> = match serde_json::from_str(&contents)
        {
            Ok(stored) => stored,
            Err(e) => {
                warn!(target: "leaderboard", "Ignoring corrupt {}: {}", path.display(), e);
                return;
            }
        };

        for (title, mut entries) in stored {
            match GameKind::from_title(&title) {
                Some(game) => {
                    rank_entries(&mut entries);
                    self.scores.insert(game, entries);
                }
                None => debug!(target: "leaderboard", "Skipping unknown game {:?}", title),
            }
        }
    }

    fn save_scores(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        }

        let ordered: BTreeMap<&str, &Vec<LeaderboardEntry>> = GameKind::all()
            .iter()
            .filter_map(|game| self.scores.get(game).map(|entries| (game.title(), entries)))
            .collect();
        let contents = serde_json::to_string_pretty(&ordered)?;

        // replace the file in one step so a failed write never leaves half a document
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, contents).map_err(|e| StorageError::io(&staging, e))?;
        fs::rename(&staging, path).map_err(|e| StorageError::io(path, e))?;
        Ok(())
    }

    /// Adds a score and persists the whole board. The entry stays in memory even when the
    /// write fails.
    pub fn record_score(
        &mut self,
        game: GameKind,
        name: &str,
        score: u32,
        level: Level,
    ) -> Result<(), StorageError> {
        let entry = LeaderboardEntry::new(game, name, score, level, Local::now());
        let entries = self.scores.entry(game).or_default();
        entries.push(entry);
        rank_entries(entries);

        info!(
            target: "leaderboard",
            "Recorded {} pts for {} in {} (level {})", score, name, game, level
        );
        self.save_scores()
    }

    pub fn top_scores(&self, game: GameKind, limit: usize) -> Vec<LeaderboardEntry> {
        self.scores
            .get(&game)
            .map(|scores| scores.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// 1-based position of `name`'s best entry, `None` when not on the board.
    pub fn rank_of(&self, game: GameKind, name: &str) -> Option<usize> {
        self.scores
            .get(&game)?
            .iter()
            .position(|entry| entry.name == name)
            .map(|index| index + 1)
    }

    pub fn clear_scores(&mut self, game: Option<GameKind>) -> Result<(), StorageError> {
        match game {
            Some(game) => {
                self.scores.insert(game, Vec::new());
            }
            None => self.scores.values_mut().for_each(Vec::clear),
        }
        self.save_scores()
    }
}

// Highest score first, ties broken by the higher level; stable, so earlier entries win
// remaining ties.
fn rank_entries(entries: &mut Vec<LeaderboardEntry>) {
    entries.sort_by(|a, b| b.score.cmp(&a.score).then(b.level.cmp(&a.level)));
    entries.truncate(MAX_ENTRIES);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::UsingLogger;
    use tempfile::tempdir;
    use test_context::test_context;

    fn level(n: u8) -> Level {
        Level::new(n).unwrap()
    }

    #[test]
    fn test_record_then_reload() {
        let dir = tempdir().unwrap();
        let mut leaderboard = Leaderboard::open(dir.path());
        leaderboard
            .record_score(GameKind::MemoryMatch, "Ada", 500, level(3))
            .unwrap();

        let reloaded = Leaderboard::open(dir.path());
        let top = reloaded.top_scores(GameKind::MemoryMatch, 10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "Ada");
        assert_eq!(top[0].score, 500);
        assert_eq!(top[0].level, level(3));
        assert_eq!(top[0].game, "Memory Match");
        assert_eq!(reloaded.rank_of(GameKind::MemoryMatch, "Ada"), Some(1));
        assert!(!dir.path().join("scores.json.tmp").exists());
    }

    #[test]
    fn test_sorted_by_score_then_level_and_capped() {
        let mut leaderboard = Leaderboard::in_memory();
        for (i, score) in [50, 300, 120, 300, 80, 10, 990, 45, 45, 700, 5, 600]
            .into_iter()
            .enumerate()
        {
            let lvl = level((i % 5) as u8 + 1);
            leaderboard
                .record_score(GameKind::NumberRush, &format!("p{}", i), score, lvl)
                .unwrap();
            let entries = leaderboard.top_scores(GameKind::NumberRush, usize::MAX);
            assert!(entries.len() <= MAX_ENTRIES);
            for pair in entries.windows(2) {
                assert!(
                    (pair[0].score, pair[0].level) >= (pair[1].score, pair[1].level),
                    "{:?} ranked above {:?}",
                    pair[0],
                    pair[1]
                );
            }
        }

        let top = leaderboard.top_scores(GameKind::NumberRush, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].score, 990);
        // equal scores: p3 (level 4) outranks p1 (level 2)
        assert_eq!(top[3].name, "p3");
        assert_eq!(top[4].name, "p1");
        assert!(top.iter().all(|entry| entry.score > 10));
    }

    #[test]
    fn test_top_scores_is_idempotent_and_limited() {
        let mut leaderboard = Leaderboard::in_memory();
        leaderboard.record_score(GameKind::ColorBlast, "Ada", 100, level(1)).unwrap();
        leaderboard.record_score(GameKind::ColorBlast, "Grace", 200, level(1)).unwrap();

        let first = leaderboard.top_scores(GameKind::ColorBlast, 10);
        let second = leaderboard.top_scores(GameKind::ColorBlast, 10);
        assert_eq!(first, second);
        assert_eq!(leaderboard.top_scores(GameKind::ColorBlast, 1).len(), 1);
        assert!(leaderboard.top_scores(GameKind::MemoryMatch, 10).is_empty());
    }

    #[test]
    fn test_rank_of_first_match_or_none() {
        let mut leaderboard = Leaderboard::in_memory();
        leaderboard.record_score(GameKind::ColorBlast, "Ada", 100, level(1)).unwrap();
        leaderboard.record_score(GameKind::ColorBlast, "Grace", 200, level(1)).unwrap();
        leaderboard.record_score(GameKind::ColorBlast, "Ada", 300, level(1)).unwrap();

        assert_eq!(leaderboard.rank_of(GameKind::ColorBlast, "Ada"), Some(1));
        assert_eq!(leaderboard.rank_of(GameKind::ColorBlast, "Grace"), Some(2));
        assert_eq!(leaderboard.rank_of(GameKind::ColorBlast, "Linus"), None);
        assert_eq!(leaderboard.rank_of(GameKind::NumberRush, "Ada"), None);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_corrupt_file_loads_empty(_: &mut UsingLogger) {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SCORES_FILE), "[[[ definitely not scores").unwrap();

        let leaderboard = Leaderboard::open(dir.path());
        for game in GameKind::all() {
            assert!(leaderboard.top_scores(game, 10).is_empty());
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let leaderboard = Leaderboard::open(&dir.path().join("not-created-yet"));
        for game in GameKind::all() {
            assert!(leaderboard.top_scores(game, 10).is_empty());
        }
    }

    #[test]
    fn test_loads_document_and_skips_unknown_titles() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(SCORES_FILE),
            r#"{
                "Number Rush": [
                    {"name": "Low", "score": 10, "level": 1, "timestamp": "2024-01-01 10:00", "game": "Number Rush"},
                    {"name": "High", "score": 900, "level": 2, "timestamp": "2024-01-02 10:00", "game": "Number Rush"}
                ],
                "Tetris": [
                    {"name": "Nobody", "score": 1, "level": 1, "timestamp": "2024-01-01 10:00", "game": "Tetris"}
                ]
            }"#,
        )
        .unwrap();

        let leaderboard = Leaderboard::open(dir.path());
        let names: Vec<String> = leaderboard
            .top_scores(GameKind::NumberRush, 10)
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names, vec!["High", "Low"]);
        assert!(leaderboard.top_scores(GameKind::ColorBlast, 10).is_empty());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_write_failure_keeps_entry_in_memory(_: &mut UsingLogger) {
        let dir = tempdir().unwrap();
        // a file where the data directory should be makes every write fail
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "").unwrap();

        let mut leaderboard = Leaderboard::open(&blocker);
        let result = leaderboard.record_score(GameKind::MemoryMatch, "Ada", 70, level(1));
        assert!(result.is_err());
        assert_eq!(leaderboard.rank_of(GameKind::MemoryMatch, "Ada"), Some(1));
    }

    #[test]
    fn test_clear_scores() {
        let dir = tempdir().unwrap();
        let mut leaderboard = Leaderboard::open(dir.path());
        leaderboard.record_score(GameKind::MemoryMatch, "Ada", 70, level(1)).unwrap();
        leaderboard.record_score(GameKind::ColorBlast, "Ada", 70, level(1)).unwrap();

        leaderboard.clear_scores(Some(GameKind::MemoryMatch)).unwrap();
        assert!(leaderboard.top_scores(GameKind::MemoryMatch, 10).is_empty());
        assert_eq!(leaderboard.top_scores(GameKind::ColorBlast, 10).len(), 1);

        leaderboard.clear_scores(None).unwrap();
        let reloaded = Leaderboard::open(dir.path());
        for game in GameKind::all() {
            assert!(reloaded.top_scores(game, 10).is_empty());
        }
    }
}
