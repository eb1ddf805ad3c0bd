use crate::consts;
use crate::options::GameMode;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// The best scores achieved in each game mode, highest first
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Leaderboard {
    /// Where the leaderboard is saved.  If `None`, scores are only kept for
    /// as long as the program runs.
    path: Option<PathBuf>,

    /// All entries for all modes, sorted by score, highest first.  Entries
    /// with equal scores are in the order they were submitted.
    entries: Vec<Entry>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Entry {
    pub(crate) name: String,
    pub(crate) score: u32,
    pub(crate) mode: GameMode,
}

impl Leaderboard {
    /// Create a leaderboard that is not backed by any file
    pub(crate) fn in_memory() -> Leaderboard {
        Leaderboard::default()
    }

    /// Read the leaderboard stored at `path`.  A missing file is treated as
    /// an empty leaderboard.
    pub(crate) fn load(path: PathBuf) -> Result<Leaderboard, LoadError> {
        let src = match fs_err::read(&path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Leaderboard {
                    path: Some(path),
                    entries: Vec::new(),
                })
            }
            Err(e) => return Err(LoadError::read(e)),
        };
        let mut entries =
            serde_json::from_slice::<Vec<Entry>>(&src).map_err(LoadError::deserialize)?;
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        let mut board = Leaderboard {
            path: Some(path),
            entries,
        };
        board.trim();
        Ok(board)
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Iterate over the entries for the given mode, best first
    pub(crate) fn top(&self, mode: GameMode) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.iter().filter(move |e| e.mode == mode)
    }

    /// Return the best score for the given mode, if any
    pub(crate) fn best(&self, mode: GameMode) -> Option<u32> {
        self.top(mode).next().map(|e| e.score)
    }

    /// Return the rank that `score` would receive if it were submitted now,
    /// or `None` if it would not make the leaderboard
    pub(crate) fn would_rank(&self, score: u32, mode: GameMode) -> Option<NonZeroUsize> {
        let ahead = self.top(mode).take_while(|e| e.score >= score).count();
        (ahead < consts::LEADERBOARD_SIZE)
            .then(|| NonZeroUsize::new(ahead + 1))
            .flatten()
    }

    /// Record a finished game.  Returns the 1-based rank of the new entry
    /// among the entries for its mode, or `None` if it did not make the
    /// leaderboard, in which case nothing is written.
    ///
    /// The name is trimmed and truncated to
    /// [`MAX_NAME_LENGTH`][consts::MAX_NAME_LENGTH] grapheme clusters; a
    /// name that is empty after trimming is rejected.
    pub(crate) fn submit(
        &mut self,
        name: &str,
        score: u32,
        mode: GameMode,
    ) -> Result<Option<NonZeroUsize>, SaveError> {
        let name = sanitize_name(name).ok_or_else(SaveError::empty_name)?;
        let Some(rank) = self.would_rank(score, mode) else {
            log::info!("Score {score} by {name:?} did not make the {mode} leaderboard");
            return Ok(None);
        };
        let index = self.entries.partition_point(|e| e.score >= score);
        self.entries.insert(index, Entry { name, score, mode });
        self.trim();
        self.save()?;
        log::info!("Score {score} entered the {mode} leaderboard at #{rank}");
        Ok(Some(rank))
    }

    /// Drop entries beyond the per-mode limit
    fn trim(&mut self) {
        let mut classic = 0;
        let mut endless = 0;
        self.entries.retain(|e| {
            let seen = match e.mode {
                GameMode::Classic => &mut classic,
                GameMode::Endless => &mut endless,
            };
            *seen += 1;
            *seen <= consts::LEADERBOARD_SIZE
        });
    }

    fn save(&self) -> Result<(), SaveError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src = serde_json::to_string_pretty(&self.entries).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(path, &src).map_err(SaveError::write)?;
        Ok(())
    }
}

/// Trim a player name and cut it down to the maximum length.  Returns `None`
/// if nothing is left.
pub(crate) fn sanitize_name(name: &str) -> Option<String> {
    let name = name
        .trim()
        .graphemes(true)
        .take(consts::MAX_NAME_LENGTH)
        .collect::<String>();
    let name = name.trim_end();
    (!name.is_empty()).then(|| name.to_owned())
}

#[derive(Debug, Error)]
#[error("Failed to save score to leaderboard")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn empty_name() -> Self {
        SaveError(SaveErrorSource::EmptyName)
    }

    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("player name is empty")]
    EmptyName,
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize leaderboard")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write leaderboard to disk")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Failed to read leaderboard from disk")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    fn deserialize(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(e))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to read leaderboard file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize leaderboard")]
    Deserialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn ranks(board: &Leaderboard, mode: GameMode) -> Vec<(String, u32)> {
        board
            .top(mode)
            .map(|e| (e.name.clone(), e.score))
            .collect()
    }

    #[test]
    fn load_missing_file() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("nested").join("leaderboard.json");
        let board = Leaderboard::load(path.clone()).unwrap();
        assert_eq!(board.top(GameMode::Classic).count(), 0);
        assert_eq!(board.path(), Some(path.as_path()));
    }

    #[test]
    fn submit_and_reload() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("nested").join("leaderboard.json");
        let mut board = Leaderboard::load(path.clone()).unwrap();
        assert_eq!(
            board.submit("Alice", 50, GameMode::Classic).unwrap(),
            NonZeroUsize::new(1)
        );
        assert_eq!(
            board.submit("Bob", 70, GameMode::Classic).unwrap(),
            NonZeroUsize::new(1)
        );
        assert_eq!(
            board.submit("Carol", 60, GameMode::Endless).unwrap(),
            NonZeroUsize::new(1)
        );
        assert_eq!(
            board.submit("Dave", 60, GameMode::Classic).unwrap(),
            NonZeroUsize::new(2)
        );
        let reloaded = Leaderboard::load(path).unwrap();
        assert_eq!(reloaded, board);
        assert_eq!(
            ranks(&reloaded, GameMode::Classic),
            [
                (String::from("Bob"), 70),
                (String::from("Dave"), 60),
                (String::from("Alice"), 50),
            ]
        );
        assert_eq!(
            ranks(&reloaded, GameMode::Endless),
            [(String::from("Carol"), 60)]
        );
        assert_eq!(reloaded.best(GameMode::Classic), Some(70));
    }

    #[test]
    fn ties_rank_below_existing() {
        let mut board = Leaderboard::in_memory();
        board.submit("first", 40, GameMode::Classic).unwrap();
        assert_eq!(
            board.submit("second", 40, GameMode::Classic).unwrap(),
            NonZeroUsize::new(2)
        );
        assert_eq!(
            ranks(&board, GameMode::Classic),
            [(String::from("first"), 40), (String::from("second"), 40)]
        );
    }

    #[test]
    fn keeps_top_ten_per_mode() {
        let mut board = Leaderboard::in_memory();
        for i in 1..=10 {
            board
                .submit(&format!("p{i}"), i * 10, GameMode::Classic)
                .unwrap();
        }
        board.submit("endless", 5, GameMode::Endless).unwrap();
        assert_eq!(board.would_rank(10, GameMode::Classic), None);
        assert_eq!(board.submit("low", 10, GameMode::Classic).unwrap(), None);
        assert_eq!(
            board.submit("mid", 55, GameMode::Classic).unwrap(),
            NonZeroUsize::new(6)
        );
        let classic = ranks(&board, GameMode::Classic);
        assert_eq!(classic.len(), 10);
        assert_eq!(classic[0], (String::from("p10"), 100));
        assert_eq!(classic[4], (String::from("p6"), 60));
        assert_eq!(classic[5], (String::from("mid"), 55));
        assert_eq!(classic[9], (String::from("p2"), 20));
        assert_eq!(
            ranks(&board, GameMode::Endless),
            [(String::from("endless"), 5)]
        );
    }

    #[test]
    fn no_write_when_not_ranked() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("leaderboard.json");
        let mut board = Leaderboard::load(path.clone()).unwrap();
        for i in 1..=10 {
            board.submit("x", 100 + i, GameMode::Endless).unwrap();
        }
        let before = fs_err::read_to_string(&path).unwrap();
        assert_eq!(board.submit("y", 0, GameMode::Endless).unwrap(), None);
        assert_eq!(fs_err::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn empty_name_rejected() {
        let mut board = Leaderboard::in_memory();
        assert!(board.submit("   ", 30, GameMode::Classic).is_err());
        assert_eq!(board.top(GameMode::Classic).count(), 0);
    }

    #[test]
    fn load_unsorted_file() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("leaderboard.json");
        fs_err::write(
            &path,
            r#"[
                {"name": "low", "score": 10, "mode": "classic"},
                {"name": "high", "score": 90, "mode": "classic"},
                {"name": "scroll", "score": 20, "mode": "endless"}
            ]"#,
        )
        .unwrap();
        let board = Leaderboard::load(path).unwrap();
        assert_eq!(
            ranks(&board, GameMode::Classic),
            [(String::from("high"), 90), (String::from("low"), 10)]
        );
        assert_eq!(board.best(GameMode::Endless), Some(20));
    }

    #[test]
    fn load_garbage() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("leaderboard.json");
        fs_err::write(&path, "{\"scores\": 3}").unwrap();
        assert!(Leaderboard::load(path).is_err());
    }

    #[rstest]
    #[case("Alice", Some("Alice"))]
    #[case("  Bob  ", Some("Bob"))]
    #[case("", None)]
    #[case(" \t ", None)]
    #[case("abcdefghijklmnopqrstuvwxyz", Some("abcdefghijklmnopqrst"))]
    #[case("abcdefghijklmnopqrs tuvwxyz", Some("abcdefghijklmnopqrs"))]
    #[case("🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍", Some("🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍🐍"))]
    fn test_sanitize_name(#[case] name: &str, #[case] r: Option<&str>) {
        assert_eq!(sanitize_name(name).as_deref(), r);
    }
}
