use super::{Score, ScoreTable};
use crate::{Difficulty, ScoreError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default score file, relative to the working directory.
pub const SCORE_FILE: &str = "MineScores.txt";

/// Ranking tables for every difficulty, backed by a flat `;`-delimited file.
///
/// High-score queries answer `false` while the backing file does not exist;
/// the caller decides whether to [`create_file`](Self::create_file).
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
    tables: BTreeMap<Difficulty, ScoreTable>,
    file_exists: bool,
}

impl ScoreStore {
    /// Loads the score file at `path`. A missing or unreadable file yields
    /// empty tables.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut store = Self::empty(path.clone());
        store.file_exists = path.exists();

        if store.file_exists {
            match fs::read_to_string(&path) {
                Ok(text) => match store.load_str(&text) {
                    Ok(count) => log::debug!("loaded {} scores from {}", count, path.display()),
                    Err(e) => log::warn!("stopped reading {}: {}", path.display(), e),
                },
                Err(e) => log::warn!("could not read {}: {}", path.display(), e),
            }
        } else {
            log::info!("score file {} does not exist", path.display());
        }

        store
    }

    fn empty(path: PathBuf) -> Self {
        let tables = Difficulty::ALL
            .into_iter()
            .map(|difficulty| (difficulty, ScoreTable::new(difficulty)))
            .collect();
        Self {
            path,
            tables,
            file_exists: false,
        }
    }

    /// Adds every line of `text` to the tables. Stops at the first bad line,
    /// keeping what was loaded before it.
    pub fn load_str(&mut self, text: &str) -> Result<usize, ScoreError> {
        let mut count = 0;
        for line in text.lines() {
            let (difficulty, score) = parse_line(line)?;
            self.table_mut(difficulty).add_score(score.name(), score.time());
            count += 1;
        }
        Ok(count)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_exists(&self) -> bool {
        self.file_exists
    }

    /// Writes an empty score file, enabling high-score queries.
    pub fn create_file(&mut self) -> Result<(), ScoreError> {
        fs::write(&self.path, "")?;
        self.file_exists = true;
        log::info!("created score file {}", self.path.display());
        Ok(())
    }

    pub fn table(&self, difficulty: Difficulty) -> &ScoreTable {
        &self.tables[&difficulty]
    }

    fn table_mut(&mut self, difficulty: Difficulty) -> &mut ScoreTable {
        self.tables
            .entry(difficulty)
            .or_insert_with(|| ScoreTable::new(difficulty))
    }

    pub fn is_high_score(&self, difficulty: Difficulty, time: f64) -> bool {
        self.file_exists && self.table(difficulty).is_high_score(time)
    }

    pub fn add_score(
        &mut self,
        difficulty: Difficulty,
        name: impl Into<String>,
        time: f64,
    ) -> Option<usize> {
        self.table_mut(difficulty).add_score(name, time)
    }

    /// The file contents for the current tables.
    pub fn serialize(&self) -> String {
        self.tables.values().map(ScoreTable::to_string).collect()
    }

    /// Overwrites the score file with every table.
    pub fn write(&mut self) -> Result<(), ScoreError> {
        fs::write(&self.path, self.serialize())?;
        self.file_exists = true;
        log::debug!("wrote scores to {}", self.path.display());
        Ok(())
    }

    /// Clears every table and empties the score file.
    pub fn reset(&mut self) -> Result<(), ScoreError> {
        for (&difficulty, table) in self.tables.iter_mut() {
            *table = ScoreTable::new(difficulty);
        }
        self.write()
    }
}

/// Parses one `difficulty;name;time` line. Any `;` between the first and
/// last field belongs to the name.
pub fn parse_line(line: &str) -> Result<(Difficulty, Score), ScoreError> {
    let fields: Vec<&str> = line.split(';').collect();
    let [key, name @ .., time] = fields.as_slice() else {
        return Err(ScoreError::MissingFields {
            line: line.to_string(),
        });
    };
    if name.is_empty() {
        return Err(ScoreError::MissingFields {
            line: line.to_string(),
        });
    }

    let difficulty = key
        .parse::<Difficulty>()
        .map_err(|_| ScoreError::UnknownDifficulty {
            line: line.to_string(),
            difficulty: key.to_string(),
        })?;
    let time = time
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|&t| Score::is_valid_time(t))
        .ok_or_else(|| ScoreError::InvalidTime {
            line: line.to_string(),
            value: time.to_string(),
        })?;

    Ok((difficulty, Score::new(name.join(";"), time)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "minesweeper-engine-{}-{}.txt",
            std::process::id(),
            name
        ))
    }

    #[test]
    fn test_parse_line() {
        let (difficulty, score) = parse_line("easy;Al;12.3").unwrap();
        assert_eq!(difficulty, Difficulty::Easy);
        assert_eq!(score, Score::new("Al", 12.3));
    }

    #[test]
    fn test_parse_line_rejoins_name() {
        let (_, score) = parse_line("expert;A;B;;C;4.0").unwrap();
        assert_eq!(score.name(), "A;B;;C");
        assert_eq!(score.time(), 4.0);
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(matches!(
            parse_line("easy;12.3"),
            Err(ScoreError::MissingFields { .. })
        ));
        assert!(matches!(parse_line(""), Err(ScoreError::MissingFields { .. })));
        assert!(matches!(
            parse_line("easy;Al;fast"),
            Err(ScoreError::InvalidTime { .. })
        ));
        assert!(matches!(
            parse_line("easy;Al;-1.0"),
            Err(ScoreError::InvalidTime { .. })
        ));
        assert!(matches!(
            parse_line("hard;Al;1.0"),
            Err(ScoreError::UnknownDifficulty { .. })
        ));
    }

    #[test]
    fn test_load_stops_at_bad_line() {
        let mut store = ScoreStore::empty(temp_path("unused"));
        let text = "easy;Al;12.3\nmedium;Bo;40.0\nbroken\neasy;Cy;1.0\n";

        assert!(store.load_str(text).is_err());
        assert_eq!(store.table(Difficulty::Easy).len(), 1);
        assert_eq!(store.table(Difficulty::Medium).len(), 1);
    }

    #[test]
    fn test_load_reorders_by_time() {
        let mut store = ScoreStore::empty(temp_path("unused"));
        store
            .load_str("easy;Slow;30.0\nexpert;X;200.5\neasy;Fast;10.0\n")
            .unwrap();

        let easy = store.table(Difficulty::Easy);
        assert_eq!(easy.scores()[0].name(), "Fast");
        assert_eq!(easy.scores()[1].name(), "Slow");
        assert_eq!(store.table(Difficulty::Expert).len(), 1);
    }

    #[test]
    fn test_missing_file_gates_high_scores() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);

        let mut store = ScoreStore::open(&path);
        assert!(!store.file_exists());
        assert!(!store.is_high_score(Difficulty::Easy, 1.0));

        store.create_file().unwrap();
        assert!(store.file_exists());
        assert!(store.is_high_score(Difficulty::Easy, 1.0));
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_and_reopen() {
        let path = temp_path("roundtrip");
        let _ = fs::remove_file(&path);
        let mut store = ScoreStore::open(&path);
        store.add_score(Difficulty::Easy, "Al", 12.3);
        store.add_score(Difficulty::Expert, "A;B", 99.9);
        store.add_score(Difficulty::Easy, "Bo", 8.0);
        store.write().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "easy;Bo;8.0\neasy;Al;12.3\nexpert;A;B;99.9\n"
        );

        let reopened = ScoreStore::open(&path);
        assert!(reopened.file_exists());
        assert_eq!(reopened.table(Difficulty::Easy), store.table(Difficulty::Easy));
        assert_eq!(reopened.table(Difficulty::Expert).scores()[0].name(), "A;B");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_written_file_reads_back_whole() {
        let path = temp_path("bad-times");
        let _ = fs::remove_file(&path);
        let mut store = ScoreStore::open(&path);
        assert_eq!(store.add_score(Difficulty::Easy, "neg", -1.0), None);
        assert_eq!(store.add_score(Difficulty::Easy, "nan", f64::NAN), None);
        store.add_score(Difficulty::Easy, "a", 12.34);
        store.add_score(Difficulty::Medium, "Al", 40.0);
        store.add_score(Difficulty::Expert, "Bo", 90.0);
        store.write().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "easy;a;12.3\nmedium;Al;40.0\nexpert;Bo;90.0\n"
        );

        let reopened = ScoreStore::open(&path);
        for difficulty in Difficulty::ALL {
            assert_eq!(reopened.table(difficulty), store.table(difficulty));
        }

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_reset_empties_file() {
        let path = temp_path("reset");
        let _ = fs::remove_file(&path);
        let mut store = ScoreStore::open(&path);
        store.add_score(Difficulty::Medium, "Al", 50.0);
        store.write().unwrap();

        store.reset().unwrap();

        assert!(store.table(Difficulty::Medium).is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        fs::remove_file(&path).unwrap();
    }
}
