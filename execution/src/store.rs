use poker_types::{Error as TypesError, League};
use std::{
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::tape::{FileTape, Tape};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("problem loading player store: {0}")]
    Decode(#[source] TypesError),
    #[error("problem saving player store: {0}")]
    Encode(#[source] TypesError),
}

/// Durable ledger of wins per player.
pub trait PlayerStore: Send + Sync + 'static {
    /// Ranking view of the ledger, sorted by descending wins.
    fn league(&self) -> League;

    /// Wins recorded for `name`, or zero if the player has never won.
    fn player_score(&self, name: &str) -> u64;

    /// Add a win for `name` (creating the player if needed) and persist the
    /// full ledger.
    fn record_win(&self, name: &str) -> Result<(), StoreError>;
}

impl<S: PlayerStore + ?Sized> PlayerStore for Arc<S> {
    fn league(&self) -> League {
        (**self).league()
    }

    fn player_score(&self, name: &str) -> u64 {
        (**self).player_score(name)
    }

    fn record_win(&self, name: &str) -> Result<(), StoreError> {
        (**self).record_win(name)
    }
}

struct Ledger<T: Tape> {
    tape: T,
    league: League,
}

/// [PlayerStore] backed by a [Tape].
///
/// The decoded ledger is cached in memory and only replaced after the tape
/// has accepted the new snapshot, so memory and tape never disagree.
pub struct FileSystemPlayerStore<T: Tape> {
    ledger: Mutex<Ledger<T>>,
}

impl FileSystemPlayerStore<FileTape> {
    /// Open (or create) the ledger file at `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let tape = FileTape::open(path)?;
        info!(path = ?tape.path(), "opened player store");
        Self::new(tape)
    }
}

impl<T: Tape> FileSystemPlayerStore<T> {
    /// Load the ledger from `tape`.
    ///
    /// Blank content is initialised to an empty ledger and unparseable content
    /// is treated as empty. Valid JSON of the wrong shape is an error.
    pub fn new(mut tape: T) -> Result<Self, StoreError> {
        let bytes = tape.load()?;
        let league = match League::from_slice(&bytes) {
            Ok(league) => {
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    tape.replace(b"[]")?;
                }
                league
            }
            Err(TypesError::Decode(e)) if e.is_syntax() || e.is_eof() => {
                warn!(error = %e, "player store is malformed, starting from an empty league");
                League::default()
            }
            Err(e) => return Err(StoreError::Decode(e)),
        };

        Ok(Self {
            ledger: Mutex::new(Ledger { tape, league }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Ledger<T>> {
        match self.ledger.lock() {
            Ok(ledger) => ledger,
            Err(poisoned) => {
                // The cached league is only swapped after a successful persist
                error!("player store lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

impl<T: Tape> PlayerStore for FileSystemPlayerStore<T> {
    fn league(&self) -> League {
        self.lock().league.sorted()
    }

    fn player_score(&self, name: &str) -> u64 {
        self.lock().league.find(name).map_or(0, |p| p.wins)
    }

    fn record_win(&self, name: &str) -> Result<(), StoreError> {
        let mut ledger = self.lock();

        let mut league = ledger.league.clone();
        let wins = league.record_win(name);
        let bytes = league.to_vec().map_err(StoreError::Encode)?;
        ledger.tape.replace(&bytes)?;
        ledger.league = league;

        info!(player = name, wins, "recorded win");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::MemoryTape;
    use poker_types::Player;
    use std::{fs, io, thread};
    use tempfile::tempdir;

    const LEDGER: &str = r#"[
        {"Name": "Cleo", "Wins": 10},
        {"Name": "Chris", "Wins": 33}]"#;

    /// Tape whose writes always fail.
    struct BrokenTape {
        content: Vec<u8>,
    }

    impl Tape for BrokenTape {
        fn load(&mut self) -> io::Result<Vec<u8>> {
            Ok(self.content.clone())
        }

        fn replace(&mut self, _: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn league_sorted_by_scores() {
        let store = FileSystemPlayerStore::new(MemoryTape::new(LEDGER)).unwrap();
        let want = League::new(vec![Player::new("Chris", 33), Player::new("Cleo", 10)]);

        assert_eq!(store.league(), want);
        // Reading again gives the same view
        assert_eq!(store.league(), want);
    }

    #[test]
    fn get_player_score() {
        let store = FileSystemPlayerStore::new(MemoryTape::new(LEDGER)).unwrap();
        assert_eq!(store.player_score("Chris"), 33);
        assert_eq!(store.player_score("Floyd"), 0);
    }

    #[test]
    fn store_wins_for_existing_and_new_players() {
        let store = FileSystemPlayerStore::new(MemoryTape::new(LEDGER)).unwrap();

        store.record_win("Chris").unwrap();
        assert_eq!(store.player_score("Chris"), 34);

        store.record_win("Pepper").unwrap();
        assert_eq!(store.player_score("Pepper"), 1);

        assert_eq!(
            store.league(),
            League::new(vec![
                Player::new("Chris", 34),
                Player::new("Cleo", 10),
                Player::new("Pepper", 1),
            ])
        );
    }

    #[test]
    fn works_with_an_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game.db.json");
        fs::write(&path, "").unwrap();

        let store = FileSystemPlayerStore::from_path(&path).unwrap();
        assert!(store.league().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn malformed_content_is_an_empty_league() {
        // Truncated
        let store = FileSystemPlayerStore::new(MemoryTape::new("[{\"Name\": \"Cle")).unwrap();
        assert!(store.league().is_empty());

        // Not JSON at all
        let store = FileSystemPlayerStore::new(MemoryTape::new("Cleo won")).unwrap();
        assert!(store.league().is_empty());
        store.record_win("Cleo").unwrap();
        assert_eq!(store.player_score("Cleo"), 1);
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let result = FileSystemPlayerStore::new(MemoryTape::new(r#"{"Name": "Cleo"}"#));
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }

    #[test]
    fn wins_survive_reopening_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game.db.json");
        fs::write(&path, LEDGER).unwrap();

        {
            let store = FileSystemPlayerStore::from_path(&path).unwrap();
            store.record_win("Cleo").unwrap();
            store.record_win("Ruth").unwrap();
        }

        let store = FileSystemPlayerStore::from_path(&path).unwrap();
        assert_eq!(store.player_score("Cleo"), 11);
        assert_eq!(store.player_score("Ruth"), 1);
        assert_eq!(store.player_score("Chris"), 33);
    }

    #[test]
    fn failed_persist_keeps_previous_ledger() {
        let store = FileSystemPlayerStore::new(BrokenTape {
            content: LEDGER.as_bytes().to_vec(),
        })
        .unwrap();

        assert!(matches!(store.record_win("Cleo"), Err(StoreError::Io(_))));
        assert_eq!(store.player_score("Cleo"), 10);
        assert_eq!(store.player_score("Pepper"), 0);
    }

    #[test]
    fn concurrent_wins_are_not_lost() {
        let store = Arc::new(FileSystemPlayerStore::new(MemoryTape::default()).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        store.record_win("Pepper").unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.player_score("Pepper"), 200);
        let ledger = store.lock();
        let persisted = League::from_slice(ledger.tape.contents()).unwrap();
        assert_eq!(persisted.find("Pepper"), Some(&Player::new("Pepper", 200)));
    }
}
