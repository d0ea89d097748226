//! Versioned JSON snapshots of learned action values

use std::{
    fs::File,
    hash::Hash,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    Error, Result,
    adapters::Table,
    ports::Agent,
    types::ActionSpace,
};

/// One learned action value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedEntry<S> {
    pub state: S,
    pub action: usize,
    pub value: f64,
}

/// Provenance of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub steps: usize,
    pub episodes: usize,
    pub seed: Option<u64>,
}

/// Action values of an agent over an enumerated set of states
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTable<S> {
    pub version: u32,
    pub algorithm: String,
    pub entries: Vec<SavedEntry<S>>,
    pub metadata: TableMetadata,
}

impl<S> SavedTable<S> {
    pub const VERSION: u32 = 1;

    /// Evaluate `agent` on every `(state, action)` pair.
    pub fn capture(
        agent: &dyn Agent<S>,
        states: &[S],
        action_space: &ActionSpace,
        metadata: TableMetadata,
    ) -> Self
    where
        S: Clone,
    {
        let entries = states
            .iter()
            .flat_map(|state| {
                action_space.values().iter().map(move |&action| SavedEntry {
                    state: state.clone(),
                    action,
                    value: agent.predict(state, action),
                })
            })
            .collect();
        Self {
            version: Self::VERSION,
            algorithm: agent.name().to_string(),
            entries,
            metadata,
        }
    }

    /// Rebuild a table; pairs not in the snapshot read as `init`.
    pub fn to_table(&self, init: f64) -> Table<S>
    where
        S: Clone + Eq + Hash,
    {
        let mut table = Table::new(init);
        for entry in &self.entries {
            table.set(entry.state.clone(), entry.action, entry.value);
        }
        table
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be created or serialized.
    pub fn save(&self, path: &Path) -> Result<()>
    where
        S: Serialize,
    {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush {}", path.display()),
            source,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or has an
    /// unsupported version.
    pub fn load(path: &Path) -> Result<Self>
    where
        S: DeserializeOwned,
    {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open {}", path.display()),
            source,
        })?;
        let saved: Self = serde_json::from_reader(BufReader::new(file))?;
        if saved.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: saved.version,
                expected: Self::VERSION,
            });
        }
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::{ConstantRate, Greedy},
        td::QLearning,
        types::{MdpInfo, Transition},
    };

    fn trained_agent() -> QLearning<usize, Table<usize>, ConstantRate, Greedy> {
        let mdp = MdpInfo::new(0.9, ActionSpace::discrete(2).unwrap()).unwrap();
        let mut agent =
            QLearning::q_learning(Table::new(0.0), Greedy, ConstantRate::new(0.5).unwrap(), mdp);
        agent
            .fit(&[Transition::new(1usize, 1, 4.0, 1, true)], 1)
            .unwrap();
        agent
    }

    #[test]
    fn test_capture_covers_every_pair() {
        let agent = trained_agent();
        let space = ActionSpace::discrete(2).unwrap();
        let saved = SavedTable::capture(&agent, &[0usize, 1], &space, TableMetadata::default());
        assert_eq!(saved.entries.len(), 4);
        assert_eq!(saved.algorithm, "QLearning");
        let table = saved.to_table(0.0);
        assert_eq!(table.get(&1, 1), 2.0);
        assert_eq!(table.get(&0, 0), 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        let agent = trained_agent();
        let space = ActionSpace::discrete(2).unwrap();
        let metadata = TableMetadata {
            steps: 1,
            episodes: 1,
            seed: Some(9),
        };
        let saved = SavedTable::capture(&agent, &[1usize], &space, metadata);
        saved.save(&path).unwrap();

        let loaded = SavedTable::<usize>::load(&path).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.json");
        std::fs::write(
            &path,
            r#"{"version": 7, "algorithm": "SARSA", "entries": [], "metadata": {"steps": 0, "episodes": 0, "seed": null}}"#,
        )
        .unwrap();
        assert!(matches!(
            SavedTable::<usize>::load(&path),
            Err(Error::UnsupportedVersion {
                found: 7,
                expected: 1
            })
        ));
    }
}
