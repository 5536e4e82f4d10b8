use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Record store backends
///
/// Selects where media assets and marketing tokens are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStore {
    Postgres,
    Memory,
}

impl FromStr for RecordStore {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(RecordStore::Postgres),
            "memory" => Ok(RecordStore::Memory),
            _ => Err(anyhow::anyhow!("Invalid record store: {}", s)),
        }
    }
}

impl Display for RecordStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RecordStore::Postgres => write!(f, "postgres"),
            RecordStore::Memory => write!(f, "memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_backends_case_insensitively() {
        assert_eq!("Postgres".parse::<RecordStore>().unwrap(), RecordStore::Postgres);
        assert_eq!("postgresql".parse::<RecordStore>().unwrap(), RecordStore::Postgres);
        assert_eq!("MEMORY".parse::<RecordStore>().unwrap(), RecordStore::Memory);
        assert!("dynamo".parse::<RecordStore>().is_err());
    }
}
