//! Replay files: one JSON object per action group, one group per line.
//!
//! ```text
//! {"seq":0,"actions":[{"kind":"start"}]}
//! {"seq":1,"actions":[{"kind":"move","tile_type":2,"source":[0,0],"target":[1,0]}, ...]}
//! ```

use std::fmt;
use std::io::{self, BufRead, Write};

use match3_types::{Action, ActionGroup, ActionKind, Coord, TileType};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum ReplayError {
    Io(io::Error),
    Json { line: usize, source: serde_json::Error },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Io(e) => write!(f, "replay i/o failed: {}", e),
            ReplayError::Json { line, source } => {
                write!(f, "bad replay record on line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReplayError::Io(e) => Some(e),
            ReplayError::Json { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for ReplayError {
    fn from(e: io::Error) -> Self {
        ReplayError::Io(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindName(pub ActionKind);

impl Serialize for KindName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for KindName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        ActionKind::from_str(s)
            .map(KindName)
            .ok_or_else(|| serde::de::Error::custom("unknown action kind"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub kind: KindName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_type: Option<TileType>,
    /// `[col, row]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<[i32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<[i32; 2]>,
}

impl From<&Action> for ActionRecord {
    fn from(a: &Action) -> Self {
        Self {
            kind: KindName(a.kind),
            tile_type: a.tile_type,
            source: a.source.map(|c| [c.col, c.row]),
            target: a.target.map(|c| [c.col, c.row]),
        }
    }
}

impl ActionRecord {
    pub fn to_action(&self) -> Action {
        Action {
            kind: self.kind.0,
            tile_type: self.tile_type,
            source: self.source.map(|[c, r]| Coord::new(c, r)),
            target: self.target.map(|[c, r]| Coord::new(c, r)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub seq: u64,
    pub actions: Vec<ActionRecord>,
}

impl GroupRecord {
    pub fn new(seq: u64, group: &ActionGroup) -> Self {
        Self {
            seq,
            actions: group.iter().map(ActionRecord::from).collect(),
        }
    }

    pub fn to_group(&self) -> ActionGroup {
        self.actions.iter().map(ActionRecord::to_action).collect()
    }
}

/// Append one group as a single JSON line.
pub fn write_group<W: Write>(out: &mut W, seq: u64, group: &ActionGroup) -> Result<(), ReplayError> {
    let record = GroupRecord::new(seq, group);
    serde_json::to_writer(&mut *out, &record).map_err(|source| ReplayError::Json { line: 0, source })?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Read every record; blank lines are skipped, line numbers in errors start at 1.
pub fn read_groups<R: BufRead>(input: R) -> Result<Vec<GroupRecord>, ReplayError> {
    let mut records = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| ReplayError::Json {
            line: i + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_record_has_no_optional_fields() {
        let mut out = Vec::new();
        write_group(&mut out, 0, &ActionGroup::from(vec![Action::start()])).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"seq\":0,\"actions\":[{\"kind\":\"start\"}]}\n"
        );
    }

    #[test]
    fn groups_survive_a_file_round_trip() {
        let swap: ActionGroup = vec![
            Action::moved(2, Coord::new(0, 0), Coord::new(1, 0)),
            Action::moved(5, Coord::new(1, 0), Coord::new(0, 0)),
        ]
        .into();
        let refill: ActionGroup = vec![
            Action::generate(3, Coord::new(1, 2)),
            Action::autofill(4, Coord::new(0, 2), Coord::new(0, 1)),
        ]
        .into();

        let mut out = Vec::new();
        write_group(&mut out, 1, &swap).unwrap();
        write_group(&mut out, 2, &refill).unwrap();

        let records = read_groups(&out[..]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].seq, 1);
        assert_eq!(records[0].to_group(), swap);
        assert_eq!(records[1].to_group(), refill);
    }

    #[test]
    fn bad_line_reports_its_number() {
        let input = "{\"seq\":0,\"actions\":[]}\n\n{\"seq\":1,\"actions\":[{\"kind\":\"explode\"}]}\n";
        let err = read_groups(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ReplayError::Json { line: 3, .. }));
    }
}
