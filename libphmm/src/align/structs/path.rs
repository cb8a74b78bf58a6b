use crate::structs::State;

use serde::{Serialize, Serializer};

/// The most likely state path of a sequence under a profile.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViterbiPath {
    /// The name of the decoded sequence
    pub name: String,
    /// The details of the decoded sequence
    pub description: Option<String>,
    /// The natural log probability of the path
    pub score: f64,
    /// The state path, in sequence order
    #[serde(rename = "path", serialize_with = "serialize_states")]
    pub states: Vec<State>,
}

fn serialize_states<S: Serializer>(states: &[State], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&states.iter().map(|s| s.to_char()).collect::<String>())
}

impl ViterbiPath {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The path written as M, I and D characters.
    pub fn state_string(&self) -> String {
        self.states.iter().map(|s| s.to_char()).collect()
    }

    pub fn count(&self, state: State) -> usize {
        self.states.iter().filter(|&&s| s == state).count()
    }

    /// The score divided by the number of states in the path.
    pub fn score_per_state(&self) -> f64 {
        if self.states.is_empty() {
            self.score
        } else {
            self.score / self.states.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    fn path() -> ViterbiPath {
        ViterbiPath {
            name: "seq".to_string(),
            description: Some("a test path".to_string()),
            score: -12.0,
            states: vec![State::Match, State::Insert, State::Insert, State::Delete],
        }
    }

    #[test]
    fn test_path_summary() {
        let path = path();
        check!(path.len() == 4);
        check!(!path.is_empty());
        check!(path.state_string() == "MIID");
        check!(path.count(State::Insert) == 2);
        check!(path.count(State::Match) == 1);
        check!(path.score_per_state() == -3.0);
    }

    #[test]
    fn test_serialize() -> anyhow::Result<()> {
        let json = serde_json::to_value(path())?;
        check!(json["name"] == "seq");
        check!(json["description"] == "a test path");
        check!(json["score"] == -12.0);
        check!(json["path"] == "MIID");
        Ok(())
    }
}
