//! Task ID generation and prefix resolution
//!
//! IDs are a base36 millisecond timestamp followed by five random base36
//! characters. Example: `mfx2k1q0a7c9d`

use rand::Rng;

use super::task::{Task, TaskId};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix
const RANDOM_LEN: usize = 5;

/// Generate a task ID from the current time plus a random suffix
pub fn generate_id() -> TaskId {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    TaskId::from_string(format!("{}{}", to_base36(millis), suffix))
}

/// Generate an ID that does not collide with any task in `existing`
pub fn generate_unique_id(existing: &[Task]) -> TaskId {
    loop {
        let id = generate_id();
        if !existing.iter().any(|t| t.id == id) {
            return id;
        }
        tracing::debug!(%id, "generate_unique_id: collision, regenerating");
    }
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// ID resolution for partial matches
pub struct IdResolver<'a> {
    tasks: &'a [Task],
}

impl<'a> IdResolver<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        Self { tasks }
    }

    /// Resolve a partial reference to a full ID
    ///
    /// Returns:
    /// - Ok(Some(id)) if exactly one match (an exact match always wins)
    /// - Ok(None) if no matches
    /// - Err with candidates if ambiguous
    pub fn resolve(&self, reference: &str) -> Result<Option<TaskId>, Vec<TaskId>> {
        if let Some(task) = self.tasks.iter().find(|t| t.id.as_str() == reference) {
            return Ok(Some(task.id.clone()));
        }

        let matches: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|t| t.id.as_str().starts_with(reference))
            .map(|t| t.id.clone())
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.into_iter().next()),
            _ => Err(matches),
        }
    }
}
