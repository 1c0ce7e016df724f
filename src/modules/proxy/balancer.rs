use std::sync::atomic::{AtomicUsize, Ordering};

use super::ProxyError;

/// Hands out upstream base URLs in rotation
pub struct RoundRobinBalancer {
    targets: Vec<String>,
    cursor: AtomicUsize,
}

impl RoundRobinBalancer {
    pub fn new(targets: Vec<String>) -> Result<Self, ProxyError> {
        let targets: Vec<String> = targets
            .into_iter()
            .map(|t| t.trim().trim_end_matches('/').to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if targets.is_empty() {
            return Err(ProxyError::NoTargets);
        }

        Ok(Self {
            targets,
            cursor: AtomicUsize::new(0),
        })
    }

    pub fn next_target(&self) -> &str {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.targets.len();
        &self.targets[index]
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }
}
