//! Completion backends for `POST /autocomplete`.

use async_trait::async_trait;
use frames::AutocompleteRequest;

/// Produces one suggested continuation for a code context.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, request: &AutocompleteRequest) -> String;
}

/// Returns the same configured text for every request.
pub struct StaticCompleter {
    suggestion: String,
}

impl StaticCompleter {
    #[must_use]
    pub fn new(suggestion: impl Into<String>) -> Self {
        Self { suggestion: suggestion.into() }
    }
}

#[async_trait]
impl Completer for StaticCompleter {
    async fn complete(&self, _request: &AutocompleteRequest) -> String {
        self.suggestion.clone()
    }
}

#[cfg(test)]
#[path = "completer_test.rs"]
mod tests;
