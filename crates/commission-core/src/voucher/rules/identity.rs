//! Agent identity extraction.

use super::patterns::AGENT_IDENTITY;
use super::{ExtractionMatch, FieldExtractor};

/// Agent code and display name taken from an `Agency Code/Name` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentIdentity {
    pub code: String,
    pub name: String,
}

/// Agent identity extractor.
pub struct IdentityExtractor;

impl IdentityExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IdentityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IdentityExtractor {
    type Output = ExtractionMatch<AgentIdentity>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        AGENT_IDENTITY
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let identity = AgentIdentity {
                    code: caps[1].to_string(),
                    name: caps[2].to_string(),
                };
                Some(
                    ExtractionMatch::new(identity, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// Extract the agent identity of a voucher section, if it has one.
pub fn extract_identity(text: &str) -> Option<AgentIdentity> {
    IdentityExtractor::new().extract(text).map(|m| m.value)
}
