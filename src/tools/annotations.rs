//! Behavioral annotations advertised alongside a registered tool.

use super::spec::ToolSpec;
use serde::{Deserialize, Serialize};

/// Fixed behavioral descriptor: display title plus four hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    pub title: String,
    pub read_only_hint: bool,
    pub destructive_hint: bool,
    pub idempotent_hint: bool,
    pub open_world_hint: bool,
}

impl ToolAnnotations {
    pub const DEFAULT_READ_ONLY: bool = true;
    pub const DEFAULT_DESTRUCTIVE: bool = false;
    pub const DEFAULT_IDEMPOTENT: bool = true;
    pub const DEFAULT_OPEN_WORLD: bool = false;

    /// Annotations with every hint at its default.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            read_only_hint: Self::DEFAULT_READ_ONLY,
            destructive_hint: Self::DEFAULT_DESTRUCTIVE,
            idempotent_hint: Self::DEFAULT_IDEMPOTENT,
            open_world_hint: Self::DEFAULT_OPEN_WORLD,
        }
    }
}

/// Derive annotations for `spec` under the composed display `title`.
///
/// Flags are taken independently; contradictory combinations such as
/// read-only and destructive are passed through as given.
pub fn derive_annotations(title: &str, spec: &ToolSpec) -> ToolAnnotations {
    ToolAnnotations {
        title: title.to_string(),
        read_only_hint: spec.read_only.unwrap_or(ToolAnnotations::DEFAULT_READ_ONLY),
        destructive_hint: spec
            .destructive
            .unwrap_or(ToolAnnotations::DEFAULT_DESTRUCTIVE),
        idempotent_hint: spec.idempotent.unwrap_or(ToolAnnotations::DEFAULT_IDEMPOTENT),
        open_world_hint: spec.open_world.unwrap_or(ToolAnnotations::DEFAULT_OPEN_WORLD),
    }
}
