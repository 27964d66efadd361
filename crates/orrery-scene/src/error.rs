//! Body table validation errors.

/// Errors detected while building a [`SolarSystem`](crate::SolarSystem) from
/// its body table. All of them are fatal at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// Two bodies share the same name, making parent references ambiguous.
    #[error("duplicate body name '{name}'")]
    DuplicateName { name: String },

    /// A body names a parent that is not in the table.
    #[error("body '{body}' references unknown parent '{parent}'")]
    UnknownParent { body: String, parent: String },

    /// Following parent references from `body` leads back to itself.
    #[error("parent cycle detected: {}", path.join(" -> "))]
    Cycle { body: String, path: Vec<String> },

    /// A ring needs `0 <= inner_radius < outer_radius`, both finite.
    #[error("body '{body}' has invalid ring extent {inner_radius}..{outer_radius}")]
    InvalidRing {
        body: String,
        inner_radius: f32,
        outer_radius: f32,
    },
}
