//! Mutation phases and rule applicability.

use serde::{Deserialize, Serialize};

/// Whether a mutation creates an entity or updates an existing master record.
///
/// Derived solely from the presence of the master record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Creation,
    Update,
}

impl Phase {
    pub fn from_existing<T>(existing: Option<&T>) -> Self {
        if existing.is_some() {
            Phase::Update
        } else {
            Phase::Creation
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Phase::Creation => Phase::Update,
            Phase::Update => Phase::Creation,
        }
    }

    /// Lowercase noun used in messages ("creation", "update").
    pub fn noun(self) -> &'static str {
        match self {
            Phase::Creation => "creation",
            Phase::Update => "update",
        }
    }
}

/// The phases a rule is registered for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum When {
    Creation,
    Update,
    #[default]
    Both,
}

impl When {
    pub fn applies_to(self, phase: Phase) -> bool {
        match self {
            When::Both => true,
            When::Creation => phase == Phase::Creation,
            When::Update => phase == Phase::Update,
        }
    }
}

impl From<Phase> for When {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Creation => When::Creation,
            Phase::Update => When::Update,
        }
    }
}
