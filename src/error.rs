// Copyright (c) 2024 Mike Tsao

//! Configuration errors. These indicate wiring bugs in a device profile, so
//! they surface at startup rather than being absorbed during event handling.

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use thiserror::Error;

/// Which kind of managed controller state an error refers to.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum ManagedKind {
    #[allow(missing_docs)]
    Mode,
    #[allow(missing_docs)]
    View,
}

/// Errors that a [Manager](crate::managers::Manager) or
/// [ControllerSession](crate::surface::ControllerSession) reports while being
/// wired up or driven.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// Something asked for an id that was never registered.
    #[error("{kind} {id} is not registered")]
    Unregistered {
        #[allow(missing_docs)]
        kind: ManagedKind,
        #[allow(missing_docs)]
        id: String,
    },
    /// The same id was registered twice.
    #[error("{kind} {id} is already registered")]
    DuplicateRegistration {
        #[allow(missing_docs)]
        kind: ManagedKind,
        #[allow(missing_docs)]
        id: String,
    },
    /// A temporary overlay was requested while one was already set. Overlays
    /// nest only one level deep.
    #[error("a temporary {kind} is already set")]
    NestedTemporary {
        #[allow(missing_docs)]
        kind: ManagedKind,
    },
    /// A restore was requested with no overlay set.
    #[error("no temporary {kind} is set")]
    NoTemporary {
        #[allow(missing_docs)]
        kind: ManagedKind,
    },
    /// Nothing is configured to be active by default.
    #[error("no default {kind} is configured")]
    NoDefault {
        #[allow(missing_docs)]
        kind: ManagedKind,
    },
}
impl SurfaceError {
    /// Convenience constructor for [SurfaceError::Unregistered].
    pub fn unregistered(kind: ManagedKind, id: impl ToString) -> Self {
        SurfaceError::Unregistered {
            kind,
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [SurfaceError::DuplicateRegistration].
    pub fn duplicate(kind: ManagedKind, id: impl ToString) -> Self {
        SurfaceError::DuplicateRegistration {
            kind,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_kind_and_id() {
        assert_eq!(
            SurfaceError::unregistered(ManagedKind::Mode, 42).to_string(),
            "mode 42 is not registered"
        );
        assert_eq!(
            SurfaceError::NestedTemporary {
                kind: ManagedKind::View
            }
            .to_string(),
            "a temporary view is already set"
        );
    }
}
