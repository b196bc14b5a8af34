/// SafetyContract — Protected State
///
/// The single governed value `a` and its initialization version.
/// Fields are only writable through the initialization guard.

use serde::{Deserialize, Serialize};

use crate::identity::{StateValue, Version};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtectedState {
    pub(crate) value: StateValue,
    pub(crate) version: Version,
}

impl ProtectedState {
    /// A fresh, uninitialized state (version 0).
    pub fn uninitialized() -> Self {
        Self::default()
    }

    /// The governed value `a`.
    pub fn value(&self) -> StateValue {
        self.value
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn is_initialized(&self) -> bool {
        self.version >= 1
    }
}
