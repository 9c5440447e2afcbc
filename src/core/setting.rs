use serde::{Deserialize, Serialize};

/// A header setting, or the instruction to leave that header out entirely.
///
/// There is no "unset" state: every header of a configuration holds either
/// its default, an explicit value, or [`Setting::OptOut`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Setting<T> {
    Set(T),
    OptOut,
}

impl<T> Setting<T> {
    #[inline]
    pub const fn is_opt_out(&self) -> bool {
        matches!(self, Setting::OptOut)
    }

    #[inline]
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Setting::Set(value) => Some(value),
            Setting::OptOut => None,
        }
    }

    #[inline]
    pub fn as_set_mut(&mut self) -> Option<&mut T> {
        match self {
            Setting::Set(value) => Some(value),
            Setting::OptOut => None,
        }
    }
}

impl<T> From<T> for Setting<T> {
    #[inline]
    fn from(value: T) -> Self {
        Setting::Set(value)
    }
}
