//! Common error infrastructure for combat-core.
//!
//! The runtime paths of this crate never fail: rejected actions return `false`,
//! and stale actor references degrade to [`DamageResult::ignored`]. The only
//! fallible surface is configuration-time validation of the immutable tables
//! handed to the core (attack data, actor stats, movesets, combat config).
//!
//! [`DamageResult::ignored`]: crate::types::DamageResult::ignored

use smol_str::SmolStr;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: attack windows out of order, zero buffer capacity
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all combat-core errors.
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Configuration-time contract violations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error(
        "attack `{attack}`: fractions must satisfy 0 <= startup <= active_end <= recovery_start <= 1 \
         (got {startup}, {active_end}, {recovery_start})"
    )]
    UnorderedFractions {
        attack: SmolStr,
        startup: f32,
        active_end: f32,
        recovery_start: f32,
    },

    #[error("attack `{attack}` deals damage but has an empty active window")]
    EmptyActiveWindow { attack: SmolStr },

    #[error("attack `{attack}` has non-positive duration {duration}")]
    NonPositiveDuration { attack: SmolStr, duration: f32 },

    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be within [0, 1] (got {value})")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("window `{inner}` ({inner_end}) must end inside `{outer}` ({outer_end})")]
    WindowNotNested {
        inner: &'static str,
        inner_end: f32,
        outer: &'static str,
        outer_end: f32,
    },

    #[error("light combo chain must contain between 1 and {max} attacks (got {len})")]
    ComboLength { len: usize, max: usize },

    #[error("input buffer capacity must be between 1 and {max} (got {capacity})")]
    BufferCapacity { capacity: usize, max: usize },
}

impl CombatError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnorderedFractions { .. } => "ATTACK_UNORDERED_FRACTIONS",
            Self::EmptyActiveWindow { .. } => "ATTACK_EMPTY_ACTIVE_WINDOW",
            Self::NonPositiveDuration { .. } => "ATTACK_NON_POSITIVE_DURATION",
            Self::NonPositive { .. } => "NON_POSITIVE_VALUE",
            Self::Negative { .. } => "NEGATIVE_VALUE",
            Self::OutOfUnitRange { .. } => "OUT_OF_UNIT_RANGE",
            Self::WindowNotNested { .. } => "WINDOW_NOT_NESTED",
            Self::ComboLength { .. } => "COMBO_LENGTH",
            Self::BufferCapacity { .. } => "BUFFER_CAPACITY",
        }
    }
}

/// Validates that `value` lies in `[0, 1]`.
pub(crate) fn unit_range(field: &'static str, value: f32) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfUnitRange { field, value })
    }
}

/// Validates that `value` is strictly positive.
pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), ValidationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}

/// Validates that `value` is zero or greater.
pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<(), ValidationError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Negative { field, value })
    }
}
