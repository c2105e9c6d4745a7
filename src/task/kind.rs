//! Classification enums attached to every extracted task.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of work an issue represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// New user-facing capability.
    Feature,
    /// Something is broken.
    Bug,
    /// Generic unit of work.
    #[default]
    Task,
    /// Writing or updating docs.
    Documentation,
    /// Investigation or proof of concept.
    Research,
}

/// How urgently a task should be picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Drop everything.
    Critical,
    /// Next in line.
    High,
    /// Normal scheduling.
    #[default]
    Medium,
    /// Whenever there is room.
    Low,
}

/// Organizational bucket derived from type and keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Writing product code.
    #[default]
    Implementation,
    /// Tests and verification.
    Testing,
    /// Docs.
    Documentation,
    /// Investigation.
    Research,
    /// UI/UX and architecture design.
    Design,
    /// Deployment and infrastructure.
    Infrastructure,
    /// Fixing defects.
    Bugfix,
    /// Restructuring without behavior change.
    Refactoring,
}

/// Effort estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    /// One or two hours.
    Small,
    /// Up to a day.
    #[default]
    Medium,
    /// A few days.
    Large,
    /// More than a few days.
    Xlarge,
}

/// Where a task came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Matched by a task-indicator pattern.
    #[default]
    Pattern,
    /// Suggested by the AI analysis collaborator.
    Ai,
    /// Whole description wrapped because nothing matched.
    Fallback,
    /// Supplied directly by a caller.
    Manual,
}

impl Size {
    /// Issue weight sent to the tracker for this size.
    #[must_use]
    pub fn weight(self) -> u32 {
        match self {
            Self::Small => 1,
            Self::Medium => 3,
            Self::Large => 8,
            Self::Xlarge => 13,
        }
    }
}

/// Implements `as_str`, a case-insensitive `parse`, and `Display` for a
/// unit-only enum from one table of `(variant, "name")` pairs.
macro_rules! string_enum {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// The lowercase wire name.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }

            /// Parses a wire name, ignoring case and surrounding whitespace.
            #[must_use]
            pub fn parse(value: &str) -> Option<Self> {
                let value = value.trim().to_lowercase();
                Self::ALL.iter().copied().find(|v| v.as_str() == value)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(TaskType {
    Feature => "feature",
    Bug => "bug",
    Task => "task",
    Documentation => "documentation",
    Research => "research",
});

string_enum!(Priority {
    Critical => "critical",
    High => "high",
    Medium => "medium",
    Low => "low",
});

string_enum!(Category {
    Implementation => "implementation",
    Testing => "testing",
    Documentation => "documentation",
    Research => "research",
    Design => "design",
    Infrastructure => "infrastructure",
    Bugfix => "bugfix",
    Refactoring => "refactoring",
});

string_enum!(Size {
    Small => "small",
    Medium => "medium",
    Large => "large",
    Xlarge => "xlarge",
});

string_enum!(ExtractionMethod {
    Pattern => "pattern",
    Ai => "ai",
    Fallback => "fallback",
    Manual => "manual",
});
