//! Enumerated modes used by entities and constraints.
//!
//! Every mode has a fixed textual form used in attribute maps
//! (`as_str` / `FromStr`), e.g. `HomeMode::Either` is `"HA"` and
//! `CompareMode::Leq` is `"LEQ"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

macro_rules! attribute_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Attribute-map spelling.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    other => Err(ValidationError::malformed(format!(
                        "'{other}' is not a valid {}",
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

attribute_enum! {
    /// Whether a constraint's cost is infeasibility or feasibility.
    ConstraintType {
        /// Cost accrues to infeasibility.
        Hard => "HARD",
        /// Cost accrues to feasibility.
        Soft => "SOFT",
    }
}

attribute_enum! {
    /// Role filter: home, away or either.
    HomeMode {
        Home => "H",
        Away => "A",
        Either => "HA",
    }
}

attribute_enum! {
    /// Aggregation across a filter: one bound in total, or one per element.
    GlobalMode {
        Every => "EVERY",
        Global => "GLOBAL",
    }
}

attribute_enum! {
    /// Unit of a sliding window.
    CountMode {
        /// Consecutive slots in id order.
        Slots => "SLOTS",
        /// Consecutive games in a team's chronological schedule.
        Games => "GAMES",
    }
}

attribute_enum! {
    /// Comparison against a bound.
    CompareMode {
        Eq => "EQ",
        Neq => "NEQ",
        Le => "LE",
        Leq => "LEQ",
        Ge => "GE",
        Geq => "GEQ",
    }
}

attribute_enum! {
    /// Break definition used by BR3.
    BreakMode {
        Regular => "REGULAR",
        Generalized => "GENERALIZED",
    }
}

attribute_enum! {
    /// Whether a league plays a compact (time-constrained) season.
    Compactness {
        Compact => "C",
        Relaxed => "R",
        None => "NULL",
    }
}

attribute_enum! {
    /// Structural relationship between consecutive round-robin phases.
    GameMode {
        /// Phase `r+1` repeats phase `r` with home and away swapped.
        Mirrored => "M",
        /// Phase `r+1` replays phase `r` in reverse slot order.
        Inverted => "I",
        /// Mirrored, rotated one slot forward.
        English => "E",
        /// Mirrored, rotated one slot backward.
        French => "F",
        /// Every pair meets exactly once per phase.
        Phased => "P",
        None => "NULL",
    }
}

attribute_enum! {
    /// Global objective added to the feasibility cost.
    ObjectiveMode {
        /// Total number of breaks.
        Breaks => "BM",
        /// Carry-over effect value per league.
        CarryOver => "CO",
        /// Total home-game cost.
        Cost => "CR",
        /// Total travel distance.
        Travel => "TR",
        /// Weighted constraint violations only.
        Constraints => "SC",
        None => "NONE",
    }
}

attribute_enum! {
    /// Provenance of the instance data.
    DataType {
        Artificial => "A",
        Real => "R",
        None => "NULL",
    }
}

attribute_enum! {
    /// Technique used to produce a solution.
    SolutionMethod {
        IntegerProgramming => "IP",
        ConstraintProgramming => "CP",
        Algorithm => "A",
        Heuristic => "H",
        None => "NULL",
    }
}

impl HomeMode {
    /// Returns `true` if a home game matches this filter.
    pub fn includes_home(self) -> bool {
        matches!(self, HomeMode::Home | HomeMode::Either)
    }

    /// Returns `true` if an away game matches this filter.
    pub fn includes_away(self) -> bool {
        matches!(self, HomeMode::Away | HomeMode::Either)
    }
}

impl Default for Compactness {
    fn default() -> Self {
        Compactness::None
    }
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::None
    }
}

impl Default for ObjectiveMode {
    fn default() -> Self {
        ObjectiveMode::None
    }
}

impl Default for DataType {
    fn default() -> Self {
        DataType::None
    }
}

impl Default for SolutionMethod {
    fn default() -> Self {
        SolutionMethod::None
    }
}
