//! Round-robin sports timetable validation.
//!
//! Loads nothing and schedules nothing: given a tournament (teams, slots,
//! leagues, groups and the meetings between teams) and a timetable
//! assigning meetings to slots, it evaluates the timetable against a
//! catalogue of standard constraints and a global objective, and returns
//! an (infeasibility, feasibility) cost pair with readable diagnostics.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Team`, `League`, `Slot`, their groups,
//!   `Meeting`, the enumerated modes, `Cost` and `Violation`
//! - **`instance`**: The entity store (`Instance`), meeting queries and
//!   derived metrics (distance, breaks, cost, carry-over)
//! - **`constraints`**: The constraint catalogue: BA, CA, GA, BR, FA and SE
//!   rules with hard/soft penalty semantics and attribute-map I/O
//! - **`evaluation`**: Full evaluation (`Instance::evaluate`), league
//!   symmetry checks, objective, `classify` and timetable rendering
//! - **`validation`**: Recoverable data errors (duplicate ids, unknown
//!   references, malformed constraints, declared-value mismatches)
//!
//! # Example
//!
//! ```
//! use u_timetable::constraints::{Ca1, Constraint, SlotFilter, TeamFilter};
//! use u_timetable::instance::Instance;
//! use u_timetable::models::{Cost, HomeMode, League, Slot, Team};
//!
//! let mut inst = Instance::new();
//! inst.add_league(League::new(0, "League").with_rounds(2)).unwrap();
//! inst.add_team(Team::new(0, "Ajax", 0)).unwrap();
//! inst.add_team(Team::new(1, "PSV", 0)).unwrap();
//! inst.add_slot(Slot::new(0, "R1")).unwrap();
//! inst.add_slot(Slot::new(1, "R2")).unwrap();
//! inst.generate_meetings();
//! inst.schedule_meeting(0, 1, 0).unwrap();
//! inst.schedule_meeting(1, 0, 1).unwrap();
//!
//! // Ajax hosts at most zero games in R1.
//! inst.add_constraint(Constraint::soft(
//!     10,
//!     Ca1::new(TeamFilter::teams([0]), 0, 0, HomeMode::Home, SlotFilter::slots([0])),
//! ))
//! .unwrap();
//!
//! assert_eq!(inst.check_constraints(true), Cost::new(0, 10));
//! ```
//!
//! # References
//!
//! - Van Bulck et al. (2020), "RobinX: A three-field classification and
//!   unified data format for round-robin sports timetabling", EJOR 280(2)
//! - Rasmussen & Trick (2008), "Round robin scheduling – a survey", EJOR 188(3)

pub mod constraints;
pub mod evaluation;
pub mod instance;
pub mod models;
pub mod validation;
