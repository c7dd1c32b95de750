//! Three-field classification and plain-text timetable.

use std::collections::BTreeSet;

use crate::instance::Instance;
use crate::models::{ConstraintType, GameMode, HomeMode, ObjectiveMode};

const EMPTY: &str = "${\\emptyset}$";
const SEPARATOR: &str = "{\\textpipe}";

impl Instance {
    /// Three-field signature `α|β|γ` of the instance (LaTeX fragments).
    ///
    /// α lists `kRR, compactness, symmetry` per league, β the sorted names
    /// of the registered constraints (tagged hard/soft when the objective
    /// is `SC`), γ the objective mode. Absent symmetry or objective is
    /// written as `${\emptyset}$`.
    pub fn classify(&self) -> String {
        let mut out = String::new();
        for league in self.leagues().values() {
            let symmetry = match league.symmetry {
                GameMode::None => EMPTY.to_string(),
                mode => mode.to_string(),
            };
            out.push_str(&format!(
                "{}RR, {}, {symmetry}{SEPARATOR}",
                league.rounds, league.compactness
            ));
        }

        let tagged = self.objective() == ObjectiveMode::Constraints;
        let names: BTreeSet<String> = self
            .constraints()
            .iter()
            .map(|c| match (tagged, c.kind) {
                (false, _) => c.name().to_string(),
                (true, ConstraintType::Hard) => format!("{}$^\\text{{H}}$", c.name()),
                (true, ConstraintType::Soft) => format!("{}$^\\text{{S}}$", c.name()),
            })
            .collect();
        out.push_str(&names.into_iter().collect::<Vec<_>>().join(", "));
        out.push_str(SEPARATOR);

        match self.objective() {
            ObjectiveMode::None => out.push_str(EMPTY),
            mode => out.push_str(mode.as_str()),
        }
        out
    }

    /// The timetable as text: one line per team, one tab-separated cell
    /// per slot. `+o` is a home game against `o`, `-o` an away game, `B`
    /// a bye.
    pub fn render_timetable(&self) -> String {
        let mut out = String::new();
        for &team in self.teams().keys() {
            out.push_str(&format!("Team {team}\t"));
            for &slot in self.slots().keys() {
                let games = self.meetings_team_slot(&[team].into(), &[slot].into(), HomeMode::Either);
                let cell = match games.first() {
                    None => "B".to_string(),
                    Some(m) if m.first == team => format!("+{}", m.second),
                    Some(m) => format!("-{}", m.first),
                };
                out.push_str(&cell);
                out.push('\t');
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::constraints::{Ba1, Constraint, Fa3, TeamFilter};
    use crate::instance::Instance;
    use crate::models::{Compactness, GameMode, League, ObjectiveMode, Slot, Team};

    fn instance() -> Instance {
        let mut inst = Instance::new();
        inst.add_league(
            League::new(0, "L")
                .with_rounds(2)
                .with_compactness(Compactness::Compact)
                .with_symmetry(GameMode::Mirrored),
        )
        .unwrap();
        for t in 0..2 {
            inst.add_team(Team::new(t, format!("T{t}"), 0)).unwrap();
        }
        for s in 0..3 {
            inst.add_slot(Slot::new(s, format!("S{s}"))).unwrap();
        }
        inst.generate_meetings();
        inst
    }

    #[test]
    fn test_classify_single_league() {
        let mut inst = instance();
        inst.add_constraint(Constraint::hard(1, Ba1)).unwrap();
        let class = inst.classify();
        assert_eq!(class, "2RR, C, M{\\textpipe}BA1{\\textpipe}${\\emptyset}$");

        let rr = class.find("2RR, C, M").unwrap();
        let ba1 = class.find("BA1").unwrap();
        let empty = class.find("${\\emptyset}$").unwrap();
        assert!(rr < ba1 && ba1 < empty);
    }

    #[test]
    fn test_classify_tags_hard_and_soft() {
        let mut inst = instance();
        inst.add_constraint(Constraint::soft(1, Fa3::new(TeamFilter::teams([0, 1]))))
            .unwrap();
        inst.add_constraint(Constraint::hard(1, Ba1)).unwrap();
        inst.set_objective(ObjectiveMode::Constraints);
        assert!(inst
            .classify()
            .ends_with("BA1$^\\text{H}$, FA3$^\\text{S}${\\textpipe}SC"));
    }

    #[test]
    fn test_classify_without_symmetry() {
        let mut inst = Instance::new();
        inst.add_league(League::new(0, "L")).unwrap();
        inst.set_objective(ObjectiveMode::Travel);
        assert_eq!(
            inst.classify(),
            "1RR, NULL, ${\\emptyset}${\\textpipe}{\\textpipe}TR"
        );
    }

    #[test]
    fn test_render_timetable() {
        let mut inst = instance();
        inst.schedule_meeting(0, 1, 0).unwrap();
        inst.schedule_meeting(1, 0, 2).unwrap();
        assert_eq!(
            inst.render_timetable(),
            "Team 0\t+1\tB\t-1\t\nTeam 1\t-0\tB\t+0\t\n"
        );
    }
}
