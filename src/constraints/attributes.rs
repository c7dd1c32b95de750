//! Flat attribute-map form of constraints, as exchanged with instance files.
//!
//! Every map carries `ClassType` (the family), `Type` (the rule name),
//! `type` (`HARD`/`SOFT`) and `penalty`. Id lists are `;`-separated
//! (`"1;2;3"`); game and slot pair lists are `"a,b;c,d;"`. Missing id lists
//! read as empty, missing scalars are malformed.

use std::collections::BTreeSet;
use std::str::FromStr;

use super::{
    Ba1, Br1, Br2, Br3, Br4, Ca1, Ca2, Ca3, Ca4, Ca5, Constraint, Fa1, Fa2, Fa3, Fa4, Fa5, Fa6,
    Ga1, Ga2, Rule, Se1, Se2, SlotFilter, TeamFilter,
};
use crate::models::{join_ids, AttrMap};
use crate::validation::{ValidationError, ValidationErrorKind, ValidationResult};

struct Writer(AttrMap);

impl Writer {
    fn set(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    fn teams(&mut self, suffix: &str, filter: &TeamFilter) -> &mut Self {
        self.set(&format!("teams{suffix}"), join_ids(&filter.teams))
            .set(&format!("teamGroups{suffix}"), join_ids(&filter.groups))
    }

    fn slots(&mut self, suffix: &str, filter: &SlotFilter) -> &mut Self {
        self.set(&format!("slots{suffix}"), join_ids(&filter.slots))
            .set(&format!("slotGroups{suffix}"), join_ids(&filter.groups))
    }

    fn pairs<'a>(&mut self, key: &str, pairs: impl IntoIterator<Item = &'a (u32, u32)>) -> &mut Self {
        let text: String = pairs.into_iter().map(|(a, b)| format!("{a},{b};")).collect();
        self.set(key, text)
    }
}

struct Reader<'a> {
    rule: &'a str,
    attrs: &'a AttrMap,
}

impl<'a> Reader<'a> {
    fn malformed(&self, message: impl std::fmt::Display) -> ValidationError {
        ValidationError::malformed(format!("{}: {message}", self.rule))
    }

    fn get(&self, key: &str) -> ValidationResult<&'a str> {
        self.attrs
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| self.malformed(format_args!("missing attribute '{key}'")))
    }

    fn int(&self, key: &str) -> ValidationResult<i64> {
        let text = self.get(key)?;
        text.trim()
            .parse()
            .map_err(|_| self.malformed(format_args!("'{text}' is not an integer ({key})")))
    }

    fn mode<T>(&self, key: &str) -> ValidationResult<T>
    where
        T: FromStr<Err = ValidationError>,
    {
        self.get(key)?.trim().parse()
    }

    fn ids(&self, key: &str) -> ValidationResult<BTreeSet<u32>> {
        let Some(text) = self.attrs.get(key) else {
            return Ok(BTreeSet::new());
        };
        text.split(';')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| {
                id.parse()
                    .map_err(|_| self.malformed(format_args!("'{id}' is not an id ({key})")))
            })
            .collect()
    }

    fn pairs(&self, key: &str) -> ValidationResult<Vec<(u32, u32)>> {
        let Some(text) = self.attrs.get(key) else {
            return Ok(Vec::new());
        };
        text.split(';')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(|pair| -> ValidationResult<(u32, u32)> {
                let bad = || self.malformed(format_args!("'{pair}' is not an id pair ({key})"));
                let (a, b) = pair.split_once(',').ok_or_else(bad)?;
                Ok((
                    a.trim().parse().map_err(|_| bad())?,
                    b.trim().parse().map_err(|_| bad())?,
                ))
            })
            .collect()
    }

    fn teams(&self, suffix: &str) -> ValidationResult<TeamFilter> {
        Ok(TeamFilter {
            teams: self.ids(&format!("teams{suffix}"))?,
            groups: self.ids(&format!("teamGroups{suffix}"))?,
        })
    }

    fn slots(&self, suffix: &str) -> ValidationResult<SlotFilter> {
        Ok(SlotFilter {
            slots: self.ids(&format!("slots{suffix}"))?,
            groups: self.ids(&format!("slotGroups{suffix}"))?,
        })
    }
}

impl Constraint {
    /// Flat attribute form of the constraint.
    pub fn to_attributes(&self) -> AttrMap {
        let mut w = Writer(AttrMap::new());
        w.set("ClassType", self.rule.family())
            .set("Type", self.name())
            .set("type", self.kind)
            .set("penalty", self.penalty);
        match &self.rule {
            Rule::Ba1(_) | Rule::Ba2(_) => {}
            Rule::Ca1(r) => {
                w.teams("", &r.teams)
                    .set("min", r.min)
                    .set("max", r.max)
                    .set("mode", r.mode)
                    .slots("", &r.slots);
            }
            Rule::Ca2(r) => {
                w.teams("1", &r.teams1)
                    .teams("2", &r.teams2)
                    .set("min", r.min)
                    .set("max", r.max)
                    .set("mode1", r.mode1)
                    .set("mode2", r.mode2)
                    .slots("", &r.slots);
            }
            Rule::Ca3(r) => {
                w.teams("1", &r.teams1)
                    .teams("2", &r.teams2)
                    .set("min", r.min)
                    .set("max", r.max)
                    .set("mode1", r.mode1)
                    .set("intp", r.intp)
                    .set("mode2", r.mode2);
            }
            Rule::Ca4(r) => {
                w.teams("1", &r.teams1)
                    .teams("2", &r.teams2)
                    .set("min", r.min)
                    .set("max", r.max)
                    .set("mode1", r.mode1)
                    .set("mode2", r.mode2)
                    .slots("", &r.slots);
            }
            Rule::Ca5(r) => {
                w.teams("1", &r.teams1)
                    .teams("2", &r.teams2)
                    .set("min", r.min)
                    .set("max", r.max)
                    .slots("", &r.slots);
            }
            Rule::Ga1(r) => {
                w.slots("", &r.slots)
                    .set("min", r.min)
                    .set("max", r.max)
                    .pairs("meetings", &r.meetings);
            }
            Rule::Ga2(r) => {
                w.teams("1", &r.teams1)
                    .teams("2", &r.teams2)
                    .teams("3", &r.teams3)
                    .teams("4", &r.teams4)
                    .set("mode1", r.mode1)
                    .set("mode2", r.mode2)
                    .set("mode3", r.mode3)
                    .slots("1", &r.slots1)
                    .slots("2", &r.slots2);
            }
            Rule::Br1(r) => {
                w.teams("", &r.teams)
                    .set("intp", r.intp)
                    .set("mode1", r.mode1)
                    .set("mode2", r.mode2)
                    .slots("", &r.slots);
            }
            Rule::Br2(r) => {
                w.set("homeMode", r.home_mode())
                    .teams("", &r.teams)
                    .set("mode2", r.mode2)
                    .set("intp", r.intp)
                    .slots("", &r.slots);
            }
            Rule::Br3(r) => {
                w.teams("", &r.teams)
                    .set("mode1", r.mode1)
                    .set("mode2", r.mode2)
                    .set("intp", r.intp);
            }
            Rule::Br4(r) => {
                w.set("mode", r.mode)
                    .teams("", &r.teams)
                    .set("min", r.min)
                    .slots("", &r.slots);
            }
            Rule::Fa1(r) => {
                w.teams("", &r.teams).set("intp", r.intp).slots("", &r.slots);
            }
            Rule::Fa2(r) => {
                w.teams("", &r.teams)
                    .set("mode", r.mode)
                    .set("intp", r.intp)
                    .slots("", &r.slots);
            }
            Rule::Fa3(r) => {
                w.teams("", &r.teams);
            }
            Rule::Fa4(r) => {
                w.teams("", &r.teams).set("intp", r.intp);
            }
            Rule::Fa5(r) => {
                w.teams("", &r.teams).slots("", &r.slots).set("intp", r.intp);
            }
            Rule::Fa6(r) => {
                w.slots("", &r.slots).set("intp", r.intp);
            }
            Rule::Se1(r) => {
                w.set("min", r.min).teams("", &r.teams).set("mode1", "SLOTS");
            }
            Rule::Se2(r) => {
                w.teams("", &r.teams).pairs("slotPairs", &r.slot_pairs);
            }
        }
        w.0
    }

    /// Parses the flat attribute form.
    ///
    /// # Errors
    /// `MalformedConstraint` for an unknown rule, a missing scalar or an
    /// unparsable value; `InternalConstraint` for `BA2`.
    pub fn from_attributes(attrs: &AttrMap) -> ValidationResult<Constraint> {
        let name = attrs
            .get("Type")
            .ok_or_else(|| ValidationError::malformed("missing attribute 'Type'"))?;
        let r = Reader { rule: name, attrs };
        let rule: Rule = match name.as_str() {
            "BA1" => Ba1.into(),
            "BA2" => {
                return Err(ValidationError::new(
                    ValidationErrorKind::InternalConstraint,
                    "BA2 is evaluated internally and cannot be declared",
                ))
            }
            "CA1" => Ca1::new(
                r.teams("")?,
                r.int("min")?,
                r.int("max")?,
                r.mode("mode")?,
                r.slots("")?,
            )
            .into(),
            "CA2" => Ca2::new(
                r.teams("1")?,
                r.teams("2")?,
                r.int("min")?,
                r.int("max")?,
                r.mode("mode1")?,
                r.mode("mode2")?,
                r.slots("")?,
            )
            .into(),
            "CA3" => Ca3::new(
                r.teams("1")?,
                r.teams("2")?,
                r.int("min")?,
                r.int("max")?,
                r.mode("mode1")?,
                r.int("intp")?,
                r.mode("mode2")?,
            )
            .into(),
            "CA4" => Ca4::new(
                r.teams("1")?,
                r.teams("2")?,
                r.int("min")?,
                r.int("max")?,
                r.mode("mode1")?,
                r.mode("mode2")?,
                r.slots("")?,
            )
            .into(),
            "CA5" => Ca5::new(
                r.teams("1")?,
                r.teams("2")?,
                r.int("min")?,
                r.int("max")?,
                r.slots("")?,
            )
            .into(),
            "GA1" => Ga1::new(r.slots("")?, r.int("min")?, r.int("max")?, r.pairs("meetings")?).into(),
            "GA2" => Ga2::new(
                r.teams("1")?,
                r.mode("mode1")?,
                r.teams("2")?,
                r.slots("1")?,
                r.teams("3")?,
                r.mode("mode2")?,
                r.mode("mode3")?,
                r.teams("4")?,
                r.slots("2")?,
            )
            .into(),
            "BR1" => Br1::new(
                r.teams("")?,
                r.int("intp")?,
                r.mode("mode1")?,
                r.mode("mode2")?,
                r.slots("")?,
            )
            .into(),
            "BR2" => Br2::new(r.teams("")?, r.mode("mode2")?, r.int("intp")?, r.slots("")?).into(),
            "BR3" => Br3::new(r.teams("")?, r.mode("mode1")?, r.mode("mode2")?, r.int("intp")?).into(),
            "BR4" => Br4::new(r.mode("mode")?, r.teams("")?, r.int("min")?, r.slots("")?).into(),
            "FA1" => Fa1::new(r.teams("")?, r.int("intp")?, r.slots("")?).into(),
            "FA2" => Fa2::new(r.teams("")?, r.mode("mode")?, r.int("intp")?, r.slots("")?).into(),
            "FA3" => Fa3::new(r.teams("")?).into(),
            "FA4" => Fa4::new(r.teams("")?, r.int("intp")?).into(),
            "FA5" => Fa5::new(r.teams("")?, r.slots("")?, r.int("intp")?).into(),
            "FA6" => Fa6::new(r.slots("")?, r.int("intp")?).into(),
            "SE1" => Se1::new(r.teams("")?, r.int("min")?).into(),
            "SE2" => Se2::new(r.teams("")?, r.pairs("slotPairs")?).into(),
            other => return Err(ValidationError::malformed(format!("unknown constraint type '{other}'"))),
        };
        Ok(Constraint::new(r.mode("type")?, r.int("penalty")?, rule))
    }
}
