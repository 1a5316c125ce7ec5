use crate::{
    query::{
        FilterSet,
        eval::{EvalError, eval},
        lookup::{Conjunction, Lookup, LookupError},
    },
    record::Record,
    value::Value,
};

///
/// BoundLookup
///
/// One parsed lookup bound to its expected value.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct BoundLookup {
    pub lookup: Lookup,
    pub expected: Value,
}

///
/// FilterProgram
///
/// A filter set compiled once per invocation: every key parsed into a
/// structured lookup, conjunction group sizes precounted. Rows are matched
/// against this program, never against raw key strings.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct FilterProgram {
    filters: Vec<BoundLookup>,
    and_count: usize,
    or_count: usize,
    ora_count: usize,
}

impl FilterProgram {
    /// Parse every lookup key in the set.
    pub(crate) fn compile(set: &FilterSet) -> Result<Self, LookupError> {
        let mut program = Self::default();
        for (key, expected) in set.iter() {
            let lookup = Lookup::parse(key)?;
            match lookup.conjunction {
                Conjunction::And => program.and_count += 1,
                Conjunction::Or => program.or_count += 1,
                Conjunction::OrAll => program.ora_count += 1,
            }
            program.filters.push(BoundLookup {
                lookup,
                expected: expected.clone(),
            });
        }

        Ok(program)
    }

    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.filters.len()
    }

    pub(crate) fn filters(&self) -> &[BoundLookup] {
        self.filters.as_slice()
    }

    /// Decide inclusion of one record.
    ///
    /// - And lookups are mandatory; the first miss rejects the row.
    /// - Or lookups need one pass across the group; once one passed the
    ///   remaining Or lookups are skipped.
    /// - OrAll lookups must all pass when any exist.
    /// - A row qualifies iff the mandatory lookups passed and, when any
    ///   Or/OrAll lookups exist, an Or passed or the OrAll group completed.
    pub(crate) fn matches(&self, record: &Record) -> Result<bool, EvalError> {
        let mut or_passed = 0_usize;
        let mut ora_passed = 0_usize;

        for bound in &self.filters {
            let conjunction = bound.lookup.conjunction;
            if conjunction == Conjunction::Or && or_passed > 0 {
                continue;
            }

            let actual = record.field(&bound.lookup.field);
            let passed = eval(bound.lookup.command, actual, &bound.expected)?;

            if passed {
                match conjunction {
                    Conjunction::And => {}
                    Conjunction::Or => or_passed += 1,
                    Conjunction::OrAll => ora_passed += 1,
                }
            } else if conjunction == Conjunction::And {
                return Ok(false);
            }
        }

        // Mandatory lookups short-circuited above; only the optional groups
        // remain to be judged.
        Ok((self.or_count == 0 && self.ora_count == 0)
            || or_passed > 0
            || (self.ora_count > 0 && ora_passed == self.ora_count))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::FilterProgram;
    use crate::{query::FilterSet, record::Record, value::Value};

    fn record(pairs: &[(&str, i64)]) -> Record {
        Record::from_entries(pairs.iter().map(|(k, v)| (*k, *v)))
    }

    fn program(pairs: &[(&str, i64)]) -> FilterProgram {
        let set: FilterSet = pairs.iter().map(|(k, v)| (*k, *v)).collect();
        FilterProgram::compile(&set).expect("criteria should compile")
    }

    #[test]
    fn empty_program_matches_everything() {
        let program = program(&[]);
        assert_eq!(program.matches(&record(&[("a", 1)])), Ok(true));
    }

    #[test]
    fn and_lookups_are_mandatory() {
        let program = program(&[("a", 1), ("b", 2)]);

        assert_eq!(program.matches(&record(&[("a", 1), ("b", 2)])), Ok(true));
        assert_eq!(program.matches(&record(&[("a", 1), ("b", 3)])), Ok(false));
        assert_eq!(program.matches(&record(&[("a", 1)])), Ok(false));
    }

    #[test]
    fn or_group_needs_one_pass() {
        let program = program(&[("a__or", 1), ("b__or", 2)]);

        assert_eq!(program.matches(&record(&[("a", 1), ("b", 9)])), Ok(true));
        assert_eq!(program.matches(&record(&[("a", 9), ("b", 2)])), Ok(true));
        assert_eq!(program.matches(&record(&[("a", 1), ("b", 2)])), Ok(true));
        assert_eq!(program.matches(&record(&[("a", 9), ("b", 9)])), Ok(false));
    }

    #[test]
    fn or_all_group_needs_every_pass() {
        let program = program(&[("a__ora", 1), ("b__ora", 2)]);

        assert_eq!(program.matches(&record(&[("a", 1), ("b", 2)])), Ok(true));
        assert_eq!(program.matches(&record(&[("a", 1), ("b", 9)])), Ok(false));
        assert_eq!(program.matches(&record(&[("a", 9), ("b", 2)])), Ok(false));
    }

    #[test]
    fn and_with_or_requires_both_sides() {
        let program = program(&[("a", 1), ("b__or", 2), ("c__or", 3)]);

        assert_eq!(program.matches(&record(&[("a", 1), ("b", 2)])), Ok(true));
        assert_eq!(program.matches(&record(&[("a", 1), ("c", 3)])), Ok(true));
        assert_eq!(program.matches(&record(&[("a", 1)])), Ok(false));
        assert_eq!(program.matches(&record(&[("a", 9), ("b", 2)])), Ok(false));
    }

    #[test]
    fn or_pass_outranks_incomplete_or_all_group() {
        // mixed groups: one Or pass qualifies even when OrAll is incomplete
        let program = program(&[("a__or", 1), ("b__ora", 2), ("c__ora", 3)]);

        assert_eq!(program.matches(&record(&[("a", 1), ("b", 2)])), Ok(true));
        assert_eq!(
            program.matches(&record(&[("a", 9), ("b", 2), ("c", 3)])),
            Ok(true)
        );
        assert_eq!(program.matches(&record(&[("a", 9), ("b", 2)])), Ok(false));
    }

    #[test]
    fn command_lookups_participate_in_conjunctions() {
        let set: FilterSet = [("age__gte", 5_i64), ("age__lt", 9_i64)]
            .into_iter()
            .collect();
        let program = FilterProgram::compile(&set).expect("compiles");

        assert_eq!(program.matches(&record(&[("age", 5)])), Ok(true));
        assert_eq!(program.matches(&record(&[("age", 9)])), Ok(false));
    }

    #[test]
    fn type_mismatch_aborts_the_match() {
        let set: FilterSet = [("age__gt", Value::Text("x".to_string()))]
            .into_iter()
            .collect();
        let program = FilterProgram::compile(&set).expect("compiles");

        assert!(program.matches(&record(&[("age", 5)])).is_err());
    }
}
