use crate::error::SolveError;
use crate::core::clause_db::{ClauseDb, WatchCursor, END};
use crate::core::solver::Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropagateResult {
    Ok,
    Unsat,
}

impl Solver {
    /// spec §4.4 `propagate`: drains the trail between `processed` and
    /// `assigned`, relinking watches as it goes, until either the trail is
    /// exhausted or a conflict at decision level 0 proves the formula UNSAT.
    ///
    /// `processed` and `assigned` are read fresh off `self.trail` on every
    /// iteration rather than cached locally: a conflict found mid-scan calls
    /// `analyze`, which can rewind both to an earlier trail position. The C
    /// source gets this for free because they're the same global pointers;
    /// here it means never hoisting them into a local.
    pub(crate) fn propagate(&mut self) -> Result<PropagateResult, SolveError> {
        let seed = self.trail.at(self.trail.processed());
        let mut forced_flag = self.trail.reason(seed.abs()) != 0;

        while self.trail.processed() < self.trail.assigned_pos() {
            let lit = self.trail.at(self.trail.processed());
            self.trail.processed += 1;
            self.counters.propagations += 1;

            let mut cursor = self.db.watch_head(lit);
            'chain: loop {
                let node = cursor.get(&self.db);
                if node == END {
                    break 'chain;
                }
                let cref = self.db.resolve_watch(node);

                if self.db.lit_at(cref, 0) == lit {
                    let other = self.db.lit_at(cref, 1);
                    self.db.set_lit_at(cref, 0, other);
                }

                let mut i: i32 = 2;
                let mut replacement: Option<i32> = None;
                loop {
                    let cur = self.db.lit_at(cref, i);
                    if cur == 0 {
                        break;
                    }
                    if !self.trail.is_false(cur) {
                        self.db.set_lit_at(cref, 1, cur);
                        self.db.set_lit_at(cref, i, lit);
                        replacement = Some(cur);
                        break;
                    }
                    i += 1;
                }

                match replacement {
                    Some(new_lit) => {
                        let next = WatchCursor::advance_onto(node).get(&self.db);
                        cursor.set(&mut self.db, next);
                        self.db.add_watch(new_lit, node);
                    }
                    None => {
                        self.db.set_lit_at(cref, 1, lit);
                        cursor = WatchCursor::advance_onto(node);
                        let other = self.db.lit_at(cref, 0);

                        if self.trail.is_true(other) {
                            continue 'chain;
                        }
                        if !self.trail.is_false(other) {
                            self.trail.assign(other, ClauseDb::reason_value(cref), forced_flag);
                        } else {
                            if forced_flag {
                                return Ok(PropagateResult::Unsat);
                            }
                            let lemma = self.analyze(cref)?;
                            let lemma_is_unit = self.db.lit_at(lemma, 1) == 0;
                            if lemma_is_unit {
                                forced_flag = true;
                            }
                            let lemma_lit = self.db.lit_at(lemma, 0);
                            self.trail.assign(lemma_lit, ClauseDb::reason_value(lemma), forced_flag);
                            break 'chain;
                        }
                    }
                }
            }
        }

        if forced_flag {
            self.trail.forced = self.trail.processed();
        }
        Ok(PropagateResult::Ok)
    }
}


#[cfg(test)]
mod tests {
    use crate::core::solver::Solver;
    use crate::core::propagate::PropagateResult;

    #[test]
    fn unit_propagation_chains_through_binary_clauses() {
        let mut s = Solver::new(3, 3);
        s.add_clause(&[1]).unwrap();
        s.add_clause(&[-1, 2]).unwrap();
        s.add_clause(&[-2, 3]).unwrap();
        assert_eq!(s.propagate().unwrap(), PropagateResult::Ok);
        assert!(s.model()[0]);
        assert!(s.model()[1]);
        assert!(s.model()[2]);
    }

    #[test]
    fn root_level_conflict_is_unsat() {
        let mut s = Solver::new(1, 2);
        s.add_clause(&[1]).unwrap();
        s.add_clause(&[-1]).unwrap();
        assert_eq!(s.propagate().unwrap(), PropagateResult::Unsat);
    }

    #[test]
    fn idempotent_on_repeated_call() {
        let mut s = Solver::new(2, 1);
        s.add_clause(&[1, 2]).unwrap();
        assert_eq!(s.propagate().unwrap(), PropagateResult::Ok);
        assert_eq!(s.propagate().unwrap(), PropagateResult::Ok);
    }
}
