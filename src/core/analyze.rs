use crate::error::SolveError;
use crate::core::clause_db::ClauseRef;
use crate::core::solver::Solver;
use crate::core::trail::{FALSE, IMPLIED, IMPLIED_NOT, MARK};


struct Frame {
    lit: i32,
    cref: ClauseRef,
    idx: i32,
}

impl Solver {
    /// spec §4.5 `bump`: marks `lit` as involved in the current conflict and
    /// moves its variable to the front of the VMTF list, unless `lit` is
    /// already known-implied (in which case it is redundant to mark).
    pub(crate) fn bump(&mut self, lit: i32) {
        if self.trail.label(lit) != IMPLIED {
            self.trail.set_label(lit, MARK);
            self.vmtf.bump(lit.abs());
        }
    }

    /// spec §4.5 `implied`: recursive self-subsumption check, converted to
    /// an explicit work-stack per spec §9's guidance (the reason graph is a
    /// DAG, but nothing bounds its depth, and the only state a frame needs —
    /// which literal, which reason clause, how far we've scanned it — fits
    /// in three words, so there is no reason to risk the native call stack).
    ///
    /// A literal fails (memoized `IMPLIED_NOT`, returns `false`) as soon as
    /// one literal in its reason clause is neither marked nor itself
    /// implied; that failure cascades: every frame still on the stack also
    /// fails and is memoized, mirroring how the recursive version's `!
    /// implied(m)` check short-circuits every enclosing call. Success only
    /// resolves the one frame whose reason clause was fully scanned; its
    /// caller keeps scanning its own remaining literals.
    pub(crate) fn implied(&mut self, root: i32) -> bool {
        let root_label = self.trail.label(root);
        if root_label > MARK {
            return root_label & MARK != 0;
        }
        if self.trail.reason(root.abs()) == 0 {
            return false;
        }

        let mut stack: Vec<Frame> = vec![Frame {
            lit: root,
            cref: self.trail.reason_ref(root.abs()).expect("checked reason != 0 above"),
            idx: 1,
        }];

        loop {
            let top = stack.len() - 1;
            let (f_lit, f_cref, f_idx) = {
                let f = &stack[top];
                (f.lit, f.cref, f.idx)
            };
            let m = self.db.lit_at(f_cref, f_idx);

            if m == 0 {
                // Every literal in this reason clause checked out.
                self.trail.set_label(f_lit, IMPLIED);
                stack.pop();
                if stack.is_empty() {
                    return true;
                }
                continue;
            }

            let label_m = self.trail.label(m);
            if label_m == MARK {
                stack[top].idx += 1;
                continue;
            }

            if label_m > MARK {
                if label_m & MARK != 0 {
                    stack[top].idx += 1;
                    continue;
                } else {
                    for f in stack.drain(..) {
                        self.trail.set_label(f.lit, IMPLIED_NOT);
                    }
                    return false;
                }
            }

            // `m` is neither marked nor memoized: descend into its reason,
            // resuming this frame one literal further once it resolves.
            stack[top].idx += 1;
            if self.trail.reason(m.abs()) == 0 {
                for f in stack.drain(..) {
                    self.trail.set_label(f.lit, IMPLIED_NOT);
                }
                return false;
            }
            let cref = self.trail.reason_ref(m.abs()).expect("checked reason != 0 above");
            stack.push(Frame { lit: m, cref, idx: 1 });
        }
    }

    /// spec §4.5 `analyze`: derives a first-UIP learned clause from a
    /// falsified clause, installs it, and leaves the trail rewound to the
    /// backjump point ready for the caller to assign the new clause's unit
    /// literal.
    pub(crate) fn analyze(&mut self, conflict: ClauseRef) -> Result<ClauseRef, SolveError> {
        self.counters.res += 1;
        self.counters.n_conflicts += 1;

        // Phase 1: mark the conflicting clause, then walk the trail
        // backward looking for the first UIP.
        for lit in self.db.clause_literals(conflict) {
            self.bump(lit);
        }

        loop {
            self.trail.assigned -= 1;
            let cur = self.trail.at(self.trail.assigned);
            let var = cur.abs();
            if self.trail.reason(var) == 0 {
                // Ran back to a decision without finding another mark:
                // `cur` is itself the first UIP.
                break;
            }
            if self.trail.label(cur) == MARK {
                let mut check = self.trail.assigned;
                let mut is_first_uip = false;
                loop {
                    check -= 1;
                    let probe = self.trail.at(check);
                    if self.trail.label(probe) == MARK {
                        break;
                    }
                    if self.trail.reason(probe.abs()) == 0 {
                        is_first_uip = true;
                        break;
                    }
                }
                if is_first_uip {
                    break;
                }
                let reason_cref = self.trail.reason_ref(var).expect("checked reason != 0 above");
                let reason_lits = self.db.clause_literals(reason_cref);
                for &lit in &reason_lits[1..] {
                    self.bump(lit);
                }
            }
            self.trail.unassign(cur);
        }

        // Phase 2: scan from the UIP down to `forced`, collecting the
        // minimized learned clause and the new `processed` resume point.
        let forced = self.trail.forced;
        let mut p = self.trail.assigned;
        let mut buffer: Vec<i32> = Vec::new();
        let mut lbd: i64 = 0;
        let mut flag = false;
        let mut new_processed = self.trail.assigned;
        let mut marked_seen: u64 = 0;

        loop {
            let lit = self.trail.at(p);
            if self.trail.label(lit) == MARK {
                marked_seen += 1;
                if !self.implied(lit) {
                    buffer.push(lit);
                    flag = true;
                }
            }
            if self.trail.reason(lit.abs()) == 0 {
                if flag {
                    lbd += 1;
                }
                flag = false;
                if buffer.len() == 1 {
                    new_processed = p;
                }
            }
            self.trail.set_label(lit, FALSE);
            if p == forced {
                break;
            }
            p -= 1;
        }
        self.trail.processed = new_processed;

        self.counters.fast -= self.counters.fast >> 5;
        self.counters.fast += lbd << 15;
        self.counters.slow -= self.counters.slow >> 15;
        self.counters.slow += lbd << 5;

        self.counters.tot_literals += marked_seen;
        self.counters.del_literals += marked_seen.saturating_sub(buffer.len() as u64);

        // Unassign everything above the backjump point, then the literal
        // sitting exactly at it (its slot is reused by the next `assign`).
        while self.trail.assigned > self.trail.processed {
            let m = self.trail.at(self.trail.assigned);
            self.trail.unassign(m);
            self.trail.assigned -= 1;
        }
        let m = self.trail.at(self.trail.assigned);
        self.trail.unassign(m);

        let lemma = self.db.add_clause(&buffer, false)?;
        self.counters.n_lemmas += 1;
        Ok(lemma)
    }
}
