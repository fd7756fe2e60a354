use crate::error::SolveError;
use crate::core::clause_db::ClauseDb;
use crate::core::trail::Trail;
use crate::core::vmtf::Vmtf;

/// Initial EMA register value, matching the C source's `ave_max = 1 << 24`.
pub(crate) const EMA_INIT: i64 = 1 << 24;
/// Initial learned-clause budget before `reduce_db` starts growing it.
pub(crate) const INITIAL_MAX_LEMMAS: u32 = 2000;

pub(crate) struct Counters {
    pub n_lemmas: u32,
    pub max_lemmas: u32,
    pub n_conflicts: u64,
    pub res: u32,
    pub fast: i64,
    pub slow: i64,
    pub restarts: u64,
    pub decisions: u64,
    pub propagations: u64,
    pub original_clauses: u64,
    pub del_literals: u64,
    pub tot_literals: u64,
}

impl Counters {
    fn new() -> Counters {
        Counters {
            n_lemmas: 0,
            max_lemmas: INITIAL_MAX_LEMMAS,
            n_conflicts: 0,
            res: 0,
            fast: EMA_INIT,
            slow: EMA_INIT,
            restarts: 0,
            decisions: 0,
            propagations: 0,
            original_clauses: 0,
            del_literals: 0,
            tot_literals: 0,
        }
    }
}

/// Outcome of feeding one original clause into the solver. Replaces the
/// "inspect the returned clause's first slot" contract spec.md §9 flags as
/// a wart: the DIMACS parser and CLI can match on this directly instead of
/// reaching into arena internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddClauseOutcome {
    Installed,
    /// The clause was empty — the formula is UNSAT.
    EmptyClause,
    /// A unit clause whose literal was already falsified — the formula is
    /// UNSAT.
    ConflictingUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveResult {
    Sat,
    Unsat,
}

/// The CDCL solver core: clause database, trail, VMTF list and search
/// counters, all owned by a single instance for the lifetime of one solve
/// (spec §5 "Shared resources").
pub struct Solver {
    pub(crate) n: usize,
    pub(crate) db: ClauseDb,
    pub(crate) trail: Trail,
    pub(crate) vmtf: Vmtf,
    pub(crate) counters: Counters,
}

impl Solver {
    /// `n` is the variable count, `m` an advisory clause count used only to
    /// size the arena. See spec §6 "Constructor inputs".
    pub fn new(n: usize, m: usize) -> Solver {
        assert!(n >= 1, "solver requires at least one variable");
        let capacity = arena_capacity_hint(n, m);
        Solver {
            n,
            db: ClauseDb::new(n, capacity),
            trail: Trail::new(n),
            vmtf: Vmtf::new(n),
            counters: Counters::new(),
        }
    }

    #[inline]
    pub fn n_vars(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn n_clauses(&self) -> u64 {
        self.counters.original_clauses
    }

    #[inline]
    pub fn mem_used(&self) -> usize {
        self.db.arena.used()
    }

    #[inline]
    pub fn n_conflicts(&self) -> u64 {
        self.counters.n_conflicts
    }

    #[inline]
    pub fn n_lemmas(&self) -> u32 {
        self.counters.n_lemmas
    }

    #[inline]
    pub fn max_lemmas(&self) -> u32 {
        self.counters.max_lemmas
    }

    #[inline]
    pub fn n_restarts(&self) -> u64 {
        self.counters.restarts
    }

    #[inline]
    pub fn n_decisions(&self) -> u64 {
        self.counters.decisions
    }

    #[inline]
    pub fn n_propagations(&self) -> u64 {
        self.counters.propagations
    }

    #[inline]
    pub fn tot_literals(&self) -> u64 {
        self.counters.tot_literals
    }

    #[inline]
    pub fn del_literals(&self) -> u64 {
        self.counters.del_literals
    }

    /// Ingests one original clause (spec §6 "Clause ingestion"). Every
    /// literal must satisfy `|literal| <= n` and be nonzero; anything else
    /// is a hard `InvalidLiteral` error rather than the spec's "implementer
    /// asserts" guidance, since this is the one boundary the core can
    /// actually check cheaply (see DESIGN.md).
    ///
    /// A unit clause that is currently unassigned is assigned immediately
    /// at decision level 0, folding the two-step contract spec §6 places on
    /// the caller ("install, then the caller must call `assign`") into one
    /// call.
    pub fn add_clause(&mut self, literals: &[i32]) -> Result<AddClauseOutcome, SolveError> {
        for &lit in literals {
            if lit == 0 || (lit.unsigned_abs() as usize) > self.n {
                return Err(SolveError::InvalidLiteral(lit));
            }
        }

        let cref = self.db.add_clause(literals, true)?;
        self.counters.original_clauses += 1;

        match literals.len() {
            0 => Ok(AddClauseOutcome::EmptyClause),
            1 => {
                let lit = literals[0];
                if self.trail.is_true(lit) {
                    Ok(AddClauseOutcome::Installed)
                } else if self.trail.is_false(lit) {
                    Ok(AddClauseOutcome::ConflictingUnit)
                } else {
                    self.trail.assign(lit, ClauseDb::reason_value(cref), true);
                    Ok(AddClauseOutcome::Installed)
                }
            }
            _ => Ok(AddClauseOutcome::Installed),
        }
    }

    /// The satisfying assignment after `solve()` returns `Sat`: `model()[i]`
    /// is the value of variable `i + 1`.
    pub fn model(&self) -> Vec<bool> {
        (1..=self.n as i32).map(|v| self.trail.model(v)).collect()
    }
}

fn arena_capacity_hint(n: usize, m: usize) -> usize {
    // Each clause costs 3 bookkeeping slots plus its literals; assume an
    // average width of 5 as a sizing guess, plus headroom scaled by `n` for
    // the learned clauses search will accumulate. Floored at the spec's
    // suggested lower bound of 2^20 slots (§4.1).
    let estimate = 1 + m.saturating_mul(8) + n.saturating_mul(4);
    estimate.max(1 << 20)
}
