use crate::error::SolveError;
use crate::core::arena::{Arena, Offset};
use crate::core::literal::Dual;


/// Sentinel marking an empty watch chain, matching the C source's `END`.
pub const END: i32 = -9;

/// Offset of a clause's first literal inside the arena. The two watch-link
/// slots for a non-unit clause live at `cref - 2` and `cref - 1`.
pub type ClauseRef = Offset;

/// Where a watch-chain cursor currently points: either the per-literal head
/// cell (`first[lit]`) or a link slot living inside some clause's watch
/// node. Stands in for the C source's `int* watch` pointing either at
/// `first[lit]` or at a `db[...]` slot — both are "a place holding the next
/// node's offset", just backed by different storage.
#[derive(Clone, Copy)]
pub enum WatchCursor {
    Head(i32),
    Node(Offset),
}

impl WatchCursor {
    #[inline]
    pub fn get(&self, db: &ClauseDb) -> Offset {
        match *self {
            WatchCursor::Head(lit) => db.first[lit],
            WatchCursor::Node(off) => db.arena.get(off),
        }
    }

    #[inline]
    pub fn set(&self, db: &mut ClauseDb, value: Offset) {
        match *self {
            WatchCursor::Head(lit) => db.first[lit] = value,
            WatchCursor::Node(off) => db.arena.set(off, value),
        }
    }

    /// Advances the cursor onto the node it currently points to, without
    /// removing anything. Mirrors `watch = (db + *watch)`.
    #[inline]
    pub fn advance_onto(node: Offset) -> WatchCursor {
        WatchCursor::Node(node)
    }
}


/// The clause database and intrusive watch index: a prefix of the arena
/// holding every clause (original and learned), with per-literal watch
/// chains threaded through the two link slots that precede each clause
/// body. See spec §3 "Clause database" / "Watch index" and §4.2.
pub struct ClauseDb {
    pub arena: Arena,
    /// Arena `used` boundary: offsets below this are original clauses,
    /// offsets at or above it are learned.
    pub mem_fixed: usize,
    first: Dual<Offset>,
}

impl ClauseDb {
    pub fn new(n: usize, arena_capacity: usize) -> ClauseDb {
        let mut arena = Arena::with_capacity(arena_capacity);
        // Sentinel 0 at offset 0 so "clause preceded by 0" detection is
        // well-defined even for the very first installed clause.
        let sentinel = arena.allocate(1).expect("arena capacity too small for sentinel");
        arena.set(sentinel, 0);

        ClauseDb {
            arena,
            mem_fixed: 0,
            first: Dual::new(n, END),
        }
    }

    /// Allocates `size + 3` slots (two watch links, the literal payload,
    /// and a terminating 0), installs watches for clauses of length > 1,
    /// and returns the offset of the clause's first literal.
    pub fn add_clause(&mut self, literals: &[i32], original: bool) -> Result<ClauseRef, SolveError> {
        let size = literals.len();
        let clause_head = self.arena.used();
        self.arena.allocate(size + 3)?;
        let cref: ClauseRef = (clause_head + 2) as Offset;

        if size > 1 {
            self.add_watch(literals[0], cref - 2);
            self.add_watch(literals[1], cref - 1);
        }

        self.arena.write_slice(cref, literals);
        self.arena.set(cref + size as Offset, 0);

        if original {
            self.mem_fixed = self.arena.used();
        }

        Ok(cref)
    }

    /// Prepends a watch node (an arena slot whose value is "next node's
    /// offset") onto literal `lit`'s chain.
    #[inline]
    pub fn add_watch(&mut self, lit: i32, node: Offset) {
        self.arena.set(node, self.first[lit]);
        self.first[lit] = node;
    }

    #[inline]
    pub fn watch_head(&self, lit: i32) -> WatchCursor {
        WatchCursor::Head(lit)
    }

    /// Given a watch node's offset (as read off a `WatchCursor`), locates
    /// the clause body it belongs to. The node is either the clause's
    /// first watch slot (`cref - 2`) or second (`cref - 1`); the leading
    /// zero sentinel lets us tell which by checking whether the slot two
    /// below the candidate body is 0. See spec §4.2 "Watch traversal".
    #[inline]
    pub fn resolve_watch(&self, node: Offset) -> ClauseRef {
        let mut candidate = node + 1;
        if self.arena.get(candidate - 2) == 0 {
            candidate += 1;
        }
        candidate
    }

    /// Whether the watch node at `node` belongs to an original clause
    /// (`node < mem_fixed`) rather than a learned one.
    #[inline]
    pub fn is_original_watch(&self, node: Offset) -> bool {
        (node as usize) < self.mem_fixed
    }

    #[inline]
    pub fn lit_at(&self, cref: ClauseRef, i: i32) -> i32 {
        self.arena.get(cref + i)
    }

    #[inline]
    pub fn set_lit_at(&mut self, cref: ClauseRef, i: i32, value: i32) {
        self.arena.set(cref + i, value);
    }

    #[inline]
    pub fn swap_lits(&mut self, cref: ClauseRef, i: i32, j: i32) {
        let a = self.lit_at(cref, i);
        let b = self.lit_at(cref, j);
        self.set_lit_at(cref, i, b);
        self.set_lit_at(cref, j, a);
    }

    /// Scans a clause body to its null terminator, returning its literals.
    pub fn clause_literals(&self, cref: ClauseRef) -> Vec<i32> {
        let mut out = Vec::new();
        let mut i = 0;
        loop {
            let lit = self.lit_at(cref, i);
            if lit == 0 {
                break;
            }
            out.push(lit);
            i += 1;
        }
        out
    }

    /// `reason[v]` stores `clause_offset + 1`; recovers the clause offset.
    #[inline]
    pub fn reason_clause(reason_value: i32) -> ClauseRef {
        reason_value - 1
    }

    /// Value to store in `reason[v]` for a clause installed at `cref`.
    #[inline]
    pub fn reason_value(cref: ClauseRef) -> i32 {
        cref + 1
    }
}
