//! Run statistics and the "Problem Statistics" report box, in the same
//! shape the teacher's `print_stats` prints, adapted to the counters this
//! core actually keeps (no `rnd_decisions`: VMTF has no randomized phase).

use crate::core::Solver;

#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    pub n_vars: usize,
    pub n_clauses: u64,
    pub restarts: u64,
    pub conflicts: u64,
    pub decisions: u64,
    pub propagations: u64,
    pub tot_literals: u64,
    pub del_literals: u64,
    pub n_lemmas: u32,
    pub max_lemmas: u32,
}

impl Stats {
    pub fn from_solver(solver: &Solver) -> Stats {
        Stats {
            n_vars: solver.n_vars(),
            n_clauses: solver.n_clauses(),
            restarts: solver.n_restarts(),
            conflicts: solver.n_conflicts(),
            decisions: solver.n_decisions(),
            propagations: solver.n_propagations(),
            tot_literals: solver.tot_literals(),
            del_literals: solver.del_literals(),
            n_lemmas: solver.n_lemmas(),
            max_lemmas: solver.max_lemmas(),
        }
    }
}

pub fn print_problem_header(n_vars: usize, n_clauses: u64) {
    info!("============================[ Problem Statistics ]=============================");
    info!("|                                                                             |");
    info!("|  Number of variables:  {:12}                                         |", n_vars);
    info!("|  Number of clauses:    {:12}                                         |", n_clauses);
}

pub fn print_timing(parse_time: f64) {
    info!("|  Parse time:           {:12.2} s                                       |", parse_time);
    info!("|                                                                             |");
    info!("===============================================================================");
}

pub fn print_stats(stats: &Stats, cpu_time: f64, mem_used: Option<usize>) {
    info!("restarts              : {:<12}", stats.restarts);

    {
        let confl_per_s = stats.conflicts as f64 / cpu_time;
        info!("conflicts             : {:<12}   ({:.0} /sec)", stats.conflicts, confl_per_s);
    }

    {
        let decisions_per_s = stats.decisions as f64 / cpu_time;
        info!("decisions             : {:<12}   ({:.0} /sec)", stats.decisions, decisions_per_s);
    }

    {
        let props_per_s = stats.propagations as f64 / cpu_time;
        info!("propagations          : {:<12}   ({:.0} /sec)", stats.propagations, props_per_s);
    }

    {
        let total = stats.del_literals + stats.tot_literals;
        let del_percent = if total == 0 { 0.0 } else { stats.del_literals as f64 * 100.0 / total as f64 };
        info!("conflict literals     : {:<12}   ({:4.2} % deleted)", stats.tot_literals, del_percent);
    }

    info!("learned clauses       : {:<12}   (budget {})", stats.n_lemmas, stats.max_lemmas);

    if let Some(mem_used) = mem_used {
        info!("Memory used           : {:.2} MB", mem_used as f64 / 1024.0);
    }
    info!("CPU time              : {:.2} s", cpu_time);
    info!("");
}
