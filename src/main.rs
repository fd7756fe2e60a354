extern crate time;
#[macro_use]
extern crate log;
extern crate env_logger;
#[macro_use]
extern crate clap;

use std::fs;
use std::io;
use std::io::Write;

use microsat_rust::core::SolveResult;
use microsat_rust::dimacs;
use microsat_rust::stats;

struct MainOptions {
    strict: bool,
    in_path: String,
    out_path: Option<String>,
}

fn main() {
    let ls012 = ["0", "1", "2"];
    let matches = clap::App::new("microsat-rust")
        .version(&crate_version!()[..])
        .about("Compact CDCL SAT solver")
        .arg(
            clap::Arg::with_name("verb")
                .long("verb")
                .takes_value(true)
                .possible_values(&ls012)
                .help("Verbosity level (0=silent, 1=some, 2=more)"),
        )
        .arg(
            clap::Arg::with_name("strict")
                .long("strict")
                .help("Validate the DIMACS header against the clauses actually parsed"),
        )
        .arg(clap::Arg::with_name("input").required(true).help("DIMACS CNF input file, optionally gzip-compressed"))
        .arg(clap::Arg::with_name("output").required(false).help("Write the DIMACS-result-format model to this file"))
        .get_matches();

    {
        let mut builder = env_logger::LogBuilder::new();
        builder.format(|record: &log::LogRecord| format!("{}", record.args()));
        builder.filter(
            None,
            matches
                .value_of("verb")
                .map(|v| match v {
                    "1" => log::LogLevelFilter::Info,
                    "2" => log::LogLevelFilter::Trace,
                    _ => log::LogLevelFilter::Off,
                })
                .unwrap_or(log::LogLevelFilter::Info),
        );
        builder.init().unwrap();
    }

    let options = MainOptions {
        strict: matches.is_present("strict"),
        in_path: matches.value_of("input").unwrap().to_string(),
        out_path: matches.value_of("output").map(|x| x.to_string()),
    };

    solve_file(options).expect("Error");
}

fn solve_file(options: MainOptions) -> io::Result<()> {
    let initial_time = time::precise_time_s();

    let outcome = dimacs::parse_file(&options.in_path, options.strict)
        .unwrap_or_else(|e| panic!("failed to parse {}: {}", options.in_path, e));
    let parsed_time = time::precise_time_s();

    stats::print_problem_header(outcome.solver.n_vars(), outcome.solver.n_clauses());
    stats::print_timing(parsed_time - initial_time);

    let mut solver = outcome.solver;
    let result = if outcome.trivially_unsat {
        info!("Solved by unit propagation during parsing");
        SolveResult::Unsat
    } else {
        solver.solve().expect("solver ran out of arena capacity")
    };

    let cpu_time = time::precise_time_s() - initial_time;
    let mem_used = microsat_rust::util::mem_used_peak();
    let solver_stats = stats::Stats::from_solver(&solver);
    stats::print_stats(&solver_stats, cpu_time, mem_used);

    match result {
        SolveResult::Unsat => println!("s UNSATISFIABLE"),
        SolveResult::Sat => {
            println!("s SATISFIABLE");
            print_model(&solver.model());
        }
    }

    if let Some(path) = options.out_path {
        let mut out = fs::File::create(path)?;
        write_result(&mut out, result, &solver)?;
    }

    Ok(())
}

fn print_model(model: &[bool]) {
    let mut line = String::new();
    for (i, &value) in model.iter().enumerate() {
        let var_id = i + 1;
        if value {
            line.push_str(&format!("{} ", var_id));
        } else {
            line.push_str(&format!("-{} ", var_id));
        }
    }
    line.push('0');
    println!("{}", line);
}

fn write_result<W: io::Write>(stream: &mut W, result: SolveResult, solver: &microsat_rust::Solver) -> io::Result<()> {
    match result {
        SolveResult::Unsat => writeln!(stream, "UNSAT"),
        SolveResult::Sat => {
            writeln!(stream, "SAT")?;
            for (i, &value) in solver.model().iter().enumerate() {
                let var_id = i + 1;
                if value {
                    write!(stream, "{} ", var_id)?;
                } else {
                    write!(stream, "-{} ", var_id)?;
                }
            }
            writeln!(stream, "0")
        }
    }
}
