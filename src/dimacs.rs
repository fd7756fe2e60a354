//! DIMACS CNF parsing: a hand-rolled character scanner in the same style as
//! minisat-family parsers, transparently decompressing gzip input. Feeds
//! parsed clauses straight into a freshly sized `Solver`.

use std::collections::HashSet;
use std::error;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::str;

use flate2::read::GzDecoder;

use crate::core::{AddClauseOutcome, Solver};
use crate::error::SolveError;

#[derive(Debug)]
pub enum ParseError {
    Io(io::Error),
    ExpectedToken(&'static str),
    IntExpected,
    ZeroVariables,
    HeaderMismatch {
        declared_vars: usize,
        declared_clauses: usize,
        found_vars: usize,
        found_clauses: usize,
    },
    Clause(SolveError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "i/o error reading DIMACS input: {}", e),
            ParseError::ExpectedToken(t) => write!(f, "expected '{}'", t),
            ParseError::IntExpected => write!(f, "expected an integer"),
            ParseError::ZeroVariables => write!(f, "DIMACS header declares zero variables"),
            ParseError::HeaderMismatch { declared_vars, declared_clauses, found_vars, found_clauses } => write!(
                f,
                "DIMACS header mismatch: declared {} vars / {} clauses, found {} vars / {} clauses",
                declared_vars, declared_clauses, found_vars, found_clauses
            ),
            ParseError::Clause(e) => write!(f, "invalid clause: {}", e),
        }
    }
}

impl error::Error for ParseError {}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError::Io(e)
    }
}

impl From<SolveError> for ParseError {
    fn from(e: SolveError) -> Self {
        ParseError::Clause(e)
    }
}

/// Result of a successful parse: the solver, pre-loaded with every clause in
/// the input, plus the header's declared sizes and whether ingestion already
/// proved the formula unsatisfiable (an empty clause or a unit conflicting
/// with an earlier one) — `solve()` still needs to be called, but the
/// caller may skip it and report UNSAT immediately.
pub struct ParseOutcome {
    pub solver: Solver,
    pub declared_vars: usize,
    pub declared_clauses: usize,
    pub trivially_unsat: bool,
}

/// Reads `path`, transparently gunzipping if it starts with the gzip magic
/// bytes, and parses it as DIMACS CNF.
pub fn parse_file<P: AsRef<Path>>(path: P, strict: bool) -> Result<ParseOutcome, ParseError> {
    let mut bytes = Vec::new();
    fs::File::open(&path)?.read_to_end(&mut bytes)?;

    let text = if bytes.starts_with(&[0x1f, 0x8b]) {
        let mut decoder = GzDecoder::new(&bytes[..]);
        let mut s = String::new();
        decoder.read_to_string(&mut s)?;
        s
    } else {
        String::from_utf8_lossy(&bytes).into_owned()
    };

    parse(&text, strict)
}

/// Parses an already-decoded DIMACS CNF text buffer.
pub fn parse(text: &str, strict: bool) -> Result<ParseOutcome, ParseError> {
    let mut p = Parser { chars: text.chars(), cur: None };
    p.advance();
    p.run(strict)
}

struct Parser<'a> {
    chars: str::Chars<'a>,
    cur: Option<char>,
}

impl<'a> Parser<'a> {
    fn run(&mut self, strict: bool) -> Result<ParseOutcome, ParseError> {
        self.skip_comments_and_whitespace()?;
        self.consume("p")?;
        self.skip_whitespace();
        self.consume("cnf")?;
        let declared_vars = self.next_uint()?;
        let declared_clauses = self.next_uint()?;

        if declared_vars == 0 {
            return Err(ParseError::ZeroVariables);
        }

        let mut solver = Solver::new(declared_vars, declared_clauses);
        let mut seen_vars: HashSet<i32> = HashSet::new();
        let mut found_clauses = 0usize;
        let mut trivially_unsat = false;

        loop {
            self.skip_comments_and_whitespace()?;
            if self.cur.is_none() {
                break;
            }

            let lits = self.parse_clause(&mut seen_vars)?;
            found_clauses += 1;
            match solver.add_clause(&lits)? {
                AddClauseOutcome::Installed => {}
                AddClauseOutcome::EmptyClause | AddClauseOutcome::ConflictingUnit => {
                    trivially_unsat = true;
                }
            }
        }

        if strict {
            if found_clauses != declared_clauses || seen_vars.len() > declared_vars {
                return Err(ParseError::HeaderMismatch {
                    declared_vars,
                    declared_clauses,
                    found_vars: seen_vars.len(),
                    found_clauses,
                });
            }
        }

        Ok(ParseOutcome { solver, declared_vars, declared_clauses, trivially_unsat })
    }

    fn parse_clause(&mut self, seen_vars: &mut HashSet<i32>) -> Result<Vec<i32>, ParseError> {
        let mut lits = Vec::new();
        loop {
            let lit = self.next_int()?;
            if lit == 0 {
                return Ok(lits);
            }
            seen_vars.insert(lit.abs());
            lits.push(lit);
            self.skip_whitespace();
        }
    }

    fn advance(&mut self) {
        self.cur = self.chars.next();
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.cur, Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.cur {
            self.advance();
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_comments_and_whitespace(&mut self) -> Result<(), ParseError> {
        loop {
            self.skip_whitespace();
            match self.cur {
                Some('c') => self.skip_line(),
                _ => return Ok(()),
            }
        }
    }

    fn consume(&mut self, target: &'static str) -> Result<(), ParseError> {
        for expected in target.chars() {
            match self.cur {
                Some(c) if c == expected => self.advance(),
                _ => return Err(ParseError::ExpectedToken(target)),
            }
        }
        Ok(())
    }

    fn read_uint_body(&mut self) -> Result<usize, ParseError> {
        let mut len = 0usize;
        let mut value: usize = 0;
        loop {
            match self.cur.and_then(|c| c.to_digit(10)) {
                Some(d) => {
                    value = value * 10 + d as usize;
                    len += 1;
                    self.advance();
                }
                None if len > 0 => return Ok(value),
                None => return Err(ParseError::IntExpected),
            }
        }
    }

    fn next_uint(&mut self) -> Result<usize, ParseError> {
        self.skip_whitespace();
        if self.cur == Some('+') {
            self.advance();
        }
        self.read_uint_body()
    }

    fn next_int(&mut self) -> Result<i32, ParseError> {
        self.skip_whitespace();
        let sign = match self.cur {
            Some('+') => {
                self.advance();
                1
            }
            Some('-') => {
                self.advance();
                -1
            }
            _ => 1,
        };
        let value = self.read_uint_body()?;
        Ok(sign * value as i32)
    }
}
