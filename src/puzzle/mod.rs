// vim: set ai et ts=4 sw=4 sts=4:
mod solver;

pub use self::solver::StepHint;

use std::fmt;
use std::rc::Rc;
use std::cell::RefCell;
use std::convert::TryFrom;
use std::collections::{BTreeSet, VecDeque};
use yaml_rust::Yaml;
use ansi_term::ANSIString;

use super::grid::{Grid, SquareStatus};
use super::util::{ralign, lalign_colored, ralign_joined_coloreds, Direction, Direction::*};
use super::row::Row;
use self::solver::Step;

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum SolveError {
    /// The puzzle document is malformed; raised while parsing.
    InvalidFormat { reason: String },
    /// Row and column run-length totals disagree; raised at construction.
    InvalidPuzzle { rows_total: usize, cols_total: usize },
    /// A line's currently known squares admit no legal alignment at all.
    NoSolution { direction: Direction, index: usize },
    /// The work queue drained with the grid incomplete; no forced deduction is left.
    Unsolvable,
    /// A full solve exhausted all forced moves without completing the grid.
    MultipleSolutions,
}
impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolveError::InvalidFormat { reason } =>
                write!(f, "invalid puzzle file: {}", reason),
            SolveError::InvalidPuzzle { rows_total, cols_total } =>
                write!(f, "invalid puzzle: row total ({}) does not match column total ({})",
                       rows_total, cols_total),
            SolveError::NoSolution { direction, index } =>
                write!(f, "no solution possible for {} {}: known squares contradict its runs",
                       direction.line_noun(), index),
            SolveError::Unsolvable =>
                write!(f, "unsolvable: not enough information, multiple solutions may exist"),
            SolveError::MultipleSolutions =>
                write!(f, "more than one solution possible"),
        }
    }
}

#[derive(Debug)]
pub struct Puzzle {
    pub rows: Vec<Row>,
    pub cols: Vec<Row>,
    pub grid: Rc<RefCell<Grid>>,
    mode:          Direction,
    queue:         VecDeque<usize>,
    follow_up:     BTreeSet<usize>,
    initial_stage: bool,
    steps:         Vec<Step>,
}

impl Puzzle {
    pub fn new(row_run_lengths: &Vec<Vec<usize>>,
               col_run_lengths: &Vec<Vec<usize>>) -> Result<Self, SolveError>
    {
        let rows_total: usize = row_run_lengths.iter().map(|runs| runs.iter().sum::<usize>()).sum();
        let cols_total: usize = col_run_lengths.iter().map(|runs| runs.iter().sum::<usize>()).sum();
        if rows_total != cols_total {
            return Err(SolveError::InvalidPuzzle { rows_total, cols_total });
        }

        let grid = Rc::new(RefCell::new(
            Grid::new(col_run_lengths.len(), row_run_lengths.len())
        ));
        let rows = (0..grid.borrow().height()).map(|y| Row::new(&grid, Horizontal, y, &row_run_lengths[y]))
                                              .collect::<Vec<_>>();
        let cols = (0..grid.borrow().width()).map(|x| Row::new(&grid, Vertical, x, &col_run_lengths[x]))
                                             .collect::<Vec<_>>();
        let mut puzzle = Puzzle {
            rows:          rows,
            cols:          cols,
            grid:          Rc::clone(&grid),
            mode:          Horizontal,
            queue:         VecDeque::new(),
            follow_up:     BTreeSet::new(),
            initial_stage: true,
            steps:         Vec::new(),
        };
        puzzle.reset_solve_state();
        Ok(puzzle)
    }
    pub fn width(&self) -> usize { self.grid.borrow().width() }
    pub fn height(&self) -> usize { self.grid.borrow().height() }

    pub fn square_status(&self, x: usize, y: usize) -> SquareStatus {
        self.grid.borrow().get_square(x, y).get_status()
    }

    pub fn from_yaml(doc: &Yaml) -> Result<Puzzle, SolveError>
    {
        let row_run_lengths = Self::_parse_lines(&doc["rows"], "rows")?;
        let col_run_lengths = Self::_parse_lines(&doc["cols"], "cols")?;
        Puzzle::new(&row_run_lengths, &col_run_lengths)
    }

    fn _parse_lines(input: &Yaml, key: &str) -> Result<Vec<Vec<usize>>, SolveError> {
        let list: &Vec<Yaml> = input.as_vec().ok_or_else(|| SolveError::InvalidFormat {
            reason: format!("missing or non-list '{}' entry", key),
        })?;
        list.iter()
            .map(|yaml_val| Self::_parse_line_runs(yaml_val, key))
            .collect()
    }

    fn _parse_line_runs(input: &Yaml, key: &str) -> Result<Vec<usize>, SolveError> {
        match input {
            Yaml::String(s)  => s.split_whitespace()
                                 .map(|tok| tok.parse::<usize>().map_err(|_| {
                                     SolveError::InvalidFormat {
                                         reason: format!("bad run length '{}' under '{}'", tok, key),
                                     }
                                 }))
                                 .collect(),
            Yaml::Integer(v) => usize::try_from(*v)
                                  .map(|len| vec![len])
                                  .map_err(|_| SolveError::InvalidFormat {
                                      reason: format!("bad run length '{}' under '{}'", v, key),
                                  }),
            Yaml::Null       => Ok(vec![]),
            _ => Err(SolveError::InvalidFormat {
                reason: format!("unexpected entry under '{}': {:?}", key, input),
            }),
        }
    }

    // ---- design-mode operations -------------------------------------------

    pub fn set_square(&mut self, x: usize, y: usize, status: SquareStatus) {
        self.grid.borrow_mut().get_square_mut(x, y).set_status(status);
    }

    /// Re-derives the run lengths of row y and column x from the squares as they
    /// currently stand. Called after a direct square edit; both crossing lines get a
    /// fresh automaton and an empty alignment cache.
    pub fn recount_specs(&mut self, x: usize, y: usize) {
        let row_counts = self.rows[y].run_lengths_from_squares();
        self.rows[y].update_run_lengths(row_counts);
        let col_counts = self.cols[x].run_lengths_from_squares();
        self.cols[x].update_run_lengths(col_counts);
    }

    pub fn update_all_specs(&mut self) {
        for row in self.rows.iter_mut().chain(self.cols.iter_mut()) {
            let counts = row.run_lengths_from_squares();
            row.update_run_lengths(counts);
        }
    }

    /// Inverts the design: every filled square becomes empty and vice versa
    /// (unknown squares count as empty), then all run lengths are recounted.
    pub fn invert(&mut self) {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let new_status = match self.square_status(x, y) {
                    SquareStatus::FilledIn => SquareStatus::CrossedOut,
                    _                      => SquareStatus::FilledIn,
                };
                self.set_square(x, y, new_status);
            }
        }
        self.update_all_specs();
    }
}

impl Puzzle {
    // helper functions for rendering
    pub fn render(&self, emit_color: bool, subdivision: Option<usize>)
        -> String
    {
        // if subdivision is given, insert visual subdivisor lines across the grid every Nth row/col
        let row_prefixes: Vec<Vec<ANSIString>> =
            self.rows.iter()
                     .map(|row| row.colored_run_labels())
                     .collect();

        let prefix_len = row_prefixes.iter()
                                     .map(|parts| (parts.iter()
                                                        .map(|ansi_str| ansi_str.len() + 1)
                                                        .sum::<usize>())
                                                  .saturating_sub(1)) // match the length of a join(" ")
                                     .max().unwrap_or(0);
        let max_col_runs = self.cols.iter()
                                    .map(|col| col.run_lengths().len())
                                    .max().unwrap_or(0);

        let mut result = String::new();
        let grid = self.grid.borrow();

        for i in (0..max_col_runs).rev() {
            result.push_str(&self._fmt_header(i, prefix_len, emit_color, subdivision));
        }

        // top board line
        result.push_str(&Self::_fmt_line(
            &ralign("", prefix_len),
            "\u{2554}",
            "\u{2557}",
            "\u{2564}",
            subdivision,
            &(0..self.width()).map(|_| String::from("\u{2550}\u{2550}\u{2550}"))
                              .collect::<Vec<_>>()
        ));

        for y in 0..self.height() {
            // board content line
            result.push_str(&Self::_fmt_line(
                &ralign_joined_coloreds(&row_prefixes[y], prefix_len, emit_color),
                "\u{2551}",
                "\u{2551}",
                "\u{2502}",
                subdivision,
                &grid.squares[y].iter()
                                .map(|s| format!(" {:1} ", s))
                                .collect::<Vec<_>>()
            ));

            // horizontal subdivisor line
            if let Some(subdiv) = subdivision {
                if ((y+1) % subdiv == 0) && (y != self.height()-1) {
                    result.push_str(&Self::_fmt_line(
                        &ralign("", prefix_len),
                        "\u{255F}",
                        "\u{2562}",
                        "\u{253C}",
                        subdivision,
                        &(0..self.width()).map(|_| String::from("\u{2500}\u{2500}\u{2500}"))
                                          .collect::<Vec<_>>()
                    ));
                }
            }
        }
        // bottom board line
        result.push_str(&Self::_fmt_line(
            &ralign("", prefix_len),
            "\u{255A}",
            "\u{255D}",
            "\u{2567}",
            subdivision,
            &(0..self.width()).map(|_| String::from("\u{2550}\u{2550}\u{2550}"))
                              .collect::<Vec<_>>()
        ));

        return result;
    }

    fn _fmt_line(prefix: &str,
                 left_delim: &str,
                 right_delim: &str,
                 columnwise_separator: &str,
                 subdivision: Option<usize>,
                 content_parts: &Vec<String>)
        -> String
    {
        let mut result = format!("{} {}", prefix, left_delim);
        for (idx, s) in content_parts.iter().enumerate() {
            result.push_str(s);
            if let Some(subdiv) = subdivision {
                if ((idx+1) % subdiv == 0) && (idx < content_parts.len()-1) {
                    result.push_str(columnwise_separator);
                }
            }
        }
        result.push_str(&format!("{}\n", right_delim));
        return result;
    }

    fn _fmt_header(&self, line_idx: usize,
                          prefix_len: usize,
                          emit_color: bool,
                          subdivision: Option<usize>)
        -> String
    {
        let mut content_parts = Vec::<String>::new();
        for col in &self.cols {
            let labels = col.colored_run_labels();
            let part: String;
            if line_idx < labels.len() {
                let colored = &labels[labels.len()-1-line_idx];
                part = format!(" {}", lalign_colored(colored, 2, emit_color));
            } else {
                part = format!(" {:-2}", " ");
            }

            content_parts.push(part);
        }

        Self::_fmt_line(
            &ralign("", prefix_len),
            " ",
            " ",
            " ",
            subdivision,
            &content_parts
        )
    }
}
impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render(false, Some(5)))
    }
}

#[cfg(test)]
mod tests {
    use yaml_rust::YamlLoader;
    use super::{Puzzle, SolveError};
    use super::super::grid::SquareStatus::*;

    #[test]
    fn parses_yaml_run_lengths() {
        let docs = YamlLoader::load_from_str("
rows:
    - 2
    - 1 1
    -
cols:
    - 1 1
    - 1
    - 1
").unwrap();
        let puzzle = Puzzle::from_yaml(&docs[0]).unwrap();
        assert_eq!(puzzle.width(), 3);
        assert_eq!(puzzle.height(), 3);
        assert_eq!(puzzle.rows[0].run_lengths(), &[2]);
        assert_eq!(puzzle.rows[1].run_lengths(), &[1, 1]);
        assert_eq!(puzzle.rows[2].run_lengths(), &[] as &[usize]);
        assert_eq!(puzzle.cols[0].run_lengths(), &[1, 1]);
    }

    #[test]
    fn rejects_malformed_yaml_documents() {
        // missing 'cols' entry
        let docs = YamlLoader::load_from_str("
rows:
    - 1
").unwrap();
        assert!(matches!(Puzzle::from_yaml(&docs[0]),
                         Err(SolveError::InvalidFormat { .. })));

        // non-numeric token in a run list
        let docs = YamlLoader::load_from_str("
rows:
    - 1 x
cols:
    - 1
").unwrap();
        assert!(matches!(Puzzle::from_yaml(&docs[0]),
                         Err(SolveError::InvalidFormat { .. })));

        // negative run length
        let docs = YamlLoader::load_from_str("
rows:
    - -1
cols:
    - 1
").unwrap();
        assert!(matches!(Puzzle::from_yaml(&docs[0]),
                         Err(SolveError::InvalidFormat { .. })));
    }

    #[test]
    fn renders_known_squares() {
        let mut puzzle = Puzzle::new(&vec![vec![1]], &vec![vec![1]]).unwrap();
        puzzle.set_square(0, 0, FilledIn);
        let rendered = puzzle.render(false, None);
        assert!(rendered.contains("\u{25A0}"));
        assert!(rendered.contains("1"));
    }

    #[test]
    fn recounting_specs_follows_edits() {
        let mut puzzle = Puzzle::new(&vec![vec![], vec![]], &vec![vec![], vec![]]).unwrap();
        puzzle.set_square(0, 0, FilledIn);
        puzzle.set_square(1, 0, FilledIn);
        puzzle.recount_specs(0, 0);
        puzzle.recount_specs(1, 0);
        assert_eq!(puzzle.rows[0].run_lengths(), &[2]);
        assert_eq!(puzzle.cols[0].run_lengths(), &[1]);
        assert_eq!(puzzle.cols[1].run_lengths(), &[1]);
        assert_eq!(puzzle.rows[1].run_lengths(), &[] as &[usize]);
    }

    #[test]
    fn inverting_recounts_everything() {
        let mut puzzle = Puzzle::new(&vec![vec![], vec![]], &vec![vec![], vec![]]).unwrap();
        puzzle.set_square(0, 0, FilledIn);
        puzzle.invert();
        assert_eq!(puzzle.square_status(0, 0), CrossedOut);
        assert_eq!(puzzle.square_status(1, 0), FilledIn);
        assert_eq!(puzzle.rows[0].run_lengths(), &[1]);
        assert_eq!(puzzle.rows[1].run_lengths(), &[2]);
        assert_eq!(puzzle.rows[0].label(), "1");
    }
}
