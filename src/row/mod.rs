// vim: set ai et ts=4 sw=4 sts=4:
mod solver;

use std::rc::Rc;
use std::cell::{Ref, RefMut, RefCell};
use ansi_term::{Colour, Style, ANSIString};

use super::util::{Direction, Direction::*};
use super::grid::{Grid, Square, SquareStatus};

pub trait DirectionalSequence
{
    fn get_row_index(&self) -> usize;
    fn get_direction(&self) -> Direction;
    fn get_grid(&self) -> &Rc<RefCell<Grid>>;

    fn square_index(&self, at: usize) -> (usize, usize) {
        match self.get_direction() {
            Horizontal => (at, self.get_row_index()),
            Vertical   => (self.get_row_index(), at),
        }
    }
    fn get_square(&self, index: usize) -> Ref<Square> {
        let grid = self.get_grid().borrow();
        let (x,y) = self.square_index(index);
        Ref::map(grid, |g| g.get_square(x, y))
    }
    fn get_square_mut(&self, index: usize) -> RefMut<Square> {
        let grid = self.get_grid().borrow_mut();
        let (x,y) = self.square_index(index);
        RefMut::map(grid, |g| g.get_square_mut(x, y))
    }
}

// -------------------------------------------------------------

#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum StateKind {
    Run,
    Gap,
}

/// One state of a row's gap/run automaton: a minimum number of squares still to be
/// consumed in this state, and whether those squares are filled in (Run) or crossed
/// out (Gap).
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct State {
    pub min_len: usize,
    pub kind:    StateKind,
}
impl State {
    pub fn new(min_len: usize, kind: StateKind) -> Self {
        State { min_len, kind }
    }
}

/// The alternating Gap/Run state sequence derived from a row's run lengths; encodes
/// "optional leading gap, then each run followed by a separating gap, with the final
/// gap optional". Immutable once built; rebuilt whenever the run lengths change.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Automaton {
    pub states: Vec<State>,
}
impl Automaton {
    pub fn new(run_lengths: &[usize]) -> Self {
        let mut states = Vec::<State>::with_capacity(2*run_lengths.len() + 2);
        states.push(State::new(0, StateKind::Gap));
        for &run_length in run_lengths {
            states.push(State::new(run_length, StateKind::Run));
            states.push(State::new(1, StateKind::Gap));
        }
        if states.len() == 1 {
            // no runs: a trailing gap must still consume the entire row
            states.push(State::new(1, StateKind::Gap));
        }
        let last = states.len() - 1;
        states[last].min_len = 0; // trailing empty space is optional
        Automaton { states }
    }
    pub fn len(&self) -> usize { self.states.len() }
}

// -------------------------------------------------------------

/// One full legal assignment of a row's squares; index i holds the status of the
/// square at offset i within the row (FilledIn or CrossedOut, never Unknown).
pub type Alignment = Vec<SquareStatus>;

#[derive(Debug)]
pub struct Row {
    pub direction:  Direction,
    pub index:      usize,
    pub length:     usize,
    run_lengths:    Vec<usize>,
    automaton:      Automaton,
    cache:          Vec<Vec<Option<Vec<Alignment>>>>, // indexed by (state idx, square idx)
    grid:           Rc<RefCell<Grid>>,
}

impl Row {
    pub fn new(grid: &Rc<RefCell<Grid>>,
               direction: Direction,
               row_index: usize,
               run_lengths: &Vec<usize>) -> Self
    {
        let row_length = match direction {
            Horizontal => grid.borrow().width(),
            Vertical   => grid.borrow().height(),
        };
        let automaton = Automaton::new(run_lengths);
        let mut row = Row {
            direction:   direction,
            index:       row_index,
            length:      row_length,
            run_lengths: run_lengths.clone(),
            automaton:   automaton,
            cache:       Vec::new(),
            grid:        Rc::clone(grid),
        };
        row.clear_cache();
        row
    }

    pub fn run_lengths(&self) -> &[usize] {
        &self.run_lengths
    }
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// Installs a new set of run lengths, rebuilding the automaton and dropping any
    /// memoized enumeration results (they were computed against the old automaton).
    pub fn update_run_lengths(&mut self, run_lengths: Vec<usize>) {
        self.automaton = Automaton::new(&run_lengths);
        self.run_lengths = run_lengths;
        self.clear_cache();
    }

    pub fn clear_cache(&mut self) {
        self.cache = vec![vec![None; self.length]; self.automaton.len()];
    }

    /// Recounts the maximal sequences of filled-in squares in this row, in order.
    /// Used in design mode to re-derive the run lengths after a direct square edit.
    pub fn run_lengths_from_squares(&self) -> Vec<usize> {
        let mut counts = Vec::<usize>::new();
        let mut current: usize = 0;
        for at in 0..self.length {
            if self.get_square(at).get_status() == SquareStatus::FilledIn {
                current += 1;
            } else if current > 0 {
                counts.push(current);
                current = 0;
            }
        }
        if current > 0 {
            counts.push(current);
        }
        counts
    }

    /// Spare room in this row: squares beyond the minimum the run lengths require
    /// (sum of runs plus one separator between each pair).
    pub fn slack(&self) -> isize {
        let min_space = self.run_lengths.iter().sum::<usize>() as isize
                        + self.run_lengths.len() as isize - 1;
        self.length as isize - min_space
    }

    /// True if at least one run is long enough that some of its squares are forced
    /// by pigeonhole, regardless of what any crossing line says.
    pub fn has_forced_square(&self) -> bool {
        let slack = self.slack();
        self.run_lengths.iter().any(|&len| len as isize > slack)
    }

    pub fn is_completed(&self) -> bool {
        (0..self.length).all(|at| self.get_square(at).get_status() != SquareStatus::Unknown)
    }

    pub fn label(&self) -> String {
        self.run_lengths.iter()
                        .map(|len| len.to_string())
                        .collect::<Vec<_>>()
                        .join(" ")
    }
    pub fn colored_run_labels(&self) -> Vec<ANSIString> {
        let style = match self.is_completed() {
            true  => Style::new().fg(Colour::Fixed(241)),
            false => Style::default(),
        };
        self.run_lengths.iter()
                        .map(|len| style.paint(len.to_string()))
                        .collect()
    }
}
impl DirectionalSequence for Row {
    fn get_row_index(&self) -> usize { self.index }
    fn get_direction(&self) -> Direction { self.direction }
    fn get_grid(&self)      -> &Rc<RefCell<Grid>> { &self.grid }
}
