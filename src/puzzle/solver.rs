// vim: set ai et ts=4 sts=4 sw=4:
use std::collections::BTreeSet;
use log::{debug, info};

use super::{Puzzle, SolveError};
use super::super::grid::SquareStatus;
use super::super::row::{Row, DirectionalSequence};
use super::super::util::{Direction, Direction::*};

/// Undo record for one productive resolution: which line fixed which squares, and
/// the follow-up set as it stood just before the step.
#[derive(Debug)]
pub struct Step {
    pub direction: Direction,
    pub index:     usize,
    pub fixed:     Vec<usize>,
    follow_up:     BTreeSet<usize>,
}

/// Lookahead result of a hint query: the next line on which a deduction is possible.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct StepHint {
    pub direction: Direction,
    pub index:     usize,
}

impl Puzzle {
    /// Reverts every square to Unknown, drops the history, and reseeds the work
    /// queue. Seeding uses the slack heuristic: start in the orientation with the
    /// tightest line, and only queue lines with a pigeonhole-forced square; all
    /// other candidates wait in the follow-up set of the opposite orientation.
    pub fn reset_solve_state(&mut self) {
        self.grid.borrow_mut().reset();
        for row in self.rows.iter_mut().chain(self.cols.iter_mut()) {
            row.clear_cache();
        }
        self.initial_stage = true;
        self.steps.clear();

        let row_order = Self::slack_order(&self.rows);
        let col_order = Self::slack_order(&self.cols);
        let min_row_slack = row_order.iter().map(|&(_, slack)| slack).min().unwrap_or(0);
        let min_col_slack = col_order.iter().map(|&(_, slack)| slack).min().unwrap_or(0);
        let row_pursue = Self::pursuable(&self.rows, &row_order);
        let col_pursue = Self::pursuable(&self.cols, &col_order);

        if min_row_slack <= min_col_slack {
            self.mode      = Horizontal;
            self.queue     = row_pursue.into_iter().collect();
            self.follow_up = col_pursue.into_iter().collect();
        } else {
            self.mode      = Vertical;
            self.queue     = col_pursue.into_iter().collect();
            self.follow_up = row_pursue.into_iter().collect();
        }
        debug!("seeded solve state: mode={}, {} line(s) queued, {} deferred",
               self.mode, self.queue.len(), self.follow_up.len());
    }

    fn slack_order(lines: &Vec<Row>) -> Vec<(usize, isize)> {
        let mut order: Vec<(usize, isize)> = lines.iter()
                                                  .enumerate()
                                                  .map(|(i, line)| (i, line.slack()))
                                                  .collect();
        order.sort_by_key(|&(_, slack)| slack);
        order
    }

    fn pursuable(lines: &Vec<Row>, order: &Vec<(usize, isize)>) -> Vec<usize> {
        order.iter()
             .filter(|&&(i, _)| lines[i].has_forced_square())
             .map(|&(i, _)| i)
             .collect()
    }

    /// Resolves lines from the work queue until one of them fixes at least one
    /// square. In hint mode the productive line is reported and left at the front of
    /// the queue, with the grid and history untouched; otherwise the step is applied,
    /// recorded, and its fixed squares' orthogonal indices queued as follow-up work.
    pub fn step_solve(&mut self, hint_mode: bool) -> Result<Option<StepHint>, SolveError> {
        let mut fixed = Vec::<usize>::new();
        while fixed.is_empty() {
            if self.queue.is_empty() {
                if self.finished() {
                    return Ok(None);
                }
                // propagation has stalled; only guessing could make progress now
                return Err(SolveError::Unsolvable);
            }

            let index = self.queue.pop_front().unwrap();
            let line = match self.mode {
                Horizontal => &mut self.rows[index],
                Vertical   => &mut self.cols[index],
            };
            fixed = line.solve(hint_mode)?;

            if !fixed.is_empty() {
                if hint_mode {
                    self.queue.push_front(index);
                    return Ok(Some(StepHint {
                        direction: self.mode,
                        index:     index,
                    }));
                }
                debug!("{} {} fixed {} square(s)", self.mode.line_noun(), index, fixed.len());
                self.steps.push(Step {
                    direction: self.mode,
                    index:     index,
                    fixed:     fixed.clone(),
                    follow_up: self.follow_up.clone(),
                });
                for &at in fixed.iter() {
                    // a fixed square at offset `at` crosses the line of the opposite
                    // orientation with that same index
                    self.follow_up.insert(at);
                }
            }

            if self.queue.is_empty() {
                if self.initial_stage {
                    // mandatory full first sweep of the other orientation
                    self.initial_stage = false;
                    let opposite_count = match self.mode.opposite() {
                        Horizontal => self.rows.len(),
                        Vertical   => self.cols.len(),
                    };
                    self.queue.extend(0..opposite_count);
                } else {
                    self.queue.extend(self.follow_up.iter().cloned()); // ascending
                }
                self.follow_up.clear();
                self.mode = self.mode.opposite();
                debug!("sweep complete, switching to {} ({} line(s) pending)",
                       self.mode, self.queue.len());
            }
        }
        Ok(None)
    }

    /// Runs the propagation to quiescence. Fails with MultipleSolutions if every
    /// forced deduction has been applied but the grid is still incomplete.
    pub fn solve(&mut self) -> Result<(), SolveError> {
        while !self.queue.is_empty() {
            self.step_solve(false)?;
        }
        if !self.finished() {
            return Err(SolveError::MultipleSolutions);
        }
        info!("solved in {} step(s)", self.steps.len());
        Ok(())
    }

    /// Exactly inverts the most recent non-hint `step_solve` mutation; no-op if
    /// there is no history.
    pub fn rollback_step(&mut self) {
        let step = match self.steps.pop() {
            Some(step) => step,
            None       => return,
        };
        let line = match step.direction {
            Horizontal => &self.rows[step.index],
            Vertical   => &self.cols[step.index],
        };
        for &at in step.fixed.iter() {
            line.get_square_mut(at).set_status(SquareStatus::Unknown);
        }
        self.mode = step.direction;
        self.queue.push_front(step.index);
        self.follow_up = step.follow_up;
    }

    pub fn finished(&self) -> bool {
        self.grid.borrow().is_complete()
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Design-mode collaborator hook: after a direct square edit at (x, y) while
    /// solving, the edited line must be re-examined and the crossing line queued as
    /// follow-up work.
    pub fn notify_square_edited(&mut self, x: usize, y: usize) {
        let (index, follow_up_index) = match self.mode {
            Horizontal => (y, x),
            Vertical   => (x, y),
        };
        if !self.queue.contains(&index) {
            self.queue.push_back(index);
        }
        self.follow_up.insert(follow_up_index);
    }
}
