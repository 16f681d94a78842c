// vim: set ai et ts=4 sts=4 sw=4:
use log::trace;

use super::{Row, Alignment, StateKind, DirectionalSequence};
use super::super::grid::SquareStatus::{CrossedOut, FilledIn, Unknown};
use super::super::puzzle::SolveError;

impl Row {
    /// Enumerates every legal full-row assignment consistent with the currently known
    /// squares, and fixes each square on which all of them agree. Returns the offsets
    /// of the newly determined squares; in hint mode they are reported but the grid is
    /// left untouched. Fails with NoSolution if no legal assignment remains.
    pub fn solve(&mut self, hint_mode: bool) -> Result<Vec<usize>, SolveError> {
        // square values may have changed since the last pass; memoized results that
        // depended on them are stale, so start from an empty cache each time
        self.clear_cache();

        let last_state = self.automaton.len() - 1;
        let start_len  = self.automaton.states[last_state].min_len;
        let alignments = self.find_alignments(self.length as isize - 1,
                                              last_state as isize,
                                              start_len);
        trace!("{} {}: {} legal alignment(s)",
               self.direction.line_noun(), self.index, alignments.len());

        if alignments.is_empty() {
            return Err(SolveError::NoSolution {
                direction: self.direction,
                index:     self.index,
            });
        }

        let mut fixed = Vec::<usize>::new();
        for at in 0..self.length {
            let value = alignments[0][at];
            if alignments.iter().all(|alignment| alignment[at] == value)
                && self.get_square(at).get_status() == Unknown
            {
                if !hint_mode {
                    self.get_square_mut(at).set_status(value);
                }
                fixed.push(at);
            }
        }
        Ok(fixed)
    }

    /// Recursive enumeration over (square index, state index, remaining state length),
    /// walking the row from its last square to its first and the automaton from its
    /// last state back to its first. An index of -1 means the row (resp. automaton)
    /// has been fully consumed.
    fn find_alignments(&mut self,
                       square_idx: isize,
                       state_idx: isize,
                       state_len: usize)
        -> Vec<Alignment>
    {
        // automaton fully consumed exactly when the squares ran out: one empty alignment
        if state_idx == 0 && square_idx == -1 {
            return vec![ Vec::new() ];
        }
        // ran out of states, or out of squares with unsatisfied states remaining
        if state_idx == -1 || (square_idx == -1 && (state_idx > 1 || state_len > 0)) {
            return Vec::new();
        }

        let state = self.automaton.states[state_idx as usize];

        // memoized results only exist at state-entry boundaries
        if state.min_len == state_len && square_idx >= 0 {
            if let Some(cached) = &self.cache[state_idx as usize][square_idx as usize] {
                return cached.clone();
            }
        }

        let mut alignments = Vec::<Alignment>::new();
        match state.kind {
            StateKind::Run => {
                if state_len > 0 {
                    // the run still needs squares; consume one if it could be filled in
                    let status = self.get_square(square_idx as usize).get_status();
                    if status == Unknown || status == FilledIn {
                        for mut alignment in self.find_alignments(square_idx - 1, state_idx, state_len - 1) {
                            alignment.push(FilledIn);
                            alignments.push(alignment);
                        }
                    }
                } else if state_idx > 0 {
                    // run fully placed; fall through to the previous state without
                    // consuming a square
                    let prev_len = self.automaton.states[(state_idx - 1) as usize].min_len;
                    alignments.extend(self.find_alignments(square_idx, state_idx - 1, prev_len));
                }
            },
            StateKind::Gap => {
                if square_idx >= 0 {
                    let status = self.get_square(square_idx as usize).get_status();
                    if status == Unknown || status == CrossedOut {
                        // gaps may extend beyond their minimum length, so stay in this
                        // state with its remaining length pinned at zero
                        for mut alignment in self.find_alignments(square_idx - 1, state_idx, 0) {
                            alignment.push(CrossedOut);
                            alignments.push(alignment);
                        }
                    }
                }
                if state_len == 0 && state_idx > 0 {
                    let prev_len = self.automaton.states[(state_idx - 1) as usize].min_len;
                    alignments.extend(self.find_alignments(square_idx, state_idx - 1, prev_len));
                }
            },
        }

        if state.min_len == state_len && square_idx >= 0 {
            self.cache[state_idx as usize][square_idx as usize] = Some(alignments.clone());
        }
        alignments
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use super::super::{Row, Automaton, State, StateKind::*, DirectionalSequence};
    use super::super::super::grid::{Grid, SquareStatus, SquareStatus::*};
    use super::super::super::util::Direction::*;
    use super::super::super::puzzle::SolveError;

    fn make_row(length: usize, run_lengths: Vec<usize>) -> Row {
        let grid = Rc::new(RefCell::new(Grid::new(length, 1)));
        Row::new(&grid, Horizontal, 0, &run_lengths)
    }

    fn enumerate(row: &mut Row) -> Vec<Vec<SquareStatus>> {
        row.clear_cache();
        let last_state = row.automaton().len() - 1;
        let start_len  = row.automaton().states[last_state].min_len;
        row.find_alignments(row.length as isize - 1, last_state as isize, start_len)
    }

    #[test]
    fn automaton_alternates_gaps_and_runs() {
        let automaton = Automaton::new(&[2, 1]);
        assert_eq!(automaton.states, vec![
            State::new(0, Gap),
            State::new(2, Run),
            State::new(1, Gap),
            State::new(1, Run),
            State::new(0, Gap),
        ]);
    }

    #[test]
    fn automaton_of_empty_run_lengths() {
        let automaton = Automaton::new(&[]);
        assert_eq!(automaton.states, vec![State::new(0, Gap), State::new(0, Gap)]);
    }

    #[test]
    fn automaton_of_zero_length_run() {
        let automaton = Automaton::new(&[0]);
        assert_eq!(automaton.states, vec![
            State::new(0, Gap),
            State::new(0, Run),
            State::new(0, Gap),
        ]);
    }

    #[test]
    fn enumerates_every_legal_alignment() {
        // runs [2,1] in 5 squares: the 2-run can start at 0 or 1
        let mut row = make_row(5, vec![2, 1]);
        let alignments: HashSet<_> = enumerate(&mut row).into_iter().collect();
        let expected: HashSet<_> = vec![
            vec![FilledIn, FilledIn, CrossedOut, FilledIn,   CrossedOut],
            vec![FilledIn, FilledIn, CrossedOut, CrossedOut, FilledIn],
            vec![CrossedOut, FilledIn, FilledIn, CrossedOut, FilledIn],
        ].into_iter().collect();
        assert_eq!(alignments, expected);
    }

    #[test]
    fn alignments_respect_known_squares() {
        let mut row = make_row(5, vec![2, 1]);
        row.get_square_mut(0).set_status(CrossedOut);
        let alignments = enumerate(&mut row);
        assert_eq!(alignments, vec![
            vec![CrossedOut, FilledIn, FilledIn, CrossedOut, FilledIn],
        ]);
    }

    #[test]
    fn warm_cache_yields_identical_alignments() {
        let mut row = make_row(7, vec![1, 2]);
        let cold: HashSet<_> = enumerate(&mut row).into_iter().collect();
        // re-run against the now-populated cache, without clearing it
        let last_state = row.automaton().len() - 1;
        let warm: HashSet<_> = row.find_alignments(6, last_state as isize, 0)
                                  .into_iter().collect();
        assert_eq!(cold, warm);
    }

    #[test]
    fn fills_overlap_of_all_alignments() {
        // run [4] in 5 squares: starts at 0 or 1, squares 1..4 are common to both
        let mut row = make_row(5, vec![4]);
        let fixed = row.solve(false).unwrap();
        assert_eq!(fixed, vec![1, 2, 3]);
        for at in 1..4 {
            assert_eq!(row.get_square(at).get_status(), FilledIn);
        }
        assert_eq!(row.get_square(0).get_status(), Unknown);
        assert_eq!(row.get_square(4).get_status(), Unknown);
    }

    #[test]
    fn empty_run_lengths_cross_out_whole_row() {
        for run_lengths in vec![vec![], vec![0]] {
            let mut row = make_row(3, run_lengths);
            let fixed = row.solve(false).unwrap();
            assert_eq!(fixed, vec![0, 1, 2]);
            for at in 0..3 {
                assert_eq!(row.get_square(at).get_status(), CrossedOut);
            }
        }
    }

    #[test]
    fn known_square_disambiguates_placement() {
        let mut row = make_row(3, vec![1]);
        row.get_square_mut(0).set_status(FilledIn);
        let fixed = row.solve(false).unwrap();
        assert_eq!(fixed, vec![1, 2]);
        assert_eq!(row.get_square(1).get_status(), CrossedOut);
        assert_eq!(row.get_square(2).get_status(), CrossedOut);
    }

    #[test]
    fn ambiguous_row_fixes_nothing() {
        let mut row = make_row(3, vec![1]);
        let fixed = row.solve(false).unwrap();
        assert!(fixed.is_empty());
        for at in 0..3 {
            assert_eq!(row.get_square(at).get_status(), Unknown);
        }
    }

    #[test]
    fn contradiction_reports_no_solution() {
        let mut row = make_row(2, vec![2]);
        row.get_square_mut(0).set_status(CrossedOut);
        assert_eq!(row.solve(false), Err(SolveError::NoSolution {
            direction: Horizontal,
            index: 0,
        }));
    }

    #[test]
    fn hint_mode_reports_without_mutating() {
        let mut row = make_row(5, vec![4]);
        let fixed = row.solve(true).unwrap();
        assert_eq!(fixed, vec![1, 2, 3]);
        for at in 0..5 {
            assert_eq!(row.get_square(at).get_status(), Unknown);
        }
    }

    #[test]
    fn recounts_run_lengths_from_squares() {
        let mut row = make_row(6, vec![]);
        for at in vec![0, 2, 3, 5] {
            row.get_square_mut(at).set_status(FilledIn);
        }
        let recounted = row.run_lengths_from_squares();
        assert_eq!(recounted, vec![1, 2, 1]);
        row.update_run_lengths(recounted);
        assert_eq!(row.run_lengths(), &[1, 2, 1]);
        // gap, run, gap, run, gap, run, gap
        assert_eq!(row.automaton().len(), 7);
    }
}
