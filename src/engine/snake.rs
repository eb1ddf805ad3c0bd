use super::direction::{Cell, Direction};
use std::collections::VecDeque;

/// Snake state.  Snate.
///
/// The cells are stored head first.  No two cells are ever equal outside of
/// [`Snake::push_head()`]/[`Snake::pop_tail()`] pairs performed within a
/// single tick.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Snake {
    cells: VecDeque<Cell>,
}

impl Snake {
    /// Create a snake of `length` cells with its head at `head`, lying in a
    /// straight line behind the head as seen when facing in `direction`
    pub(super) fn new(head: Cell, direction: Direction, length: usize) -> Snake {
        let behind = direction.reverse();
        let cells = std::iter::successors(Some(head), |&c| Some(c.step(behind)))
            .take(length)
            .collect();
        Snake { cells }
    }

    /// Create a snake from its cells, head first
    #[cfg(test)]
    pub(super) fn from_cells<I: IntoIterator<Item = Cell>>(cells: I) -> Snake {
        Snake {
            cells: cells.into_iter().collect(),
        }
    }

    /// Return the position of the snake's head
    pub(super) fn head(&self) -> Cell {
        self.cells
            .front()
            .copied()
            .expect("snake should never be empty")
    }

    /// Iterate over the snake's cells, head first
    pub(super) fn cells(&self) -> impl ExactSizeIterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Test whether any part of the snake, tail included, is on `cell`
    pub(super) fn occupies(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Add a new head in front of the current one
    pub(super) fn push_head(&mut self, cell: Cell) {
        self.cells.push_front(cell);
    }

    /// Remove the last cell of the snake.  The head is never removed.
    pub(super) fn pop_tail(&mut self) {
        if self.cells.len() > 1 {
            let _ = self.cells.pop_back();
        }
    }
}
