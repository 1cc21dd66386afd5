//! Board: fixed N×N grid of cells, critical mass, adjacency, whole-board scans.

/// Player index, 0-based, cyclic over the number of players.
pub type PlayerId = usize;

/// Grid dimension of the playing board.
pub const GRID_SIZE: usize = 6;

/// Grid coordinate (row, col), both in [0, N).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Critical mass for a position on an `size`×`size` grid: 2 in a corner, 3 on an edge, 4 inside.
pub fn critical_mass_for(pos: Position, size: usize) -> usize {
    let last = size.saturating_sub(1);
    let on_row_edge = pos.row == 0 || pos.row == last;
    let on_col_edge = pos.col == 0 || pos.col == last;
    match (on_row_edge, on_col_edge) {
        (true, true) => 2,
        (true, false) | (false, true) => 3,
        (false, false) => 4,
    }
}

/// Single grid position: a stack of same-owner orbs and a fixed critical mass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    /// One entry per orb; every entry equals `owner` when non-empty.
    orbs: Vec<PlayerId>,
    owner: Option<PlayerId>,
    critical_mass: usize,
    /// Set by the renderer for the cell under the cursor/mouse. Game logic never reads it.
    pub hover: bool,
}

impl Cell {
    pub fn new(position: Position, size: usize) -> Self {
        Self {
            position,
            orbs: Vec::new(),
            owner: None,
            critical_mass: critical_mass_for(position, size),
            hover: false,
        }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    #[cfg(test)]
    pub fn orbs(&self) -> &[PlayerId] {
        &self.orbs
    }

    #[inline]
    pub fn orb_count(&self) -> usize {
        self.orbs.len()
    }

    #[inline]
    pub fn critical_mass(&self) -> usize {
        self.critical_mass
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orbs.is_empty()
    }

    #[inline]
    pub fn is_critical(&self) -> bool {
        self.orbs.len() >= self.critical_mass
    }

    /// Add one orb of `player`. Does not check move legality.
    ///
    /// On a cell owned by another player the whole stack flips to `player` before the new orb
    /// is appended (capture). Returns true if the cell reached critical mass.
    pub fn add_orb(&mut self, player: PlayerId) -> bool {
        if self.owner.is_some_and(|o| o != player) {
            self.orbs.iter_mut().for_each(|o| *o = player);
        }
        self.orbs.push(player);
        self.owner = Some(player);
        self.is_critical()
    }

    /// Empty the cell and return the four orthogonal neighbours (up, down, left, right),
    /// unclipped. Coordinates may fall outside the grid; the caller clips them.
    pub fn explode(&mut self) -> [(isize, isize); 4] {
        self.orbs.clear();
        self.owner = None;
        let (r, c) = (self.position.row as isize, self.position.col as isize);
        [(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)]
    }
}

/// Fixed-size square grid; exactly one cell per position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// cells[row * size + col]
    cells: Vec<Cell>,
}

impl Board {
    pub fn new() -> Self {
        Self::with_size(GRID_SIZE)
    }

    pub fn with_size(size: usize) -> Self {
        let cells = (0..size * size)
            .map(|i| Cell::new(Position::new(i / size, i % size), size))
            .collect();
        Self { size, cells }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Clip a raw (possibly negative) coordinate to the grid.
    pub fn clip(&self, (row, col): (isize, isize)) -> Option<Position> {
        let (row, col) = (usize::try_from(row).ok()?, usize::try_from(col).ok()?);
        let pos = Position::new(row, col);
        self.in_bounds(pos).then_some(pos)
    }

    /// Cell at `pos`. Panics if `pos` is outside the grid.
    pub fn cell(&self, pos: Position) -> &Cell {
        assert!(self.in_bounds(pos), "position {pos} outside {0}x{0} board", self.size);
        &self.cells[pos.row * self.size + pos.col]
    }

    /// Mutable cell at `pos`. Panics if `pos` is outside the grid.
    pub fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        assert!(self.in_bounds(pos), "position {pos} outside {0}x{0} board", self.size);
        &mut self.cells[pos.row * self.size + pos.col]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn total_orbs(&self) -> usize {
        self.cells.iter().map(Cell::orb_count).sum()
    }

    /// True if `player` owns at least one non-empty cell.
    pub fn has_orbs(&self, player: PlayerId) -> bool {
        self.cells
            .iter()
            .any(|c| !c.is_empty() && c.owner() == Some(player))
    }

    pub fn orbs_of(&self, player: PlayerId) -> usize {
        self.cells
            .iter()
            .filter(|c| c.owner() == Some(player))
            .map(Cell::orb_count)
            .sum()
    }

    /// The player owning every non-empty cell, if there is at least one and they share an owner.
    pub fn sole_owner(&self) -> Option<PlayerId> {
        let mut owners = self.cells.iter().filter_map(Cell::owner);
        let first = owners.next()?;
        owners.all(|o| o == first).then_some(first)
    }

    /// Mark exactly one cell (or none) as hovered.
    pub fn set_hover(&mut self, pos: Option<Position>) {
        for cell in &mut self.cells {
            cell.hover = Some(cell.position) == pos;
        }
    }

    pub fn hovered(&self) -> Option<Position> {
        self.cells.iter().find(|c| c.hover).map(Cell::position)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
