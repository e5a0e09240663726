/// In-process tape with the same layout and growth rules as the one the
/// compiled program carries: a zeroed buffer of whole pages, grown by one
/// page whenever a single-step move leaves it.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<u8>,
    cursor: usize,
    page_size: usize,
    growths: usize,
}

impl Tape {
    /// Panics if `page_size` is zero.
    pub fn new(page_size: usize) -> Self {
        assert!(page_size > 0, "tape page size must be non-zero");
        Tape {
            cells: vec![0; page_size],
            cursor: 0,
            page_size,
            growths: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// How many pages have been added since creation.
    pub fn growth_count(&self) -> usize {
        self.growths
    }

    pub fn get(&self) -> u8 {
        self.cells[self.cursor]
    }

    pub fn set(&mut self, value: u8) {
        self.cells[self.cursor] = value;
    }

    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.cursor];
        *cell = cell.wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.cursor];
        *cell = cell.wrapping_sub(1);
    }

    /// Raw buffer contents, lowest address first.
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    pub fn move_forward(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.cells.len() {
            self.cells.resize(self.cells.len() + self.page_size, 0);
            self.growths += 1;
        }
    }

    pub fn move_backward(&mut self) {
        if self.cursor == 0 {
            let old_len = self.cells.len();
            self.cells.resize(old_len + self.page_size, 0);
            // Shift first, then clear the vacated leading page.
            self.cells.copy_within(0..old_len, self.page_size);
            self.cells[..self.page_size].fill(0);
            self.cursor = self.page_size;
            self.growths += 1;
        }
        self.cursor -= 1;
    }

    /// Moves by a single step; `delta` must be +1 or -1.
    pub fn move_by(&mut self, delta: i8) {
        match delta {
            1 => self.move_forward(),
            -1 => self.move_backward(),
            _ => panic!("tape moves are single steps, got {}", delta),
        }
    }
}
