//! Block region stack used to build structured control flow in one pass.
//!
//! A region is one nesting level: `head` is the block the region started
//! with and `tail` is the block currently accepting operations inside it.
//! Only the innermost region's tail is open for appends. The stack knows
//! nothing about branch targets; whoever pops a region wires it up.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<B> {
    pub head: B,
    pub tail: B,
}

#[derive(Debug, Clone)]
pub struct RegionStack<B> {
    regions: Vec<Region<B>>,
}

impl<B: Copy> Default for RegionStack<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Copy> RegionStack<B> {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
        }
    }

    /// Opens a region that starts (and, for now, ends) at `block`.
    pub fn enter(&mut self, block: B) {
        self.regions.push(Region {
            head: block,
            tail: block,
        });
    }

    /// Closes the innermost region and hands it back to the caller.
    pub fn exit(&mut self) -> Option<Region<B>> {
        self.regions.pop()
    }

    pub fn top(&self) -> Option<&Region<B>> {
        self.regions.last()
    }

    /// The block currently open for appends.
    pub fn tail(&self) -> Option<B> {
        self.regions.last().map(|r| r.tail)
    }

    /// Moves emission in the innermost region to `block`.
    /// Returns false when there is no region to update.
    pub fn set_tail(&mut self, block: B) -> bool {
        match self.regions.last_mut() {
            Some(region) => {
                region.tail = block;
                true
            }
            None => false,
        }
    }

    pub fn depth(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
