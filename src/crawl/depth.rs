// src/crawl/depth.rs
// =============================================================================
// Discovery depth: how many link hops an address is from the seed.
//
// A flat HashMap keyed by the canonical address string. The seed is 0 and
// anything found on a page at depth d is d + 1.
// =============================================================================

use std::collections::HashMap;

use crate::address::Address;

#[derive(Debug, Default, Clone)]
pub struct DepthIndex {
    depths: HashMap<String, usize>,
}

impl DepthIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_seed(&mut self, seed: &Address) {
        self.depths.insert(seed.render().to_string(), 0);
    }

    /// Stores and returns `discovered_on_depth + 1` for `address`.
    pub fn record(&mut self, address: &Address, discovered_on_depth: usize) -> usize {
        let depth = discovered_on_depth + 1;
        self.depths.insert(address.render().to_string(), depth);
        depth
    }

    pub fn depth_of(&self, address: &Address) -> Option<usize> {
        self.depths.get(address.render()).copied()
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}
