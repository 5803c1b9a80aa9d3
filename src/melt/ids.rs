/// First id handed out for object-derived rows
pub const FIRST_ENTITY_ID: u64 = 1;

/// First id handed out for junction rows
pub const FIRST_JUNCTION_ID: u64 = 10_000;

/// Issues row identifiers for one melt run.
///
/// Entity and junction ids come from two independent counters shared by
/// every table. Neither is ever reset or reused while the allocator lives.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_entity_id: u64,
    next_junction_id: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator {
            next_entity_id: FIRST_ENTITY_ID,
            next_junction_id: FIRST_JUNCTION_ID,
        }
    }

    pub fn next_entity_id(&mut self) -> u64 {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        id
    }

    pub fn next_junction_id(&mut self) -> u64 {
        let id = self.next_junction_id;
        self.next_junction_id += 1;
        id
    }

    /// Number of entity ids issued so far
    pub fn entities_issued(&self) -> u64 {
        self.next_entity_id - FIRST_ENTITY_ID
    }

    /// Number of junction ids issued so far
    pub fn junctions_issued(&self) -> u64 {
        self.next_junction_id - FIRST_JUNCTION_ID
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
