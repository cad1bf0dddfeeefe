use foundation::handles::Handle;

/// Scene node id. Ids are dense and spawn-ordered, so the index doubles as
/// the slot in every component column of the world.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub Handle);

impl EntityId {
    pub fn from_index(index: u32) -> Self {
        EntityId(Handle::new(index, 0))
    }

    pub fn index(&self) -> u32 {
        self.0.index()
    }

    /// Column slot of this node.
    pub fn slot(&self) -> usize {
        self.0.index() as usize
    }
}
