use ice_crypto::{CommandState, CryptoPhase};

/// Submission notification to the controller for one tag.
pub trait Doorbell {
    fn ring(&self, tag: u32);
}

/// Per-tag command working state for one hardware queue.
///
/// Each tag's state (header, PRDT, binding) is owned by exactly one in-flight
/// command at a time. Queues on different threads own disjoint pools, or
/// disjoint slices of one pool via [`CommandPool::slots_mut`].
pub struct CommandPool {
    slots: Vec<CommandState>,
}

impl CommandPool {
    pub fn new(depth: u32, sg_entry_size: usize, max_sg_entries: usize) -> Self {
        assert!(depth > 0, "CommandPool: zero queue depth");
        let slots = (0..depth)
            .map(|tag| CommandState::new(tag, sg_entry_size, max_sg_entries))
            .collect();
        Self { slots }
    }

    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, tag: u32) -> &CommandState {
        &self.slots[tag as usize]
    }

    pub fn slot_mut(&mut self, tag: u32) -> &mut CommandState {
        assert!((tag as usize) < self.slots.len(), "CommandPool: tag {} out of range", tag);
        &mut self.slots[tag as usize]
    }

    pub fn slots_mut(&mut self) -> &mut [CommandState] {
        &mut self.slots
    }

    /// A tag is busy from binding until its crypto teardown has run.
    pub fn is_in_flight(&self, tag: u32) -> bool {
        !matches!(self.slot(tag).phase(), CryptoPhase::Unbound | CryptoPhase::Reclaimed)
    }
}
