use super::voice::Voice;
use crate::MAX_VOICES;

const _: () = assert!(MAX_VOICES <= u32::BITS as usize);

/// Index of an allocated slot in a [`VoicePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceHandle(u8);

impl VoiceHandle {
    /// Converts a raw integer handle, as passed over the C ABI.
    pub fn from_raw(raw: i32) -> Option<Self> {
        usize::try_from(raw)
            .ok()
            .filter(|&index| index < MAX_VOICES)
            .map(|index| VoiceHandle(index as u8))
    }

    pub fn raw(self) -> i32 {
        i32::from(self.0)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Fixed slab of [`MAX_VOICES`] voices with an allocation bitmask.
///
/// Voices are built once up front; allocating and releasing only flips bits
/// and resets state, so the pool never touches the heap after construction
/// apart from instrument data owned by the voices.
#[derive(Debug, Clone)]
pub struct VoicePool {
    voices: [Voice; MAX_VOICES],
    allocated: u32,
}

impl VoicePool {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: std::array::from_fn(|_| Voice::new(sample_rate)),
            allocated: 0,
        }
    }

    /// Claims the lowest free slot. `None` when every slot is taken.
    pub fn allocate(&mut self) -> Option<VoiceHandle> {
        let index = (0..MAX_VOICES).find(|&i| self.allocated & (1 << i) == 0)?;
        self.allocated |= 1 << index;
        self.voices[index].reset();
        Some(VoiceHandle(index as u8))
    }

    /// Resets the voice and frees its slot. Returns false for a slot that was
    /// not allocated.
    pub fn release(&mut self, handle: VoiceHandle) -> bool {
        if !self.is_allocated(handle) {
            return false;
        }
        self.voices[handle.index()].reset();
        self.allocated &= !(1 << handle.index());
        true
    }

    pub fn is_allocated(&self, handle: VoiceHandle) -> bool {
        handle.index() < MAX_VOICES && self.allocated & (1 << handle.index()) != 0
    }

    pub fn get(&self, handle: VoiceHandle) -> Option<&Voice> {
        if self.is_allocated(handle) {
            self.voices.get(handle.index())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: VoiceHandle) -> Option<&mut Voice> {
        if self.is_allocated(handle) {
            self.voices.get_mut(handle.index())
        } else {
            None
        }
    }

    pub fn allocated_count(&self) -> usize {
        self.allocated.count_ones() as usize
    }

    pub fn is_full(&self) -> bool {
        self.allocated_count() == MAX_VOICES
    }

    /// Handles of all allocated voices, lowest slot first.
    pub fn handles(&self) -> impl Iterator<Item = VoiceHandle> + '_ {
        (0..MAX_VOICES)
            .filter(|&i| self.allocated & (1 << i) != 0)
            .map(|i| VoiceHandle(i as u8))
    }

    pub fn iter(&self) -> impl Iterator<Item = (VoiceHandle, &Voice)> {
        let allocated = self.allocated;
        self.voices
            .iter()
            .enumerate()
            .filter(move |(i, _)| allocated & (1 << i) != 0)
            .map(|(i, voice)| (VoiceHandle(i as u8), voice))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (VoiceHandle, &mut Voice)> {
        let allocated = self.allocated;
        self.voices
            .iter_mut()
            .enumerate()
            .filter(move |(i, _)| allocated & (1 << i) != 0)
            .map(|(i, voice)| (VoiceHandle(i as u8), voice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_until_full() {
        let mut pool = VoicePool::new(44_100.0);
        let handles: Vec<_> = (0..MAX_VOICES).map(|_| pool.allocate().unwrap()).collect();
        assert_eq!(handles[0].raw(), 0);
        assert_eq!(handles[MAX_VOICES - 1].raw(), MAX_VOICES as i32 - 1);
        assert!(pool.is_full());
        assert!(pool.allocate().is_none());
    }

    #[test]
    fn released_slot_is_reused() {
        let mut pool = VoicePool::new(44_100.0);
        let a = pool.allocate().unwrap();
        let b = pool.allocate().unwrap();
        assert!(pool.release(a));
        assert!(!pool.release(a));
        assert!(pool.get(a).is_none());
        assert_eq!(pool.allocate(), Some(a));
        assert_eq!(pool.handles().collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn raw_handles_are_range_checked() {
        assert_eq!(VoiceHandle::from_raw(-1), None);
        assert_eq!(VoiceHandle::from_raw(MAX_VOICES as i32), None);
        assert_eq!(VoiceHandle::from_raw(3).map(VoiceHandle::index), Some(3));

        let pool = VoicePool::new(44_100.0);
        assert!(pool.get(VoiceHandle::from_raw(3).unwrap()).is_none());
    }
}
