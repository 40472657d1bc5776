use gatecast_model::Volume;

/// Live volume plus the level to restore on unmute.
///
/// Setting the volume to zero counts as muting; the restore level only
/// tracks non-zero values so unmuting brings back the prior loudness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeMemory {
    live: Volume,
    restore: Volume,
}

impl VolumeMemory {
    pub fn new(initial: Volume) -> Self {
        Self {
            live: initial,
            restore: if initial.is_muted() {
                Volume::FULL
            } else {
                initial
            },
        }
    }

    pub fn live(&self) -> Volume {
        self.live
    }

    pub fn is_muted(&self) -> bool {
        self.live.is_muted()
    }

    /// Returns true when the live volume changed.
    pub fn set(&mut self, volume: Volume) -> bool {
        if !volume.is_muted() {
            self.restore = volume;
        }
        let changed = self.live != volume;
        self.live = volume;
        changed
    }

    pub fn mute(&mut self) -> bool {
        if self.live.is_muted() {
            return false;
        }
        self.restore = self.live;
        self.live = Volume::MUTED;
        true
    }

    pub fn unmute(&mut self) -> bool {
        if !self.live.is_muted() {
            return false;
        }
        self.live = self.restore;
        true
    }

    pub fn toggle_mute(&mut self) -> bool {
        if self.is_muted() {
            self.unmute()
        } else {
            self.mute()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmute_restores_level_before_mute() {
        let mut volume = VolumeMemory::new(Volume::new(0.7));
        volume.set(Volume::new(0.35));
        assert!(volume.mute());
        assert!(volume.is_muted());
        assert!(volume.unmute());
        assert_eq!(volume.live(), Volume::new(0.35));
    }

    #[test]
    fn slider_to_zero_counts_as_mute() {
        let mut volume = VolumeMemory::new(Volume::new(0.7));
        volume.set(Volume::new(0.4));
        volume.set(Volume::MUTED);
        assert!(volume.is_muted());
        volume.unmute();
        assert_eq!(volume.live(), Volume::new(0.4));
    }

    #[test]
    fn muted_start_unmutes_to_full() {
        let mut volume = VolumeMemory::new(Volume::MUTED);
        assert!(!volume.mute());
        volume.toggle_mute();
        assert_eq!(volume.live(), Volume::FULL);
    }
}
