// SPDX-License-Identifier: GPL-3.0-only

//! Active coder registry
//!
//! Media pipeline code asks the registry which coder to build for a codec
//! each time it creates one. Activation is the only writer and always
//! publishes a complete [`RegistrySnapshot`], so a reader sees either the
//! old or the new (encoder, decoder) pair, never a mix.

use crate::codecs::{CodecMode, CoderDescriptor, LogicalCodec};
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

/// Process-wide registry used by [`crate::configure_hardware_acceleration`]
static GLOBAL_REGISTRY: LazyLock<CodecRegistry> = LazyLock::new(CodecRegistry::new);

/// Immutable view of the active coders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySnapshot {
    encoders: BTreeMap<LogicalCodec, CoderDescriptor>,
    decoders: BTreeMap<LogicalCodec, CoderDescriptor>,
}

impl RegistrySnapshot {
    /// Software coders for every supported codec
    pub fn software_defaults() -> Self {
        let mut snapshot = Self {
            encoders: BTreeMap::new(),
            decoders: BTreeMap::new(),
        };
        for codec in LogicalCodec::ALL {
            for mode in CodecMode::ALL {
                snapshot.set(CoderDescriptor::software(codec, mode));
            }
        }
        snapshot
    }

    /// Replace the slot matching the descriptor's codec and mode
    pub(crate) fn set(&mut self, descriptor: CoderDescriptor) {
        let slots = match descriptor.mode {
            CodecMode::Encode => &mut self.encoders,
            CodecMode::Decode => &mut self.decoders,
        };
        slots.insert(descriptor.codec, descriptor);
    }

    pub fn get(&self, codec: LogicalCodec, mode: CodecMode) -> CoderDescriptor {
        let slots = match mode {
            CodecMode::Encode => &self.encoders,
            CodecMode::Decode => &self.decoders,
        };
        // Snapshots are seeded with every codec, so a miss only happens for a
        // hand-built snapshot; the software coder is the correct answer then.
        slots
            .get(&codec)
            .cloned()
            .unwrap_or_else(|| CoderDescriptor::software(codec, mode))
    }

    pub fn encoder(&self, codec: LogicalCodec) -> CoderDescriptor {
        self.get(codec, CodecMode::Encode)
    }

    pub fn decoder(&self, codec: LogicalCodec) -> CoderDescriptor {
        self.get(codec, CodecMode::Decode)
    }

    /// All slots, encoders first, ordered by codec
    pub fn iter(&self) -> impl Iterator<Item = &CoderDescriptor> {
        self.encoders.values().chain(self.decoders.values())
    }
}

impl Default for RegistrySnapshot {
    fn default() -> Self {
        Self::software_defaults()
    }
}

/// Shared, swappable registry of active coders
#[derive(Debug)]
pub struct CodecRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl CodecRegistry {
    /// A registry holding the software defaults
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(RegistrySnapshot::software_defaults())),
        }
    }

    /// The process-wide registry
    pub fn global() -> &'static CodecRegistry {
        &GLOBAL_REGISTRY
    }

    /// Current snapshot; stays valid even if activation runs again
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        // The guarded value is a single Arc, so a poisoned lock still holds a
        // complete snapshot
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Encoder to build for `codec` right now
    pub fn get_encoder(&self, codec: LogicalCodec) -> CoderDescriptor {
        self.snapshot().encoder(codec)
    }

    /// Decoder to build for `codec` right now
    pub fn get_decoder(&self, codec: LogicalCodec) -> CoderDescriptor {
        self.snapshot().decoder(codec)
    }

    pub(crate) fn publish(&self, snapshot: RegistrySnapshot) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(snapshot);
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_software() {
        let registry = CodecRegistry::new();
        for codec in LogicalCodec::ALL {
            assert!(!registry.get_encoder(codec).is_hardware());
            assert!(!registry.get_decoder(codec).is_hardware());
        }
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let registry = CodecRegistry::new();
        let before = registry.snapshot();

        let mut next = RegistrySnapshot::software_defaults();
        next.set(CoderDescriptor::hardware(
            LogicalCodec::H264,
            CodecMode::Encode,
            "nvh264enc",
        ));
        registry.publish(next);

        assert_eq!(
            registry.get_encoder(LogicalCodec::H264).element_name(),
            "nvh264enc"
        );
        // Readers holding the old snapshot keep a consistent view
        assert!(!before.encoder(LogicalCodec::H264).is_hardware());
    }

    #[test]
    fn test_snapshot_iterates_every_slot() {
        let snapshot = RegistrySnapshot::software_defaults();
        assert_eq!(snapshot.iter().count(), LogicalCodec::ALL.len() * 2);
    }
}
