//! Gating matrix: one threshold per (module, facility) pair
//!
//! Thresholds and the derived per-module minimum live in atomics so the
//! call-site pre-check never takes a lock. Writers are serialized by the owning
//! `Vlog`; a reader may observe a threshold change slightly before the cache
//! catches up, which only ever costs one extra (or one skipped) formatting pass.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::facility::Facility;
use crate::level::Severity;
use crate::module::Module;

type Row = [AtomicU8; Facility::COUNT];

/// Per-module, per-facility severity thresholds
#[derive(Debug)]
pub struct GatingMatrix {
    levels: Box<[Row]>,
    min_levels: Box<[AtomicU8]>,
}

impl GatingMatrix {
    /// Matrix for `modules` modules, every row set to `defaults`
    ///
    /// `defaults` is indexed by [`Facility::index`]. The cache starts out
    /// assuming every facility is live; owners recompute it once liveness is
    /// known.
    pub fn new(modules: usize, defaults: [Severity; Facility::COUNT]) -> Self {
        let levels = (0..modules)
            .map(|_| defaults.map(|level| AtomicU8::new(level.as_u8())))
            .collect();
        let initial_min = defaults
            .into_iter()
            .fold(Severity::Off, Severity::least_severe);
        let min_levels = (0..modules)
            .map(|_| AtomicU8::new(initial_min.as_u8()))
            .collect();
        Self { levels, min_levels }
    }

    /// Number of module rows
    pub fn modules(&self) -> usize {
        self.levels.len()
    }

    /// Store one threshold; the caller recomputes the module's cache
    pub fn set(&self, module: Module, facility: Facility, level: Severity) {
        self.levels[module.index()][facility.index()].store(level.as_u8(), Ordering::Release);
    }

    /// Current threshold for a concrete pair
    #[inline]
    pub fn get(&self, module: Module, facility: Facility) -> Severity {
        decode(self.levels[module.index()][facility.index()].load(Ordering::Acquire))
    }

    /// Recompute the module's minimum effective level over live facilities
    pub fn recompute(&self, module: Module, live: impl Fn(Facility) -> bool) -> Severity {
        let row = &self.levels[module.index()];
        let min = Facility::ALL
            .into_iter()
            .filter(|facility| live(*facility))
            .map(|facility| decode(row[facility.index()].load(Ordering::Acquire)))
            .fold(Severity::Off, Severity::least_severe);
        self.min_levels[module.index()].store(min.as_u8(), Ordering::Release);
        min
    }

    /// Cached minimum effective level
    #[inline(always)]
    pub fn min_level(&self, module: Module) -> Severity {
        decode(self.min_levels[module.index()].load(Ordering::Relaxed))
    }

    /// Fast pre-check: one load, one comparison
    #[inline(always)]
    pub fn is_enabled(&self, module: Module, level: Severity) -> bool {
        level.as_u8() <= self.min_levels[module.index()].load(Ordering::Relaxed)
    }
}

#[inline(always)]
fn decode(raw: u8) -> Severity {
    // Only `Severity::as_u8` values are ever stored.
    Severity::from_u8(raw).unwrap_or(Severity::Off)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: [Severity; Facility::COUNT] = [Severity::Info, Severity::Off, Severity::Info];

    fn all_live(_: Facility) -> bool {
        true
    }

    #[test]
    fn test_defaults_fill_every_pair() {
        let matrix = GatingMatrix::new(2, DEFAULTS);
        for module in [Module::from_raw(0), Module::from_raw(1)] {
            assert_eq!(matrix.get(module, Facility::Console), Severity::Info);
            assert_eq!(matrix.get(module, Facility::Syslog), Severity::Off);
            assert_eq!(matrix.get(module, Facility::File), Severity::Info);
            assert_eq!(matrix.min_level(module), Severity::Info);
        }
    }

    #[test]
    fn test_recompute_takes_least_severe_live_threshold() {
        let matrix = GatingMatrix::new(1, DEFAULTS);
        let module = Module::from_raw(0);

        matrix.set(module, Facility::File, Severity::Dbg);
        assert_eq!(matrix.recompute(module, all_live), Severity::Dbg);
        assert!(matrix.is_enabled(module, Severity::Dbg));

        // A closed file no longer counts.
        let min = matrix.recompute(module, |facility| facility != Facility::File);
        assert_eq!(min, Severity::Info);
        assert!(!matrix.is_enabled(module, Severity::Dbg));
        assert!(matrix.is_enabled(module, Severity::Emer));
    }

    #[test]
    fn test_everything_off() {
        let matrix = GatingMatrix::new(1, [Severity::Off; Facility::COUNT]);
        let module = Module::from_raw(0);
        matrix.recompute(module, all_live);
        for level in Severity::MESSAGE_LEVELS {
            assert!(!matrix.is_enabled(module, level));
        }
    }
}
