//! Hearing and tuning profiles
//!
//! A `HearingProfile` stores the measured loss per corrected band, one
//! instance per ear. A `TuningProfile` stores the amplification intensity
//! applied on top of the measured loss, shared across both ears. Both are
//! owned by the configuration collaborator; the engine only reads snapshots.
//!
//! Out-of-range values from the collaborator are clamped at this boundary so
//! they can never reach the gain math.

use serde::{Deserialize, Serialize};

use crate::bands::{band_index, BAND_COUNT};
use crate::error::{CoreError, Result};

/// Loss range accepted per band, in dB (0 = no loss).
pub const LOSS_DB_RANGE: (f32, f32) = (0.0, 100.0);

/// Tuning range accepted per band, in percent.
pub const TUNING_PCT_RANGE: (f32, f32) = (40.0, 90.0);

/// Default tuning intensity, in percent.
pub const DEFAULT_TUNING_PCT: f32 = 50.0;

/// Which ear a profile or control applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ear {
    /// Output channel 0
    Left,
    /// Output channel 1
    Right,
}

/// Measured hearing loss per band, in dB
///
/// Values are indexed by position in the band registry and clamped to
/// 0–100 dB on write. Missing bands default to 0 dB (no loss).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HearingProfile {
    loss_db: [f32; BAND_COUNT],
}

impl HearingProfile {
    /// Create a profile with no loss on any band.
    pub fn flat() -> Self {
        Self {
            loss_db: [0.0; BAND_COUNT],
        }
    }

    /// Get the loss for a band by registry index.
    pub fn loss_db_at(&self, index: usize) -> f32 {
        self.loss_db.get(index).copied().unwrap_or(0.0)
    }

    /// Get the loss for a band by center frequency.
    ///
    /// Frequencies outside the registry read as 0 dB.
    pub fn loss_db(&self, frequency: f32) -> f32 {
        band_index(frequency).map_or(0.0, |i| self.loss_db[i])
    }

    /// Set the loss for a band by center frequency, clamped to 0–100 dB.
    ///
    /// Frequencies outside the registry are ignored.
    pub fn set_loss_db(&mut self, frequency: f32, value: f32) {
        if let Some(i) = band_index(frequency) {
            self.loss_db[i] = value.clamp(LOSS_DB_RANGE.0, LOSS_DB_RANGE.1);
        }
    }

    /// Set the loss for a band, rejecting instead of clamping.
    ///
    /// The strict variant for callers validating external input (imports,
    /// account sync): an off-registry frequency or out-of-range value is
    /// reported back instead of silently repaired.
    pub fn try_set_loss_db(&mut self, frequency: f32, value: f32) -> Result<()> {
        let i = band_index(frequency).ok_or(CoreError::UnknownBand(frequency))?;
        if !(LOSS_DB_RANGE.0..=LOSS_DB_RANGE.1).contains(&value) {
            return Err(CoreError::InvalidProfileValue { frequency, value });
        }
        self.loss_db[i] = value;
        Ok(())
    }

    /// Parse a profile from a comma-separated value string in registry order.
    ///
    /// This is the storage format the account layer uses for per-ear data
    /// (`"0,10,40,0,0,0,0"`). Missing or unparseable entries default to 0 dB;
    /// parsed values are clamped like any other write.
    pub fn from_csv(data: &str) -> Self {
        let mut profile = Self::flat();
        for (i, field) in data.split(',').take(BAND_COUNT).enumerate() {
            let value = field.trim().parse::<f32>().unwrap_or(0.0);
            profile.loss_db[i] = value.clamp(LOSS_DB_RANGE.0, LOSS_DB_RANGE.1);
        }
        profile
    }

    /// Serialize the profile to the comma-separated storage format.
    pub fn to_csv(&self) -> String {
        self.loss_db
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for HearingProfile {
    fn default() -> Self {
        Self::flat()
    }
}

/// Amplification intensity per band, in percent
///
/// Acts as a multiplier on the prescribed compensation: 100 % applies the
/// full measured loss as boost, 50 % half of it. Clamped to 40–90 % on
/// write; missing bands default to 50 %.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningProfile {
    intensity_pct: [f32; BAND_COUNT],
}

impl TuningProfile {
    /// Get the intensity for a band by registry index.
    pub fn intensity_pct_at(&self, index: usize) -> f32 {
        self.intensity_pct
            .get(index)
            .copied()
            .unwrap_or(DEFAULT_TUNING_PCT)
    }

    /// Get the intensity for a band by center frequency.
    pub fn intensity_pct(&self, frequency: f32) -> f32 {
        band_index(frequency).map_or(DEFAULT_TUNING_PCT, |i| self.intensity_pct[i])
    }

    /// Set the intensity for a band, clamped to 40–90 %.
    ///
    /// Frequencies outside the registry are ignored.
    pub fn set_intensity_pct(&mut self, frequency: f32, value: f32) {
        if let Some(i) = band_index(frequency) {
            self.intensity_pct[i] = value.clamp(TUNING_PCT_RANGE.0, TUNING_PCT_RANGE.1);
        }
    }

    /// Set the intensity for a band, rejecting instead of clamping.
    ///
    /// Strict variant of [`Self::set_intensity_pct`] for validating external
    /// input.
    pub fn try_set_intensity_pct(&mut self, frequency: f32, value: f32) -> Result<()> {
        let i = band_index(frequency).ok_or(CoreError::UnknownBand(frequency))?;
        if !(TUNING_PCT_RANGE.0..=TUNING_PCT_RANGE.1).contains(&value) {
            return Err(CoreError::InvalidProfileValue { frequency, value });
        }
        self.intensity_pct[i] = value;
        Ok(())
    }
}

impl Default for TuningProfile {
    fn default() -> Self {
        Self {
            intensity_pct: [DEFAULT_TUNING_PCT; BAND_COUNT],
        }
    }
}

/// Snapshot of everything the engine needs from the configuration layer
///
/// Pushed into the engine whenever the collaborator reports a change. The
/// engine never holds a reference back into the configuration layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CorrectionSettings {
    /// Left ear hearing profile
    pub left: HearingProfile,
    /// Right ear hearing profile
    pub right: HearingProfile,
    /// Tuning profile shared across both ears
    pub tuning: TuningProfile,
}

impl CorrectionSettings {
    /// Borrow the hearing profile for one ear.
    pub fn ear(&self, ear: Ear) -> &HearingProfile {
        match ear {
            Ear::Left => &self.left,
            Ear::Right => &self.right,
        }
    }

    /// Mutably borrow the hearing profile for one ear.
    pub fn ear_mut(&mut self, ear: Ear) -> &mut HearingProfile {
        match ear {
            Ear::Left => &mut self.left,
            Ear::Right => &mut self.right,
        }
    }
}
