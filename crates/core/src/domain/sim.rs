// SIM Domain Model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::error::{DomainError, Result};

/// Number of SIM slots in every unit
pub const SIM_SLOTS: u8 = 8;

/// One SIM slot of a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sim {
    pub slot: u8,
    pub imei: Option<String>,
    pub vendor: Option<String>,
}

fn blank_to_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl Sim {
    /// Build a slot entry; blank IMEI/vendor are stored as absent
    pub fn new(slot: u8, imei: Option<&str>, vendor: Option<&str>) -> Result<Self> {
        if !(1..=SIM_SLOTS).contains(&slot) {
            return Err(DomainError::InvalidSimSet(format!(
                "slot {} outside 1..={}",
                slot, SIM_SLOTS
            )));
        }
        Ok(Self {
            slot,
            imei: blank_to_none(imei),
            vendor: blank_to_none(vendor),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.imei.is_none() && self.vendor.is_none()
    }
}

/// A complete SIM set: exactly slots 1..=8, each once, ordered by slot.
/// Entries are normalized like `Sim::new`, so blank IMEI/vendor become absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimSet(Vec<Sim>);

impl SimSet {
    pub fn new(sims: Vec<Sim>) -> Result<Self> {
        if sims.len() != SIM_SLOTS as usize {
            return Err(DomainError::InvalidSimSet(format!(
                "expected {} slots, got {}",
                SIM_SLOTS,
                sims.len()
            )));
        }

        let mut seen = BTreeSet::new();
        let mut normalized = Vec::with_capacity(sims.len());
        for sim in sims {
            let sim = Sim::new(sim.slot, sim.imei.as_deref(), sim.vendor.as_deref())?;
            if !seen.insert(sim.slot) {
                return Err(DomainError::InvalidSimSet(format!(
                    "duplicate slot {}",
                    sim.slot
                )));
            }
            normalized.push(sim);
        }

        normalized.sort_by_key(|s| s.slot);
        Ok(Self(normalized))
    }

    /// Fill missing slots with empty entries (the editable 8-row grid)
    pub fn grid_from(existing: &[Sim]) -> Self {
        let sims = (1..=SIM_SLOTS)
            .map(|slot| {
                existing
                    .iter()
                    .find(|s| s.slot == slot)
                    .cloned()
                    .unwrap_or(Sim {
                        slot,
                        imei: None,
                        vendor: None,
                    })
            })
            .collect();
        Self(sims)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sim> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Sim] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Sim> {
        self.0
    }
}
