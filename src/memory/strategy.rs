//! Block placement strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::models::MemoryBlock;

/// How a free block is chosen for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationStrategy {
    /// First free block, in list order, large enough for the request.
    #[default]
    FirstFit,
    /// Free block leaving the least unused space; ties go to the lowest index.
    BestFit,
}

impl AllocationStrategy {
    /// Canonical name (`"first-fit"` / `"best-fit"`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::FirstFit => "first-fit",
            Self::BestFit => "best-fit",
        }
    }

    /// Returns the index of the block chosen for `size`, if any fits.
    pub fn select(&self, blocks: &[MemoryBlock], size: u64) -> Option<usize> {
        match self {
            Self::FirstFit => blocks.iter().position(|b| b.fits(size)),
            Self::BestFit => {
                let mut best: Option<(usize, u64)> = None;
                for (i, block) in blocks.iter().enumerate() {
                    if !block.fits(size) {
                        continue;
                    }
                    let waste = block.size - size;
                    if best.map_or(true, |(_, least)| waste < least) {
                        best = Some((i, waste));
                    }
                }
                best.map(|(i, _)| i)
            }
        }
    }
}

impl FromStr for AllocationStrategy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first-fit" | "firstfit" | "ff" => Ok(Self::FirstFit),
            "best-fit" | "bestfit" | "bf" => Ok(Self::BestFit),
            _ => Err(SimError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for AllocationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
