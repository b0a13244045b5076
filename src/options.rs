// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Resizer configuration

use crate::energy::EnergyFunction;
use crate::error::SeamError;
use crate::seamfinder::CostModel;
use std::str::FromStr;

/// How far an axis may be grown, relative to the image handed to the
/// resizer.  Beyond about twice the original size the image is mostly
/// averaged pixels.
pub const DEFAULT_MAX_GROWTH: f64 = 2.0;

/// The order in which the two axes are brought to size.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Order {
    /// Finish the width completely, then the height.
    WidthFirst,
    /// Alternate one width step and one height step while both are
    /// off target, then finish whichever is left.  Batch growth only
    /// takes effect once a single axis remains.
    Interleaved,
}

/// How an axis is grown.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Growth {
    /// Recompute the energy and insert one seam per step.
    Iterative,
    /// Find the `k` seams that removing `k` would take, then duplicate
    /// all of them in one pass.
    Batch,
}

impl Default for Order {
    fn default() -> Self {
        Order::WidthFirst
    }
}

impl Default for Growth {
    fn default() -> Self {
        Growth::Iterative
    }
}

impl FromStr for Order {
    type Err = SeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "width-first" => Ok(Order::WidthFirst),
            "interleaved" => Ok(Order::Interleaved),
            _ => Err(SeamError::UnknownSetting {
                kind: "order",
                name: s.to_string(),
            }),
        }
    }
}

impl FromStr for Growth {
    type Err = SeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "iterative" => Ok(Growth::Iterative),
            "batch" => Ok(Growth::Batch),
            _ => Err(SeamError::UnknownSetting {
                kind: "growth",
                name: s.to_string(),
            }),
        }
    }
}

/// Everything about a resize other than the target itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Largest allowed `target / original` on either axis.  Must be at
    /// least 1.0.
    pub max_growth: f64,
    /// Clamp a target that grows too far instead of refusing it.
    pub clamp_growth: bool,
    pub energy: EnergyFunction,
    pub cost: CostModel,
    pub order: Order,
    pub growth: Growth,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_growth: DEFAULT_MAX_GROWTH,
            clamp_growth: false,
            energy: EnergyFunction::default(),
            cost: CostModel::default(),
            order: Order::default(),
            growth: Growth::default(),
        }
    }
}

impl Options {
    pub fn with_max_growth(mut self, max_growth: f64) -> Self {
        self.max_growth = max_growth;
        self
    }

    pub fn with_clamp_growth(mut self, clamp_growth: bool) -> Self {
        self.clamp_growth = clamp_growth;
        self
    }

    pub fn with_energy(mut self, energy: EnergyFunction) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_cost(mut self, cost: CostModel) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn with_growth(mut self, growth: Growth) -> Self {
        self.growth = growth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options.max_growth, 2.0);
        assert!(!options.clamp_growth);
        assert_eq!(options.energy, EnergyFunction::Luminance);
        assert_eq!(options.cost, CostModel::Backward);
        assert_eq!(options.order, Order::WidthFirst);
        assert_eq!(options.growth, Growth::Iterative);
    }

    #[test]
    fn builders_chain() {
        let options = Options::default()
            .with_max_growth(3.0)
            .with_order(Order::Interleaved)
            .with_growth(Growth::Batch);
        assert_eq!(options.max_growth, 3.0);
        assert_eq!(options.order, Order::Interleaved);
        assert_eq!(options.growth, Growth::Batch);
    }

    #[test]
    fn parses_names() {
        assert_eq!("interleaved".parse::<Order>(), Ok(Order::Interleaved));
        assert_eq!("batch".parse::<Growth>(), Ok(Growth::Batch));
        assert_eq!(
            "sometimes".parse::<Growth>(),
            Err(SeamError::UnknownSetting {
                kind: "growth",
                name: "sometimes".to_string()
            })
        );
    }
}
