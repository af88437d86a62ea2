// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller brand.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// The firmware family a controller speaks.
///
/// The brand selects the wire field names, the status layout and the
/// capability names exposed for a device. Brand-qualified capability names
/// use [`Brand::prefix`] (e.g. `me_operating_mode`); the legacy generic
/// controller has no prefix and exposes unqualified names.
///
/// # Examples
///
/// ```
/// use climactl_lib::types::Brand;
///
/// let brand: Brand = "mhi".parse().unwrap();
/// assert_eq!(brand, Brand::MitsubishiHeavyIndustries);
/// assert_eq!(brand.prefix(), Some("mhi"));
/// assert_eq!(Brand::GenericLegacy.prefix(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Brand {
    /// Mitsubishi Electric (CN105 based controllers).
    MitsubishiElectric,
    /// Mitsubishi Heavy Industries.
    MitsubishiHeavyIndustries,
    /// LG.
    Lg,
    /// First generation generic controller with unqualified capability names.
    GenericLegacy,
}

impl Brand {
    /// All supported brands.
    pub const ALL: [Self; 4] = [
        Self::MitsubishiElectric,
        Self::MitsubishiHeavyIndustries,
        Self::Lg,
        Self::GenericLegacy,
    ];

    /// Returns the capability name prefix, or `None` for the legacy controller.
    #[must_use]
    pub const fn prefix(&self) -> Option<&'static str> {
        match self {
            Self::MitsubishiElectric => Some("me"),
            Self::MitsubishiHeavyIndustries => Some("mhi"),
            Self::Lg => Some("lg"),
            Self::GenericLegacy => None,
        }
    }

    /// Returns a human readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::MitsubishiElectric => "Mitsubishi Electric",
            Self::MitsubishiHeavyIndustries => "Mitsubishi Heavy Industries",
            Self::Lg => "LG",
            Self::GenericLegacy => "generic controller",
        }
    }

    /// Returns `true` if this brand exposes brand-qualified capability names.
    #[must_use]
    pub const fn is_qualified(&self) -> bool {
        self.prefix().is_some()
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Brand {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "me" | "mitsubishi_electric" => Ok(Self::MitsubishiElectric),
            "mhi" | "mitsubishi_heavy_industries" => Ok(Self::MitsubishiHeavyIndustries),
            "lg" => Ok(Self::Lg),
            "generic" | "generic_legacy" | "climatecontrol" => Ok(Self::GenericLegacy),
            _ => Err(ValueError::UnknownBrand(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes() {
        assert_eq!(Brand::MitsubishiElectric.prefix(), Some("me"));
        assert_eq!(Brand::MitsubishiHeavyIndustries.prefix(), Some("mhi"));
        assert_eq!(Brand::Lg.prefix(), Some("lg"));
        assert!(!Brand::GenericLegacy.is_qualified());
    }

    #[test]
    fn parse_short_and_long_ids() {
        assert_eq!("ME".parse::<Brand>().unwrap(), Brand::MitsubishiElectric);
        assert_eq!(
            "mitsubishi_heavy_industries".parse::<Brand>().unwrap(),
            Brand::MitsubishiHeavyIndustries
        );
        assert_eq!("climatecontrol".parse::<Brand>().unwrap(), Brand::GenericLegacy);
        assert!(matches!(
            "daikin".parse::<Brand>(),
            Err(ValueError::UnknownBrand(_))
        ));
    }

    #[test]
    fn serde_ids() {
        assert_eq!(serde_json::to_string(&Brand::Lg).unwrap(), "\"lg\"");
        let brand: Brand = serde_json::from_str("\"mitsubishi_electric\"").unwrap();
        assert_eq!(brand, Brand::MitsubishiElectric);
    }
}
