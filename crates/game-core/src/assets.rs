use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetKind {
    Coin,
    Stock,
    RealEstate,
}

/// Static per-asset tuning. `max_step_pct` bounds the random walk step the
/// price may take on a single clock tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetProfile {
    pub kind: AssetKind,
    pub display_name: &'static str,
    pub max_step_pct: f64,
}

impl AssetKind {
    pub fn profile(self) -> AssetProfile {
        match self {
            Self::Coin => AssetProfile {
                kind: self,
                display_name: "Cryptocurrency",
                max_step_pct: 0.008,
            },
            Self::Stock => AssetProfile {
                kind: self,
                display_name: "Stock",
                max_step_pct: 0.004,
            },
            Self::RealEstate => AssetProfile {
                kind: self,
                display_name: "Real Estate",
                max_step_pct: 0.0015,
            },
        }
    }

    pub fn all() -> [AssetKind; 3] {
        [Self::Coin, Self::Stock, Self::RealEstate]
    }
}

#[cfg(test)]
mod tests {
    use super::AssetKind;

    #[test]
    fn riskier_assets_have_wider_step_bounds() {
        let coin = AssetKind::Coin.profile();
        let stock = AssetKind::Stock.profile();
        let real_estate = AssetKind::RealEstate.profile();

        assert!(coin.max_step_pct > stock.max_step_pct);
        assert!(stock.max_step_pct > real_estate.max_step_pct);
    }

    #[test]
    fn asset_kind_round_trips_through_kebab_case_json() {
        let json = serde_json::to_string(&AssetKind::RealEstate).unwrap();
        assert_eq!(json, "\"real-estate\"");

        let parsed: AssetKind = serde_json::from_str("\"coin\"").unwrap();
        assert_eq!(parsed, AssetKind::Coin);
    }
}
