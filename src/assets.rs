//! The three assets the pipeline tracks.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedAsset {
    Bnb,
    Eth,
    Id,
}

impl TrackedAsset {
    /// Report order; the first entry also defines the report's time period.
    pub const ALL: [TrackedAsset; 3] = [TrackedAsset::Bnb, TrackedAsset::Eth, TrackedAsset::Id];

    pub fn prefix(self) -> &'static str {
        match self {
            TrackedAsset::Bnb => "bnb_daily_prices",
            TrackedAsset::Eth => "eth_daily_prices",
            TrackedAsset::Id => "id_daily_prices",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TrackedAsset::Bnb => "BNB",
            TrackedAsset::Eth => "ETH",
            TrackedAsset::Id => "ID",
        }
    }

    /// ERC-20 contract on the `ethereum` platform. ETH is priced through WETH.
    pub fn contract_address(self) -> &'static str {
        match self {
            TrackedAsset::Bnb => "0xb8c77482e45f1f44de1745f52c74426c631bdd52",
            TrackedAsset::Eth => "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            TrackedAsset::Id => "0x2dff88a56767223a5529ea5960da7a3f5f766406",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bnb" => Some(TrackedAsset::Bnb),
            "eth" | "weth" => Some(TrackedAsset::Eth),
            "id" | "space-id" => Some(TrackedAsset::Id),
            _ => None,
        }
    }
}

impl fmt::Display for TrackedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
