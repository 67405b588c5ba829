use std::collections::BTreeMap;

use common_errors::{LendingError, LendingResult};
use common_math::Decimal;
use common_proxies::PriceOracle;
use common_structs::AssetId;

/// In-memory price feed; prices are WAD based values of one whole token.
#[derive(Clone, Debug, Default)]
pub struct PriceFeeds {
    prices: BTreeMap<AssetId, Decimal>,
}

impl PriceFeeds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit_price(&mut self, asset: &AssetId, price_wad: Decimal) {
        common_events::update_asset_price_event(asset, &price_wad);
        self.prices.insert(asset.clone(), price_wad);
    }
}

impl PriceOracle for PriceFeeds {
    fn price(&self, asset: &AssetId) -> LendingResult<Decimal> {
        self.prices
            .get(asset)
            .cloned()
            .ok_or_else(|| LendingError::PriceNotAvailable(asset.to_string()))
    }
}
