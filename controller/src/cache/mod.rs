use std::collections::BTreeMap;

use common_errors::LendingResult;
use common_math::Decimal;
use common_proxies::PriceOracle;
use common_structs::AssetId;

/// Per-operation memo of oracle prices.
#[derive(Clone, Debug, Default)]
pub struct Cache {
    pub prices_cache: BTreeMap<AssetId, Decimal>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// WAD price of `asset`, read from the oracle once per operation.
    pub fn get_cached_price<O: PriceOracle>(
        &mut self,
        oracle: &O,
        asset: &AssetId,
    ) -> LendingResult<Decimal> {
        if let Some(price) = self.prices_cache.get(asset) {
            return Ok(price.clone());
        }

        let price = oracle.price(asset)?;
        self.prices_cache.insert(asset.clone(), price.clone());

        Ok(price)
    }

    pub fn clean_prices_cache(&mut self) {
        self.prices_cache.clear();
    }
}
