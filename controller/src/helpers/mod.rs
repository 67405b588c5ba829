pub mod math;

use common_errors::LendingResult;
use common_proxies::{AssetTransfer, PriceOracle};
use common_structs::{AccountPosition, Address, AssetId};
use liquidity_layer::MarketState;

use crate::Controller;

/// Everything an operation spanning several reserves may touch, captured
/// before its first mutation.
pub(crate) struct Checkpoint<T> {
    markets: Vec<(AssetId, MarketState)>,
    positions: Vec<(AssetId, Address, Option<AccountPosition>)>,
    tokens: T,
}

impl<O, T> Controller<O, T>
where
    O: PriceOracle,
    T: AssetTransfer + Clone,
{
    pub(crate) fn checkpoint(
        &self,
        assets: &[&AssetId],
        account: &Address,
    ) -> LendingResult<Checkpoint<T>> {
        let mut markets = Vec::with_capacity(assets.len());
        let mut positions = Vec::with_capacity(assets.len());
        for asset in assets {
            markets.push(((*asset).clone(), self.reserves.market_state(asset)?.clone()));
            positions.push((
                (*asset).clone(),
                *account,
                self.positions.get(asset, account).cloned(),
            ));
        }

        Ok(Checkpoint {
            markets,
            positions,
            tokens: self.tokens.clone(),
        })
    }

    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint<T>) -> LendingResult<()> {
        let Checkpoint {
            markets,
            positions,
            tokens,
        } = checkpoint;

        for (asset, state) in markets {
            self.reserves.restore(&asset, state)?;
        }
        for (asset, account, previous) in positions {
            self.positions.restore(&asset, &account, previous);
        }
        self.tokens = tokens;

        Ok(())
    }
}
