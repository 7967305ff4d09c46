//! Public entry point: total value locked, reference-token price and market cap.

pub mod reads;

use std::sync::Arc;

use alloy::primitives::Address;
use bigdecimal::BigDecimal;
use log::info;

use crate::cache::MetricCache;
use crate::config::{ConfigError, ProtocolContext, Settings};
use crate::error::MetricsResult;
use crate::gateway::{MulticallGateway, ReadGateway};
use crate::models::Token;
use crate::pricing::{
    circulating_supply, market_cap, pair_quote, total_value_locked, value_positions, PairQuote,
    PriceGraph, TvlReport,
};

const TVL_KEY: &str = "tvl";
const UP_PRICE_KEY: &str = "upPrice";
const MARKET_CAP_KEY: &str = "marketCap";

/// Valuation metrics for one protocol deployment.
///
/// Every computation reads fresh on-chain state through the gateway. The four
/// read groups behind TVL run concurrently and any one failing fails the
/// metric. Results are memoized per metric for the configured TTL.
pub struct UpSdk<G: ReadGateway> {
    ctx: Arc<ProtocolContext>,
    gateway: G,
    batch_size: usize,
    tvl_cache: MetricCache<TvlReport>,
    price_cache: MetricCache<BigDecimal>,
    market_cap_cache: MetricCache<BigDecimal>,
}

impl UpSdk<MulticallGateway> {
    /// Load network data for `settings` and connect to its RPC endpoint.
    pub fn connect(settings: &Settings) -> Result<Self, ConfigError> {
        let ctx = ProtocolContext::load(settings)?;
        let gateway = MulticallGateway::new(settings.rpc_node(), ctx.multicall)?;

        info!(
            "Connected to chain {} via {} (multicall {})",
            settings.chain_id,
            settings.rpc_node(),
            ctx.multicall
        );

        Ok(Self::new(Arc::new(ctx), gateway, settings))
    }
}

impl<G: ReadGateway> UpSdk<G> {
    pub fn new(ctx: Arc<ProtocolContext>, gateway: G, settings: &Settings) -> Self {
        Self {
            ctx,
            gateway,
            batch_size: settings.multicall_batch_size,
            tvl_cache: MetricCache::new(&settings.cache),
            price_cache: MetricCache::new(&settings.cache),
            market_cap_cache: MetricCache::new(&settings.cache),
        }
    }

    pub fn context(&self) -> &ProtocolContext {
        &self.ctx
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Case-insensitive token lookup by symbol.
    pub fn token(&self, symbol: &str) -> Option<&Token> {
        self.ctx.token(symbol)
    }

    /// Total value locked with per-position detail, floored to 8 decimals.
    pub async fn tvl(&self, with_cache: bool) -> MetricsResult<TvlReport> {
        if !with_cache {
            return self.compute_tvl().await;
        }
        self.tvl_cache
            .remember(TVL_KEY, || self.compute_tvl())
            .await
    }

    /// Price of the reference token, full precision.
    pub async fn up_price(&self, with_cache: bool) -> MetricsResult<BigDecimal> {
        if !with_cache {
            return self.compute_up_price().await;
        }
        self.price_cache
            .remember(UP_PRICE_KEY, || self.compute_up_price())
            .await
    }

    /// Reference-token price × circulating supply, full precision.
    pub async fn market_cap(&self, with_cache: bool) -> MetricsResult<BigDecimal> {
        if !with_cache {
            return self.compute_market_cap().await;
        }
        self.market_cap_cache
            .remember(MARKET_CAP_KEY, || self.compute_market_cap())
            .await
    }

    /// Quote `token` directly from one pair and the oracle of its counter asset.
    ///
    /// Not cached and not routed.
    pub async fn pair_token_price(
        &self,
        token: &Token,
        pair: Address,
        oracle: Address,
    ) -> MetricsResult<PairQuote> {
        let (price, decimals, token0, reserves) =
            reads::pair_readings(&self.gateway, pair, oracle, self.batch_size).await?;
        Ok(pair_quote(token.address, token0, reserves, price, decimals))
    }

    async fn price_graph(&self) -> MetricsResult<PriceGraph> {
        let (oracles, helpers) = futures::try_join!(
            reads::oracle_readings(&self.ctx, &self.gateway, self.batch_size),
            reads::helper_readings(&self.ctx, &self.gateway, self.batch_size),
        )?;
        Ok(PriceGraph::build(&oracles, &helpers))
    }

    async fn compute_tvl(&self) -> MetricsResult<TvlReport> {
        let ctx = &self.ctx;
        let (oracles, helpers, lps, locked) = futures::try_join!(
            reads::oracle_readings(ctx, &self.gateway, self.batch_size),
            reads::helper_readings(ctx, &self.gateway, self.batch_size),
            reads::lp_states(ctx, &self.gateway, self.batch_size),
            reads::locked_amounts(ctx, &self.gateway, self.batch_size),
        )?;

        let graph = PriceGraph::build(&oracles, &helpers);
        let values = value_positions(&ctx.positions, &graph, &lps, &locked)?;
        let report = total_value_locked(values);

        info!("TVL {} across {} positions", report.total, report.detail.len());
        Ok(report)
    }

    async fn compute_up_price(&self) -> MetricsResult<BigDecimal> {
        let graph = self.price_graph().await?;
        graph.price_of(&self.ctx.reference_token)
    }

    async fn compute_market_cap(&self) -> MetricsResult<BigDecimal> {
        let (price, (total_supply, excluded)) = futures::try_join!(
            self.compute_up_price(),
            reads::supply_readings(&self.ctx, &self.gateway, self.batch_size),
        )?;

        let circulating = circulating_supply(total_supply, &excluded)?;
        let cap = market_cap(&price, circulating);

        info!(
            "Market cap {} ({} circulating at {})",
            cap, circulating, price
        );
        Ok(cap)
    }
}
