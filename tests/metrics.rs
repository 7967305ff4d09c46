mod common;

use std::time::Duration;

use alloy::primitives::U256;
use up_sdk::config::CacheSettings;
use up_sdk::gateway::{ReadCall, MULTICALL_BATCH_SIZE};
use up_sdk::{MetricsError, Settings};

use common::*;

#[tokio::test]
async fn test_tvl_end_to_end() {
    let sdk = sdk(MockGateway::new(chain()));

    let report = sdk.tvl(false).await.unwrap();

    assert_eq!(report.total, dec("130"));
    let detail: Vec<_> = report
        .detail
        .iter()
        .map(|e| (e.alias.as_str(), e.tvl.clone()))
        .collect();
    assert_eq!(
        detail,
        vec![
            ("UP-BNB LP", dec("60")),
            ("CAKE", dec("10")),
            ("UP staking", dec("30")),
            ("UP-BNB farm", dec("30")),
        ]
    );
    // oracles, helpers, LP state, locked amounts
    assert_eq!(sdk.gateway().reads(), 4);
}

#[tokio::test]
async fn test_tvl_reads_each_lp_pair_once() {
    let sdk = sdk(MockGateway::new(chain()));

    sdk.tvl(false).await.unwrap();

    let requests = sdk.gateway().requests();
    let lp_group = requests
        .iter()
        .find(|calls| calls.iter().any(|c| matches!(c, ReadCall::GetReserves { .. })))
        .unwrap();
    assert_eq!(
        lp_group,
        &vec![
            ReadCall::Token0 { pair: addr(UP_BNB_LP) },
            ReadCall::GetReserves { pair: addr(UP_BNB_LP) },
            ReadCall::TotalSupply { token: addr(UP_BNB_LP) },
        ]
    );
}

#[tokio::test]
async fn test_locked_amount_source_per_position() {
    let sdk = sdk(MockGateway::new(chain()));

    sdk.tvl(false).await.unwrap();

    let requests = sdk.gateway().requests();
    let locked_group = requests
        .iter()
        .find(|calls| calls.iter().any(|c| matches!(c, ReadCall::WantLockedTotal { .. })))
        .unwrap();
    assert_eq!(
        locked_group,
        &vec![
            ReadCall::WantLockedTotal { strategy: addr(LP_STRATEGY) },
            ReadCall::WantLockedTotal { strategy: addr(CAKE_STRATEGY) },
            ReadCall::TotalSupply { token: addr(UP_FARM) },
            ReadCall::BalanceOf {
                token: addr(UP_BNB_LP),
                owner: addr(LP_FARM),
            },
        ]
    );
}

#[tokio::test]
async fn test_up_price_and_market_cap() {
    let sdk = sdk(MockGateway::new(chain()));

    assert_eq!(sdk.up_price(false).await.unwrap(), dec("0.3"));
    assert_eq!(sdk.market_cap(false).await.unwrap(), dec("150000"));
}

#[tokio::test]
async fn test_tvl_report_serializes_as_strings() {
    let sdk = sdk(MockGateway::new(chain()));

    let report = sdk.tvl(false).await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert!(json["total"].is_string());
    assert_eq!(json["detail"].as_array().unwrap().len(), 4);
    assert_eq!(json["detail"][1]["alias"], "CAKE");
}

#[tokio::test]
async fn test_remote_failure_fails_the_metric() {
    let mut chain = chain();
    chain.want_locked.remove(&addr(CAKE_STRATEGY));
    let sdk = sdk(MockGateway::new(chain));

    let err = sdk.tvl(false).await.unwrap_err();
    assert!(matches!(err, MetricsError::RemoteRead(_)));

    // price reads never touch the strategies
    assert_eq!(sdk.up_price(false).await.unwrap(), dec("0.3"));
}

#[tokio::test]
async fn test_unreachable_quote_token_fails_tvl() {
    let mut network = network();
    network.price_helper.retain(|h| h.base_token != "cake");
    let sdk = sdk_with(
        context(&network),
        MockGateway::new(chain()),
        Settings::default(),
    );

    match sdk.tvl(false).await {
        Err(MetricsError::PriceUnavailable { symbol, address }) => {
            assert_eq!(symbol, "CAKE");
            assert_eq!(address, addr(CAKE));
        },
        other => panic!("expected PriceUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_excluded_holders_above_supply_is_inconsistent() {
    let mut chain = chain();
    chain
        .balances
        .insert((addr(UP), addr(TREASURY)), ether(2_000_000));
    let sdk = sdk(MockGateway::new(chain));

    let err = sdk.market_cap(false).await.unwrap_err();
    assert!(matches!(err, MetricsError::DataConsistency(_)));
}

#[tokio::test]
async fn test_large_groups_split_into_sub_batches() {
    let mut network = network();
    let mut chain = chain();
    network.fix_supply_addresses.clear();
    chain.balances.remove(&(addr(UP), addr(TREASURY)));
    chain.balances.remove(&(addr(UP), addr(TEAM)));
    for i in 0..25u8 {
        let holder = addr(0x80 + i);
        network.fix_supply_addresses.push(holder);
        chain.balances.insert((addr(UP), holder), ether(1_000));
    }
    let sdk = sdk_with(context(&network), MockGateway::new(chain), Settings::default());

    // 1_000_000 - 25 × 1_000 circulating at 0.3
    assert_eq!(sdk.market_cap(false).await.unwrap(), dec("292500"));

    let sizes = sdk.gateway().batch_sizes();
    assert!(sizes.iter().all(|&s| s <= MULTICALL_BATCH_SIZE));
    assert!(sizes.contains(&20));
    assert!(sizes.contains(&6));
}

#[tokio::test]
async fn test_configured_batch_size_above_limit_is_capped() {
    let mut network = network();
    let mut chain = chain();
    for i in 0..30u8 {
        let holder = addr(0x80 + i);
        network.fix_supply_addresses.push(holder);
        chain.balances.insert((addr(UP), holder), ether(1_000));
    }
    let settings = Settings {
        multicall_batch_size: 50,
        ..Default::default()
    };
    let sdk = sdk_with(context(&network), MockGateway::new(chain), settings);

    // 1_000_000 - 500_000 - 30 × 1_000 circulating at 0.3
    assert_eq!(sdk.market_cap(false).await.unwrap(), dec("141000"));

    // total supply + 32 excluded holders
    let sizes = sdk.gateway().batch_sizes();
    assert!(sizes.iter().all(|&s| s <= MULTICALL_BATCH_SIZE));
    assert!(sizes.contains(&20));
    assert!(sizes.contains(&13));
}

#[tokio::test]
async fn test_pair_token_price() {
    let sdk = sdk(MockGateway::new(chain()));
    let up = sdk.token("UP").unwrap().clone();

    let quote = sdk
        .pair_token_price(&up, addr(UP_BNB_LP), addr(WBNB_ORACLE))
        .await
        .unwrap();

    // 0.5 WBNB against 500 UP at 300
    assert_eq!(quote.price, dec("0.3"));
    assert_eq!(quote.price_related, Some(dec("0.001")));
    assert_eq!(sdk.gateway().reads(), 1);
}

#[tokio::test]
async fn test_cached_metric_skips_reads_within_ttl() {
    let sdk = sdk(MockGateway::new(chain()));

    let first = sdk.up_price(true).await.unwrap();
    assert_eq!(sdk.gateway().reads(), 2);

    let second = sdk.up_price(true).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(sdk.gateway().reads(), 2);

    // bypass always recomputes
    sdk.up_price(false).await.unwrap();
    assert_eq!(sdk.gateway().reads(), 4);
}

#[tokio::test]
async fn test_metrics_cache_independently() {
    let sdk = sdk(MockGateway::new(chain()));

    sdk.up_price(true).await.unwrap();
    sdk.market_cap(true).await.unwrap();
    // market cap recomputes the price rather than reading the price cache
    assert_eq!(sdk.gateway().reads(), 2 + 3);

    sdk.up_price(true).await.unwrap();
    sdk.market_cap(true).await.unwrap();
    assert_eq!(sdk.gateway().reads(), 5);
}

#[tokio::test]
async fn test_concurrent_misses_both_compute() {
    let gateway = MockGateway::new(chain()).with_delay(Duration::from_millis(50));
    let sdk = sdk(gateway);

    let (a, b) = tokio::join!(sdk.up_price(true), sdk.up_price(true));

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(sdk.gateway().reads(), 4);

    sdk.up_price(true).await.unwrap();
    assert_eq!(sdk.gateway().reads(), 4);
}

#[tokio::test]
async fn test_cached_value_expires() {
    let settings = Settings {
        cache: CacheSettings {
            ttl_secs: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let sdk = sdk_with(context(&network()), MockGateway::new(chain()), settings);

    sdk.up_price(true).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_200)).await;
    sdk.up_price(true).await.unwrap();

    assert_eq!(sdk.gateway().reads(), 4);
}

#[tokio::test]
async fn test_failure_is_not_cached() {
    let mut chain = chain();
    chain.prices.remove(&addr(WBNB_ORACLE));
    let sdk = sdk(MockGateway::new(chain));

    assert!(sdk.up_price(true).await.is_err());
    let after_first = sdk.gateway().reads();

    assert!(sdk.up_price(true).await.is_err());
    assert!(sdk.gateway().reads() > after_first);
}

#[test]
fn test_ether_helper() {
    assert_eq!(ether(1), U256::from(1_000_000_000_000_000_000u64));
}
