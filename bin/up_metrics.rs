use anyhow::Context;
use jemallocator::Jemalloc;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use up_sdk::{Settings, UpSdk};

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .context("Failed to install logger")?;

    let settings = Settings::new().context("Failed to load settings")?;

    let sdk = UpSdk::connect(&settings).context(format!(
        "Failed to initialize network {}{} from {}",
        settings.chain_id,
        settings.suffix,
        settings.data_dir.display()
    ))?;

    let tvl = sdk.tvl(true).await.context("Failed to compute TVL")?;
    println!("{}", serde_json::to_string_pretty(&tvl)?);

    let price = sdk.up_price(true).await.context("Failed to compute price")?;
    println!("{}", price);

    let market_cap = sdk.market_cap(true).await.context("Failed to compute market cap")?;
    println!("{}", market_cap);

    info!("Done");
    Ok(())
}
