//! Keeps the cache filled for one station and prints yesterday's hourly
//! global radiation once it is available.
//!
//! ```sh
//! DMI_TOKEN=... cargo run --example fill_and_project --features examples -- 06180
//! ```

use chrono::{Days, Utc};
use metobs_cache::{day_window, MetObs, MetObsError, StationId};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), MetObsError> {
    tracing_subscriber::fmt().init();

    let station_arg = std::env::args().nth(1).unwrap_or_else(|| "06180".to_string());
    let Some(station) = StationId::new(station_arg) else {
        eprintln!("Station id must not be empty");
        return Ok(());
    };

    let client = MetObs::from_env().await?;
    println!("Caching observations in {}", client.config().cache_dir.display());
    let filler = client.spawn_filler(station.clone());

    let Some(yesterday) = Utc::now().date_naive().checked_sub_days(Days::new(1)) else {
        return Ok(());
    };
    let Some((start, end)) = day_window(yesterday) else {
        return Ok(());
    };
    // The window is half-open; stop just before the next midnight.
    let end = end - chrono::TimeDelta::seconds(1);

    loop {
        let radiation = client
            .radiation(&station)
            .start(start)
            .end(end)
            .call()
            .await;
        match radiation {
            Some(series) => {
                for (hour, value) in series.points() {
                    println!("{hour}  {value:>8.1} W/m²");
                }
                break;
            }
            None => {
                let cached = client.available_days(&station).await.len();
                println!("{yesterday} not cached yet ({cached} days cached so far), waiting...");
            }
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(Duration::from_secs(5)) => {}
        }
    }

    println!("Cache stats: {:?}", client.stats());
    filler.shutdown().await;
    Ok(())
}
