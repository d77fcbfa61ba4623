//! Open-rate load generator.
//!
//! Issues infer requests at a controlled rate for a fixed duration against
//! an in-process gateway, recording completion latency relative to each
//! request's *scheduled* send time rather than its actual send time, so a
//! stalled sender cannot hide queueing delay (coordinated omission).
//! Aggregates into an HDR histogram (1 us - 60 s, 3 significant figures)
//! and persists the encoded histogram to `latency.hdr`.

use std::fs::File;
use std::time::{Duration, Instant};

use anyhow::Context;
use hdrhistogram::Histogram;
use hdrhistogram::serialization::{Serializer, V2Serializer};
use microbatch::api::Request;
use microbatch::infer::InferGateway;
use microbatch::InferConfig;
use microbatch_bench::TailProneCompute;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let rate: f64 = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(200.0);
    let seconds: f64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(10.0);

    let gateway = InferGateway::new(TailProneCompute::default(), InferConfig::default());
    let mut hist = Histogram::<u64>::new_with_bounds(1, 60_000_000, 3)?;

    let interval = Duration::from_secs_f64(1.0 / rate);
    let start = Instant::now();
    let deadline = start + Duration::from_secs_f64(seconds);

    info!(rate, seconds, "starting blast");

    let mut sent: u64 = 0;
    loop {
        let scheduled = start + interval.mul_f64(sent as f64);
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        if scheduled > now {
            tokio::time::sleep(scheduled - now).await;
        }

        // round-trip through the wire schema, as a transport would
        let request = Request::Infer {
            payload: serde_json::json!({"x": 1}),
        };
        let encoded = serde_json::to_string(&request)?;
        let Request::Infer { payload } = serde_json::from_str(&encoded)? else {
            unreachable!("encoded an infer request");
        };

        match gateway.submit(payload).await.await {
            Ok(_completion) => {
                let latency = Instant::now().duration_since(scheduled);
                hist.record((latency.as_micros() as u64).max(1))?;
            }
            Err(error) => warn!(%error, "request failed"),
        }

        sent += 1;
        if sent % 1000 == 0 {
            let elapsed = start.elapsed().as_secs_f64();
            info!(sent, elapsed, qps = sent as f64 / elapsed, "progress");
        }
    }

    let p = |q: f64| hist.value_at_quantile(q / 100.0) as f64 / 1000.0;
    println!(
        "n={} p50={:.2}ms p95={:.2}ms p99={:.2}ms p99.9={:.2}ms",
        hist.len(),
        p(50.0),
        p(95.0),
        p(99.0),
        p(99.9)
    );

    let mut file = File::create("latency.hdr").context("creating latency.hdr")?;
    V2Serializer::new()
        .serialize(&hist, &mut file)
        .map_err(|e| anyhow::anyhow!("writing histogram: {e:?}"))?;
    info!("blast complete, histogram written to latency.hdr");

    Ok(())
}
