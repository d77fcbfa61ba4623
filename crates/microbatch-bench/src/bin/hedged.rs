//! Hedged-request client.
//!
//! For each logical request, races two submissions of the same payload
//! staggered by a hedge delay, takes whichever completes first, and drops
//! the loser's handle. The gateway treats the pair as independent requests;
//! cancelling the loser must not affect the winner, and the scheduler's
//! later attempt to resolve the dropped handle is a checked no-op.

use std::time::{Duration, Instant};

use microbatch::InferConfig;
use microbatch::infer::InferGateway;
use microbatch_bench::{TailProneCompute, percentile};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let rounds: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(200);
    let hedge_ms: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(30);

    let gateway = InferGateway::new(TailProneCompute::default(), InferConfig::default());
    info!(rounds, hedge_ms, "starting hedged run");

    let mut latencies = Vec::with_capacity(rounds);
    for _ in 0..rounds {
        let t0 = Instant::now();

        let first = gateway.submit(serde_json::json!({"x": 1})).await;
        let hedge = async {
            tokio::time::sleep(Duration::from_millis(hedge_ms)).await;
            gateway.submit(serde_json::json!({"x": 1})).await.await
        };
        tokio::pin!(first);
        tokio::pin!(hedge);

        let winner = tokio::select! {
            r = &mut first => r,
            r = &mut hedge => r,
        };
        winner?;
        // the losing branch is dropped here, cancelling its handle

        latencies.push(t0.elapsed().as_secs_f64() * 1e3);
    }

    latencies.sort_by(f64::total_cmp);
    for q in [50.0, 95.0, 99.0] {
        println!("p{q} {:.2}ms", percentile(&latencies, q));
    }

    Ok(())
}
