//! Mock event sender
//!
//! Posts randomly generated demo events to a running inbox server at a
//! random interval until stopped with Ctrl+C.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Parser)]
#[command(name = "mock-sender", about = "Send random demo events to an event inbox")]
struct Args {
    /// Base URL of the inbox server
    #[arg(long, default_value = "http://localhost:8000")]
    url: String,

    /// Shortest pause between events, in seconds
    #[arg(long, default_value_t = 2.0)]
    min_interval: f64,

    /// Longest pause between events, in seconds
    #[arg(long, default_value_t = 5.0)]
    max_interval: f64,

    /// Stop after this many events were accepted
    #[arg(long)]
    count: Option<u64>,
}

struct Template {
    source: &'static str,
    event_type: &'static str,
    payload: fn(&mut ThreadRng) -> Value,
}

const TEMPLATES: &[Template] = &[
    Template {
        source: "stripe",
        event_type: "payment.succeeded",
        payload: |rng| {
            json!({
                "amount": rng.gen_range(1000..=9999),
                "currency": "usd",
                "customer_id": format!("cus_{}", rng.gen_range(10000..=99999)),
            })
        },
    },
    Template {
        source: "stripe",
        event_type: "payment.failed",
        payload: |rng| {
            json!({
                "amount": rng.gen_range(1000..=9999),
                "currency": "usd",
                "error": pick(rng, &["insufficient_funds", "card_declined", "expired_card"]),
            })
        },
    },
    Template {
        source: "gmail",
        event_type: "email.received",
        payload: |rng| {
            json!({
                "from": format!("user{}@example.com", rng.gen_range(1..=100)),
                "subject": pick(rng, &[
                    "Important Update",
                    "Meeting Request",
                    "Project Status",
                    "Invoice Attached",
                    "Quick Question",
                ]),
                "has_attachment": rng.gen_bool(0.5),
            })
        },
    },
    Template {
        source: "slack",
        event_type: "message.sent",
        payload: |rng| {
            json!({
                "channel": pick(rng, &["#general", "#engineering", "#sales", "#support"]),
                "user": format!("user{}", rng.gen_range(1..=10)),
                "text": pick(rng, &[
                    "Project completed!",
                    "Need help with deployment",
                    "Meeting in 5 minutes",
                    "New PR ready for review",
                ]),
            })
        },
    },
    Template {
        source: "github",
        event_type: "push",
        payload: |rng| {
            json!({
                "repo": pick(rng, &["acme/inbox", "acme/workflows", "acme/integrations"]),
                "commits": rng.gen_range(1..=5),
                "branch": pick(rng, &["main", "develop", "feature/new-api"]),
            })
        },
    },
    Template {
        source: "github",
        event_type: "pull_request.opened",
        payload: |rng| {
            json!({
                "repo": "acme/inbox",
                "pr_number": rng.gen_range(100..=999),
                "author": format!("developer{}", rng.gen_range(1..=20)),
            })
        },
    },
    Template {
        source: "shopify",
        event_type: "order.created",
        payload: |rng| {
            let total: f64 = rng.gen_range(25.0..500.0);
            json!({
                "order_id": format!("ord_{}", rng.gen_range(10000..=99999)),
                "total": (total * 100.0).round() / 100.0,
                "items": rng.gen_range(1..=5),
            })
        },
    },
    Template {
        source: "twilio",
        event_type: "sms.received",
        payload: |rng| {
            json!({
                "from": format!("+1555{}", rng.gen_range(1_000_000..=9_999_999)),
                "body": pick(rng, &[
                    "Thanks for the update!",
                    "When is my order arriving?",
                    "Please call me back",
                    "Confirm appointment",
                ]),
            })
        },
    },
];

fn pick(rng: &mut ThreadRng, options: &[&'static str]) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct EventResponse {
    event_id: String,
}

/// Build one random event body. Returns (label, body).
fn random_event() -> (String, Value) {
    let mut rng = rand::thread_rng();
    let template = TEMPLATES
        .choose(&mut rng)
        .unwrap_or(&TEMPLATES[0]);

    let body = json!({
        "source": template.source,
        "event_type": template.event_type,
        "payload": (template.payload)(&mut rng),
    });
    (format!("{}.{}", template.source, template.event_type), body)
}

fn random_pause(min: f64, max: f64) -> Duration {
    let secs = if max > min {
        rand::thread_rng().gen_range(min..max)
    } else {
        min
    };
    Duration::from_secs_f64(secs.max(0.0))
}

async fn send_event(client: &reqwest::Client, events_url: &str) -> bool {
    let (label, body) = random_event();
    let timestamp = Local::now().format("%H:%M:%S");

    let response = match client.post(events_url).json(&body).send().await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => {
            println!("[ERROR] Request timed out");
            return false;
        }
        Err(e) if e.is_connect() => {
            println!("[ERROR] Cannot connect to API. Is the server running?");
            return false;
        }
        Err(e) => {
            println!("[ERROR] {}", e);
            return false;
        }
    };

    if !response.status().is_success() {
        println!("[FAIL] HTTP {}", response.status().as_u16());
        return false;
    }

    match response.json::<EventResponse>().await {
        Ok(created) => {
            println!("[OK] [{}] {} -> {}", timestamp, label, created.event_id);
            true
        }
        Err(e) => {
            println!("[ERROR] Unexpected response: {}", e);
            false
        }
    }
}

/// Reject pauses `Duration::from_secs_f64` cannot represent
fn check_intervals(min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() {
        bail!("--min-interval and --max-interval must be finite numbers");
    }
    if min < 0.0 || max < min {
        bail!("--min-interval must be >= 0 and <= --max-interval");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    check_intervals(args.min_interval, args.max_interval)?;

    let base_url = args.url.trim_end_matches('/').to_string();
    let events_url = format!("{}/api/v1/events", base_url);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .context("Failed to build HTTP client")?;

    let rule = "=".repeat(60);
    println!("{}", rule);
    println!("Mock Event Sender");
    println!("{}", rule);
    println!("Sending events to: {}", events_url);
    println!(
        "Interval: {}-{} seconds (random)",
        args.min_interval, args.max_interval
    );
    println!("Press Ctrl+C to stop");
    println!("{}", rule);
    println!();

    println!("Testing API connection...");
    match client.get(format!("{}/health", base_url)).send().await {
        Ok(response) if response.status().is_success() => {
            println!("[OK] Connected to API successfully!\n");
        }
        Ok(_) => println!("[WARN] API returned unexpected status\n"),
        Err(_) => {
            println!("[ERROR] Cannot connect to API. Make sure it's running!\n");
            println!("        Start the API with: cargo run --bin inbox-server\n");
            std::process::exit(1);
        }
    }

    let mut sent: u64 = 0;
    let run = async {
        loop {
            if send_event(&client, &events_url).await {
                sent += 1;
                if sent % 10 == 0 {
                    println!("\n[INFO] Sent {} events so far...\n", sent);
                }
                if args.count.is_some_and(|cap| sent >= cap) {
                    break;
                }
            }
            tokio::time::sleep(random_pause(args.min_interval, args.max_interval)).await;
        }
    };

    tokio::select! {
        _ = run => {}
        _ = tokio::signal::ctrl_c() => println!("\n"),
    }

    println!("{}", rule);
    println!("Stopped. Total events sent: {}", sent);
    println!("{}", rule);
    Ok(())
}
