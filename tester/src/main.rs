use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use sacco::{
    config::Config,
    format::{format_currency, format_date},
    geo::DEFAULT_NEAREST_LIMIT,
    register::{password_strength, NewMember},
    storage::FileStorage,
    Portal,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Base URL serving the JSON documents
    #[arg(long, default_value = "http://localhost:5173/json")]
    data_url: String,

    /// File backing the local key-value store
    #[arg(long, default_value = "sacco-store.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate and print the dashboard snapshot
    Login { member_id: String, password: String },

    /// Register a new member into the local store
    Register {
        member_id: String,
        name: String,
        email: String,
        password: String,
        balance: f64,
        #[arg(default_value = "UGX")]
        currency: String,
    },

    /// Merge local registrations with the reference collection
    Sync,

    /// Convert an amount between two currencies
    Convert { amount: f64, from: String, to: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let mut config = Config::load();
    config.data_url = args.data_url;

    let storage = Arc::new(FileStorage::open(&args.store)?);
    let portal = Portal::new(config, storage);

    match args.command {
        Command::Login {
            member_id,
            password,
        } => login(&portal, &member_id, &password).await?,
        Command::Register {
            member_id,
            name,
            email,
            password,
            balance,
            currency,
        } => {
            println!("password strength: {:?}", password_strength(&password));
            let member = portal.register(NewMember {
                member_id,
                name,
                email,
                password,
                balance,
                currency,
            })?;
            println!(
                "registered {} ({}), level {:?}",
                member.member_id,
                member.name,
                member.membership_level()
            );
        }
        Command::Sync => {
            let merged = portal.reconcile().await;
            println!("{} members after sync", merged.len());
        }
        Command::Convert { amount, from, to } => {
            let conversion = portal.convert(amount, &from, &to).await?;
            println!(
                "{} = {} (rate {})",
                format_currency(amount, &from),
                format_currency(conversion.amount, &to),
                conversion.rate
            );
        }
    }

    Ok(())
}

async fn login(portal: &Portal, member_id: &str, password: &str) -> Result<()> {
    let member = portal.authenticate(member_id, password).await?;
    portal.store_session(&member)?;
    println!(
        "{} logged in, member since {}, level {:?}",
        member.name,
        format_date(member.created_at),
        member.membership_level()
    );

    let data = portal.dashboard(&member).await?;
    println!(
        "balance {}  savings {}  loans {}",
        format_currency(data.summary.total_balance, &member.currency),
        format_currency(data.summary.savings, &member.currency),
        format_currency(data.summary.loan_balance, &member.currency)
    );

    for t in data.transactions.iter().take(5) {
        println!(
            "  {}  {:>14}  {}",
            format_date(t.date),
            format_currency(t.signed_amount(), &member.currency),
            t.description
        );
    }

    let unread = data.notifications.iter().filter(|n| !n.read).count();
    println!("{} notifications ({unread} unread)", data.notifications.len());
    println!("{} exchange rates loaded", data.rates.len());

    // Kampala city centre as the demo position.
    let nearest = portal
        .nearest_branches(0.3476, 32.5825, DEFAULT_NEAREST_LIMIT)
        .await;
    for b in &nearest {
        println!("  {} ({:.1} km)", b.branch.name, b.distance_km);
    }

    for article in portal.financial_news().await {
        println!("  news: {}", article.title);
    }

    Ok(())
}
