//! CLI for sealed-bid auctions over Pedersen commitments.
//!
//! This binary provides commands for:
//! - Committing to a bid and verifying an opening
//! - Drawing a split of the public bound
//! - Simulating a whole auction against the in-memory ledger

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::OsRng;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auction_crypto::{
    decode_point, encode_point, parse_scalar, point_from_decimal, point_to_decimal,
    scalar_to_decimal, sums_to_bound, CurveContext, Fr, IntervalChallenge, Opening,
    ResponseScheme, ShareOpening, SplitProof,
};
use auction_ledger::{HighestDeposit, InMemoryLedger, LedgerExecutor};
use auction_protocol::{claim_winner, create_bid, pay, submit_bid, withdraw, AuctionProtocol};
use auction_types::{address_hex, sha256, Address, AuctionConfig, TieBreak};

const DEFAULT_FILTER: &str = "auction_cli=info,auction_protocol=info,auction_ledger=info";

#[derive(Parser)]
#[command(name = "auction-cli")]
#[command(about = "CLI for sealed-bid auctions over Pedersen commitments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Commit to a bid value
    Commit {
        /// Bid value
        #[arg(long)]
        value: u64,

        /// Blinding factor (decimal); random if omitted
        #[arg(long)]
        blinding: Option<String>,
    },

    /// Check an opening against a commitment
    Verify {
        #[arg(long)]
        value: u64,

        /// Blinding factor (decimal)
        #[arg(long)]
        blinding: String,

        /// Commitment x coordinate (decimal)
        #[arg(long)]
        x: String,

        /// Commitment y coordinate (decimal)
        #[arg(long)]
        y: String,
    },

    /// Draw a split of the public bound
    Split {
        /// Bound to split
        #[arg(long, default_value_t = auction_types::MAX_BID)]
        bound: u64,
    },

    /// Run a full auction against the in-memory ledger
    Simulate {
        /// Auction configuration (JSON); testing defaults if omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of bidders
        #[arg(long, default_value_t = 5)]
        bidders: u32,

        /// First bid value
        #[arg(long, default_value_t = 2000)]
        start: u64,

        /// Increment between consecutive bids
        #[arg(long, default_value_t = 2500)]
        step: u64,

        /// Proof rounds (overrides the configuration)
        #[arg(long)]
        rounds: Option<u32>,

        /// Tie-break rule (overrides the configuration)
        #[arg(long, value_enum)]
        tie_break: Option<TieBreakArg>,

        /// Response scheme used by both auctioneer and ledger
        #[arg(long, value_enum, default_value_t = SchemeArg::Interval)]
        scheme: SchemeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TieBreakArg {
    EarliestBid,
    LowestAddress,
}

impl From<TieBreakArg> for TieBreak {
    fn from(arg: TieBreakArg) -> Self {
        match arg {
            TieBreakArg::EarliestBid => TieBreak::EarliestBid,
            TieBreakArg::LowestAddress => TieBreak::LowestAddress,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemeArg {
    /// Open shares or the masked bid depending on the challenge
    Interval,
    /// Always open both shares
    Shares,
}

impl SchemeArg {
    fn scheme(self) -> Arc<dyn ResponseScheme> {
        match self {
            SchemeArg::Interval => Arc::new(IntervalChallenge),
            SchemeArg::Shares => Arc::new(ShareOpening),
        }
    }
}

// ============ Output ============

#[derive(Serialize)]
struct CommitOutput {
    value: u64,
    blinding: String,
    x: String,
    y: String,
}

#[derive(Serialize)]
struct SplitOutput {
    bound: u64,
    w1: u64,
    r1: u64,
    w2: u64,
    r2: u64,
    big_w1: (String, String),
    big_w2: (String, String),
    sums_to_bound: bool,
}

#[derive(Serialize)]
struct BidderOutput {
    address: String,
    value: u64,
    status: String,
    withdrawn: u128,
}

#[derive(Serialize)]
struct SimulationOutput {
    auction: String,
    scheme: &'static str,
    rounds: u32,
    winner: String,
    winning_bid: Option<u64>,
    bidders: Vec<BidderOutput>,
    auctioneer_balance: u128,
    block_height: u64,
}

fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = CurveContext::bn128()?;

    match cli.command {
        Commands::Commit { value, blinding } => commit_cmd(&ctx, value, blinding.as_deref()),
        Commands::Verify {
            value,
            blinding,
            x,
            y,
        } => verify_cmd(&ctx, value, &blinding, &x, &y),
        Commands::Split { bound } => split_cmd(&ctx, bound),
        Commands::Simulate {
            config,
            bidders,
            start,
            step,
            rounds,
            tie_break,
            scheme,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(rounds) = rounds {
                config.proof_rounds = rounds;
            }
            if let Some(tie_break) = tie_break {
                config.tie_break = tie_break.into();
            }
            config.validate()?;
            simulate_cmd(config, bidders, start, step, scheme.scheme())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn commit_cmd(ctx: &CurveContext, value: u64, blinding: Option<&str>) -> Result<()> {
    let blinding = match blinding {
        Some(decimal) => parse_scalar(decimal)?,
        None => ctx.random_scalar(&mut OsRng),
    };
    let opening = Opening::new(value, blinding);
    let (x, y) = point_to_decimal(&encode_point(&opening.commit(ctx)));

    print_json(&CommitOutput {
        value,
        blinding: scalar_to_decimal(&blinding),
        x,
        y,
    })
}

fn verify_cmd(ctx: &CurveContext, value: u64, blinding: &str, x: &str, y: &str) -> Result<()> {
    let blinding: Fr = parse_scalar(blinding)?;
    let commitment = decode_point(&point_from_decimal(x, y)?)?;
    let valid = Opening::new(value, blinding).verify(ctx, &commitment);

    println!("{}", if valid { "valid" } else { "invalid" });
    if !valid {
        bail!("opening does not match the commitment");
    }
    Ok(())
}

fn split_cmd(ctx: &CurveContext, bound: u64) -> Result<()> {
    let split = SplitProof::generate(ctx, bound, &mut OsRng);
    let (big_w1, big_w2) = split.points();

    print_json(&SplitOutput {
        bound,
        w1: split.w1(),
        r1: split.r1(),
        w2: split.w2(),
        r2: split.r2(),
        big_w1: point_to_decimal(&encode_point(&big_w1)),
        big_w2: point_to_decimal(&encode_point(&big_w2)),
        sums_to_bound: sums_to_bound(ctx, bound, &big_w1, &big_w2, split.r1(), split.r2()),
    })
}

fn load_config(path: Option<&Path>) -> Result<AuctionConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
        }
        None => Ok(AuctionConfig::testing()),
    }
}

/// Deterministic account address for simulation participants.
fn account(label: &str) -> Address {
    sha256(label.as_bytes())
}

fn simulate_cmd(
    config: AuctionConfig,
    bidders: u32,
    start: u64,
    step: u64,
    scheme: Arc<dyn ResponseScheme>,
) -> Result<()> {
    let ledger = InMemoryLedger::with_components(Arc::clone(&scheme), Arc::new(HighestDeposit));
    let auctioneer = account("auctioneer");
    let stake = config.fairness_fees;
    let bid_deadline = config.bid_block_number;
    let testing = config.testing;

    let mut protocol = AuctionProtocol::deploy(ledger.clone(), auctioneer, config, stake)?
        .with_scheme(Arc::clone(&scheme));
    let auction = protocol.address();
    info!(auction = %address_hex(&auction), bidders, "simulation started");

    let mut participants = Vec::new();
    for i in 0..u64::from(bidders) {
        let bidder = account(&format!("bidder-{i}"));
        let value = i
            .checked_mul(step)
            .and_then(|offset| offset.checked_add(start))
            .context("bid value overflow")?;
        let bid = create_bid(protocol.curve(), value, protocol.max_bid(), &mut OsRng)?;
        submit_bid(&ledger, &bidder, &auction, &bid)?;
        protocol.accept_opening(&bidder, bid.opening)?;
        participants.push((bidder, bid));
    }

    if !testing {
        let height = ledger.block_height()?;
        if height < bid_deadline {
            ledger.advance_blocks(bid_deadline - height);
        }
    }

    let outcome = protocol.run(&mut OsRng)?;

    let (_, winning_bid) = participants
        .iter()
        .find(|(bidder, _)| *bidder == outcome.winner)
        .context("winner is not a simulated bidder")?;
    claim_winner(&ledger, &outcome.winner, &auction, winning_bid)?;
    pay(&ledger, &outcome.winner, &auction)?;

    let mut bidder_output = Vec::with_capacity(participants.len());
    let statuses = ledger.bids(&auction)?;
    for (bidder, bid) in &participants {
        let withdrawn = if *bidder == outcome.winner {
            ledger.balance(bidder)
        } else {
            withdraw(&ledger, bidder, &auction)?;
            ledger.balance(bidder)
        };
        let status = statuses
            .iter()
            .find(|record| record.bidder == *bidder)
            .map(|record| format!("{:?}", record.status))
            .unwrap_or_default();
        bidder_output.push(BidderOutput {
            address: address_hex(bidder),
            value: bid.bid_value(),
            status,
            withdrawn,
        });
    }

    protocol.withdraw_stake()?;
    protocol.destroy()?;

    print_json(&SimulationOutput {
        auction: address_hex(&auction),
        scheme: scheme.name(),
        rounds: outcome.rounds,
        winner: address_hex(&outcome.winner),
        winning_bid: ledger.highest_bid(&auction)?,
        bidders: bidder_output,
        auctioneer_balance: ledger.balance(&auctioneer),
        block_height: ledger.block_height()?,
    })
}
