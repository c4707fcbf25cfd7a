//! Ledger side of the sealed-bid auction.
//!
//! The ledger owns every auction's state and is the only party that moves it
//! forward. The protocol talks to it through [`LedgerExecutor`]; this crate
//! also ships [`InMemoryLedger`], a reference executor for tests, simulation
//! and the CLI.
//!
//! # Architecture
//!
//! - `call`: Message types for state-changing operations
//! - `handlers`: Business logic for processing calls
//! - `queries`: Read-only state access
//! - `state`: Ledger state structures
//! - `winner`: Winner selection rules
//! - `executor`: The executor trait and its error type
//! - `memory`: In-memory executor
//! - `error`: Error types
//!
//! # Example
//!
//! ```ignore
//! use auction_ledger::{InMemoryLedger, LedgerExecutor};
//!
//! let ledger = InMemoryLedger::new();
//! let (auction, _) = ledger.deploy(&auctioneer, request)?;
//! ledger.bid(&bidder, &auction, commitment, deposit)?;
//! ```

pub mod call;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod memory;
pub mod queries;
pub mod state;
pub mod winner;

pub use call::LedgerCall;
pub use error::LedgerError;
pub use executor::{ExecResult, ExecutorError, LedgerExecutor};
pub use handlers::{CallContext, CallOutput, Environment, HandlerResult};
pub use memory::InMemoryLedger;
pub use state::LedgerState;
pub use winner::{HighestDeposit, WinnerRule};
