//! On-chain data decoding
//!
//! Pure decoders from the ledger's tagged constructor/fields JSON encoding
//! into typed datum and redeemer records. No I/O happens here; fetching
//! lives in [`crate::ledger`] and candidate selection in
//! [`crate::resolver`].

pub mod datum;
pub mod redeemer;
pub mod value;

pub use datum::{DelegationDatum, SwapOfferDatum};
pub use redeemer::{
    DecodeOutcome, DelegationDepositRedeemer, SwapAdaToFtRedeemer, SwapOfferDepositRedeemer,
};
pub use value::PlutusValue;
