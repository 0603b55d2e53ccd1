//! Library surface of the AED Coin tooling.
//!
//! Four building blocks, combined by the `aedc` binary:
//!
//! * [`ledger`] — the access-controlled fungible token ledger (owner-gated
//!   mint/burn over per-account balances).
//! * [`identity`] — Ed25519 backed account identities and key material
//!   handling.
//! * [`deploy`] — deployment configuration (compiler pin plus named network
//!   targets), kept strictly outside the ledger core.
//! * [`snapshot`] — JSON snapshots of the ledger with a SHA-256 digest for
//!   tamper evidence.

pub mod deploy;
pub mod identity;
pub mod ledger;
pub mod snapshot;
