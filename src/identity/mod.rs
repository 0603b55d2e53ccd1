use std::fs;
use std::path::Path;

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::ledger::AccountId;

const SECRET_KEY_SIZE: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid secret key hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("secret key must be 32 bytes (64 hex chars)")]
    InvalidLength,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ed25519 keypair backing an account identity.
///
/// The account identifier is the hex-encoded verifying key, so possession of
/// the secret key is what ties a caller to an account. Secret material is
/// zeroised on drop.
pub struct Keypair {
    signing: SigningKey,
}

impl Keypair {
    /// Generate a fresh random keypair.
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::generate(&mut OsRng),
        }
    }

    /// Parse a keypair from a hex-encoded 32-byte secret.
    pub fn from_secret_hex(secret_hex: &str) -> Result<Self, IdentityError> {
        let bytes = Zeroizing::new(hex::decode(secret_hex.trim())?);
        if bytes.len() != SECRET_KEY_SIZE {
            return Err(IdentityError::InvalidLength);
        }
        let mut raw = Zeroizing::new([0u8; SECRET_KEY_SIZE]);
        (*raw).copy_from_slice(&bytes);
        Ok(Self {
            signing: SigningKey::from_bytes(&raw),
        })
    }

    /// The account identity controlled by this keypair.
    pub fn account_id(&self) -> AccountId {
        hex::encode(self.signing.verifying_key().as_bytes())
    }

    pub fn secret_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.signing.to_bytes()))
    }

    /// Write `sk.hex` / `pk.hex` into `dir`, creating it if needed.
    pub fn write_files(&self, dir: &Path) -> Result<(), IdentityError> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join("sk.hex"), self.secret_hex().as_bytes())?;
        fs::write(dir.join("pk.hex"), self.account_id().as_bytes())?;
        Ok(())
    }
}
