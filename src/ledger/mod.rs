use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type AccountId = String;
pub type Amount = u64;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("caller {caller} is not the ledger owner")]
    Unauthorized { caller: AccountId },
    #[error("insufficient balance in {account}: have {have}, need {need}")]
    InsufficientBalance {
        account: AccountId,
        have: Amount,
        need: Amount,
    },
    #[error("arithmetic overflow")]
    Overflow,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenEvent {
    Minted { to: AccountId, amount: Amount },
    Burned { from: AccountId, amount: Amount },
}

/// Fungible token ledger with a single fixed owner.
///
/// Both supply-changing operations check the caller against the owner before
/// touching any state; a failed call leaves the ledger untouched. Accounts
/// come into existence with balance 0 the first time a mutation references
/// them and are never removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenLedger {
    owner: AccountId,
    balances: BTreeMap<AccountId, Amount>,
    total_supply: Amount,
    events: Vec<TokenEvent>,
}

impl TokenLedger {
    pub fn new(owner: impl Into<AccountId>) -> Self {
        Self {
            owner: owner.into(),
            balances: BTreeMap::new(),
            total_supply: 0,
            events: Vec::new(),
        }
    }

    /// Rebuild a ledger from previously recorded state. Callers are expected
    /// to have checked that `total_supply` matches the balance sum.
    pub(crate) fn from_parts(
        owner: AccountId,
        balances: BTreeMap<AccountId, Amount>,
        total_supply: Amount,
        events: Vec<TokenEvent>,
    ) -> Self {
        Self {
            owner,
            balances,
            total_supply,
            events,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The ownership predicate gating every supply-changing operation.
    pub fn is_owner(&self, caller: &str) -> bool {
        self.owner == caller
    }

    pub fn balance_of(&self, account: &str) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balances(&self) -> &BTreeMap<AccountId, Amount> {
        &self.balances
    }

    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Create `amount` new units on `account`. Owner only.
    pub fn mint(&mut self, caller: &str, account: &str, amount: Amount) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        let new_balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert(account.to_string(), new_balance);
        self.total_supply = new_supply;
        self.events.push(TokenEvent::Minted {
            to: account.to_string(),
            amount,
        });
        Ok(())
    }

    /// Destroy `amount` units held by `account`. Owner only, and the account
    /// must hold at least `amount`.
    pub fn burn(&mut self, caller: &str, account: &str, amount: Amount) -> Result<(), TokenError> {
        self.ensure_owner(caller)?;
        let have = self.balance_of(account);
        if have < amount {
            return Err(TokenError::InsufficientBalance {
                account: account.to_string(),
                have,
                need: amount,
            });
        }
        self.balances.insert(account.to_string(), have - amount);
        // Conservation guarantees total_supply >= balance_of(account).
        self.total_supply -= amount;
        self.events.push(TokenEvent::Burned {
            from: account.to_string(),
            amount,
        });
        Ok(())
    }

    fn ensure_owner(&self, caller: &str) -> Result<(), TokenError> {
        if !self.is_owner(caller) {
            return Err(TokenError::Unauthorized {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }
}
