// ledgerlink/core/codec/src/sender.rs

use crate::identity::AccountIdentifier;
use crate::transaction::Transaction;
use ledgerlink_primitives::{CodecError, Result};
use tracing::{debug, warn};

/// Work out which cross-chain account a pushed transaction acts for.
///
/// A signed transaction speaks for `account_name` bound to its recovered
/// signer. An unsigned one must name its identifier explicitly, as hex.
pub fn resolve_sender(
    account_name: &str,
    tx: &Transaction,
    declared_identifier: Option<&str>,
) -> Result<AccountIdentifier> {
    match tx {
        Transaction::Signed(signed) => {
            let id = AccountIdentifier::create(account_name, &signed.sender())?;
            if let Some(declared) = declared_identifier {
                let declared = AccountIdentifier::from_hex(declared)?;
                if declared != id {
                    warn!(
                        account = account_name,
                        declared = %declared,
                        derived = %id,
                        "Declared identifier does not match signer"
                    );
                    return Err(CodecError::invalid_input(
                        "declared identifier does not match signer",
                    ));
                }
            }
            debug!(account = account_name, identifier = %id, "Resolved signed sender");
            Ok(id)
        }
        Transaction::Unsigned(_) => {
            let declared = declared_identifier.ok_or_else(|| {
                CodecError::invalid_input("unsigned transaction requires a declared identifier")
            })?;
            let id = AccountIdentifier::from_hex(declared)?;
            debug!(account = account_name, identifier = %id, "Resolved unsigned sender");
            Ok(id)
        }
    }
}
