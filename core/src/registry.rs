//! Compiled-in registry of known protocol features.
//!
//! Ids and metadata follow the framework's feature list; gaps in the id
//! sequence are features that were retired or never shipped. The registry is
//! built once on first access and is read-only afterwards.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::types::FeatureId;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
	Consensus,
	Vm,
	Crypto,
	Account,
	Asset,
	Storage,
	Governance,
	Other,
}

/// Static metadata of one known feature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureMeta {
	pub name: &'static str,
	pub description: &'static str,
	pub category: Category,
}

/// Immutable `FeatureId -> FeatureMeta` mapping.
#[derive(Clone, Debug, Default)]
pub struct Registry(BTreeMap<FeatureId, FeatureMeta>);

impl Registry {
	/// The compiled-in feature table.
	pub fn builtin() -> &'static Registry {
		&BUILTIN
	}

	pub fn from_entries(entries: impl IntoIterator<Item = (FeatureId, FeatureMeta)>) -> Self {
		Registry(entries.into_iter().collect())
	}

	pub fn get(&self, feature: FeatureId) -> Option<&FeatureMeta> {
		self.0.get(&feature)
	}

	/// Known feature ids in ascending order.
	pub fn ids(&self) -> impl Iterator<Item = FeatureId> + '_ {
		self.0.keys().copied()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

static BUILTIN: Lazy<Registry> = Lazy::new(|| {
	Registry::from_entries(FEATURES.iter().map(|&(id, name, description, category)| {
		(
			id,
			FeatureMeta {
				name,
				description,
				category,
			},
		)
	}))
});

use Category::*;

#[rustfmt::skip]
const FEATURES: &[(FeatureId, &str, &str, Category)] = &[
	(1, "Code Dependency Check", "Dependency checks on module publishing", Vm),
	(2, "Treat Friend as Private", "Friend functions are treated as module-private", Vm),
	(3, "SHA-512 and RIPEMD-160 Natives", "Native SHA-512 and RIPEMD-160 hash functions", Crypto),
	(4, "Aptos Stdlib Chain ID Natives", "Native chain id accessors in the standard library", Other),
	(5, "VM Binary Format V6", "Version 6 of the VM binary format", Vm),
	(7, "Multi Ed25519 PK Validate V2", "Stricter multi-Ed25519 public key validation", Crypto),
	(8, "Blake2b-256 Native", "Native Blake2b-256 hash function", Crypto),
	(9, "Resource Groups", "Groups of resources stored under a single storage slot", Storage),
	(10, "Multisig Accounts", "On-chain multisig account support", Account),
	(11, "Delegation Pools", "Stake delegation pools", Governance),
	(12, "Cryptography Algebra Natives", "Native algebraic structure operations", Crypto),
	(13, "BLS12-381 Structures", "BLS12-381 group and field structures", Crypto),
	(15, "Struct Constructors", "Struct constructors callable from entry functions", Vm),
	(16, "Periodical Reward Rate Decrease", "Periodic staking reward rate decrease", Governance),
	(17, "Partial Governance Voting", "Voting with part of the stake", Governance),
	(20, "Charge Invariant Violation", "Gas charging on invariant violations", Vm),
	(21, "Delegation Pool Partial Governance Voting", "Partial governance voting for delegation pools", Governance),
	(22, "Fee Payer Enabled", "Transactions with a separate gas fee payer", Account),
	(23, "Aptos Unique Identifiers", "Natively generated unique identifiers", Other),
	(24, "Bulletproofs Natives", "Native Bulletproofs range proof verification", Crypto),
	(25, "Signer Native Format Fix", "Fixed native representation of signers", Account),
	(26, "Module Event", "Module-scoped event streams", Vm),
	(31, "Safer Resource Groups", "Hardened resource group semantics", Storage),
	(32, "Safer Metadata", "Hardened metadata handling", Storage),
	(33, "Single Sender Authenticator", "Single sender transaction authenticator", Account),
	(34, "Sponsored Automatic Account Creation", "Accounts created automatically by sponsored transactions", Account),
	(35, "Fee Payer Account Optional", "Fee payer account may be omitted", Account),
	(38, "Limit Max Identifier Length", "Maximum identifier length enforcement", Vm),
	(39, "Operator Beneficiary Change", "Staking operators may change their beneficiary", Governance),
	(40, "VM Binary Format V7", "Version 7 of the VM binary format", Vm),
	(42, "Commission Change Delegation Pool", "Commission changes for delegation pools", Governance),
	(43, "BN254 Structures", "BN254 group and field structures", Crypto),
	(45, "Reconfigure with DKG", "Reconfiguration through distributed key generation", Consensus),
	(46, "Keyless Accounts", "Accounts authenticated without a private key", Account),
	(47, "Keyless but ZKless Accounts", "Keyless accounts without zero-knowledge proofs", Account),
	(49, "JWK Consensus", "Consensus on JSON web keys", Consensus),
	(50, "Concurrent Fungible Assets", "Concurrent fungible asset balance updates", Asset),
	(52, "Object Code Deployment", "Code deployment to objects", Storage),
	(53, "Max Object Nesting Check", "Maximum object nesting depth enforcement", Storage),
	(54, "Keyless Accounts with Passkeys", "Keyless accounts backed by passkeys", Account),
	(55, "Multisig V2 Enhancement", "Second generation multisig improvements", Account),
	(56, "Delegation Pool Allowlisting", "Delegator allowlists for delegation pools", Governance),
	(57, "Module Event Migration", "Migration of legacy events to module events", Vm),
	(59, "Transaction Context Extension", "Extended transaction context natives", Vm),
	(60, "Coin to Fungible Asset Migration", "Migration from coins to fungible assets", Asset),
	(62, "Object Native Derived Address", "Native derived addresses for objects", Storage),
	(63, "Dispatchable Fungible Asset", "Fungible assets with dispatchable hooks", Asset),
	(64, "New Accounts Default to FA APT Store", "New accounts use the fungible asset APT store", Asset),
	(65, "Operations Default to FA APT Store", "Operations use the fungible asset APT store", Asset),
	(66, "Aggregator V2 Is At Least API", "Aggregator v2 is-at-least comparison API", Vm),
	(67, "Concurrent Fungible Balance", "Concurrent fungible balance resource", Asset),
	(68, "Default to Concurrent Fungible Balance", "Concurrent fungible balance by default", Asset),
	(70, "Abort If Multisig Payload Mismatch", "Abort on multisig payload mismatch", Account),
	(78, "Transaction Simulation Enhancement", "Improved transaction simulation fidelity", Vm),
	(79, "Collection Owner", "Ownership tracking for collections", Storage),
	(80, "Native Memory Operations", "Native memory copy and compare operations", Vm),
	(84, "Permissioned Signer", "Signers restricted to granted permissions", Account),
	(85, "Account Abstraction", "Programmable account authentication", Account),
	(87, "Bulletproofs Batch Natives", "Batched Bulletproofs verification natives", Crypto),
	(88, "Derivable Account Abstraction", "Account abstraction with derivable authentication", Account),
	(90, "New Accounts Default to FA Store", "New accounts use the fungible asset store", Asset),
	(91, "Default Account Resource", "Accounts without an explicit account resource", Account),
	(92, "JWK Consensus Per Key Mode", "Per-key mode for JWK consensus", Consensus),
	(94, "Orderless Transactions", "Transactions without a sequence number ordering", Vm),
];
