//! Feature flag bitmap codec.
//!
//! The on-chain feature set is a packed byte vector: bit `i` lives in byte
//! `i / 8` under mask `1 << (i % 8)`, so byte 0 covers feature ids 0..=7.
//! Bits past the end of the vector are implicitly unset. The wire
//! representation is a hex string with an optional `0x` prefix, byte 0 first.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::FeatureId;

#[derive(Error, Debug)]
pub enum BitmapError {
	#[error("malformed hex bitmap: {0}")]
	MalformedHex(#[from] hex::FromHexError),
}

/// Growable feature flag bit vector.
///
/// The vector only ever grows: clearing a bit never drops trailing zero
/// bytes, so the addressable range is monotonically non-decreasing across a
/// sequence of operations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Bitmap(Vec<u8>);

impl Bitmap {
	pub fn new() -> Self {
		Bitmap(Vec::new())
	}

	pub fn from_bytes(bytes: Vec<u8>) -> Self {
		Bitmap(bytes)
	}

	/// Decodes a hex string as returned by the node REST API.
	///
	/// Odd digit counts and non-hex characters are rejected, never guessed at.
	pub fn from_hex(hex_string: &str) -> Result<Self, BitmapError> {
		let digits = hex_string
			.strip_prefix("0x")
			.or_else(|| hex_string.strip_prefix("0X"))
			.unwrap_or(hex_string);
		Ok(Bitmap(hex::decode(digits)?))
	}

	/// Inverse of [`Bitmap::from_hex`]: always `0x`-prefixed, two lowercase
	/// digits per byte, leading zero bytes preserved.
	pub fn to_hex(&self) -> String {
		format!("0x{}", hex::encode(&self.0))
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Number of bytes currently addressable.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Tests a single feature bit. Reads past the current length are not an
	/// error, they mean "unset".
	pub fn contains(&self, feature: FeatureId) -> bool {
		let byte_index = (feature / 8) as usize;
		let bit_mask = 1u8 << (feature % 8);
		self.0
			.get(byte_index)
			.is_some_and(|byte| byte & bit_mask != 0)
	}

	/// Forces a single feature bit to `include`, growing the vector when the
	/// target byte is out of range. New bytes start zeroed.
	pub fn set(&mut self, feature: FeatureId, include: bool) {
		let byte_index = (feature / 8) as usize;
		let bit_mask = 1u8 << (feature % 8);
		if byte_index >= self.0.len() {
			self.0.resize(byte_index + 1, 0);
		}
		if include {
			self.0[byte_index] |= bit_mask;
		} else {
			self.0[byte_index] &= !bit_mask;
		}
	}

	/// Applies a feature diff: every id in `enable` is set, then every id in
	/// `disable` is cleared. An id present in both lists ends up disabled.
	/// Inputs need not be sorted or unique.
	pub fn apply_diff(&mut self, enable: &[FeatureId], disable: &[FeatureId]) {
		for &feature in enable {
			self.set(feature, true);
		}
		for &feature in disable {
			self.set(feature, false);
		}
	}

	/// Enumerates enabled feature ids in ascending order.
	pub fn enabled_ids(&self) -> Vec<FeatureId> {
		let mut enabled = Vec::new();
		for (byte_index, byte) in self.0.iter().enumerate() {
			for bit_index in 0..8 {
				if byte & (1u8 << bit_index) != 0 {
					enabled.push((byte_index * 8 + bit_index) as FeatureId);
				}
			}
		}
		enabled
	}

	pub fn stats(&self) -> BitmapStats {
		let enabled_ids = self.enabled_ids();
		let total_features = (self.0.len() * 8) as u32;
		let enabled_features = enabled_ids.len() as u32;
		BitmapStats {
			total_features,
			enabled_features,
			disabled_features: total_features - enabled_features,
			enabled_ids,
			bitmap_size: self.0.len(),
		}
	}
}

impl TryFrom<String> for Bitmap {
	type Error = BitmapError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Bitmap::from_hex(&value)
	}
}

impl From<Bitmap> for String {
	fn from(value: Bitmap) -> Self {
		value.to_hex()
	}
}

impl Display for Bitmap {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "bitmap ({} bytes): {:?}", self.0.len(), self.enabled_ids())
	}
}

/// Tests a feature bit on an optional bitmap; an absent bitmap reads as
/// all-disabled. Callers that must distinguish "no data" from "bit unset"
/// do so before collapsing to an `Option`.
pub fn is_enabled(bitmap: Option<&Bitmap>, feature: FeatureId) -> bool {
	bitmap.is_some_and(|bitmap| bitmap.contains(feature))
}

/// Addressable/enabled/disabled breakdown of a bitmap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BitmapStats {
	pub total_features: u32,
	pub enabled_features: u32,
	pub disabled_features: u32,
	pub enabled_ids: Vec<FeatureId>,
	pub bitmap_size: usize,
}

/// Decodes a hex bitmap and returns its statistics in one step.
pub fn analyze_hex(hex_string: &str) -> Result<BitmapStats, BitmapError> {
	Bitmap::from_hex(hex_string).map(|bitmap| bitmap.stats())
}
