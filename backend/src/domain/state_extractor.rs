//! Financial state extraction from model replies.
//!
//! The assistant is instructed to end every reply with a fenced JSON block
//! summarizing the user's financial state. This module splits a raw reply into
//! the text that is shown to the user and the machine-readable patch.
//!
//! Only the first fenced block is authoritative. A reply that carries more than
//! one block keeps the later ones in its display text.
//!
//! Any block that is valid JSON is stripped from the display text. Fields that
//! do not have the expected type are dropped from the patch; a payload that is
//! not a JSON object yields no patch at all.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use shared::FinancialStatePatch;
use thiserror::Error;
use tracing::{debug, warn};

/// Opening fence "```json", a newline, the payload, a newline and the closing fence.
static FENCED_JSON_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```json\n(.*?)\n```").expect("fenced JSON pattern is valid")
});

/// A fenced block was found but its payload is not valid JSON.
#[derive(Debug, Error)]
#[error("malformed financial state block: {0}")]
pub struct MalformedPatchError(#[from] serde_json::Error);

/// Result of splitting a model reply
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedReply {
    /// Text to show in the transcript
    pub display_text: String,
    /// Patch decoded from the fenced block, if one was present and usable
    pub patch: Option<FinancialStatePatch>,
}

/// Split a raw model reply into display text and an optional state patch.
///
/// Never fails: a block that is not valid JSON is logged and the reply is
/// returned untouched.
pub fn extract(raw_reply: &str) -> ExtractedReply {
    let Some(captures) = FENCED_JSON_BLOCK.captures(raw_reply) else {
        return untouched(raw_reply);
    };

    let payload = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    match parse_payload(payload) {
        Ok(value) => {
            let display_text = FENCED_JSON_BLOCK.replace(raw_reply, "").trim().to_string();
            let patch = patch_from_value(&value);
            match &patch {
                Some(patch) => debug!("Extracted financial state patch (reset: {})", patch.reset),
                None => warn!("Financial state block is not a JSON object, ignoring it"),
            }
            ExtractedReply { display_text, patch }
        }
        Err(e) => {
            warn!("Failed to parse financial state JSON: {}", e);
            untouched(raw_reply)
        }
    }
}

fn parse_payload(payload: &str) -> Result<Value, MalformedPatchError> {
    Ok(serde_json::from_str(payload)?)
}

/// Build a patch from whatever fields of the object have the expected type.
fn patch_from_value(value: &Value) -> Option<FinancialStatePatch> {
    let object = value.as_object()?;

    Some(FinancialStatePatch {
        cash: number_field(object, "cash"),
        bank: number_field(object, "bank"),
        debts_to_user: debt_map_field(object, "debtsToUser"),
        user_debts: debt_map_field(object, "userDebts"),
        reset: object.get("reset").and_then(Value::as_bool).unwrap_or(false),
    })
}

fn number_field(object: &Map<String, Value>, key: &str) -> Option<f64> {
    match object.get(key)? {
        Value::Null => None,
        value => {
            let number = value.as_f64();
            if number.is_none() {
                warn!("Ignoring non-numeric {} in financial state: {}", key, value);
            }
            number
        }
    }
}

/// Person-to-amount map; entries whose amount is not a number are dropped.
fn debt_map_field(object: &Map<String, Value>, key: &str) -> Option<BTreeMap<String, f64>> {
    match object.get(key)? {
        Value::Null => None,
        Value::Object(entries) => Some(
            entries
                .iter()
                .filter_map(|(person, amount)| match amount.as_f64() {
                    Some(amount) => Some((person.clone(), amount)),
                    None => {
                        warn!("Ignoring non-numeric amount for {} in {}", person, key);
                        None
                    }
                })
                .collect(),
        ),
        value => {
            warn!("Ignoring non-object {} in financial state: {}", key, value);
            None
        }
    }
}

fn untouched(raw_reply: &str) -> ExtractedReply {
    ExtractedReply {
        display_text: raw_reply.to_string(),
        patch: None,
    }
}
