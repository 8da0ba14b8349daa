//! Model-name resolution and cost computation.
//!
//! A query is fuzzy-matched against the snapshot's model ids and, on a
//! confident match, priced with the per-1K formula. Every way a query can
//! fail to produce a breakdown is a distinct [`ResolveError`] variant so
//! a renderer can say exactly what went wrong.

use serde::Serialize;

use crate::record::{PricingRecord, RecordSet};
use crate::similarity::similarity;

/// A candidate is accepted only when its score strictly exceeds this.
pub const MATCH_THRESHOLD: u8 = 70;

/// Which per-token price a cost term draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Input,
    Output,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
        }
    }
}

/// Why a query produced no cost breakdown.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("no model matching '{query}' (best fuzzy score {best_score}/100)")]
    NoMatch { query: String, best_score: u8 },

    #[error("'{model_id}' has no {kind}-token price in the current snapshot")]
    PricingUnavailable { model_id: String, kind: TokenKind },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// A computed cost breakdown for one query against one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct CostResult {
    pub model_id: String,
    /// Fuzzy-match confidence, 0..=100.
    pub confidence: u8,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    /// The matched record, so renderers can show the raw per-1K prices.
    pub record: PricingRecord,
}

/// Best fuzzy match for `query` across the set.
///
/// Scans in the set's sorted iteration order, keeping the strictly
/// highest score; on a tie the earlier model id wins. `None` only for an
/// empty set; thresholding is the caller's concern.
pub fn best_match<'a>(
    query: &str,
    records: &'a RecordSet,
) -> Option<(&'a str, &'a PricingRecord, u8)> {
    let needle = query.to_lowercase();
    let mut best: Option<(&str, &PricingRecord, u8)> = None;
    for (model_id, record) in records.iter() {
        let score = similarity(&needle, &model_id.to_lowercase());
        if best.map_or(true, |(_, _, b)| score > b) {
            best = Some((model_id, record, score));
        }
    }
    best
}

/// Resolve a free-text model name and price the given usage against it.
///
/// Counts arrive signed so out-of-range values are representable and can
/// be rejected as [`ResolveError::InvalidInput`] rather than masked
/// upstream. For fixed inputs and a fixed set the result is always
/// identical.
pub fn resolve_and_cost(
    query: &str,
    input_tokens: i64,
    output_tokens: i64,
    requests: i64,
    records: &RecordSet,
) -> Result<CostResult, ResolveError> {
    if input_tokens < 0 {
        return Err(ResolveError::InvalidInput(format!(
            "input token count must be non-negative, got {input_tokens}"
        )));
    }
    if output_tokens < 0 {
        return Err(ResolveError::InvalidInput(format!(
            "output token count must be non-negative, got {output_tokens}"
        )));
    }
    if requests < 1 {
        return Err(ResolveError::InvalidInput(format!(
            "request count must be positive, got {requests}"
        )));
    }

    let (model_id, record, score) = match best_match(query, records) {
        Some(hit) if hit.2 > MATCH_THRESHOLD => hit,
        other => {
            return Err(ResolveError::NoMatch {
                query: query.to_string(),
                best_score: other.map(|(_, _, s)| s).unwrap_or(0),
            })
        }
    };

    let input_cost = cost_term(record.input_price, input_tokens, requests, model_id, TokenKind::Input)?;
    let output_cost = cost_term(record.output_price, output_tokens, requests, model_id, TokenKind::Output)?;

    Ok(CostResult {
        model_id: model_id.to_string(),
        confidence: score,
        input_cost,
        output_cost,
        total_cost: input_cost + output_cost,
        record: record.clone(),
    })
}

/// One cost term: `price x tokens / 1000 x requests`.
///
/// Zero tokens cost zero whether or not the price is known. A positive
/// count against an absent price is reported as unavailable, never as
/// a zero cost.
fn cost_term(
    price: Option<f64>,
    tokens: i64,
    requests: i64,
    model_id: &str,
    kind: TokenKind,
) -> Result<f64, ResolveError> {
    if tokens == 0 {
        return Ok(0.0);
    }
    match price {
        Some(p) => Ok(p * tokens as f64 / 1000.0 * requests as f64),
        None => Err(ResolveError::PricingUnavailable {
            model_id: model_id.to_string(),
            kind,
        }),
    }
}
