use crate::core::{AppError, Result};

/// Largest-remainder (Hamilton) apportionment.
///
/// Turns arbitrary nonnegative shares — they need not sum to 100 — into
/// integer counts that sum to exactly `total`. Each share is normalized by
/// the sum of all shares, floored, and the leftover units go to the entries
/// with the largest fractional remainder. Ties keep input order.
///
/// An all-zero share set distributes evenly; with equal shares the leftover
/// still lands on the earliest entries, so the sum invariant holds for every
/// input.
pub fn apportion<L: Clone>(total: u64, shares: &[(L, f64)]) -> Result<Vec<(L, u64)>> {
    for (_, share) in shares {
        if !share.is_finite() || *share < 0.0 {
            return Err(AppError::validation(format!(
                "Percentage shares must be finite and nonnegative, got {}",
                share
            )));
        }
    }

    if total == 0 {
        return Ok(shares.iter().map(|(l, _)| (l.clone(), 0)).collect());
    }

    if shares.is_empty() {
        return Err(AppError::validation(
            "At least one percentage share is required",
        ));
    }

    let sum: f64 = shares.iter().map(|(_, s)| s).sum();

    // Real-valued targets after normalization; equal weights when every
    // share is zero
    let targets: Vec<f64> = if sum == 0.0 {
        let even = total as f64 / shares.len() as f64;
        vec![even; shares.len()]
    } else {
        shares.iter().map(|(_, s)| s / sum * total as f64).collect()
    };

    let mut counts: Vec<u64> = targets.iter().map(|t| t.floor() as u64).collect();
    let assigned: u64 = counts.iter().sum();
    let remainder = total.saturating_sub(assigned) as usize;

    // Stable sort keeps input order among equal fractional remainders
    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| {
        let frac_a = targets[a] - targets[a].floor();
        let frac_b = targets[b] - targets[b].floor();
        frac_b
            .partial_cmp(&frac_a)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for &idx in order.iter().take(remainder) {
        counts[idx] += 1;
    }

    Ok(shares
        .iter()
        .zip(counts)
        .map(|((label, _), count)| (label.clone(), count))
        .collect())
}
