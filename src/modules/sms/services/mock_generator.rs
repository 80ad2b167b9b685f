use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::apportion::apportion;
use crate::core::{AppError, Result};
use crate::modules::clients::ClientRepository;
use crate::modules::sms::models::{SmsRecord, SmsStatus};
use crate::modules::sms::repositories::SmsRepository;

/// Message templates for synthetic traffic
const MESSAGE_TEMPLATES: [&str; 10] = [
    "Pesan promosi produk terbaru",
    "Notifikasi pembayaran jatuh tempo",
    "Konfirmasi pesanan telah diterima",
    "Reminder jadwal meeting",
    "Update status pengiriman",
    "Pemberitahuan maintenance sistem",
    "Konfirmasi registrasi akun",
    "Notifikasi saldo terbaru",
    "Peringatan keamanan akun",
    "Update informasi produk",
];

/// How generated records are split across delivery outcomes.
///
/// The legacy form carries a single failure percentage; everything else is
/// marked SENT. The three-way form also produces DELIVERED records so that
/// dashboards show a realistic delivery-report mix.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum StatusMix {
    ThreeWay {
        delivered: f64,
        undelivered: f64,
        failed: f64,
    },
    Legacy {
        failed_percentage: f64,
    },
}

impl StatusMix {
    fn validate(&self) -> Result<()> {
        let pcts: Vec<f64> = match self {
            StatusMix::Legacy { failed_percentage } => vec![*failed_percentage],
            StatusMix::ThreeWay {
                delivered,
                undelivered,
                failed,
            } => vec![*delivered, *undelivered, *failed],
        };

        for pct in pcts {
            if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
                return Err(AppError::validation(format!(
                    "Percentages must be between 0 and 100, got {}",
                    pct
                )));
            }
        }
        Ok(())
    }
}

/// Generation window expressed as minute offsets from "now"
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TimeWindow {
    pub start_minutes: i64,
    pub end_minutes: i64,
}

impl Default for TimeWindow {
    fn default() -> Self {
        // Now until 20 minutes ahead
        Self {
            start_minutes: 0,
            end_minutes: 20,
        }
    }
}

/// Result summary of one generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub requested: u64,
    pub sent: u64,
    pub failed: u64,
    pub unit_price: Decimal,
    pub total_cost: Decimal,
}

/// Generates synthetic SMS delivery records for a client.
///
/// Validation happens before any persistence and the insert is a single
/// database transaction, so a run either lands completely or not at all.
pub struct MockSmsGenerator {
    client_repo: Arc<ClientRepository>,
    sms_repo: Arc<SmsRepository>,
}

impl MockSmsGenerator {
    pub fn new(client_repo: Arc<ClientRepository>, sms_repo: Arc<SmsRepository>) -> Self {
        Self {
            client_repo,
            sms_repo,
        }
    }

    /// Generate and persist `count` records inside the window.
    ///
    /// The RNG is injected so callers (and tests) control determinism.
    pub async fn generate<R: Rng>(
        &self,
        client_id: &str,
        count: u64,
        unit_price: Decimal,
        window: TimeWindow,
        mix: StatusMix,
        rng: &mut R,
    ) -> Result<GenerationSummary> {
        if count == 0 {
            return Err(AppError::validation("SMS count must be greater than 0"));
        }
        if unit_price <= Decimal::ZERO {
            return Err(AppError::validation("Unit price must be greater than 0"));
        }
        if window.start_minutes >= window.end_minutes {
            return Err(AppError::validation(
                "Time window start must be before its end",
            ));
        }
        mix.validate()?;

        self.client_repo.require_active(client_id).await?;

        let now = Utc::now();
        let start = now + Duration::minutes(window.start_minutes);
        let end = now + Duration::minutes(window.end_minutes);

        let (records, summary) = build_records(client_id, count, unit_price, start, end, mix, rng)?;

        self.sms_repo.bulk_insert(&records).await?;

        info!(
            client_id = %client_id,
            requested = summary.requested,
            sent = summary.sent,
            failed = summary.failed,
            total_cost = %summary.total_cost,
            "Mock SMS batch generated"
        );

        Ok(summary)
    }
}

/// Build the record set without touching storage.
///
/// Split out so the randomized construction is testable with a seeded RNG.
pub fn build_records<R: Rng>(
    client_id: &str,
    count: u64,
    unit_price: Decimal,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    mix: StatusMix,
    rng: &mut R,
) -> Result<(Vec<SmsRecord>, GenerationSummary)> {
    let statuses = draw_statuses(count, mix, rng)?;

    let window_ms = (end - start).num_milliseconds();
    if window_ms <= 0 {
        return Err(AppError::validation(
            "Time window start must be before its end",
        ));
    }

    let mut records = Vec::with_capacity(count as usize);
    let mut failed: u64 = 0;

    for status in statuses {
        let at = start + Duration::milliseconds(rng.gen_range(0..window_ms));
        let phone = format!("+628{:09}", rng.gen_range(0..1_000_000_000u32));
        let template = MESSAGE_TEMPLATES[rng.gen_range(0..MESSAGE_TEMPLATES.len())];
        let message = format!("{} - {}", template, at.format("%d/%m/%Y %H:%M"));

        let cost = if status == SmsStatus::Failed {
            failed += 1;
            Decimal::ZERO
        } else {
            unit_price
        };

        records.push(SmsRecord::new(
            client_id.to_string(),
            phone,
            message,
            status,
            cost,
            Some(at),
            at,
        ));
    }

    let sent = count - failed;
    let summary = GenerationSummary {
        requested: count,
        sent,
        failed,
        unit_price,
        total_cost: unit_price * Decimal::from(sent),
    };

    Ok((records, summary))
}

/// Draw one status per record according to the requested mix.
///
/// The legacy form rounds the failure percentage to a target count and
/// samples that many distinct indices, so the target is hit exactly (capped
/// at `count`). The three-way form apportions all three outcomes and
/// shuffles the pooled statuses.
fn draw_statuses<R: Rng>(count: u64, mix: StatusMix, rng: &mut R) -> Result<Vec<SmsStatus>> {
    match mix {
        StatusMix::Legacy { failed_percentage } => {
            let target_failed =
                (((failed_percentage / 100.0) * count as f64).round() as u64).min(count);

            let mut statuses = vec![SmsStatus::Sent; count as usize];
            let failed_indices =
                rand::seq::index::sample(rng, count as usize, target_failed as usize);
            for idx in failed_indices {
                statuses[idx] = SmsStatus::Failed;
            }
            Ok(statuses)
        }
        StatusMix::ThreeWay {
            delivered,
            undelivered,
            failed,
        } => {
            let counts = apportion(
                count,
                &[
                    (SmsStatus::Delivered, delivered),
                    (SmsStatus::Sent, undelivered),
                    (SmsStatus::Failed, failed),
                ],
            )?;

            let mut statuses = Vec::with_capacity(count as usize);
            for (status, n) in counts {
                statuses.extend(std::iter::repeat(status).take(n as usize));
            }
            statuses.shuffle(rng);
            Ok(statuses)
        }
    }
}
