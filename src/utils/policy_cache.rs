use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::model::schedule::Schedule;
use crate::timeclock::ShiftPolicy;

/// Per-employee shift policy, keyed by employee id. Check-in classifies
/// against this without a schedule lookup on the hot path.
pub static POLICY_CACHE: Lazy<Cache<u64, ShiftPolicy>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(3600)) // 1h TTL
        .build()
});

/// Resolve the shift policy for an employee.
///
/// Cache hit wins; on a miss the employee's currently active schedule is
/// loaded and cached. Employees with no active schedule (or an unreadable
/// one) fall back to the configured default policy, uncached so a later
/// schedule assignment takes effect within one lookup.
pub async fn policy_for(
    pool: &MySqlPool,
    employee_id: u64,
    default_policy: &ShiftPolicy,
) -> ShiftPolicy {
    if let Some(policy) = POLICY_CACHE.get(&employee_id).await {
        return policy;
    }

    match load_active_policy(pool, employee_id).await {
        Ok(Some(policy)) => {
            POLICY_CACHE.insert(employee_id, policy.clone()).await;
            policy
        }
        Ok(None) => default_policy.clone(),
        Err(e) => {
            tracing::warn!(error = %e, employee_id, "Falling back to default shift policy");
            default_policy.clone()
        }
    }
}

/// Drop the cached policy after a schedule write.
pub async fn invalidate(employee_id: u64) {
    POLICY_CACHE.invalidate(&employee_id).await;
}

async fn load_active_policy(pool: &MySqlPool, employee_id: u64) -> Result<Option<ShiftPolicy>> {
    let schedule = sqlx::query_as::<_, Schedule>(
        r#"
        SELECT *
        FROM schedules
        WHERE employee_id = ?
        AND CURDATE() BETWEEN start_date AND end_date
        ORDER BY start_date DESC
        LIMIT 1
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;

    match schedule {
        Some(row) => Ok(Some(row.shift_policy()?)),
        None => Ok(None),
    }
}

/// Batch insert into the cache, awaiting insertions concurrently.
async fn batch_insert(entries: &[(u64, ShiftPolicy)]) {
    let futures: Vec<_> = entries
        .iter()
        .map(|(employee_id, policy)| POLICY_CACHE.insert(*employee_id, policy.clone()))
        .collect();

    futures::future::join_all(futures).await;
}

/// Load all currently active schedules into the cache at startup (batched).
pub async fn warmup_policy_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, Schedule>(
        r#"
        SELECT *
        FROM schedules
        WHERE CURDATE() BETWEEN start_date AND end_date
        ORDER BY employee_id, start_date
        "#,
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;
    let mut skipped = 0usize;

    while let Some(row) = stream.next().await {
        let schedule: Schedule = row?;
        match schedule.shift_policy() {
            Ok(policy) => {
                batch.push((schedule.employee_id, policy));
                total += 1;
            }
            Err(e) => {
                // A row that predates policy validation; skip, do not abort warmup.
                tracing::warn!(error = %e, schedule_id = schedule.id, "Skipping schedule with invalid policy");
                skipped += 1;
            }
        }

        if batch.len() >= batch_size {
            batch_insert(&batch).await;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        batch_insert(&batch).await;
    }

    tracing::info!(total, skipped, "Shift policy cache warmup complete");

    Ok(())
}
