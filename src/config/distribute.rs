//! Splitting provider descriptions across agents
//!
//! When one test plan runs on several load agents, ranges and value lists are
//! cut into disjoint contiguous chunks so no two agents hand out the same value.
//! File sets and custom providers cannot be split and are cloned instead.

use super::*;
use anyhow::{Context, Result};

/// Split `total` items into `agents` chunk sizes that differ by at most one
///
/// Earlier agents receive the larger chunks.
pub fn even_load(total: u64, agents: usize) -> Result<Vec<u64>> {
    if agents == 0 {
        anyhow::bail!("cannot distribute values to zero agents");
    }
    let agents_u64 = agents as u64;
    if total < agents_u64 {
        anyhow::bail!(
            "could not distribute only {} values to {} agents; decrease the number of agents or increase the possible values",
            total,
            agents
        );
    }

    let base = total / agents_u64;
    let remainder = total % agents_u64;
    Ok((0..agents_u64)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect())
}

/// Cut an inclusive range into per-agent inclusive ranges
fn split_range(start: i64, end: i64, agents: usize) -> Result<Vec<(i64, i64)>> {
    if start > end {
        anyhow::bail!("range start {} is greater than range end {}", start, end);
    }
    let total = match end.abs_diff(start).checked_add(1) {
        Some(total) => total,
        None => anyhow::bail!("range {}..={} holds too many values to distribute", start, end),
    };
    let sizes = even_load(total, agents)?;

    let mut chunks = Vec::with_capacity(agents);
    let mut next = Some(start);
    for size in sizes {
        let Some(chunk_end) = next.and_then(|n| n.checked_add_unsigned(size - 1)) else {
            anyhow::bail!("range {}..={} could not be split into {} chunks", start, end, agents);
        };
        let chunk_start = chunk_end - (size - 1) as i64;
        chunks.push((chunk_start, chunk_end));
        next = chunk_end.checked_add(1);
    }
    Ok(chunks)
}

/// Cut a list into per-agent contiguous sub-lists
fn split_list(values: &[Value], agents: usize) -> Result<Vec<Vec<Value>>> {
    let sizes = even_load(values.len() as u64, agents)?;

    let mut chunks = Vec::with_capacity(agents);
    let mut offset = 0usize;
    for size in sizes {
        let size = size as usize;
        chunks.push(values[offset..offset + size].to_vec());
        offset += size;
    }
    Ok(chunks)
}

impl ProviderConfig {
    /// Produce one description per agent
    pub fn distribute(&self, agents: usize) -> Result<Vec<ProviderConfig>> {
        if agents == 0 {
            anyhow::bail!("cannot distribute parameter '{}' to zero agents", self.name());
        }

        let split = match self {
            Self::Range(range) => split_range(range.start, range.end, agents)?
                .into_iter()
                .map(|(start, end)| {
                    Self::Range(RangeConfig {
                        start,
                        end,
                        ..range.clone()
                    })
                })
                .collect(),
            Self::List(list) => split_list(&list.values, agents)?
                .into_iter()
                .map(|values| {
                    Self::List(ListConfig {
                        values,
                        ..list.clone()
                    })
                })
                .collect(),
            Self::Username(username) => match (&username.values, username.start) {
                (Some(values), _) => split_list(values, agents)?
                    .into_iter()
                    .map(|values| {
                        Self::Username(UsernameConfig {
                            values: Some(values),
                            ..username.clone()
                        })
                    })
                    .collect(),
                (None, Some(start)) => {
                    let end = username.end.unwrap_or(DEFAULT_RANGE_END);
                    split_range(start, end, agents)?
                        .into_iter()
                        .map(|(start, end)| {
                            Self::Username(UsernameConfig {
                                start: Some(start),
                                end: Some(end),
                                ..username.clone()
                            })
                        })
                        .collect()
                }
                (None, None) => {
                    anyhow::bail!("username provider has neither values nor a range to distribute")
                }
            },
            Self::FileSet(_) | Self::Custom(_) => vec![self.clone(); agents],
        };

        Ok(split)
    }
}

impl PlanConfig {
    /// Produce one plan per agent, distributing every parameter
    pub fn distribute(&self, agents: usize) -> Result<Vec<PlanConfig>> {
        let mut plans = vec![PlanConfig::default(); agents];
        for provider in &self.parameters {
            let parts = provider
                .distribute(agents)
                .with_context(|| format!("failed to distribute parameter '{}'", provider.name()))?;
            for (plan, part) in plans.iter_mut().zip(parts) {
                plan.parameters.push(part);
            }
        }
        Ok(plans)
    }
}
