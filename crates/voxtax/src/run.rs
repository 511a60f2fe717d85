use std::fs;

use anyhow::{anyhow, Context, Result};
use serde_yaml::from_str;

use crate::config::{OrganizeJob, RunConfig};
use crate::organize;

pub fn run_from_config(path: &str) -> Result<()> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read config {path}"))?;
    let cfg: RunConfig = from_str(&raw).context("invalid voxtax config")?;
    run_pipeline(cfg, organize::run)
}

fn run_pipeline<FOrganize>(cfg: RunConfig, organize_fn: FOrganize) -> Result<()>
where
    FOrganize: Fn(OrganizeJob) -> Result<()>,
{
    if cfg.jobs.is_empty() {
        return Err(anyhow!("run config must declare at least one job"));
    }
    let jobs = cfg.organize_jobs()?;
    let total = jobs.len();
    for (idx, job) in jobs.into_iter().enumerate() {
        eprintln!(
            "[voxtax] organize job {}/{}: source={} pattern={} output={}",
            idx + 1,
            total,
            job.source,
            job.pattern,
            job.output
        );
        let source = job.source.clone();
        organize_fn(job).with_context(|| format!("job {} ({source}) failed", idx + 1))?;
    }
    Ok(())
}
