use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result, bail};
use backon::{BlockingRetryable, ConstantBuilder};
use pparchive::Stager;

use crate::config::Context;

pub fn stage_command(ctx: &Context, paths: Vec<PathBuf>, wait: bool) -> Result<()> {
    let stager = Stager::dmf();
    stager.request(paths.clone())?;
    println!("staging request dispatched for {} files", paths.len());

    if wait {
        wait_for_residency(&stager, &paths, ctx.poll_secs(), ctx.max_polls())
            .context("staging did not complete")?;
        println!("all {} files on disk", paths.len());
    }
    Ok(())
}

/// Poll residency until every path is on disk.
///
/// The recall itself runs in the tape library; all this loop does is
/// ask again. A subsystem failure stops the loop immediately, only the
/// "still on tape" answer is retried, `max_polls` times at `poll_secs`
/// intervals.
fn wait_for_residency(
    stager: &Stager,
    paths: &[PathBuf],
    poll_secs: u64,
    max_polls: usize,
) -> Result<()> {
    let backoff = ConstantBuilder::default()
        .with_delay(Duration::from_secs(poll_secs))
        .with_max_times(max_polls);

    let poll = || -> Result<()> {
        let residency = stager.residency(paths)?;
        if residency.all_resident() {
            return Ok(());
        }
        bail!(
            "{} of {} files still on tape",
            residency.missing().len(),
            residency.len()
        )
    };

    poll.retry(backoff)
        .when(|err| err.downcast_ref::<pparchive::Error>().is_none())
        .notify(|err, delay| {
            let reason = err.to_string();
            diagnostics::log_info!("{reason}, next residency check in {seconds}s", reason: reason.as_str(), seconds: delay.as_secs());
        })
        .call()
}
