//! Check explicit items

use super::{connect, execute, Global, RunArgs};
use anyhow::Result;
use wdbot_core::parse_item_ids;

pub fn run(global: &Global, raw_ids: &[String], args: &RunArgs) -> Result<()> {
    // before touching config or the network
    let ids = parse_item_ids(raw_ids)?;
    let config = global.load_config()?;
    let repo = connect(&config);
    execute(global, &config, repo, ids, args)
}
