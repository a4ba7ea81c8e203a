//! Check the items belonging to one TV show

use super::{execute, Global, RunArgs};
use anyhow::{Context, Result};
use clap::ValueEnum;
use wdbot_core::properties::{instance, INSTANCE_OF, PART_OF_THE_SERIES};
use wdbot_core::ItemId;
use wdbot_model::{Pattern, QueryService};

/// Which members of the show to check
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChildType {
    Episode,
    Season,
    Series,
    All,
}

impl ChildType {
    /// Instance types to stream, in order
    fn instance_types(self) -> Vec<ItemId> {
        match self {
            ChildType::Episode => vec![instance::TELEVISION_SERIES_EPISODE],
            ChildType::Season => vec![instance::TELEVISION_SERIES_SEASON],
            ChildType::Series => vec![instance::TELEVISION_SERIES],
            ChildType::All => vec![
                instance::TELEVISION_SERIES,
                instance::TELEVISION_SERIES_SEASON,
                instance::TELEVISION_SERIES_EPISODE,
            ],
        }
    }
}

/// The series itself, then its members of each requested type
pub fn member_ids(
    query: &dyn QueryService,
    series: ItemId,
    child_type: ChildType,
) -> wdbot_core::Result<Vec<ItemId>> {
    let mut ids = Vec::new();
    for instance_type in child_type.instance_types() {
        if instance_type == instance::TELEVISION_SERIES {
            ids.push(series);
            continue;
        }
        let pattern = Pattern::new()
            .with(PART_OF_THE_SERIES.id, series)
            .with(INSTANCE_OF.id, instance_type);
        let found = query.find(&pattern)?;
        tracing::info!(pattern = %pattern, count = found.len(), "found show members");
        ids.extend(found);
    }
    Ok(ids)
}

pub fn run(global: &Global, raw_series: &str, child_type: ChildType, args: &RunArgs) -> Result<()> {
    let series: ItemId = raw_series
        .parse()
        .with_context(|| format!("bad series id '{}'", raw_series))?;
    let config = global.load_config()?;
    let repo = super::connect(&config);

    let ids = member_ids(repo.query(), series, child_type)?;
    if ids.is_empty() {
        tracing::warn!(series = %series, "no {:?} items found", child_type);
        return Ok(());
    }
    execute(global, &config, repo, ids, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wdbot_core::Value;
    use wdbot_model::memory::MemoryRepo;
    use wdbot_model::ItemData;

    fn show() -> std::sync::Arc<MemoryRepo> {
        let series = ItemId::from_raw(10);
        let mem = MemoryRepo::new();
        mem.insert(ItemData::new(series).with(INSTANCE_OF.id, Value::Item(instance::TELEVISION_SERIES)));
        for (id, kind) in [
            (20, instance::TELEVISION_SERIES_SEASON),
            (21, instance::TELEVISION_SERIES_SEASON),
            (30, instance::TELEVISION_SERIES_EPISODE),
        ] {
            mem.insert(
                ItemData::new(ItemId::from_raw(id))
                    .with(INSTANCE_OF.id, Value::Item(kind))
                    .with(PART_OF_THE_SERIES.id, Value::Item(series)),
            );
        }
        // an episode of some other show
        mem.insert(
            ItemData::new(ItemId::from_raw(99))
                .with(INSTANCE_OF.id, Value::Item(instance::TELEVISION_SERIES_EPISODE))
                .with(PART_OF_THE_SERIES.id, Value::Item(ItemId::from_raw(11))),
        );
        mem
    }

    #[test]
    fn test_episodes_only() {
        let mem = show();
        let ids = member_ids(mem.repo().query(), ItemId::from_raw(10), ChildType::Episode).unwrap();
        assert_eq!(ids, vec![ItemId::from_raw(30)]);
    }

    #[test]
    fn test_series_needs_no_query() {
        let mem = show();
        let ids = member_ids(mem.repo().query(), ItemId::from_raw(10), ChildType::Series).unwrap();
        assert_eq!(ids, vec![ItemId::from_raw(10)]);
        assert_eq!(mem.queries(), 0);
    }

    #[test]
    fn test_all_streams_series_then_seasons_then_episodes() {
        let mem = show();
        let ids = member_ids(mem.repo().query(), ItemId::from_raw(10), ChildType::All).unwrap();
        assert_eq!(
            ids,
            vec![
                ItemId::from_raw(10),
                ItemId::from_raw(20),
                ItemId::from_raw(21),
                ItemId::from_raw(30),
            ]
        );
        assert_eq!(mem.queries(), 2);
    }
}
