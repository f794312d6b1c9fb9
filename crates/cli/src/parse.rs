//! ArgMatches → CliAction conversion.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::ArgMatches;
use nutriflow_engine::Dataset;

/// Which derived collections `aggregate` rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateTarget {
    Summary,
    Families,
    All,
}

/// Which query `query` runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    Fruits { order: Option<String> },
    Snacks,
    Families,
}

/// The result of parsing the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    Init,
    Stage {
        dataset: Dataset,
        file: PathBuf,
        date: NaiveDate,
    },
    Load {
        dataset: Dataset,
        date: NaiveDate,
    },
    Aggregate(AggregateTarget),
    Query(QueryKind),
}

/// Convert parsed arguments into an action; `today` fills in a missing `--date`.
pub fn matches_to_action(matches: &ArgMatches, today: NaiveDate) -> Result<CliAction> {
    match matches.subcommand() {
        Some(("init", _)) => Ok(CliAction::Init),
        Some(("stage", sub)) => Ok(CliAction::Stage {
            dataset: dataset(sub)?,
            file: sub
                .get_one::<String>("file")
                .map(PathBuf::from)
                .ok_or_else(|| anyhow!("missing FILE"))?,
            date: date(sub, today)?,
        }),
        Some(("load", sub)) => Ok(CliAction::Load {
            dataset: dataset(sub)?,
            date: date(sub, today)?,
        }),
        Some(("aggregate", sub)) => {
            let target = match sub.get_one::<String>("target").map(String::as_str) {
                Some("summary") => AggregateTarget::Summary,
                Some("families") => AggregateTarget::Families,
                Some("all") => AggregateTarget::All,
                other => bail!("unknown aggregate target {:?}", other),
            };
            Ok(CliAction::Aggregate(target))
        }
        Some(("query", sub)) => {
            let kind = match sub.subcommand() {
                Some(("fruits", q)) => QueryKind::Fruits {
                    order: q.get_one::<String>("order").cloned(),
                },
                Some(("snacks", _)) => QueryKind::Snacks,
                Some(("families", _)) => QueryKind::Families,
                _ => bail!("expected one of: fruits, snacks, families"),
            };
            Ok(CliAction::Query(kind))
        }
        Some((other, _)) => bail!("unknown command '{}'", other),
        None => bail!("no command given"),
    }
}

fn dataset(matches: &ArgMatches) -> Result<Dataset> {
    let name = matches
        .get_one::<String>("dataset")
        .ok_or_else(|| anyhow!("missing dataset"))?;
    name.parse::<Dataset>().map_err(|e| anyhow!(e))
}

fn date(matches: &ArgMatches, today: NaiveDate) -> Result<NaiveDate> {
    match matches.get_one::<String>("date") {
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .with_context(|| format!("invalid --date '{}', expected YYYY-MM-DD", text)),
        None => Ok(today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_cli;

    fn parse(args: &[&str]) -> Result<CliAction> {
        let matches = build_cli().try_get_matches_from(args)?;
        matches_to_action(&matches, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    #[test]
    fn stage_defaults_to_today() {
        let action = parse(&["nutriflow", "stage", "fruit", "fruits.json"]).unwrap();
        assert_eq!(
            action,
            CliAction::Stage {
                dataset: Dataset::Fruit,
                file: PathBuf::from("fruits.json"),
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            }
        );
    }

    #[test]
    fn load_with_explicit_date() {
        let action = parse(&["nutriflow", "load", "snack", "--date", "2023-12-24"]).unwrap();
        assert_eq!(
            action,
            CliAction::Load {
                dataset: Dataset::Snack,
                date: NaiveDate::from_ymd_opt(2023, 12, 24).unwrap(),
            }
        );
        assert!(parse(&["nutriflow", "load", "snack", "--date", "24/12/2023"]).is_err());
    }

    #[test]
    fn aggregate_and_query_targets() {
        assert_eq!(
            parse(&["nutriflow", "aggregate", "all"]).unwrap(),
            CliAction::Aggregate(AggregateTarget::All)
        );
        assert_eq!(
            parse(&["nutriflow", "query", "fruits"]).unwrap(),
            CliAction::Query(QueryKind::Fruits { order: None })
        );
        assert_eq!(
            parse(&["nutriflow", "query", "families"]).unwrap(),
            CliAction::Query(QueryKind::Families)
        );
    }
}
