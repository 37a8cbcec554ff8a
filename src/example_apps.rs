//! Reusable demo runner replaying the bundled experiment scores the way
//! a bar-chart/line-chart front end would consume them.

use std::error::Error;

use clap::{Parser, error::ErrorKind};

use crate::constants::demo::{DEFAULT_CLASSIFIER, DEFAULT_DECODER, DEFAULT_REVISION};
use crate::data::RunRecord;
use crate::dimension::FilterSpec;
use crate::group::{GroupEntry, Reducer};
use crate::metrics::bin_shares;
use crate::session::Session;
use crate::store::{RecordStore, SchemaPolicy};
use crate::types::{ClassifierTag, DecoderTag, RevisionTag};

/// Bundled sample dataset: 24 revision × classifier × decoder F1 cells.
/// The r1 scores come from an actual run; r2 and r3 are synthetic.
const SAMPLE_RUNS_JSON: &str = r#"[
  {"revision": "r1", "classifier": "bayes",  "decoder": "last",          "f1": 0.243},
  {"revision": "r1", "classifier": "bayes",  "decoder": "local",         "f1": 0.285},
  {"revision": "r1", "classifier": "bayes",  "decoder": "locallyGreedy", "f1": 0.248},
  {"revision": "r1", "classifier": "bayes",  "decoder": "mst",           "f1": 0.291},
  {"revision": "r1", "classifier": "maxent", "decoder": "last",          "f1": 0.301},
  {"revision": "r1", "classifier": "maxent", "decoder": "local",         "f1": 0.261},
  {"revision": "r1", "classifier": "maxent", "decoder": "locallyGreedy", "f1": 0.304},
  {"revision": "r1", "classifier": "maxent", "decoder": "mst",           "f1": 0.379},
  {"revision": "r2", "classifier": "bayes",  "decoder": "last",          "f1": 0.343},
  {"revision": "r2", "classifier": "bayes",  "decoder": "local",         "f1": 0.385},
  {"revision": "r2", "classifier": "bayes",  "decoder": "locallyGreedy", "f1": 0.348},
  {"revision": "r2", "classifier": "bayes",  "decoder": "mst",           "f1": 0.391},
  {"revision": "r2", "classifier": "maxent", "decoder": "last",          "f1": 0.401},
  {"revision": "r2", "classifier": "maxent", "decoder": "local",         "f1": 0.361},
  {"revision": "r2", "classifier": "maxent", "decoder": "locallyGreedy", "f1": 0.204},
  {"revision": "r2", "classifier": "maxent", "decoder": "mst",           "f1": 0.579},
  {"revision": "r3", "classifier": "bayes",  "decoder": "last",          "f1": 0.373},
  {"revision": "r3", "classifier": "bayes",  "decoder": "local",         "f1": 0.285},
  {"revision": "r3", "classifier": "bayes",  "decoder": "locallyGreedy", "f1": 0.448},
  {"revision": "r3", "classifier": "bayes",  "decoder": "mst",           "f1": 0.291},
  {"revision": "r3", "classifier": "maxent", "decoder": "last",          "f1": 0.201},
  {"revision": "r3", "classifier": "maxent", "decoder": "local",         "f1": 0.561},
  {"revision": "r3", "classifier": "maxent", "decoder": "locallyGreedy", "f1": 0.404},
  {"revision": "r3", "classifier": "maxent", "decoder": "mst",           "f1": 0.379}
]"#;

/// Parse the bundled sample dataset.
pub fn sample_run_records() -> Result<Vec<RunRecord>, serde_json::Error> {
    serde_json::from_str(SAMPLE_RUNS_JSON)
}

#[derive(Debug, Parser)]
#[command(
    name = "chart_feed_demo",
    disable_help_subcommand = true,
    about = "Print cross-filtered chart feeds from the sample scores",
    long_about = "Replay the bundled revision/classifier/decoder F1 dataset: one decoder-keyed \
                  bar feed per classifier for the selected revision, then a revision trend \
                  series for a fixed classifier/decoder pair."
)]
struct ChartFeedCli {
    #[arg(
        long,
        default_value = DEFAULT_REVISION,
        help = "Revision shown in the per-classifier decoder feeds"
    )]
    revision: RevisionTag,
    #[arg(
        long,
        default_value = DEFAULT_CLASSIFIER,
        help = "Classifier pinned for the revision trend series"
    )]
    classifier: ClassifierTag,
    #[arg(
        long,
        default_value = DEFAULT_DECODER,
        help = "Decoder pinned for the revision trend series"
    )]
    decoder: DecoderTag,
}

/// Run the chart-feed demo over the bundled dataset.
pub fn run_chart_feed_demo<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) = parse_cli::<ChartFeedCli, _>(
        std::iter::once("chart_feed_demo".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let records = sample_run_records()?;
    let store = RecordStore::load_checked(records, RunRecord::validate, SchemaPolicy::Strict)?;
    let mut session = Session::new(store);

    let revision_dim = session.dimension("revision", |r: &RunRecord| r.revision.clone())?;
    let classifier_dim = session.dimension("classifier", |r: &RunRecord| r.classifier.clone())?;
    let decoder_dim = session.dimension("decoder", |r: &RunRecord| r.decoder.clone())?;
    let by_decoder = session.group(decoder_dim, Reducer::sum(|r: &RunRecord| r.f1))?;

    let revisions = session.distinct_keys(revision_dim)?;
    if !revisions.contains(&cli.revision) {
        println!(
            "revision '{}' is not in the dataset (known: {})",
            cli.revision,
            revisions.join(", ")
        );
    }

    session.filter(revision_dim, FilterSpec::equals(cli.revision.clone()))?;

    for classifier in session.distinct_keys(classifier_dim)? {
        session.filter(classifier_dim, FilterSpec::equals(classifier.clone()))?;
        let feed = session.totals(by_decoder)?;
        print_feed(
            &format!("decoder F1 (classifier {classifier}, revision {})", cli.revision),
            &feed,
        );
    }

    // The trend series pins classifier and decoder; the revision filter
    // stays active and the revision group ignores it, so every revision
    // still shows up.
    session.filter(classifier_dim, FilterSpec::equals(cli.classifier.clone()))?;
    session.filter(decoder_dim, FilterSpec::equals(cli.decoder.clone()))?;
    let by_revision = session.group(revision_dim, Reducer::sum(|r: &RunRecord| r.f1))?;
    let trend = session.totals(by_revision)?;
    print_feed(
        &format!("revision trend ({}/{})", cli.classifier, cli.decoder),
        &trend,
    );

    Ok(())
}

fn print_feed(title: &str, entries: &[GroupEntry]) {
    println!("== {title} ==");
    if entries.is_empty() {
        println!("  (no visible records)");
        return;
    }
    let shares = bin_shares(entries);
    for entry in entries {
        let share = shares
            .as_ref()
            .and_then(|s| s.per_bin.iter().find(|bin| bin.key == entry.key))
            .map(|bin| bin.share * 100.0)
            .unwrap_or(0.0);
        println!("  {:<16} {:>7.3}  (share {share:>5.1}%)", entry.key, entry.value);
    }
    if let Some(shares) = shares {
        println!(
            "  total {:.3} across {} bins (max/min ratio {:.2})",
            shares.total, shares.bins, shares.ratio
        );
    }
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
