//! Line-oriented interactive session over the results cache.

use crate::data::{GroupKey, GroupedSeries};
use crate::error::{ForecastError, Result};
use crate::pipeline::{ForecastPipeline, ForecastResult, Lookup, ResultsCache, TrainOutcome};
use crate::report::{comparison_rows_table, groups_table, params_table, render_chart, trials_table};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

pub const NOT_TRAINED: &str = "not trained yet; run `train` first";
pub const NO_GROUPS: &str = "trained, no groups";

const CHART_WIDTH: usize = 72;
const CHART_HEIGHT: usize = 16;

const HELP: &str = "\
commands:
  train                 tune and forecast every group (cached while input is unchanged)
  list                  trained groups with their metrics
  show <key|index>      chart, parameters and comparison table of a group
  trials <key|index>    search history of a group
  export <key|index> <path>
                        write a group's result as JSON
  clear                 drop cached results
  help                  this text
  quit                  leave the session";

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Train,
    List,
    Show(String),
    Trials(String),
    Export { group: String, path: PathBuf },
    Clear,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or_else(|| "empty command".to_string())?;
        let args: Vec<&str> = words.collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("train", []) => Command::Train,
            ("list" | "ls", []) => Command::List,
            ("show", [group]) => Command::Show(group.to_string()),
            ("trials", [group]) => Command::Trials(group.to_string()),
            ("export", [group, path]) => Command::Export {
                group: group.to_string(),
                path: PathBuf::from(path),
            },
            ("clear", []) => Command::Clear,
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit" | "q", []) => Command::Quit,
            ("show" | "trials", _) => return Err(format!("usage: {name} <key|index>")),
            ("export", _) => return Err("usage: export <key|index> <path>".to_string()),
            ("train" | "list" | "ls" | "clear" | "help" | "?" | "quit" | "exit" | "q", _) => {
                return Err(format!("{name} takes no arguments"))
            }
            _ => return Err(format!("unknown command '{name}'; type `help`")),
        };
        Ok(command)
    }
}

/// Whether the session continues after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive session state: the prepared groups, the pipeline and the
/// cache it fills.
pub struct Session {
    groups: BTreeMap<GroupKey, GroupedSeries>,
    pipeline: ForecastPipeline,
    cache: ResultsCache,
}

impl Session {
    pub fn new(groups: BTreeMap<GroupKey, GroupedSeries>, pipeline: ForecastPipeline) -> Self {
        Self {
            groups,
            pipeline,
            cache: ResultsCache::new(),
        }
    }

    pub fn cache(&self) -> &ResultsCache {
        &self.cache
    }

    /// Read commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "{} groups loaded. Type `help` for commands.",
            self.groups.len()
        )?;
        write!(out, "> ")?;
        out.flush()?;

        for line in input.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                match line.parse::<Command>() {
                    Ok(command) => {
                        if self.execute(command, out)? == Flow::Quit {
                            return Ok(());
                        }
                    }
                    Err(message) => writeln!(out, "{message}")?,
                }
            }
            write!(out, "> ")?;
            out.flush()?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Execute one command, writing its output to `out`.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        match command {
            Command::Train => self.train(out)?,
            Command::List => self.list(out)?,
            Command::Show(group) => self.show(&group, out)?,
            Command::Trials(group) => self.trials(&group, out)?,
            Command::Export { group, path } => self.export(&group, &path, out)?,
            Command::Clear => {
                self.cache.clear();
                writeln!(out, "cached results cleared")?
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn train<W: Write>(&mut self, out: &mut W) -> Result<()> {
        match self.pipeline.train(&mut self.cache, &self.groups) {
            TrainOutcome::Reused => writeln!(out, "input unchanged; using cached results")?,
            TrainOutcome::Computed { succeeded: 0, failed: 0 } => writeln!(out, "{NO_GROUPS}")?,
            TrainOutcome::Computed { succeeded, failed } => {
                writeln!(out, "trained {succeeded} groups, {failed} failed")?
            }
        }
        Ok(())
    }

    fn list<W: Write>(&self, out: &mut W) -> Result<()> {
        match self.cache.outcomes() {
            None => writeln!(out, "{NOT_TRAINED}")?,
            Some(outcomes) if outcomes.is_empty() => writeln!(out, "{NO_GROUPS}")?,
            Some(outcomes) => writeln!(out, "{}", groups_table(outcomes))?,
        }
        Ok(())
    }

    /// Accept a `"{plant}_{material}"` key or a 1-based position in `list`.
    fn resolve(&self, group: &str) -> String {
        if let (Ok(index), Some(keys)) = (group.parse::<usize>(), self.cache.keys()) {
            if let Some(key) = index.checked_sub(1).and_then(|i| keys.get(i)) {
                return key.to_string();
            }
        }
        group.to_string()
    }

    /// Look up a trained group, writing the reason to `out` when it has no
    /// result to show.
    fn ready<W: Write>(&self, group: &str, out: &mut W) -> Result<Option<&ForecastResult>> {
        let key = self.resolve(group);
        match self.cache.get(&key) {
            Lookup::Ready(result) => return Ok(Some(result.as_ref())),
            Lookup::NotTrained => writeln!(out, "{NOT_TRAINED}")?,
            Lookup::Missing if self.cache.keys().is_some_and(|k| k.is_empty()) => {
                writeln!(out, "{NO_GROUPS}")?
            }
            Lookup::Missing => writeln!(out, "unknown group '{key}'")?,
            Lookup::Failed(failure) => writeln!(out, "group {key} failed: {}", failure.error)?,
        }
        Ok(None)
    }

    fn show<W: Write>(&self, group: &str, out: &mut W) -> Result<()> {
        let Some(result) = self.ready(group, out)? else {
            return Ok(());
        };
        writeln!(out, "{}", render_chart(&result.figure, CHART_WIDTH, CHART_HEIGHT))?;
        writeln!(
            out,
            "RMSE {:.3}  MAE {:.3}  (best search MAE {:.3})",
            result.rmse, result.mae, result.search_mae
        )?;
        writeln!(out, "{}", params_table(&result.best_params))?;
        writeln!(out, "{}", comparison_rows_table(&result.table))?;
        Ok(())
    }

    fn trials<W: Write>(&self, group: &str, out: &mut W) -> Result<()> {
        if let Some(result) = self.ready(group, out)? {
            writeln!(out, "{}", trials_table(&result.trials))?;
            writeln!(
                out,
                "{} trials, {} failed",
                result.trials.len(),
                result.failed_trials
            )?;
        }
        Ok(())
    }

    fn export<W: Write>(&self, group: &str, path: &Path, out: &mut W) -> Result<()> {
        let Some(result) = self.ready(group, out)? else {
            return Ok(());
        };
        match write_json(result, path) {
            Ok(()) => {
                info!(group = %result.key, path = %path.display(), "exported result");
                writeln!(out, "wrote {}", path.display())?;
            }
            Err(e) => writeln!(out, "export failed: {e}")?,
        }
        Ok(())
    }
}

fn write_json(result: &ForecastResult, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, result)
        .map_err(|e| ForecastError::Io(e.to_string()))?;
    writer.flush()?;
    Ok(())
}
