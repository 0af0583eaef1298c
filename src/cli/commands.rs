//! Command implementations for the `rstree` binary.
//!
//! Every command reads an indented outline (see [`crate::outline`]) into a
//! `Tree<String>` built with the effective settings.

use std::path::Path;

use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, Order};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, TreeSettings};
use crate::node::NodeId;
use crate::outline::{read_outline, to_outline};
use crate::path::NodePath;
use crate::tree::Tree;

/// Dispatch a parsed command line. `Completion` is handled by the binary.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = TreeSettings::load(cli.config.as_deref())?;
    match &cli.command {
        Some(Commands::Show { file, order, depth }) => cmd_show(&settings, file, *order, *depth),
        Some(Commands::Stats { file }) => cmd_stats(&settings, file),
        Some(Commands::Path { file, value }) => cmd_path(&settings, file, value),
        Some(Commands::Get { file, path }) => cmd_get(&settings, file, path),
        Some(Commands::Sort { file, deep }) => cmd_sort(&settings, file, *deep),
        Some(Commands::Config { command }) => cmd_config(&settings, command),
        Some(Commands::Completion { .. }) | None => Ok(()),
    }
}

fn load(settings: &TreeSettings, file: &Path) -> CliResult<Tree<String>> {
    let tree = read_outline(file, settings.clone())?;
    debug!(file = %file.display(), size = tree.size(), "loaded outline");
    Ok(tree)
}

#[instrument(skip(settings))]
fn cmd_show(settings: &TreeSettings, file: &Path, order: Order, depth: Option<usize>) -> CliResult<()> {
    let mut tree = load(settings, file)?;
    let within = |tree: &Tree<String>, id: NodeId| depth.map_or(true, |max| tree.depth(id) <= max);

    match order {
        Order::Tree => {
            if let Some(max) = depth {
                let cut: Vec<NodeId> = tree
                    .iter()
                    .filter(|&(id, _)| tree.depth(id) == max)
                    .map(|(id, _)| id)
                    .collect();
                for id in cut {
                    tree.erase_children(id);
                }
            }
            output::raw(&tree.to_string());
        }
        Order::Pre => {
            let mut walk = tree.iter();
            while let Some((id, value)) = walk.next() {
                output::info(&format!("{:width$}{value}", "", width = 2 * tree.depth(id)));
                if depth == Some(tree.depth(id)) {
                    walk.skip_current_children();
                }
            }
        }
        Order::Post => {
            for (_, value) in tree.post_order().filter(|&(id, _)| within(&tree, id)) {
                output::info(value);
            }
        }
        Order::Breadth => {
            for (_, value) in tree.breadth_first().filter(|&(id, _)| within(&tree, id)) {
                output::info(value);
            }
        }
        Order::Leaves => {
            for (_, value) in tree.leaves().filter(|&(id, _)| within(&tree, id)) {
                output::info(value);
            }
        }
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_stats(settings: &TreeSettings, file: &Path) -> CliResult<()> {
    let tree = load(settings, file)?;
    output::header(&file.display());
    output::field("roots", &tree.roots().count());
    output::field("nodes", &tree.size());
    match tree.max_depth() {
        Some(depth) => output::field("max depth", &depth),
        None => output::field("max depth", "-"),
    }
    output::field("leaves", &tree.leaves().count());
    #[cfg(feature = "bookkeeping")]
    {
        output::field("expandable", &tree.count_expandable());
        output::field("expanded", &tree.count_expanded());
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_path(settings: &TreeSettings, file: &Path, value: &str) -> CliResult<()> {
    let tree = load(settings, file)?;
    let (id, _) = tree
        .iter()
        .find(|(_, v)| v.as_str() == value)
        .ok_or_else(|| CliError::NotFound(format!("no node with value {value:?}")))?;
    output::info(&tree.path_of(id)?);
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_get(settings: &TreeSettings, file: &Path, path: &str) -> CliResult<()> {
    let tree = load(settings, file)?;
    let path: NodePath = path.parse()?;
    if path.is_empty() {
        return Err(CliError::InvalidArgs("path must have at least one step".into()));
    }
    let id = tree.node_at(&path)?;
    output::raw(&tree.to_termtree_with(id, &mut |_, value: &String| value.clone()).to_string());
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_sort(settings: &TreeSettings, file: &Path, deep: bool) -> CliResult<()> {
    let mut tree = load(settings, file)?;
    tree.sort_roots(deep);
    output::raw(&to_outline(&tree));
    Ok(())
}

fn cmd_config(settings: &TreeSettings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            match global_config_path() {
                Some(path) if path.exists() => output::header(&format!("# {}", path.display())),
                Some(path) => output::warning(&format!("no global config at {}", path.display())),
                None => output::warning("no config directory available"),
            }
            output::raw(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::raw(&TreeSettings::template()),
    }
    Ok(())
}
