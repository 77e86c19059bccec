//! Command execution

use std::path::Path;

use anyhow::{Context, Result};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands};
use crate::domain::builder::RouteBuilder;
use crate::domain::entities::Flow;
use crate::tree_traits::RenderTree;

pub fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Tree { flows_file }) => _tree(flows_file),
        Some(Commands::Leaves { flows_file }) => _leaves(flows_file),
        Some(Commands::Routes { flows_file }) => _routes(flows_file),
        Some(Commands::Info { flows_file }) => _info(flows_file),
        None => Ok(()),
    }
}

fn load_flows(flows_file: &Path) -> Result<Vec<Flow>> {
    RouteBuilder::new()
        .build_from_file(flows_file)
        .with_context(|| format!("Cannot build flows from {}", flows_file.display()))
}

#[instrument]
fn _tree(flows_file: &Path) -> Result<()> {
    debug!("flows_file: {:?}", flows_file);
    for flow in load_flows(flows_file)? {
        println!("{}", flow.to_display_tree());
    }
    Ok(())
}

#[instrument]
fn _leaves(flows_file: &Path) -> Result<()> {
    debug!("flows_file: {:?}", flows_file);
    for flow in load_flows(flows_file)? {
        let names = flow
            .tree
            .leaves()?
            .into_iter()
            .filter_map(|idx| flow.tree.get_node(idx))
            .map(|node| node.payload().to_string())
            .join(", ");
        println!("{}: {}", flow.name, names);
    }
    Ok(())
}

#[instrument]
fn _routes(flows_file: &Path) -> Result<()> {
    debug!("flows_file: {:?}", flows_file);
    for flow in load_flows(flows_file)? {
        println!("{}:", flow.name);
        for route in flow.tree.routes()? {
            let hops: Vec<String> = route
                .into_iter()
                .filter_map(|idx| flow.tree.get_node(idx))
                .map(|node| node.payload().to_string())
                .collect();
            let destination = hops.last().cloned().unwrap_or_default();
            println!("  Path to {}: {}", destination, hops.iter().join(", "));
        }
    }
    Ok(())
}

#[instrument]
fn _info(flows_file: &Path) -> Result<()> {
    debug!("flows_file: {:?}", flows_file);
    for flow in load_flows(flows_file)? {
        let leaf_count = flow.tree.leaves()?.len();
        println!(
            "{}: {} nodes, depth {}, {} leaves",
            flow.name,
            flow.tree.node_count(),
            flow.tree.depth(),
            leaf_count
        );
    }
    Ok(())
}
