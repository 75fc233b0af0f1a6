use super::Context;
use crate::{Direction, ZeroTarget};
use anyhow::Result;
use pathnet_core::hygiene::{
    append_missing_nodes, blanks_to_value, duplicate_groups, edge_ids_missing_from_nodes,
    first_column_repeats, node_ids_missing_from_edges, prune_orphan_nodes, remove_duplicates,
    sort_by_type_and_pathways, zeros_to_blank,
};
use pathnet_engine::engine::CellRange;
use std::path::PathBuf;

pub fn repeats(ctx: &Context, node: Option<PathBuf>) -> Result<bool> {
    let sheet = ctx.load(&ctx.node_path(node))?;
    let report = first_column_repeats(&sheet)?;
    if report.is_clean() {
        println!("No repeated ids in {}.", sheet.display_name());
        return Ok(true);
    }
    for r in &report.repeats {
        println!("Row {}: {} (occurrence {})", r.row_number, r.value, r.occurrence);
    }
    println!();
    for (value, count) in &report.counts {
        println!("{}: {} times", value, count);
    }
    println!(
        "{} repeated ids, {} extra rows.",
        report.counts.len(),
        report.repeats.len()
    );
    Ok(true)
}

pub fn duplicates(
    ctx: &Context,
    edge: Option<PathBuf>,
    key_cols: usize,
    remove: bool,
    brief: bool,
) -> Result<bool> {
    let mut sheet = ctx.load(&ctx.edge_path(edge))?;
    let groups = duplicate_groups(&sheet, key_cols)?;
    if groups.is_empty() {
        println!("No duplicate rows in {}.", sheet.display_name());
        return Ok(true);
    }

    for group in &groups {
        let duplicate = sheet.row_number(group.duplicate());
        if brief {
            println!("Row {}", duplicate);
            continue;
        }
        let rows: Vec<String> = group.rows.iter().map(|&r| sheet.row_number(r).to_string()).collect();
        println!(
            "[{}] rows {}; duplicate: row {}",
            group.key.join(", "),
            rows.join(", "),
            duplicate
        );
    }
    println!("{} duplicate groups.", groups.len());

    if remove {
        let question = format!(
            "Remove {} duplicate rows from {}?",
            groups.len(),
            sheet.display_name()
        );
        if ctx.confirm(&question)? {
            let removed = remove_duplicates(&mut sheet, &groups);
            println!("Removed {} rows.", removed);
            ctx.save_in_place(&mut sheet)?;
        } else {
            println!("Cancelled; {} left unchanged.", sheet.display_name());
        }
    }
    Ok(true)
}

fn print_ids(title: &str, ids: &[String]) {
    if ids.is_empty() {
        println!("{}: none", title);
        return;
    }
    println!("{} ({}):", title, ids.len());
    for id in ids {
        println!("  {}", id);
    }
}

pub fn missing(
    ctx: &Context,
    node: Option<PathBuf>,
    edge: Option<PathBuf>,
    direction: Option<Direction>,
    prune: bool,
    append: bool,
) -> Result<bool> {
    let mut nodes = ctx.load(&ctx.node_path(node))?;
    let edges = ctx.load(&ctx.edge_path(edge))?;

    if direction != Some(Direction::Edges) {
        print_ids(
            "Nodes used by no edge",
            &node_ids_missing_from_edges(&nodes, &edges)?,
        );
    }
    if direction != Some(Direction::Nodes) {
        print_ids(
            "Edge endpoints missing from the node table",
            &edge_ids_missing_from_nodes(&nodes, &edges)?,
        );
    }

    if prune {
        let question = format!("Delete orphan rows from {}?", nodes.display_name());
        if ctx.confirm(&question)? {
            let removed = prune_orphan_nodes(&mut nodes, &edges)?;
            for (row, id) in &removed {
                println!("Deleted row {}: {}", row, id);
            }
            if !removed.is_empty() {
                ctx.save_in_place(&mut nodes)?;
            }
        }
    } else if append {
        let question = format!("Append missing nodes to {}?", nodes.display_name());
        if ctx.confirm(&question)? {
            let added = append_missing_nodes(&mut nodes, &edges)?;
            for id in &added {
                println!("Added {}", id);
            }
            if !added.is_empty() {
                ctx.save_in_place(&mut nodes)?;
            }
        }
    }
    Ok(true)
}

pub fn sort(ctx: &Context, node: Option<PathBuf>) -> Result<bool> {
    let mut sheet = ctx.load(&ctx.node_path(node))?;
    if !sort_by_type_and_pathways(&mut sheet)? {
        println!("{} is already sorted.", sheet.display_name());
        return Ok(true);
    }
    let question = format!("Write sorted rows to {}?", sheet.display_name());
    ctx.confirm_and_save(&mut sheet, &question)?;
    Ok(true)
}

pub fn zeros(
    ctx: &Context,
    file: Option<PathBuf>,
    to: ZeroTarget,
    values: Vec<String>,
    fill: &str,
    range: Option<&CellRange>,
) -> Result<bool> {
    let mut sheet = ctx.load(&ctx.node_path(file))?;
    let changed = match to {
        ZeroTarget::Blank => {
            let values = if values.is_empty() {
                vec!["0".to_string()]
            } else {
                values
            };
            zeros_to_blank(&mut sheet, &values, range)
        }
        ZeroTarget::Zero => blanks_to_value(&mut sheet, fill, range),
    };

    if changed.is_empty() {
        println!("Nothing to change in {}.", sheet.display_name());
        return Ok(true);
    }
    let cells: Vec<String> = changed.iter().map(|c| c.to_string()).collect();
    tracing::debug!(cells = %cells.join(" "), "changed cells");
    println!("{} cells changed.", changed.len());

    let question = format!("Save {}?", sheet.display_name());
    ctx.confirm_and_save(&mut sheet, &question)?;
    Ok(true)
}
