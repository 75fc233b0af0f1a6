use super::Context;
use anyhow::{Context as _, Result, bail};
use pathnet_core::network::{
    PathwayLayout, PlanFormat, edge_pairs, mark_pathway_membership, plan_all_pathways,
    plan_pathway_layout, plan_styles, render_bypasses, render_layouts, write_bypasses,
    write_layouts,
};
use pathnet_core::storage::PositionLedger;
use pathnet_engine::layout::LayoutStrategy;
use pathnet_engine::style::effective;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct LayoutArgs {
    pub node: Option<PathBuf>,
    pub edge: Option<PathBuf>,
    pub pathway: Option<String>,
    pub strategy: Option<LayoutStrategy>,
    pub ledger: Option<PathBuf>,
    pub reset_ledger: bool,
    pub output: Option<PathBuf>,
    pub json: bool,
}

fn plan_format(output: Option<&Path>, json: bool) -> PlanFormat {
    match (json, output) {
        (true, _) => PlanFormat::Json,
        (false, Some(path)) => PlanFormat::for_path(path),
        (false, None) => PlanFormat::Csv,
    }
}

pub fn mark(ctx: &Context, node: Option<PathBuf>, edge: Option<PathBuf>) -> Result<bool> {
    let mut nodes = ctx.load(&ctx.node_path(node))?;
    let edges = ctx.load(&ctx.edge_path(edge))?;
    let report = mark_pathway_membership(&mut nodes, &edges)?;

    println!("Pathways: {}", report.pathways.join(", "));
    for header in &report.added_columns {
        println!("Added column {}", header);
    }
    println!("{} node cells set to 1.", report.marked);
    if !report.unknown.is_empty() {
        println!("Not in the node table: {}", report.unknown.join(", "));
    }

    if nodes.modified {
        let question = format!("Save {}?", nodes.display_name());
        ctx.confirm_and_save(&mut nodes, &question)?;
    }
    Ok(true)
}

fn describe(layout: &PathwayLayout) -> String {
    let mut line = format!(
        "{}: {} placed, {} already positioned",
        layout.pathway,
        layout.placements.len(),
        layout.skipped.len()
    );
    if let Some(cycle) = &layout.cycle {
        line.push_str(&format!(", built around a {}-node cycle", cycle.len()));
    }
    line
}

pub fn layout(ctx: &Context, args: LayoutArgs) -> Result<bool> {
    let settings = &ctx.config.layout;
    let nodes = ctx.load(&ctx.node_path(args.node))?;
    let edges = ctx.load(&ctx.edge_path(args.edge))?;
    let pairs = edge_pairs(&edges)?;
    let strategy = args.strategy.unwrap_or(settings.strategy);

    let ledger_path = args.ledger.unwrap_or_else(|| settings.ledger.clone());
    let mut ledger = PositionLedger::load(&ledger_path)
        .with_context(|| format!("Failed to read ledger {}", ledger_path.display()))?;
    if args.reset_ledger && !ledger.is_empty() {
        let question = format!(
            "Forget {} positioned nodes in {}?",
            ledger.len(),
            ledger_path.display()
        );
        if ctx.confirm(&question)? {
            ledger.reset()?;
        }
    }

    let layouts = match args.pathway.as_deref() {
        Some(name) => {
            let columns = nodes.pathway_columns();
            let Some(k) = columns.iter().position(|c| {
                c.name.eq_ignore_ascii_case(name.trim()) || c.header.trim() == name.trim()
            }) else {
                bail!("No pathway column named {} in {}", name, nodes.display_name());
            };
            let column = &columns[k].name;
            vec![plan_pathway_layout(
                &nodes,
                &pairs,
                column,
                k,
                &ledger,
                strategy,
                &settings.params,
            )?]
        }
        None => plan_all_pathways(&nodes, &pairs, &ledger, strategy, &settings.params)?,
    };
    if layouts.is_empty() {
        println!("No pathway columns in {}.", nodes.display_name());
        return Ok(true);
    }

    let format = plan_format(args.output.as_deref(), args.json);
    match &args.output {
        Some(path) => {
            write_layouts(path, &layouts, format, &ctx.config.retry)?;
            for layout in &layouts {
                println!("{}", describe(layout));
            }
            println!("Plan written to {}", path.display());
        }
        None => {
            for layout in &layouts {
                info!("{}", describe(layout));
            }
            print!("{}", render_layouts(&layouts, format)?);
        }
    }

    let recorded = ledger.append(layouts.iter().flat_map(|l| &l.placed_ids))?;
    info!(recorded, ledger = %ledger_path.display(), "updated positioned-node ledger");
    Ok(true)
}

pub fn style(
    ctx: &Context,
    node: Option<PathBuf>,
    edge: Option<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
    all: bool,
) -> Result<bool> {
    let nodes = ctx.load(&ctx.node_path(node))?;
    let edges = ctx.load(&ctx.edge_path(edge))?;
    let planned = plan_styles(&nodes, &edges, &ctx.config.style)?;
    let bypasses = if all { planned } else { effective(&planned) };

    let format = plan_format(output.as_deref(), json);
    match &output {
        Some(path) => {
            write_bypasses(path, &bypasses, format, &ctx.config.retry)?;
            println!("{} overrides written to {}", bypasses.len(), path.display());
        }
        None => print!("{}", render_bypasses(&bypasses, format)?),
    }
    Ok(true)
}
