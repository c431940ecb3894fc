//! Quire CLI
//!
//! Loads a JSON document fixture, builds its box tree, and prints it as a
//! colored outline or as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use quire_css::Direction;
use quire_document::{BoxTree, BuildSettings, LoadedDocument, load_document};
use quire_layout::{BlockBox, BoxContent, BoxKind, BuildOptions, Styleable, TextRun};

/// Quire — print the box tree of a document fixture
#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Outline of the box tree and page-margin tables
    quire res/sample.json

    # Machine-readable dump
    quire res/sample.json --json

    # Screen media, no bidi analysis
    quire res/sample.json --screen --no-bidi
"#)]
struct Cli {
    /// Path to a JSON document fixture
    #[arg(value_name = "FILE")]
    path: String,

    /// Print the box tree as JSON
    #[arg(short, long)]
    json: bool,

    /// Skip the bidi algorithm; all text is left-to-right
    #[arg(long)]
    no_bidi: bool,

    /// Build for screen media (no multi-column containers)
    #[arg(long)]
    screen: bool,

    /// Do not echo warnings to stderr while building
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    quire_common::warning::set_quiet(cli.quiet);

    let doc =
        load_document(&cli.path).with_context(|| format!("could not load '{}'", cli.path))?;

    let settings = BuildSettings {
        options: BuildOptions {
            paged: !cli.screen,
            ..BuildOptions::default()
        },
        bidi: !cli.no_bidi,
    };
    let tree = doc.build(&settings);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else {
        print_document(&doc, &tree);
    }
    Ok(())
}

/// Print the box tree, the margin tables, and any warnings.
fn print_document(doc: &LoadedDocument, tree: &BoxTree) {
    println!("=== Box Tree ({} styled elements) ===", doc.styles.len());
    match &tree.root {
        Some(root) => print_box(tree, root, 0),
        None => println!("(no document element)"),
    }

    for margin in &tree.margins {
        println!("\n=== Margin: {} ===", margin.area);
        print_box(tree, &margin.table, 0);
    }

    if !tree.warnings.is_empty() {
        println!("\n=== Warnings ===");
        for warning in &tree.warnings {
            println!("  {}", warning.yellow());
        }
    }
}

/// Recursively print a box and its content.
fn print_box(tree: &BoxTree, block: &BlockBox, depth: usize) {
    let indent = "  ".repeat(depth);

    let mut details = vec![block.style.display.to_string()];
    if block.anonymous {
        details.push("anonymous".to_string());
    }
    if block.replaced {
        details.push("replaced".to_string());
    }
    if let Some(floated) = &block.floated {
        details.push(format!("float: {}", floated.side));
    }
    if block.from_captioned_table {
        details.push("caption wrapper".to_string());
    }
    if let Some(counter) = block.list_counter {
        details.push(format!("list-item {counter}"));
    }
    if let Some(height) = block.height_override {
        details.push(format!("height {height}"));
    }
    if let Some(layer) = block.layer {
        details.push(format!("layer {}", layer.0));
    }

    println!(
        "{indent}{} {} {}",
        kind_label(&block.kind).cyan(),
        element_label(tree, block).green(),
        format!("({})", details.join(", ")).dimmed()
    );

    if let BoxKind::Table { columns } = &block.kind {
        for column in columns {
            let tag = tree.dom.tag_name(column.element).unwrap_or_default();
            println!("{indent}  {} <{tag}>", "column".dimmed());
        }
    }

    match &block.content {
        BoxContent::Empty => {}
        BoxContent::Block(children) => {
            for child in children {
                print_box(tree, child, depth + 1);
            }
        }
        BoxContent::Inline(items) => {
            for item in items {
                match item {
                    Styleable::Inline(run) => print_run(tree, run, depth + 1),
                    Styleable::Box(child) => print_box(tree, child, depth + 1),
                }
            }
        }
    }
}

/// Print one inline leaf, with `[`/`]` marking element starts and ends.
fn print_run(tree: &BoxTree, run: &TextRun, depth: usize) {
    let indent = "  ".repeat(depth);
    let preview: String = run.text.chars().take(30).collect();
    let suffix = if run.text.chars().count() > 30 { "..." } else { "" };

    let open = if run.starts_here { "[" } else { "" };
    let close = if run.ends_here { "]" } else { "" };
    let owner = run
        .element
        .and_then(|id| tree.dom.tag_name(id))
        .map(|tag| format!(" <{tag}>"))
        .unwrap_or_default();
    let rtl = if run.direction == Direction::Rtl { " rtl" } else { "" };
    let dynamic = if run.dynamic.is_some() { " dynamic" } else { "" };

    println!(
        "{indent}{open}Text(\"{}{}\"){close}{}",
        preview.replace('\n', "\\n"),
        suffix,
        format!("{owner}{rtl}{dynamic}").dimmed()
    );

    if let Some(footnote) = &run.footnote {
        println!("{indent}  {}", "footnote:".magenta());
        print_box(tree, footnote, depth + 2);
    }
}

fn kind_label(kind: &BoxKind) -> String {
    match kind {
        BoxKind::Plain => "Block".to_string(),
        BoxKind::Table { .. } => "Table".to_string(),
        BoxKind::TableRowGroup { header: true, .. } => "RowGroup(header)".to_string(),
        BoxKind::TableRowGroup { footer: true, .. } => "RowGroup(footer)".to_string(),
        BoxKind::TableRowGroup { .. } => "RowGroup".to_string(),
        BoxKind::TableRow => "Row".to_string(),
        BoxKind::TableCell => "Cell".to_string(),
        BoxKind::AnonymousBlock { open_inline } if open_inline.is_empty() => {
            "AnonymousBlock".to_string()
        }
        BoxKind::AnonymousBlock { open_inline } => {
            format!("AnonymousBlock(reopens {})", open_inline.len())
        }
        BoxKind::ColumnContainer => "Columns".to_string(),
    }
}

fn element_label(tree: &BoxTree, block: &BlockBox) -> String {
    let tag = block
        .element
        .and_then(|id| tree.dom.tag_name(id))
        .map_or_else(|| "-".to_string(), |tag| format!("<{tag}>"));
    match block.pseudo {
        Some(pseudo) => format!("{tag}::{pseudo}"),
        None => tag,
    }
}
