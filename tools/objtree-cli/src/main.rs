// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

mod render;

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use objtree::{
    is_element_name, parse_xml, read_document, to_xml_string, CompositeNode, XmlOptions,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "objtree")]
#[command(about = "Inspect and convert self-describing object records (binary <-> XML)")]
#[command(version)]
struct Cli {
    /// Log reconciliation decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a binary record and print its field tree
    Inspect {
        /// Binary record file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Name given to the root composite
        #[arg(long, default_value = "record")]
        root: String,
    },

    /// Convert a binary record to an XML document
    ToXml {
        /// Binary record file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output XML file (stdout if omitted)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Name of the XML root element
        #[arg(long, default_value = "record")]
        root: String,

        /// Write the document on a single line
        #[arg(long)]
        compact: bool,

        /// Spaces per nesting level (overrides OBJTREE_XML_INDENT_WIDTH)
        #[arg(long, value_name = "N")]
        indent_width: Option<usize>,
    },

    /// Apply an XML document onto the shape of a template record
    FromXml {
        /// Binary record giving the field shapes and default values
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// XML document holding the values
        #[arg(value_name = "XML")]
        xml: PathBuf,

        /// Output binary record file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Inspect { input, root } => cmd_inspect(&input, &root)?,
        Commands::ToXml {
            input,
            output,
            root,
            compact,
            indent_width,
        } => {
            let mut options = XmlOptions::from_env();
            if compact {
                options.indent = false;
            }
            if let Some(width) = indent_width {
                options.indent_width = width;
            }
            cmd_to_xml(&input, output.as_deref(), &root, &options)?;
        }
        Commands::FromXml {
            template,
            xml,
            output,
        } => cmd_from_xml(&template, &xml, &output)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn load_record(path: &Path, root: &str) -> Result<CompositeNode<'static>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut node = CompositeNode::new(root);
    let consumed = node
        .read_bytes(&bytes)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    if consumed < bytes.len() {
        log::warn!(
            "{}: {} trailing byte(s) ignored",
            path.display(),
            bytes.len() - consumed
        );
    }
    Ok(node)
}

fn cmd_inspect(input: &Path, root: &str) -> Result<()> {
    let node = load_record(input, root)?;
    print!("{}", render::render_tree(&node));
    Ok(())
}

fn cmd_to_xml(input: &Path, output: Option<&Path>, root: &str, options: &XmlOptions) -> Result<()> {
    ensure!(is_element_name(root), "'{}' is not a valid XML element name", root);
    let node = load_record(input, root)?;
    let xml = to_xml_string(&node, options);
    match output {
        Some(path) => {
            fs::write(path, xml).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("[OK] Wrote {}", path.display());
        }
        None => print!("{}", xml),
    }
    Ok(())
}

/// Root element name selects the composite name, so any root is accepted.
fn cmd_from_xml(template: &Path, xml: &Path, output: &Path) -> Result<()> {
    let text = fs::read_to_string(xml).with_context(|| format!("Failed to read {}", xml.display()))?;
    let document = parse_xml(&text).with_context(|| format!("Failed to parse {}", xml.display()))?;

    let mut node = load_record(template, document.name())?;
    read_document(&mut node, &document);

    let bytes = node.to_bytes().context("Failed to encode record")?;
    fs::write(output, &bytes).with_context(|| format!("Failed to write {}", output.display()))?;
    println!("[OK] Wrote {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}
