use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "inkform", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill a template with values and write the resulting PDF.
    Fill(FillArgs),
    /// Convert form field geometry records into a layout file.
    Import(ImportArgs),
}

#[derive(Parser, Debug)]
struct FillArgs {
    /// Layout JSON describing the template.
    #[arg(long)]
    layout: PathBuf,

    /// Values JSON object keyed by binding.
    #[arg(long)]
    values: PathBuf,

    /// Output PDF path.
    #[arg(long)]
    out: PathBuf,

    /// Directory template sources are resolved against (defaults to the layout's directory).
    #[arg(long)]
    root: Option<PathBuf>,

    /// Skip page rasterization; pages render without backgrounds.
    #[arg(long)]
    no_background: bool,
}

#[derive(Parser, Debug)]
struct ImportArgs {
    /// Field records JSON array.
    #[arg(long)]
    records: PathBuf,

    /// Source document identity written into the layout.
    #[arg(long)]
    source: String,

    /// Output layout JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Display name written into the layout.
    #[arg(long)]
    name: Option<String>,

    /// Background rasterization resolution.
    #[arg(long, default_value_t = 144)]
    dpi: u32,
}

#[derive(serde::Deserialize, Debug)]
#[serde(untagged)]
enum ValueJson {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    Date {
        date: String,
    },
    Signature {
        strokes: Vec<Vec<[f64; 2]>>,
        canvas: [f64; 2],
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Fill(args) => cmd_fill(args),
        Command::Import(args) => cmd_import(args),
    }
}

fn read_values_json(path: &Path) -> anyhow::Result<BTreeMap<String, Option<ValueJson>>> {
    let f = File::open(path).with_context(|| format!("open values '{}'", path.display()))?;
    let values = serde_json::from_reader(BufReader::new(f)).with_context(|| "parse values JSON")?;
    Ok(values)
}

fn apply_value(
    doc: &mut inkform::Document,
    binding: &str,
    value: Option<ValueJson>,
) -> anyhow::Result<()> {
    match value {
        None => doc.set_value::<inkform::RuntimeValue>(binding, None)?,
        Some(ValueJson::Bool(b)) => doc.set_value(binding, Some(b))?,
        Some(ValueJson::Integer(n)) => doc.set_value(binding, Some(n))?,
        Some(ValueJson::Number(n)) => doc.set_value(binding, Some(n))?,
        Some(ValueJson::Text(s)) => doc.set_value(binding, Some(s))?,
        Some(ValueJson::Date { date }) => {
            let d = chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .with_context(|| format!("value '{binding}': invalid date '{date}'"))?;
            doc.set_value(binding, Some(d))?;
        }
        Some(ValueJson::Signature { strokes, canvas }) => {
            let strokes: Vec<Vec<inkform::Point>> = strokes
                .into_iter()
                .map(|s| s.into_iter().map(|[x, y]| inkform::Point::new(x, y)).collect())
                .collect();
            let snapshot = inkform::SignatureSnapshot::new(
                &strokes,
                inkform::Size::new(canvas[0], canvas[1]),
            );
            doc.set_signature(binding, Some(snapshot))?;
        }
    }
    Ok(())
}

fn cmd_fill(args: FillArgs) -> anyhow::Result<()> {
    let layout = inkform::LayoutFile::from_path(&args.layout)?;
    let root = args
        .root
        .clone()
        .or_else(|| args.layout.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let rasterizer: Arc<dyn inkform::PageRasterizer> = if args.no_background {
        Arc::new(inkform::NullRasterizer)
    } else {
        let pdftoppm = inkform::PdftoppmRasterizer::default();
        if !pdftoppm.is_available() {
            eprintln!(
                "warning: '{}' not found; pages will render without backgrounds",
                pdftoppm.program().display()
            );
        }
        Arc::new(pdftoppm)
    };
    let resolver = Arc::new(inkform::TemplateResolver::new(
        Arc::new(inkform::FsAssetSource::new(root)),
        rasterizer,
        inkform::ResolverOpts::default(),
    ));

    let mut doc = inkform::DocumentBuilder::from_layout_file(resolver, &layout).build()?;
    for (binding, value) in read_values_json(&args.values)? {
        apply_value(&mut doc, &binding, value)?;
    }
    let bytes = doc.generate()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write pdf '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_import(args: ImportArgs) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.records)
        .with_context(|| format!("read records '{}'", args.records.display()))?;
    let layout = inkform::LayoutFile {
        source: args.source,
        name: args.name,
        dpi: args.dpi,
        pages: inkform::layouts_from_records_json(&json)?,
    };
    layout.validate()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = File::create(&args.out)
        .with_context(|| format!("create layout '{}'", args.out.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(f), &layout).with_context(|| "write layout JSON")?;

    eprintln!(
        "wrote {} ({} pages, {} fields)",
        args.out.display(),
        layout.pages.len(),
        layout.pages.iter().map(|p| p.fields.len()).sum::<usize>()
    );
    Ok(())
}
