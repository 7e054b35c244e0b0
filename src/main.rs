use clap::{Parser, Subcommand};
use imgpipe::cache::ResizeCache;
use imgpipe::imaging::RustBackend;
use imgpipe::process::{AssetPipeline, AssetRequest};
use imgpipe::{breakpoints, config, output};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "imgpipe")]
#[command(about = "Build-time image resize stage with an on-disk transform cache")]
#[command(long_about = "\
Build-time image resize stage with an on-disk transform cache

Asset specs carry a resize directive in their query string:

  imgpipe process 'hero.jpg?resize=800x600>&quality=80'
  imgpipe process 'icon.png?resize=32x32!&inline=inline'
  imgpipe process logo.svg                # no directive = passthrough

Directive grammar: resize=<width>x<height><flag>, where either dimension
may be omitted (derive from source) and the optional flag is one of:

  !   force exact box, ignore aspect
  >   shrink only if the source is larger
  <   enlarge only if the source is smaller
  ^   cover the box, preserving aspect

Other recognized keys: format (target encoding, default source extension),
name, suffix (output naming), quality (1-100), inline=inline (emit a data
URI instead of a file, up to the configured size limit).

Transformed bytes are memoized in a cache keyed by source path, directive,
and the file's size + mtime; unchanged sources skip re-encoding entirely.

Run 'imgpipe gen-config' to generate a documented imgpipe.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: imgpipe.toml in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transform image assets given as PATH?QUERY specs
    Process(ProcessArgs),
    /// Print CSS media-query conditions for responsive breakpoints
    Media(MediaArgs),
    /// Print a stock imgpipe.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ProcessArgs {
    /// Asset specs, e.g. 'hero.jpg?resize=800x600>&quality=80'
    #[arg(required = true)]
    assets: Vec<String>,

    /// Output directory (overrides config)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Cache directory (overrides config)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Ignore the existing cache — re-encode every asset
    #[arg(long)]
    no_cache: bool,
}

#[derive(clap::Args)]
struct MediaArgs {
    /// Breakpoints to include, comma-separated (default: all)
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Override a breakpoint size as NAME=PX (repeatable)
    #[arg(long = "size", value_name = "NAME=PX")]
    sizes: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let options = config::load_options(cli.config.as_deref())?;

    match cli.command {
        Command::Process(args) => run_process(&options, &args)?,
        Command::Media(args) => run_media(&options, &args)?,
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

fn run_process(
    options: &config::Options,
    args: &ProcessArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&options.output.dir));
    let cache_dir = args
        .cache_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&options.cache.dir));

    init_thread_pool(&options.processing);

    let cache = if args.no_cache {
        ResizeCache::open_empty(&cache_dir)
    } else {
        ResizeCache::open(&cache_dir)
    };
    let pipeline = AssetPipeline::new(RustBackend::new(), cache, &out_dir, options.inline.limit);

    // Spec-level failures (unreadable files) report alongside pipeline
    // failures rather than aborting the batch
    let loaded: Vec<_> = args.assets.iter().map(|spec| AssetRequest::load(spec)).collect();
    let requests: Vec<AssetRequest> = loaded.iter().flatten().cloned().collect();
    let mut handled = pipeline.run_batch(&requests).into_iter();

    let results: Vec<_> = loaded
        .into_iter()
        .map(|load_result| match load_result {
            Ok(_) => handled.next().expect("one result per loaded request"),
            Err(e) => Err(e),
        })
        .collect();

    output::print_process_output(&args.assets, &results);

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        return Err(format!("{failed} asset(s) failed").into());
    }
    Ok(())
}

fn run_media(
    options: &config::Options,
    args: &MediaArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let selected: Vec<String> = if args.select.is_empty() {
        breakpoints::Breakpoint::CATALOG
            .iter()
            .map(|bp| bp.name().to_string())
            .collect()
    } else {
        args.select.clone()
    };

    // Config overrides first, CLI --size flags on top
    let mut overrides: BTreeMap<String, u32> = options.breakpoints.sizes.clone();
    for pair in &args.sizes {
        let (name, px) = pair
            .split_once('=')
            .ok_or_else(|| format!("invalid --size '{pair}', expected NAME=PX"))?;
        let px: u32 = px
            .parse()
            .map_err(|_| format!("invalid --size '{pair}', expected NAME=PX"))?;
        overrides.insert(name.to_string(), px);
    }

    let conditions = breakpoints::media_conditions_by_name(&selected, &overrides)?;
    output::print_media_output(&conditions);
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores — user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let workers = config::effective_workers(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()
        .ok();
}
