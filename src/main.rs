// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Command-line interface for the ghstat binary.
//!
//! The CLI fetches statistics and language distributions for GitHub users,
//! prints them as JSON, and renders SVG cards either for a single login or
//! for every target of a YAML render plan.

use std::{
    io,
    path::{Path, PathBuf},
    process,
};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use ghstat::{
    ChartGeometry, ChartOptions, ClientConfig, Error, ErrorResult, GithubSource, LanguageEntry,
    Palette, PolicyKind, RenderPlan, RenderTarget, RepositorySource, chart_geometry, embed_snippet,
    fetch_languages, fetch_report, fetch_stats, load_plan, update_readme, write_assets,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command line interface for GitHub statistics cards.
#[derive(Debug, Parser,)]
#[command(name = "ghstat", version, about = "Render GitHub stat cards and language charts")]
struct Cli
{
    #[command(flatten)]
    client: ClientArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args,)]
struct ClientArgs
{
    /// GitHub token used for API requests.
    #[arg(long = "token", env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String,>,

    /// GitHub API base URL, e.g. for GitHub Enterprise.
    #[arg(long = "api-base", env = "GITHUB_API_URL", value_name = "URL", global = true)]
    api_base: Option<String,>,
}

impl ClientArgs
{
    fn client_config(&self,) -> ClientConfig
    {
        ClientConfig {
            token:    self.token.clone(),
            base_uri: self.api_base.clone(),
        }
    }
}

#[derive(Debug, Subcommand,)]
enum Command
{
    /// Print profile counters and star total as JSON.
    Stats(StatsArgs,),
    /// Print the language distribution and chart slices as JSON.
    Languages(LanguagesArgs,),
    /// Render the stat card, language chart and manifest for one user.
    Card(CardArgs,),
    /// Normalize a render plan and print it as JSON.
    Plan(PlanArgs,),
    /// Render every target of a plan.
    Render(RenderArgs,),
    /// Print or splice the README table embedding rendered images.
    Embed(EmbedArgs,),
}

#[derive(Debug, Args,)]
struct StatsArgs
{
    /// GitHub login.
    #[arg(long = "user", value_name = "LOGIN")]
    user: String,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct LanguagesArgs
{
    /// GitHub login.
    #[arg(long = "user", value_name = "LOGIN")]
    user: String,

    #[command(flatten)]
    chart: ChartArgs,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args, Default,)]
struct ChartArgs
{
    /// Bucketing rule for the chart.
    #[arg(long = "policy", value_enum)]
    policy: Option<PolicyArg,>,

    /// Languages kept by the top-n policy.
    #[arg(long = "limit", value_name = "N")]
    limit: Option<usize,>,

    /// Share threshold in percent used by the min-share policy.
    #[arg(long = "percent", value_name = "P")]
    percent: Option<f64,>,

    /// Slice palette.
    #[arg(long = "palette", value_enum)]
    palette: Option<PaletteArg,>,
}

impl ChartArgs
{
    fn options(&self,) -> ChartOptions
    {
        ChartOptions {
            policy:  self.policy.map(|policy| match policy {
                PolicyArg::TopN => PolicyKind::TopN,
                PolicyArg::MinShare => PolicyKind::MinShare,
            },),
            limit:   self.limit,
            percent: self.percent,
            palette: self.palette.map(|palette| match palette {
                PaletteArg::Vivid => Palette::Vivid,
                PaletteArg::Classic => Palette::Classic,
            },),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum,)]
enum PolicyArg
{
    TopN,
    MinShare,
}

#[derive(Debug, Clone, Copy, ValueEnum,)]
enum PaletteArg
{
    Vivid,
    Classic,
}

#[derive(Debug, Args,)]
struct CardArgs
{
    /// GitHub login.
    #[arg(long = "user", value_name = "LOGIN")]
    user: String,

    #[command(flatten)]
    chart: ChartArgs,

    /// Directory that will receive the SVG and manifest artifacts.
    #[arg(long = "output", value_name = "DIR", default_value = "stats")]
    output: PathBuf,
}

#[derive(Debug, Args,)]
struct PlanArgs
{
    /// Path to the YAML render plan.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool,
}

#[derive(Debug, Args,)]
struct RenderArgs
{
    /// Path to the YAML render plan.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,

    /// Directory that will receive the SVG and manifest artifacts.
    #[arg(long = "output", value_name = "DIR", default_value = "stats")]
    output: PathBuf,
}

#[derive(Debug, Args,)]
struct EmbedArgs
{
    /// Path to the YAML render plan.
    #[arg(long = "config", value_name = "PATH")]
    config: PathBuf,

    /// URL the rendered images are published under.
    #[arg(long = "base-url", value_name = "URL")]
    base_url: String,

    /// README to update in place instead of printing the table.
    #[arg(long = "readme", value_name = "PATH")]
    readme: Option<PathBuf,>,
}

#[derive(Debug, Serialize,)]
struct LanguagesOutput<'a,>
{
    login:    &'a str,
    entries:  &'a [LanguageEntry],
    geometry: &'a ChartGeometry,
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main()
{
    init_tracing();

    if let Err(error,) = run().await {
        eprintln!("{}", error.to_display_string());
        process::exit(1,);
    }
}

fn init_tracing()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),);
    tracing_subscriber::fmt().with_env_filter(filter,).with_writer(io::stderr,).init();
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates configuration, upstream and output errors.
async fn run() -> Result<(), Error,>
{
    let cli = Cli::parse();

    match cli.command {
        Command::Plan(args,) => run_plan(&args,),
        Command::Embed(args,) => run_embed(&args,),
        command => {
            let source = GithubSource::new(&cli.client.client_config(),)?;
            match command {
                Command::Stats(args,) => run_stats(&source, &args,).await,
                Command::Languages(args,) => run_languages(&source, &args,).await,
                Command::Card(args,) => run_card(&source, &args,).await,
                Command::Render(args,) => run_render(&source, &args,).await,
                Command::Plan(_,) | Command::Embed(_,) => Ok((),),
            }
        }
    }
}

async fn run_stats<S,>(source: &S, args: &StatsArgs,) -> Result<(), Error,>
where
    S: RepositorySource + ?Sized,
{
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match fetch_stats(source, &args.user,).await {
        Ok(summary,) => write_json(&mut handle, &summary, args.pretty,),
        Err(error,) => {
            write_json(&mut handle, &ErrorResult::from(&error,), args.pretty,)?;
            Err(error,)
        }
    }
}

async fn run_languages<S,>(source: &S, args: &LanguagesArgs,) -> Result<(), Error,>
where
    S: RepositorySource + ?Sized,
{
    let options = args.chart.options();
    let policy = options.policy()?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match fetch_languages(source, &args.user,).await {
        Ok(entries,) => {
            let geometry = chart_geometry(&entries, policy, options.palette(),);
            let output = LanguagesOutput {
                login:    args.user.trim(),
                entries:  &entries,
                geometry: &geometry,
            };
            write_json(&mut handle, &output, args.pretty,)
        }
        Err(error,) => {
            write_json(&mut handle, &ErrorResult::from(&error,), args.pretty,)?;
            Err(error,)
        }
    }
}

async fn run_card<S,>(source: &S, args: &CardArgs,) -> Result<(), Error,>
where
    S: RepositorySource + ?Sized,
{
    let mut target = RenderTarget::for_login(&args.user,)?;
    let options = args.chart.options();
    target.policy = options.policy()?;
    target.palette = options.palette();

    render_target(source, &target, &args.output,).await
}

fn run_plan(args: &PlanArgs,) -> Result<(), Error,>
{
    let plan = load_plan(&args.config,)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, &plan, args.pretty,)
}

async fn run_render<S,>(source: &S, args: &RenderArgs,) -> Result<(), Error,>
where
    S: RepositorySource + ?Sized,
{
    let plan = load_plan(&args.config,)?;
    render_plan(source, &plan, &args.output,).await
}

fn run_embed(args: &EmbedArgs,) -> Result<(), Error,>
{
    let plan = load_plan(&args.config,)?;

    match args.readme.as_deref() {
        Some(readme,) => {
            update_readme(readme, &plan, &args.base_url,)?;
            Ok((),)
        }
        None => {
            let snippet = embed_snippet(&plan, &args.base_url,)?;
            println!("{snippet}");
            Ok((),)
        }
    }
}

async fn render_plan<S,>(source: &S, plan: &RenderPlan, output: &Path,) -> Result<(), Error,>
where
    S: RepositorySource + ?Sized,
{
    let total = plan.targets.len() as u64;
    let pb = ProgressBar::new(total,);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}",)
            .unwrap_or_else(|_| ProgressStyle::default_bar(),),
    );

    for target in &plan.targets {
        pb.set_message(format!("Rendering {}...", target.login),);
        render_target(source, target, output,).await?;
        pb.inc(1,);
    }

    pb.finish_with_message(format!("Rendered {total} targets into {}", output.display()),);
    Ok((),)
}

async fn render_target<S,>(source: &S, target: &RenderTarget, output: &Path,) -> Result<(), Error,>
where
    S: RepositorySource + ?Sized,
{
    let report = fetch_report(source, &target.login, target.policy, target.palette,).await;
    let assets = write_assets(target, &report, output,)?;

    if assets.has_failures() {
        warn!("Wrote error cards for {}", target.login);
    }
    info!("Manifest for {} written to {}", target.login, assets.manifest_path.display());
    Ok((),)
}

fn write_json<W, T,>(writer: &mut W, value: &T, pretty: bool,) -> Result<(), Error,>
where
    W: io::Write,
    T: Serialize + ?Sized,
{
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value,)?;
    } else {
        serde_json::to_writer(&mut *writer, value,)?;
    }
    writeln!(writer).map_err(|source| ghstat::asset_io_error(Path::new("<stdout>",), source,),)
}
