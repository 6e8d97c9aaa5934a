use crate::{
    config::Config,
    export,
    model::{JobData, MasterData},
    paginate::{ResultStats, TablePlan},
    store::FileStore,
    tags::{TagProcessor, VOCABULARY},
    template::Template,
    util::{ensure_dir, now_rfc3339, sha256_hex},
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "lux-report")]
#[command(about = "Printable light-measurement report generator (tag templates + paginated tables + print CSS)")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./lux-report.toml if present,
    /// built-in defaults otherwise.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lint a template against the tag vocabulary.
    Check {
        #[arg(long)]
        template: PathBuf,
    },
    /// Print the resolved tag map for a job as JSON.
    Tags {
        #[arg(long, conflicts_with = "job_file")]
        job_id: Option<String>,
        /// Read the job record from a local JSON file instead of the store.
        #[arg(long)]
        job_file: Option<PathBuf>,
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Print the pagination plan and result stats for a job as JSON.
    Plan {
        #[arg(long)]
        job_id: String,
        #[arg(long)]
        page_size: Option<usize>,
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Render the full document. Without a job the output is a draft.
    Render {
        #[arg(long)]
        template: PathBuf,
        #[arg(long, conflicts_with = "job_file")]
        job_id: Option<String>,
        #[arg(long)]
        job_file: Option<PathBuf>,
        #[arg(long)]
        store: Option<PathBuf>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    match &args.cmd {
        Command::Check { template } => {
            let log_path = resolve_log_path(&cfg, None);
            let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
            check(&cfg, template)
        }
        Command::Tags {
            job_id,
            job_file,
            store,
        } => {
            let log_path = resolve_log_path(&cfg, None);
            let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
            tags(&cfg, job_id.as_deref(), job_file.as_deref(), store.as_deref())
        }
        Command::Plan {
            job_id,
            page_size,
            store,
        } => {
            let log_path = resolve_log_path(&cfg, None);
            let _guard = init_logging(&args, &cfg, log_path.as_deref())?;
            plan(&cfg, job_id, *page_size, store.as_deref())
        }
        Command::Render {
            template,
            job_id,
            job_file,
            store,
            out_dir,
        } => render(
            &args,
            &cfg,
            template,
            job_id.as_deref(),
            job_file.as_deref(),
            store.as_deref(),
            out_dir.as_deref(),
        ),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("lux-report.toml");
    if default.exists() { Some(default) } else { None }
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

/// Lints a template against the tag vocabulary without touching the store.
fn check(cfg: &Config, template_path: &Path) -> Result<()> {
    validate_template(cfg, template_path)?;
    let text = load_template(cfg, template_path)?;
    let template = Template::parse(&text)?;
    let (known, unknown): (Vec<String>, Vec<String>) = template
        .tag_names()
        .into_iter()
        .partition(|name| VOCABULARY.contains(&name.as_str()));

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "template": template_path,
            "known": known,
            "unknown": unknown,
            "ok": unknown.is_empty(),
        }))?
    );
    Ok(())
}

fn tags(
    cfg: &Config,
    job_id: Option<&str>,
    job_file: Option<&Path>,
    store: Option<&Path>,
) -> Result<()> {
    let (job, id, master) = load_job_source(cfg, store, job_id, job_file)?
        .ok_or_else(|| anyhow!("one of --job-id or --job-file is required"))?;
    let processor = TagProcessor::new(cfg, &master)?;
    let map = processor.tag_map(&job, &id);
    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}

fn plan(cfg: &Config, job_id: &str, page_size: Option<usize>, store: Option<&Path>) -> Result<()> {
    let store = FileStore::open(&store_root(cfg, store))?;
    let job = store
        .job(job_id)?
        .ok_or_else(|| anyhow!("job not found: {job_id}"))?;

    let page_size = page_size.unwrap_or(cfg.table.items_per_page);
    let plan = TablePlan::new(job.results.len(), page_size);
    let stats = ResultStats::collect(&job.results, &cfg.strings.pass_word);

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "job_id": job_id,
            "plan": plan,
            "stats": stats,
        }))?
    );
    Ok(())
}

fn render(
    args: &Args,
    cfg: &Config,
    template_path: &Path,
    job_id: Option<&str>,
    job_file: Option<&Path>,
    store: Option<&Path>,
    out_override: Option<&Path>,
) -> Result<()> {
    validate_template(cfg, template_path)?;

    let out_root = out_override
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.output.out_dir));
    ensure_dir(&out_root)?;

    let log_path = resolve_log_path(cfg, Some(&out_root));
    let _guard = init_logging(args, cfg, log_path.as_deref())?;

    // Without a job the document renders as a draft: tags stay literal.
    let (job, resolved_id, master) = match load_job_source(cfg, store, job_id, job_file)? {
        Some((job, id, master)) => (Some(job), Some(id), master),
        None => (None, None, MasterData::default()),
    };
    let job_id = resolved_id.as_deref();

    info!(
        "render template={} job={} out={}",
        template_path.display(),
        job_id.unwrap_or("(draft)"),
        out_root.display()
    );

    if cfg.debug.dump_effective_config {
        let raw = toml::to_string(cfg).unwrap_or_default();
        let path = out_root.join("effective-config.toml");
        std::fs::write(&path, raw)
            .with_context(|| format!("writing effective config: {}", path.display()))?;
    }

    let started = now_rfc3339();
    let text = load_template(cfg, template_path)?;

    let processor = TagProcessor::new(cfg, &master)?;
    let content = processor.process(&text, job.as_ref(), job_id)?;
    let content = crate::assemble::highlight_keywords(cfg, &content)?;
    let document = crate::assemble::assemble(cfg, &content, job_id);

    let today = crate::util::now_with_offset(cfg.locale.utc_offset_hours)?.date();
    let doc_name = export::export_filename(&cfg.strings.document_label, job_id, today, "html");
    let doc_path = out_root.join(&doc_name);

    let mut exported = None;
    if cfg.output.write_document {
        std::fs::write(&doc_path, &document)
            .with_context(|| format!("writing document: {}", doc_path.display()))?;
        info!("wrote {}", doc_path.display());
        exported = export::export_document(cfg, &doc_path)?;
        if let Some(path) = &exported {
            info!("exported {}", path.display());
        }
    } else if cfg.export.mode != "none" {
        warn!("export skipped: output.write_document=false");
    }

    let digest = sha256_hex(document.as_bytes());
    let stats = job
        .as_ref()
        .map(|j| ResultStats::collect(&j.results, &cfg.strings.pass_word));
    let table_plan = job
        .as_ref()
        .map(|j| TablePlan::new(j.results.len(), cfg.table.items_per_page));

    if cfg.output.write_report_json {
        let report_path = doc_path.with_extension("report.json");
        let report = serde_json::json!({
            "job_id": job_id,
            "document": doc_name,
            "out_dir": out_root,
            "sha256": digest,
            "bytes": document.len(),
            "started": started,
            "finished": now_rfc3339(),
            "stats": stats,
            "plan": table_plan,
            "exported": exported,
        });
        std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing report: {}", report_path.display()))?;
    }

    if cfg.output.print_summary {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "job_id": job_id,
                "document": doc_path,
                "sha256": digest,
                "stats": stats,
                "status": "ok",
            }))?
        );
    }

    Ok(())
}

fn store_root(cfg: &Config, flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&cfg.store.root))
}

/// Resolves the job record from the store or a local JSON file. `None` means
/// neither source was named (the render draft path).
fn load_job_source(
    cfg: &Config,
    store: Option<&Path>,
    job_id: Option<&str>,
    job_file: Option<&Path>,
) -> Result<Option<(JobData, String, MasterData)>> {
    let root = store_root(cfg, store);
    match (job_id, job_file) {
        (Some(id), _) => {
            let store = FileStore::open(&root)?;
            let job = store
                .job(id)?
                .ok_or_else(|| anyhow!("job not found: {id}"))?;
            let master = store.master_data()?;
            Ok(Some((job, id.to_string(), master)))
        }
        (None, Some(path)) => {
            let path_str = path.display().to_string();
            if cfg.security.reject_url_inputs && looks_like_url(&path_str) {
                return Err(anyhow!("URL inputs are disabled: {path_str}"));
            }
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading job file: {}", path.display()))?;
            let job: JobData = serde_json::from_str(&raw)
                .with_context(|| format!("decoding job file: {}", path.display()))?;
            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .ok_or_else(|| anyhow!("job file has no usable name: {}", path.display()))?;
            // Master data still comes from the store when one is present.
            let master = if root.is_dir() {
                FileStore::open(&root)?.master_data()?
            } else {
                MasterData::default()
            };
            Ok(Some((job, id, master)))
        }
        (None, None) => Ok(None),
    }
}

fn load_template(cfg: &Config, path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading template: {}", path.display()))?;
    if cfg.assemble.normalize_unicode {
        Ok(crate::util::nfc(&raw))
    } else {
        Ok(raw)
    }
}

fn validate_template(cfg: &Config, input: &Path) -> Result<()> {
    let input_str = input.display().to_string();

    if cfg.security.reject_url_inputs && looks_like_url(&input_str) {
        return Err(anyhow!("URL inputs are disabled: {input_str}"));
    }

    if !input.exists() {
        return Err(anyhow!("template does not exist: {}", input.display()));
    }

    if let Some(ext) = input.extension().and_then(|s| s.to_str()) {
        let ext = ext.to_ascii_lowercase();
        if ext != "html" && ext != "htm" {
            return Err(anyhow!("template is not HTML: {}", input.display()));
        }
    } else {
        warn!(
            "template has no extension; assuming HTML: {}",
            input.display()
        );
    }

    Ok(())
}

fn looks_like_url(s: &str) -> bool {
    let s = s.to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("file://")
}

fn resolve_log_path(cfg: &Config, out_dir: Option<&Path>) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    if let Some(out_dir) = out_dir {
        return Some(out_dir.join("logs").join("lux-report.log"));
    }

    Some(PathBuf::from(&cfg.output.out_dir).join("lux-report.log"))
}
