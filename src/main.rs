use anyhow::Result;
use clap::Parser;
use fs_err as fs;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

mod cli;
mod config;
mod errors;
mod export;
mod generate;
mod log;
mod prompt;
mod provider;
mod session;
mod ux;
mod wire;
mod workflow;

use cli::{Command, PlanArgs, PrdArgs};
use config::Config;
use errors::ForgeError;
use generate::GenerationClient;
use session::Session;
use wire::{AppType, ExportFormat, Language, PrdRequest};
use workflow::{PlanWorkflow, PrdWorkflow};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = cli::Args::parse();
    log::init_tracing(args.global.debug);
    config::load_env_file();
    let cfg = Config::load(&args.global)?;

    let generator = open_generator(&cfg);
    if let Err(e) = &generator {
        ux::error(&e.to_string());
    }
    let mut session = Session::open(generator);
    if cfg.save_prompts {
        session = session.with_artifacts(Path::new(&cfg.out_dir));
        info!(session = %session.id(), "saving prompt artifacts");
    }

    let code = match args.command.unwrap_or(Command::Interactive) {
        Command::Prd(a) => run_prd(&mut session, &cfg, a).await?,
        Command::Plan(a) => run_plan(&session, &cfg, a).await?,
        Command::Interactive => run_interactive(&mut session, &cfg).await,
    };
    session.close();
    Ok(code)
}

fn open_generator(cfg: &Config) -> Result<GenerationClient, ForgeError> {
    let key = config::credential(cfg.provider)?;
    let provider = provider::make_provider(cfg, key)
        .map_err(|e| ForgeError::Configuration(format!("{e:#}")))?;
    info!(provider = provider.name(), model = cfg.model_name(), "generation client ready");
    Ok(GenerationClient::new(provider))
}

/// The configuration error itself was shown at startup; later submits only get a short reminder.
fn report(e: &ForgeError) {
    if e.is_warning() {
        return ux::warning(&e.to_string());
    }
    match e {
        ForgeError::Configuration(_) => ux::error("Generation is disabled until the API key is configured."),
        other => ux::error(&other.to_string()),
    }
}

async fn generate_prd(wf: &mut PrdWorkflow, session: &mut Session, req: PrdRequest) -> bool {
    let pb = ux::spinner("Generating PRD... ⏳");
    let result = wf.submit(session, req).await;
    pb.finish_and_clear();
    match result {
        Ok(doc) => {
            ux::show_document("Generated PRD", doc);
            true
        }
        Err(e) => {
            report(&e);
            false
        }
    }
}

async fn generate_plan(wf: &mut PlanWorkflow, session: &Session, language: Language) -> bool {
    let pb = ux::spinner("Generating Implementation Plan... ⏳");
    let result = wf.submit(session, language).await;
    pb.finish_and_clear();
    match result {
        Ok(doc) => {
            ux::show_document("Generated Implementation Plan", doc);
            true
        }
        Err(e) => {
            report(&e);
            false
        }
    }
}

fn export_prd(wf: &mut PrdWorkflow, cfg: &Config, format: ExportFormat) -> bool {
    match wf.export(Path::new(&cfg.out_dir), format) {
        Ok(path) => {
            ux::saved(&format!("PRD ({format})"), &path, format.mime());
            let chars = wf.document().map_or(0, |d| d.text.chars().count());
            info!(stage = ?wf.stage(), chars, path = %path.display(), "prd exported");
            true
        }
        Err(e) => {
            report(&e);
            false
        }
    }
}

fn export_plan(wf: &mut PlanWorkflow, cfg: &Config) -> bool {
    match wf.export(Path::new(&cfg.out_dir)) {
        Ok(path) => {
            ux::saved("Plan (Markdown)", &path, ExportFormat::Markdown.mime());
            let chars = wf.document().map_or(0, |d| d.text.chars().count());
            info!(stage = ?wf.stage(), chars, path = %path.display(), "plan exported");
            true
        }
        Err(e) => {
            report(&e);
            false
        }
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

async fn run_prd(session: &mut Session, cfg: &Config, a: PrdArgs) -> Result<ExitCode> {
    let req = PrdRequest {
        name: a.name,
        description: a.description,
        app_type: a.app_type,
        language: a.language,
    };
    let mut prd = PrdWorkflow::new();
    if !generate_prd(&mut prd, session, req).await {
        return Ok(ExitCode::FAILURE);
    }
    if !a.no_export && !export_prd(&mut prd, cfg, a.format) {
        return Ok(ExitCode::FAILURE);
    }
    if !a.with_plan {
        return Ok(ExitCode::SUCCESS);
    }

    let mut plan = PlanWorkflow::init(session);
    if !generate_plan(&mut plan, session, a.plan_language.unwrap_or(a.language)).await {
        return Ok(ExitCode::FAILURE);
    }
    Ok(exit_code(a.no_export || export_plan(&mut plan, cfg)))
}

async fn run_plan(session: &Session, cfg: &Config, a: PlanArgs) -> Result<ExitCode> {
    let source = match &a.prd_file {
        Some(path) => fs::read_to_string(path)?,
        None if io::stdin().is_terminal() => ux::ask_block("Paste a PRD"),
        None => io::read_to_string(io::stdin())?,
    };
    let mut plan = PlanWorkflow::init(session);
    plan.set_input(source);
    if !generate_plan(&mut plan, session, a.language).await {
        return Ok(ExitCode::FAILURE);
    }
    Ok(exit_code(a.no_export || export_plan(&mut plan, cfg)))
}

async fn run_interactive(session: &mut Session, cfg: &Config) -> ExitCode {
    let mut prd = PrdWorkflow::new();
    loop {
        ux::title("📄 PRD & 🚀 Implementation Plan Generator");
        println!("  1. Generate PRD");
        println!("  2. Generate Implementation Plan");
        println!("  3. Quit");
        match ux::ask("Choose").trim() {
            "1" => prd_step(&mut prd, session, cfg).await,
            "2" => plan_step(session, cfg).await,
            "" | "3" | "q" | "quit" => return ExitCode::SUCCESS,
            other => ux::warning(&format!("Unknown choice '{other}'.")),
        }
    }
}

async fn prd_step(prd: &mut PrdWorkflow, session: &mut Session, cfg: &Config) {
    ux::title("📄 Generate Product Requirements Document (PRD)");
    let name = ux::ask("App Name");
    let description = ux::ask("Describe your app idea");
    let app_type = ux::choose("App Type", &AppType::ALL, 0);
    let language = ux::choose("Output Language", &Language::ALL, 0);
    let format = ux::choose("Export Format", &ExportFormat::ALL, 0);

    let req = PrdRequest { name, description, app_type, language };
    if generate_prd(prd, session, req).await && ux::confirm(&format!("Save PRD as {format}?"), true) {
        export_prd(prd, cfg, format);
    }
}

async fn plan_step(session: &Session, cfg: &Config) {
    ux::title("🚀 Generate Project Implementation Plan");
    let mut plan = PlanWorkflow::init(session);
    if plan.input().is_empty() {
        println!("Paste a PRD below or generate one in step 1.");
        plan.set_input(ux::ask_block("PRD Input"));
    } else {
        println!("Using the PRD generated in step 1 ({} chars).", plan.input().chars().count());
        if !ux::confirm("Keep it?", true) {
            plan.set_input(ux::ask_block("PRD Input"));
        }
    }
    let language = ux::choose("Plan Language", &Language::ALL, 0);

    if generate_plan(&mut plan, session, language).await && ux::confirm("Save plan as Markdown?", true) {
        export_plan(&mut plan, cfg);
    }
}
