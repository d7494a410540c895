//! Quill command-line interface.
//!
//! One-shot commands over the drafting engine: browse templates and the
//! section catalog, preview compiled prompts, run a generation against the
//! hosted service, inspect feasibility estimates, and manage the stored
//! profile.

use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use quill::config;
use quill::countries;
use quill::estimator::{Estimate, Estimator, feasibility_level};
use quill::generation::HttpGenerationClient;
use quill::logging;
use quill::project::{MediaPurpose, PhotoConfig, SurveyConfiguration, VideoConfig};
use quill::sections::{self, SectionKind};
use quill::session::{DesignSession, Severity, SolutionType};
use quill::store::{LocalStore, UserProfile};
use quill::survey::SurveySection;
use quill::templates::{self, SolutionKind};

#[derive(Parser)]
#[command(name = "quill", version, about = "AI-assisted survey drafting companion")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available project templates
    Templates {
        /// Restrict to one arm of the product
        #[arg(long, value_enum)]
        kind: Option<TemplateKindArg>,
    },
    /// List the framework section catalog
    Sections {
        /// Restrict to screener or content sections
        #[arg(long, value_enum)]
        kind: Option<SectionKindArg>,
    },
    /// Show feasibility and cost estimates for a configuration
    Estimate(EstimateArgs),
    /// Compile a prompt and generate a survey draft
    Generate(GenerateArgs),
    /// Show or update the stored user profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TemplateKindArg {
    Explore,
    Test,
}

#[derive(Clone, Copy, ValueEnum)]
enum SectionKindArg {
    Screener,
    Content,
}

#[derive(Clone, Copy, ValueEnum)]
enum PurposeArg {
    Qualitative,
    Quantitative,
}

impl From<PurposeArg> for MediaPurpose {
    fn from(arg: PurposeArg) -> Self {
        match arg {
            PurposeArg::Qualitative => MediaPurpose::Qualitative,
            PurposeArg::Quantitative => MediaPurpose::Quantitative,
        }
    }
}

#[derive(clap::Args)]
struct AudienceArgs {
    /// Sample size (minimum 51)
    #[arg(long)]
    sample: Option<u32>,
    /// Target market code (repeatable), e.g. --market us --market gb
    #[arg(long = "market")]
    markets: Vec<String>,
    /// Estimated incidence rate, 0-100
    #[arg(long)]
    ir: Option<f64>,
    /// Number of photo respondents; enables the photo add-on
    #[arg(long)]
    photos: Option<u32>,
    #[arg(long, value_enum, default_value = "qualitative")]
    photo_purpose: PurposeArg,
    /// Number of video respondents; enables the video add-on
    #[arg(long)]
    videos: Option<u32>,
    #[arg(long, value_enum, default_value = "qualitative")]
    video_purpose: PurposeArg,
}

#[derive(clap::Args)]
struct EstimateArgs {
    #[command(flatten)]
    audience: AudienceArgs,
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Template id (see `quill templates`)
    #[arg(long, conflicts_with = "pulse")]
    template: Option<String>,
    /// Run a pulse survey from a free-text description instead of a template
    #[arg(long)]
    pulse: Option<String>,
    /// Follow-up answer as key=value (repeatable)
    #[arg(long = "answer")]
    answers: Vec<String>,
    /// Deselect a framework section by title (repeatable)
    #[arg(long = "drop-section")]
    drop_sections: Vec<String>,
    /// Add a framework section from the catalog by title (repeatable)
    #[arg(long = "add-section")]
    add_sections: Vec<String>,
    #[command(flatten)]
    audience: AudienceArgs,
    /// Print the compiled prompt and estimates without calling the service
    #[arg(long)]
    dry_run: bool,
    /// Submit the generated survey to the local store afterwards
    #[arg(long)]
    launch: bool,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print the stored profile
    Show,
    /// Store or replace the profile
    Set {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        organisation: String,
        #[arg(long, default_value = "")]
        role: String,
        #[arg(long, default_value = "")]
        industry: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();

    let loaded = config::load_config();
    let config = loaded.config.clone();

    // Logging failures are reported but never fatal.
    let logging_context = match logging::init(&config.logging.level) {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };
    if let Some(ctx) = &logging_context {
        logging::cleanup_old_logs(&ctx.log_directory);
    }

    let result = match cli.command {
        Command::Templates { kind } => run_templates(kind),
        Command::Sections { kind } => run_sections(kind),
        Command::Estimate(args) => run_estimate(&config, &args),
        Command::Generate(args) => run_generate(&config, &args).await,
        Command::Profile { action } => run_profile(&config, action),
    };

    if let Some(ctx) = &logging_context {
        info!(
            session_id = %ctx.session_id,
            duration_secs = start_time.elapsed().as_secs_f64(),
            "session_end"
        );
    }

    result
}

fn run_templates(kind: Option<TemplateKindArg>) -> Result<()> {
    let templates = match kind {
        Some(TemplateKindArg::Explore) => templates::templates_for(SolutionKind::Explore),
        Some(TemplateKindArg::Test) => templates::templates_for(SolutionKind::Test),
        None => templates::all_templates(),
    };
    for template in templates {
        println!(
            "{:<18} [{}] {}",
            template.id,
            template.kind.label(),
            template.title
        );
        println!("{:<18} {}", "", template.description);
        println!(
            "{:<18} sections: {}",
            "",
            template.framework_sections.join(" | ")
        );
    }
    Ok(())
}

fn run_sections(kind: Option<SectionKindArg>) -> Result<()> {
    let catalog = match kind {
        Some(SectionKindArg::Screener) => sections::catalog(SectionKind::Screener),
        Some(SectionKindArg::Content) => sections::catalog(SectionKind::Content),
        None => sections::all_sections(),
    };
    for section in catalog {
        println!("{}", section.title);
        if !section.description.is_empty() {
            println!("    {}", section.description);
        }
    }
    Ok(())
}

fn apply_audience(
    config: &config::Config,
    args: &AudienceArgs,
    configuration: &mut SurveyConfiguration,
) -> Result<()> {
    configuration.set_sample_size(
        args.sample
            .unwrap_or(config.feasibility.default_sample_size),
    );

    let mut selected = Vec::new();
    for code in &args.markets {
        let country = countries::find_by_value(code)
            .with_context(|| format!("Unknown market code '{}'", code))?;
        selected.push(country);
    }
    configuration.selected_countries = selected;

    configuration.set_incidence_rate(args.ir);

    configuration.photo_config = args.photos.map(|num_photos| PhotoConfig {
        purpose: args.photo_purpose.into(),
        num_photos,
        description: String::new(),
    });
    configuration.video_config = args.videos.map(|num_videos| VideoConfig {
        purpose: args.video_purpose.into(),
        num_videos,
        description: String::new(),
    });
    Ok(())
}

fn print_estimate(estimate: &Estimate) {
    println!(
        "Feasibility:   {} ({:.0}/100)",
        feasibility_level(estimate.feasibility_score),
        estimate.feasibility_score
    );
    println!("Tokens:        {}", estimate.estimated_tokens);
    println!("Field time:    {}", estimate.field_time);
    println!("Survey length: {}", estimate.survey_length);
}

fn run_estimate(config: &config::Config, args: &EstimateArgs) -> Result<()> {
    let mut configuration = SurveyConfiguration::default();
    apply_audience(config, &args.audience, &mut configuration)?;

    let estimator = Estimator::new(config.feasibility.harder_access_markets.clone());
    print_estimate(&estimator.estimate(&configuration));
    Ok(())
}

fn parse_answers(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .with_context(|| format!("Invalid --answer '{}', expected key=value", pair))
        })
        .collect()
}

fn print_survey(sections: &[SurveySection], title: &str, introduction: &str) {
    println!("# {}", title);
    println!();
    println!("{}", introduction);
    for section in sections {
        println!();
        println!("## {}", section.section_title);
        if let Some(description) = &section.section_description
            && !description.is_empty()
        {
            println!("{}", description);
        }
        for (i, question) in section.questions.iter().enumerate() {
            println!(
                "{:>3}. [{}] {}",
                i + 1,
                question.question_type.label(),
                question.question_text
            );
            for option in &question.options {
                println!("       - {}", option);
            }
        }
    }
}

fn report_notices(session: &mut DesignSession) {
    for notice in session.take_notices() {
        match notice.severity {
            Severity::Error => eprintln!("error: {}: {}", notice.title, notice.message),
            Severity::Info => eprintln!("{}: {}", notice.title, notice.message),
        }
    }
}

async fn run_generate(config: &config::Config, args: &GenerateArgs) -> Result<()> {
    let estimator = Estimator::new(config.feasibility.harder_access_markets.clone());

    let mut session = match (&args.pulse, &args.template) {
        (Some(_), _) => DesignSession::new(SolutionType::Pulse),
        (None, Some(id)) => {
            let template = templates::find_template(id).with_context(|| {
                let known: Vec<&str> = templates::all_templates().iter().map(|t| t.id).collect();
                format!(
                    "Unknown template '{}'. Known templates: {}",
                    id,
                    known.join(", ")
                )
            })?;
            let solution_type = match template.kind {
                SolutionKind::Explore => SolutionType::Explore,
                SolutionKind::Test => SolutionType::Test,
            };
            let mut session = DesignSession::new(solution_type);
            session.activate_template(Some(template));
            session
        }
        (None, None) => bail!("Either --template or --pulse is required"),
    }
    .with_estimator(estimator)
    .with_default_sample_size(config.feasibility.default_sample_size);

    if let Some(description) = &args.pulse {
        session.set_pulse_description(description);
    }
    for (key, value) in parse_answers(&args.answers)? {
        session.set_answer(&key, &value);
    }
    for title in &args.drop_sections {
        if session.toggle_section(title) {
            bail!("--drop-section '{}' was not part of the framework", title);
        }
    }
    for title in &args.add_sections {
        if !session.toggle_section(title) {
            bail!("--add-section '{}' is already included", title);
        }
    }

    let mut audience = SurveyConfiguration::default();
    apply_audience(config, &args.audience, &mut audience)?;
    session.set_sample_size(audience.sample_size());
    session.set_selected_countries(audience.selected_countries.clone());
    session.set_incidence_rate(audience.estimated_incidence_rate);
    session.set_photo_config(audience.photo_config.clone());
    session.set_video_config(audience.video_config.clone());

    if !session.ready_to_generate() {
        let missing = missing_answers(&session);
        bail!(
            "Missing required follow-up answers: {}. Pass them with --answer key=value.",
            missing.join(", ")
        );
    }

    if args.dry_run {
        let description = session
            .compiled_description()
            .context("Nothing to compile")?;
        println!("{}", description);
        println!();
        print_estimate(&session.estimate());
        return Ok(());
    }

    let client = HttpGenerationClient::new(config.api.endpoint.clone(), config.api.api_key.clone());
    let generated = session.generate(&client, Some(&client)).await;
    report_notices(&mut session);

    if !generated {
        bail!("Survey generation did not produce a usable draft");
    }

    print_survey(
        session.survey_sections(),
        session.survey_title(),
        session.survey_introduction(),
    );
    println!();
    if let Some(ir) = session.configuration().estimated_incidence_rate {
        println!("Estimated IR:  {:.0}%", ir);
    }
    print_estimate(&session.estimate());

    if args.launch {
        let store = LocalStore::open(&config.database_path())?;
        let profile = store.load_profile()?;
        if profile.is_none() {
            eprintln!("note: no stored profile; run `quill profile set` to attach one");
        }
        if let Some(id) = session.launch(&store, profile) {
            println!("Submitted as #{id}");
        }
        report_notices(&mut session);
    }

    Ok(())
}

/// Required follow-up questions that are visible but unanswered.
fn missing_answers(session: &DesignSession) -> Vec<String> {
    let Some(template) = session.active_template() else {
        return vec!["description".to_string()];
    };
    let answers = session.follow_up_answers();
    template
        .follow_up_questions
        .iter()
        .filter(|q| {
            q.required
                && q.is_visible(answers)
                && answers
                    .get(q.id)
                    .map(|a| a.trim().is_empty())
                    .unwrap_or(true)
        })
        .map(|q| q.id.to_string())
        .collect()
}

fn run_profile(config: &config::Config, action: ProfileAction) -> Result<()> {
    let store = LocalStore::open(&config.database_path())?;
    match action {
        ProfileAction::Show => match store.load_profile()? {
            Some(profile) => {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            }
            None => println!("No profile stored yet. Use `quill profile set`."),
        },
        ProfileAction::Set {
            name,
            email,
            organisation,
            role,
            industry,
        } => {
            let profile = UserProfile {
                name,
                email,
                organisation,
                role,
                custom_role: None,
                industry,
                custom_industry: None,
            };
            store.save_profile(&profile)?;
            println!("Profile saved.");
        }
    }
    Ok(())
}
