use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nutri_ai::models::{MealPlanResponse, NutritionAnalysis, Recipe};
use nutri_ai::service::NutritionService;
use nutri_ai::{config, encoder};

#[derive(Parser, Debug)]
#[command(
    name = "nutri-ai",
    version,
    about = "AI nutrition assistant — analyze meal photos, get recipes from your pantry, plan your week"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate calories, macros and a health score from a meal photo
    Scan {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },
    /// Suggest recipes from a photo of your fridge or pantry
    Chef {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
    },
    /// Generate a Monday–Sunday meal plan
    Plan {
        /// Main goal (e.g. "Perder peso", "Ganar músculo")
        #[arg(short, long)]
        goal: String,
        /// Dietary restrictions or preferences (default: Ninguna)
        #[arg(short, long)]
        restrictions: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    let Some(command) = cli.command else {
        anyhow::bail!("No command specified. Use --help for usage.");
    };

    let config = config::Config::load(cli.config.as_deref())?;
    let json = cli.json || config.output.json;
    let service = NutritionService::new(config.build_gateway()?);
    log::debug!("Using model {}", service.gateway().model());

    match command {
        Command::Scan { image } => {
            let outcome: Result<NutritionAnalysis> = async {
                let encoded = encoder::encode_file(&image)?;
                service.analyze_food_image(&encoded).await
            }
            .await;
            let analysis = report(outcome, "Error al analizar la imagen. Inténtalo de nuevo.")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis(&analysis);
            }
        }
        Command::Chef { image } => {
            let outcome: Result<Vec<Recipe>> = async {
                let encoded = encoder::encode_file(&image)?;
                service.suggest_recipes(&encoded).await
            }
            .await;
            let recipes = report(
                outcome,
                "Error al generar recetas. Intenta con una imagen más clara.",
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&recipes)?);
            } else {
                print_recipes(&recipes);
            }
        }
        Command::Plan { goal, restrictions } => {
            let outcome = service
                .generate_meal_plan(&goal, restrictions.as_deref())
                .await;
            let plan = report(outcome, "Error al generar el plan. Por favor intenta de nuevo.")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print_plan(&plan);
            }
        }
    }

    Ok(())
}

/// Log the detailed cause and replace it with the user-facing message.
fn report<T>(outcome: Result<T>, message: &str) -> Result<T> {
    outcome.map_err(|e| {
        log::error!("{e:#}");
        anyhow::anyhow!("{message}")
    })
}

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Max width for the value column before wrapping.
const VAL_WIDTH: usize = 52;
/// Indent for continuation lines (label column width + " : "), printed after
/// the same 2 leading spaces as the first line.
const INDENT: &str = "                 ";

fn score_color(score: f64) -> &'static str {
    if score >= 7.0 {
        GREEN
    } else if score >= 4.0 {
        YELLOW
    } else {
        RED
    }
}

fn print_analysis(analysis: &NutritionAnalysis) {
    println!();
    println!(
        "{BOLD}{}{RESET}  {}Salud: {}/10{RESET}",
        analysis.food_name,
        score_color(analysis.health_score),
        analysis.health_score
    );
    println!("  {DIM}{}{RESET}", "─".repeat(70));
    print_row("Calorías", &format!("{} kcal", analysis.calories));

    let total = analysis.macro_grams();
    for m in analysis.macro_breakdown() {
        let share = if total > 0.0 { m.value / total * 100.0 } else { 0.0 };
        print_row(m.name, &format!("{} {} ({share:.0}%)", m.value, m.unit));
    }

    println!("  {DIM}{}{RESET}", "─".repeat(70));
    print_row("Resumen", &analysis.summary);
    print_row("Consejo", &format!("\"{}\"", analysis.advice));
    println!();
}

fn print_recipes(recipes: &[Recipe]) {
    if recipes.is_empty() {
        println!("  {DIM}(no recipes returned){RESET}");
        return;
    }

    for recipe in recipes {
        println!();
        println!("{BOLD}{}{RESET}", recipe.title);
        println!("  {DIM}{}{RESET}", "─".repeat(70));
        print_row("Dificultad", recipe.difficulty.as_str());
        print_row("Tiempo", &format!("{} min", recipe.time_minutes));
        print_row("Calorías", &format!("{} kcal", recipe.calories));
        print_row("Ingredientes", &recipe.ingredients.join(", "));
        for (i, step) in recipe.instructions.iter().enumerate() {
            let label = if i == 0 { "Pasos" } else { "" };
            print_row(label, &format!("{}. {step}", i + 1));
        }
    }
    println!();
}

fn print_plan(plan: &MealPlanResponse) {
    println!();
    println!("{BOLD}Plan generado{RESET}");
    print_row("Objetivo", &plan.weekly_goal);
    if !plan.is_complete() {
        println!("  {YELLOW}(plan has {} day(s) instead of 7){RESET}", plan.plan.len());
    }

    for day in &plan.plan {
        println!();
        println!("  {BOLD}{}{RESET}", day.day);
        println!("  {DIM}{}{RESET}", "─".repeat(70));
        print_row("Desayuno", &day.breakfast);
        print_row("Almuerzo", &day.lunch);
        print_row("Cena", &day.dinner);
        print_row("Snack", &day.snack);
    }
    println!();
}

/// Print a single labeled row, wrapping long values.
fn print_row(label: &str, val: &str) {
    let label_col = format!("{:<14}", label);
    let lines = wrap_text(val, VAL_WIDTH);
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            println!("  {label_col} : {line}");
        } else {
            println!("  {INDENT}{line}");
        }
    }
}

/// Wrap text at word boundaries to fit within max_width.
fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in s.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.chars().count() + 1 + word.chars().count() <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(s.to_string());
    }

    lines
}
