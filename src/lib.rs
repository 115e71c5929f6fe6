//! # nutri-ai
//!
//! AI nutrition assistant — photograph a meal for a calorie and macro estimate,
//! photograph your fridge for recipe ideas, or describe a goal for a weekly
//! meal plan. All nutrition knowledge comes from Google Gemini through
//! schema-constrained JSON output; this crate encodes the image, builds the
//! request with its response schema, and decodes the answer into typed values.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nutri_ai::config::Config;
//! use nutri_ai::encoder::encode_file;
//! use nutri_ai::service::NutritionService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // API key from GEMINI_API_KEY or config.json
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!     let service = NutritionService::new(config.build_gateway()?);
//!
//!     let meal = encode_file("lunch.jpg".as_ref())?;
//!     let analysis = service.analyze_food_image(&meal).await?;
//!     println!("{}: {} kcal, score {}/10", analysis.food_name, analysis.calories, analysis.health_score);
//!
//!     let pantry = encode_file("fridge.jpg".as_ref())?;
//!     for recipe in service.suggest_recipes(&pantry).await? {
//!         println!("{} ({}, {} min)", recipe.title, recipe.difficulty, recipe.time_minutes);
//!     }
//!
//!     let plan = service.generate_meal_plan("Perder peso", None).await?;
//!     for day in &plan.plan {
//!         println!("{}: {}", day.day, day.lunch);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Every operation returns `anyhow::Result`. Gateway failures (network, auth,
//! quota) come back untouched. Parse failures carry an [`ai::ParseError`]:
//!
//! | Variant | Cause |
//! |---|---|
//! | `MissingResponse` | the model returned no text |
//! | `Malformed` | the text is not JSON |
//! | `ShapeMismatch` | the JSON does not fit the expected type |
//!
//! The number of recipes and of plan days is not checked.
//!
//! ## Modules
//!
//! - [`ai`] — gateway trait, Gemini backend, prompts and schemas, response parsing
//! - [`config`] — configuration loading/saving and API key resolution
//! - [`encoder`] — image file → base64 payload and media type
//! - [`models`] — result types
//! - [`service`] — the three operations

pub mod ai;
pub mod config;
pub mod encoder;
pub mod models;
pub mod service;
