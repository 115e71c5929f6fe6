use anyhow::Result;
use serde::de::DeserializeOwned;

use crate::ai::{AiGateway, GenerationRequest, parse_structured, prompts};
use crate::encoder::EncodedImage;
use crate::models::{MealPlanResponse, NutritionAnalysis, Recipe};

/// Errors raised before any request is sent.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("A goal is required to generate a meal plan")]
    EmptyGoal,
}

/// The three nutrition operations over one explicitly owned gateway.
///
/// Each call is a single request → response → parse round trip. Gateway
/// errors are returned as-is; parse failures surface as
/// [`crate::ai::ParseError`] inside the `anyhow::Error`.
///
/// # Example
///
/// ```rust,no_run
/// use nutri_ai::ai::GeminiGateway;
/// use nutri_ai::encoder::encode_file;
/// use nutri_ai::service::NutritionService;
///
/// # async fn example() -> anyhow::Result<()> {
/// let service = NutritionService::new(GeminiGateway::new("key".into(), "gemini-2.5-flash".into()));
/// let image = encode_file("lunch.jpg".as_ref())?;
/// let analysis = service.analyze_food_image(&image).await?;
/// println!("{}: {} kcal", analysis.food_name, analysis.calories);
/// # Ok(())
/// # }
/// ```
pub struct NutritionService<G> {
    gateway: G,
}

impl<G: AiGateway> NutritionService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Estimate calories, macros and a health score for a meal photo.
    pub async fn analyze_food_image(&self, image: &EncodedImage) -> Result<NutritionAnalysis> {
        log::info!("Analyzing meal photo ({})", image.mime_type);
        self.generate_structured(&prompts::analyze_request(image), "nutrition analysis")
            .await
    }

    /// Suggest recipes from a photo of ingredients.
    ///
    /// Three are requested, but whatever count the model returns is kept.
    pub async fn suggest_recipes(&self, image: &EncodedImage) -> Result<Vec<Recipe>> {
        log::info!("Suggesting recipes from ingredients photo ({})", image.mime_type);
        let recipes: Vec<Recipe> = self
            .generate_structured(&prompts::recipes_request(image), "recipe list")
            .await?;
        if recipes.len() != 3 {
            log::debug!("Model returned {} recipes instead of 3", recipes.len());
        }
        Ok(recipes)
    }

    /// Weekly plan for a goal. Blank `restrictions` becomes "Ninguna".
    pub async fn generate_meal_plan(
        &self,
        goal: &str,
        restrictions: Option<&str>,
    ) -> Result<MealPlanResponse> {
        if goal.trim().is_empty() {
            return Err(ServiceError::EmptyGoal.into());
        }
        log::info!("Generating weekly meal plan for goal: {}", goal.trim());
        let plan: MealPlanResponse = self
            .generate_structured(&prompts::meal_plan_request(goal, restrictions), "meal plan")
            .await?;
        if !plan.is_complete() {
            log::debug!("Meal plan has {} day(s)", plan.plan.len());
        }
        Ok(plan)
    }

    /// Send any structured-generation request and decode the answer as `T`.
    pub async fn generate_structured<T: DeserializeOwned>(
        &self,
        request: &GenerationRequest,
        expected: &'static str,
    ) -> Result<T> {
        let text = self.gateway.generate(request).await?;
        Ok(parse_structured(text.as_deref(), expected)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ParseError, Part};
    use crate::models::{Difficulty, WEEKDAYS};
    use std::sync::Mutex;

    /// Returns a canned reply and records every request it sees.
    struct MockGateway {
        reply: Mutex<Option<Result<Option<String>>>>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl MockGateway {
        fn replying(text: &str) -> Self {
            Self::with(Ok(Some(text.to_string())))
        }

        fn with(reply: Result<Option<String>>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last_request(&self) -> GenerationRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl AiGateway for MockGateway {
        fn name(&self) -> &str {
            "Mock"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.lock().unwrap().take().unwrap_or(Ok(None))
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset by peer")]
    struct NetworkError;

    fn image() -> EncodedImage {
        EncodedImage { data: "/9j/4AAQ".into(), mime_type: "image/jpeg".into() }
    }

    fn parse_error(err: &anyhow::Error) -> &ParseError {
        err.downcast_ref::<ParseError>().expect("parse error")
    }

    // ── analyze_food_image ───────────────────────────────────────────

    #[tokio::test]
    async fn analyze_grilled_chicken_salad() {
        let service = NutritionService::new(MockGateway::replying(
            r#"{"foodName":"Ensalada de pollo a la parrilla","calories":380,"protein":34,
                "carbs":14,"fat":19,"healthScore":9,"summary":"Pollo con verduras",
                "advice":"Añade legumbres para más fibra"}"#,
        ));

        let analysis = service.analyze_food_image(&image()).await.unwrap();
        assert!(!analysis.food_name.is_empty());
        assert!(analysis.calories > 0.0);
        assert!((1.0..=10.0).contains(&analysis.health_score));

        let req = service.gateway().last_request();
        assert!(matches!(&req.parts[0], Part::InlineData { data, .. } if data == "/9j/4AAQ"));
        assert_eq!(req.response_schema, prompts::nutrition_schema());
    }

    // ── suggest_recipes ──────────────────────────────────────────────

    #[tokio::test]
    async fn recipes_from_eggs_tomatoes_onions() {
        let service = NutritionService::new(MockGateway::replying(
            r#"[
              {"title":"Shakshuka","difficulty":"Media","timeMinutes":25,"calories":320,
               "ingredients":["huevos","tomates","cebolla"],"instructions":["Sofreír","Añadir huevos"]},
              {"title":"Tortilla de cebolla","difficulty":"Fácil","timeMinutes":15,"calories":280,
               "ingredients":["huevos","cebolla"],"instructions":["Pochar","Cuajar"]},
              {"title":"Tomates rellenos","difficulty":"Difícil","timeMinutes":45,"calories":250,
               "ingredients":["tomates","huevos"],"instructions":["Vaciar","Rellenar","Hornear"]}
            ]"#,
        ));

        let recipes = service.suggest_recipes(&image()).await.unwrap();
        assert_eq!(recipes.len(), 3);
        for recipe in &recipes {
            assert!(!recipe.title.is_empty());
            assert!(Difficulty::WIRE_VALUES.contains(&recipe.difficulty.as_str()));
            assert!(!recipe.ingredients.is_empty());
            assert!(!recipe.instructions.is_empty());
        }
        assert_eq!(recipes[2].instructions, ["Vaciar", "Rellenar", "Hornear"]);
    }

    #[tokio::test]
    async fn recipe_count_is_not_enforced() {
        let service = NutritionService::new(MockGateway::replying(
            r#"[{"title":"Huevo frito","difficulty":"Fácil","timeMinutes":5,"calories":90,
                "ingredients":["huevo"],"instructions":["Freír"]}]"#,
        ));
        assert_eq!(service.suggest_recipes(&image()).await.unwrap().len(), 1);
    }

    // ── generate_meal_plan ───────────────────────────────────────────

    #[tokio::test]
    async fn meal_plan_defaults_restrictions() {
        let days: Vec<String> = WEEKDAYS
            .iter()
            .map(|d| {
                format!(
                    r#"{{"day":"{d}","breakfast":"Avena","lunch":"Ensalada","dinner":"Pescado","snack":"Fruta"}}"#
                )
            })
            .collect();
        let reply = format!(r#"{{"weeklyGoal":"Déficit calórico suave","plan":[{}]}}"#, days.join(","));
        let service = NutritionService::new(MockGateway::replying(&reply));

        let plan = service.generate_meal_plan("Perder peso", Some("")).await.unwrap();
        assert!(plan.is_complete());
        assert!(plan.plan.iter().all(|d| WEEKDAYS.contains(&d.day.as_str())));

        let prompt = service.gateway().last_request().prompt_text();
        assert!(prompt.contains("\"Perder peso\""));
        assert!(prompt.contains("\"Ninguna\""));
    }

    #[tokio::test]
    async fn short_meal_plan_is_permitted_but_incomplete() {
        let service = NutritionService::new(MockGateway::replying(
            r#"{"weeklyGoal":"Ganar músculo","plan":[
                {"day":"Lunes","breakfast":"Huevos","lunch":"Arroz","dinner":"Pollo","snack":"Nueces"},
                {"day":"Martes","breakfast":"Avena","lunch":"Pasta","dinner":"Atún","snack":"Yogur"}
            ]}"#,
        ));
        let plan = service.generate_meal_plan("Ganar músculo", None).await.unwrap();
        assert_eq!(plan.plan.len(), 2);
        assert!(!plan.is_complete());
    }

    #[tokio::test]
    async fn blank_goal_is_rejected_without_a_call() {
        let service = NutritionService::new(MockGateway::replying("{}"));
        let err = service.generate_meal_plan("  ", None).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ServiceError>(), Some(ServiceError::EmptyGoal)));
        assert_eq!(service.gateway().calls(), 0);
    }

    // ── failures ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn missing_response_for_every_operation() {
        for reply in [None, Some(String::new())] {
            let service = NutritionService::new(MockGateway::with(Ok(reply.clone())));
            let err = service.analyze_food_image(&image()).await.unwrap_err();
            assert!(matches!(parse_error(&err), ParseError::MissingResponse));

            let service = NutritionService::new(MockGateway::with(Ok(reply.clone())));
            let err = service.suggest_recipes(&image()).await.unwrap_err();
            assert!(matches!(parse_error(&err), ParseError::MissingResponse));

            let service = NutritionService::new(MockGateway::with(Ok(reply)));
            let err = service.generate_meal_plan("Comer sano", None).await.unwrap_err();
            assert!(matches!(parse_error(&err), ParseError::MissingResponse));
        }
    }

    #[tokio::test]
    async fn network_error_propagates_unchanged() {
        let service = NutritionService::new(MockGateway::with(Err(NetworkError.into())));
        let err = service.analyze_food_image(&image()).await.unwrap_err();
        assert!(err.downcast_ref::<NetworkError>().is_some());
        assert!(err.downcast_ref::<ParseError>().is_none());
        assert_eq!(err.to_string(), "connection reset by peer");
    }

    #[tokio::test]
    async fn malformed_and_mismatched_responses() {
        let service = NutritionService::new(MockGateway::replying("Lo siento, no puedo."));
        let err = service.analyze_food_image(&image()).await.unwrap_err();
        assert!(matches!(parse_error(&err), ParseError::Malformed(_)));

        let service = NutritionService::new(MockGateway::replying(r#"{"foodName":"Pizza"}"#));
        let err = service.analyze_food_image(&image()).await.unwrap_err();
        assert!(matches!(
            parse_error(&err),
            ParseError::ShapeMismatch { expected: "nutrition analysis", .. }
        ));
    }
}
