//! Instructions and response schemas for the three use cases.
//!
//! Schemas use the OpenAPI subset accepted by Gemini's `responseSchema`
//! (upper-case type names, `required` lists, `enum` on strings).

use serde_json::{Value, json};

use super::GenerationRequest;
use crate::encoder::EncodedImage;
use crate::models::Difficulty;

/// Used when the user gives no dietary restriction.
pub const DEFAULT_RESTRICTIONS: &str = "Ninguna";

pub const ANALYZE_INSTRUCTION: &str = "Analiza esta comida. Identifica el plato principal, \
estima las calorías totales, y desglose de macronutrientes (proteína, carbohidratos, grasa). \
Da una puntuación de salud del 1 al 10, un breve resumen y un consejo.";

pub const RECIPES_INSTRUCTION: &str = "Mira estos ingredientes en la foto (nevera o despensa). \
Sugiere 3 recetas creativas que se puedan hacer principalmente con estos ingredientes. \
Asume que el usuario tiene básicos como aceite, sal, pimienta.";

/// Request for [`crate::service::NutritionService::analyze_food_image`].
pub fn analyze_request(image: &EncodedImage) -> GenerationRequest {
    GenerationRequest::with_image(image, ANALYZE_INSTRUCTION, nutrition_schema())
}

/// Request for [`crate::service::NutritionService::suggest_recipes`].
pub fn recipes_request(image: &EncodedImage) -> GenerationRequest {
    GenerationRequest::with_image(image, RECIPES_INSTRUCTION, recipes_schema())
}

/// Request for [`crate::service::NutritionService::generate_meal_plan`].
pub fn meal_plan_request(goal: &str, restrictions: Option<&str>) -> GenerationRequest {
    GenerationRequest::text(meal_plan_prompt(goal, restrictions), meal_plan_schema())
}

/// Resolve the restriction text, defaulting blank input to [`DEFAULT_RESTRICTIONS`].
pub fn effective_restrictions(restrictions: Option<&str>) -> &str {
    match restrictions.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => DEFAULT_RESTRICTIONS,
    }
}

pub fn meal_plan_prompt(goal: &str, restrictions: Option<&str>) -> String {
    format!(
        "Genera un plan de alimentación semanal (Lunes a Domingo) para una persona con el objetivo: \"{}\".\n\
         Restricciones o preferencias dietéticas: \"{}\".\n\
         Devuelve la respuesta en JSON estructurado.",
        goal.trim(),
        effective_restrictions(restrictions)
    )
}

/// Object with the eight required [`crate::models::NutritionAnalysis`] fields.
pub fn nutrition_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "foodName": { "type": "STRING" },
            "calories": { "type": "NUMBER", "description": "Total estimated calories" },
            "protein": { "type": "NUMBER", "description": "Protein in grams" },
            "carbs": { "type": "NUMBER", "description": "Carbohydrates in grams" },
            "fat": { "type": "NUMBER", "description": "Fat in grams" },
            "healthScore": { "type": "NUMBER", "description": "Score from 1 to 10 based on nutritional value" },
            "summary": { "type": "STRING", "description": "A short description of the meal" },
            "advice": { "type": "STRING", "description": "Nutritional advice regarding this meal" }
        },
        "required": ["foodName", "calories", "protein", "carbs", "fat", "healthScore", "summary", "advice"]
    })
}

/// Array of [`crate::models::Recipe`] objects.
pub fn recipes_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "difficulty": { "type": "STRING", "enum": Difficulty::WIRE_VALUES },
                "timeMinutes": { "type": "NUMBER" },
                "calories": { "type": "NUMBER" },
                "ingredients": { "type": "ARRAY", "items": { "type": "STRING" } },
                "instructions": { "type": "ARRAY", "items": { "type": "STRING" } }
            },
            "required": ["title", "difficulty", "timeMinutes", "calories", "ingredients", "instructions"]
        }
    })
}

pub fn meal_plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "weeklyGoal": { "type": "STRING", "description": "Summary of the goal focusing on nutrition" },
            "plan": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "day": { "type": "STRING" },
                        "breakfast": { "type": "STRING" },
                        "lunch": { "type": "STRING" },
                        "dinner": { "type": "STRING" },
                        "snack": { "type": "STRING" }
                    },
                    "required": ["day", "breakfast", "lunch", "dinner", "snack"]
                }
            }
        },
        "required": ["weeklyGoal", "plan"]
    })
}
