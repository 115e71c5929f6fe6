use serde::{Deserialize, Serialize};

/// Nutrition estimate for a single photographed meal.
///
/// All numeric fields are required. `health_score` is meant to fall in 1–10,
/// but the range is the model's promise, not something checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionAnalysis {
    pub food_name: String,
    /// Total estimated kcal.
    pub calories: f64,
    /// Grams.
    pub protein: f64,
    /// Grams.
    pub carbs: f64,
    /// Grams.
    pub fat: f64,
    pub health_score: f64,
    pub summary: String,
    pub advice: String,
}

/// One slice of the macronutrient chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroData {
    pub name: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

impl NutritionAnalysis {
    /// Protein, carbs and fat in chart order.
    pub fn macro_breakdown(&self) -> [MacroData; 3] {
        [
            MacroData { name: "Proteína", value: self.protein, unit: "g" },
            MacroData { name: "Carbohidratos", value: self.carbs, unit: "g" },
            MacroData { name: "Grasa", value: self.fat, unit: "g" },
        ]
    }

    /// Total macronutrient mass in grams.
    pub fn macro_grams(&self) -> f64 {
        self.protein + self.carbs + self.fat
    }
}

/// Recipe difficulty as declared in the response schema.
///
/// The wire values are Spanish; English names are accepted on input too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Fácil", alias = "Easy")]
    Easy,
    #[serde(rename = "Media", alias = "Medium")]
    Medium,
    #[serde(rename = "Difícil", alias = "Hard")]
    Hard,
}

impl Difficulty {
    /// Enumeration values sent in the recipe schema.
    pub const WIRE_VALUES: [&'static str; 3] = ["Fácil", "Media", "Difícil"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Fácil",
            Self::Medium => "Media",
            Self::Hard => "Difícil",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recipe suggestion built mostly from the photographed ingredients.
///
/// `ingredients` and `instructions` keep the model's order; steps are meant
/// to be followed in sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub difficulty: Difficulty,
    pub time_minutes: f64,
    pub calories: f64,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

/// Meals for one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: String,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub snack: String,
}

/// Weekly plan, Monday first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanResponse {
    pub weekly_goal: String,
    pub plan: Vec<DayPlan>,
}

/// Weekday names the plan prompt asks for, in order.
pub const WEEKDAYS: [&str; 7] = [
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
    "Domingo",
];

impl MealPlanResponse {
    /// Whether the model returned one entry per weekday. Parsing never
    /// rejects a short or long plan; this is for display only.
    pub fn is_complete(&self) -> bool {
        self.plan.len() == WEEKDAYS.len()
    }
}
