use crate::recipes::dto::Recipe;

/// Persona instruction sent with every assistant call.
pub const SYSTEM_PROMPT: &str = "You are Bhayia AI, a friendly Indian cooking assistant. \
Always keep answers short, clear, and to the point. Use bullet points or short sentences \
when needed. Avoid unnecessary explanations or over-friendly tone. Prioritize clarity \
and brevity. Be warm and helpful, but concise.";

/// Recipe block embedded in the user message: title, comma-joined
/// ingredients, newline-joined steps, nutrition text.
pub fn recipe_details(recipe: &Recipe) -> String {
    format!(
        "Title: {}\nIngredients: {}\nSteps: {}\nNutrition: {}",
        recipe.title,
        recipe.ingredients.join(", "),
        recipe.steps.join("\n"),
        recipe.nutritional_benefits,
    )
}

pub fn user_message(recipe: &Recipe, question: &str) -> String {
    format!(
        "Here's the recipe:\n{}\n\nQuestion: {}",
        recipe_details(recipe),
        question
    )
}
