use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A generated recipe as persisted in the `recipes` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    #[serde(rename = "_id")]
    pub id: String,

    /// The ingredients the caller asked for, in request order.
    pub ingredients: Vec<String>,

    pub title: String,

    /// One entry per non-empty line of the generated instruction text.
    pub instructions: Vec<String>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Build a recipe from the requested ingredients and an accepted candidate.
    ///
    /// The candidate's own ingredient list is discarded: the stored recipe
    /// always records what the caller asked for.
    pub fn from_candidate(requested: Vec<String>, candidate: RecipeCandidate) -> Self {
        let now = super::now_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            ingredients: requested,
            title: candidate.title,
            instructions: split_instructions(&candidate.instructions),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Structured output expected back from the model.
///
/// Deserialisation enforces presence and types; [`Validate`] enforces the
/// non-empty constraints.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, PartialEq)]
pub struct RecipeCandidate {
    #[validate(length(min = 1, message = "Recipe must include at least one ingredient."))]
    pub ingredients: Vec<String>,

    #[validate(custom(function = "not_blank"))]
    pub title: String,

    #[validate(custom(function = "not_blank"))]
    pub instructions: String,
}

impl RecipeCandidate {
    /// Return a copy with surrounding whitespace removed from text fields.
    pub fn trimmed(self) -> Self {
        Self {
            ingredients: self.ingredients,
            title: self.title.trim().to_string(),
            instructions: self.instructions.trim().to_string(),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::from("must not be empty"));
        return Err(err);
    }
    Ok(())
}

/// Split free-text instructions into trimmed, non-empty steps.
pub fn split_instructions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(ingredients: &[&str], title: &str, instructions: &str) -> RecipeCandidate {
        RecipeCandidate {
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            title: title.to_string(),
            instructions: instructions.to_string(),
        }
    }

    #[test]
    fn valid_candidate_passes() {
        let c = candidate(&["Egg"], "Boiled Egg", "Boil the egg.");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn blank_title_and_instructions_are_rejected() {
        let c = candidate(&["Egg"], "   ", "\n\t");
        let errors = c.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("instructions"));
    }

    #[test]
    fn empty_ingredient_list_is_rejected() {
        let c = candidate(&[], "Air", "Breathe.");
        let errors = c.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("ingredients"));
    }

    #[test]
    fn split_instructions_drops_blank_lines() {
        let steps = split_instructions("1. Crack eggs.\n\n  2. Whisk.  \r\n3. Fry.\n");
        assert_eq!(steps, vec!["1. Crack eggs.", "2. Whisk.", "3. Fry."]);
    }

    #[test]
    fn recipe_keeps_requested_ingredients() {
        let requested = vec!["Egg".to_string(), "Milk".to_string(), "Rice".to_string()];
        let c = candidate(&["Egg"], " Omelette ", "Whisk.\nCook.").trimmed();
        let recipe = Recipe::from_candidate(requested.clone(), c);

        assert_eq!(recipe.ingredients, requested);
        assert_eq!(recipe.title, "Omelette");
        assert_eq!(recipe.instructions, vec!["Whisk.", "Cook."]);
        assert_eq!(recipe.created_at, recipe.updated_at);
    }

    #[test]
    fn from_candidate_timestamps_match_stored_precision() {
        let recipe = Recipe::from_candidate(
            vec!["Egg".to_string()],
            candidate(&["Egg"], "Boiled Egg", "Boil the egg."),
        );

        let stored = mongodb::bson::to_document(&recipe).unwrap();
        let read_back: Recipe = mongodb::bson::from_document(stored).unwrap();
        assert_eq!(read_back.created_at, recipe.created_at);
        assert_eq!(read_back.updated_at, recipe.updated_at);
    }
}
